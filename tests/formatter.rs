//! Formatter-specific tests.

mod common;

use common::parse_fresh;
use nvi_rs::{EnvMap, format, to_json};

#[test]
fn format_trailing_newline() {
    let envs: EnvMap = [("A", "1")].into_iter().collect();
    assert!(format(&envs).ends_with('\n'));
}

#[test]
fn format_keeps_insertion_order() {
    let envs = parse_fresh("Z=last\nA=first\nM=middle\n");
    assert_eq!(format(&envs), "Z=last\nA=first\nM=middle\n");
}

#[test]
fn format_output_parses_back() {
    let envs = parse_fresh("BASE=hello\nREF=${BASE} world\nA\\=B=c\nEMPTY=\n");
    let reparsed = parse_fresh(&format(&envs));
    assert_eq!(reparsed, envs);
}

#[test]
fn format_values_are_resolved() {
    let envs = parse_fresh("BASE=hello\nREF=${BASE}\n");
    assert_eq!(format(&envs), "BASE=hello\nREF=hello\n");
}

#[test]
fn format_entries_without_escape_syntax() {
    let envs: EnvMap = [
        ("#HIDDEN", "x"),
        ("MULTI", "a\nB=b"),
        ("TRAILING\\", "v"),
    ]
    .into_iter()
    .collect();
    let text = format(&envs);
    assert_eq!(text, "#HIDDEN=x\nMULTI=a\nB=b\nTRAILING\\=v\n");

    let reparsed = parse_fresh(&text);
    assert!(!reparsed.contains_key("#HIDDEN"));
    assert_eq!(reparsed.get("MULTI"), Some("a"));
    assert_eq!(reparsed.get("B"), Some("b"));
    assert!(!reparsed.contains_key("TRAILING\\"));
}

#[test]
fn json_keeps_insertion_order() {
    let envs = parse_fresh("Z=1\nA=2\n");
    assert_eq!(to_json(&envs).expect("json"), "{\n  \"Z\": \"1\",\n  \"A\": \"2\"\n}");
}

#[test]
fn json_escapes_values() {
    let envs = parse_fresh("QUOTES=sad\"wow\"bak\n");
    let json = to_json(&envs).expect("json");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(value["QUOTES"], "sad\"wow\"bak");
}
