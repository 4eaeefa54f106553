#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use nvi_rs::{Diagnostic, DiagnosticKind, EnvMap, MemoryStore, Options, Parser, load};
use tempfile::TempDir;

pub fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// Parse `input` as one file against `store`.
pub fn parse_into(
    store: &mut MemoryStore,
    input: &str,
    override_existing: bool,
) -> (EnvMap, Vec<Diagnostic>) {
    let mut envs = EnvMap::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    Parser::new(store, &mut envs, &mut diagnostics)
        .override_existing(override_existing)
        .parse(".env", input)
        .unwrap_or_else(|e| panic!("failed to parse: {e}\n--- input ---\n{input}"));
    (envs, diagnostics)
}

/// Parse `input` against a fresh, empty store.
pub fn parse_fresh(input: &str) -> EnvMap {
    parse_into(&mut MemoryStore::new(), input, false).0
}

/// Load `options` against `store`, collecting diagnostics.
pub fn load_into(
    options: &Options,
    store: &mut MemoryStore,
) -> (Result<EnvMap, nvi_rs::Error>, Vec<Diagnostic>) {
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let result = load(options, store, &mut diagnostics);
    (result, diagnostics)
}

/// Temporary directory holding the given `(name, contents)` files.
pub fn env_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    for (name, contents) in files {
        fs::write(dir.path().join(name), contents).expect("write env file");
    }
    dir
}

pub fn not_found_names(diagnostics: &[Diagnostic]) -> Vec<&str> {
    diagnostics
        .iter()
        .filter_map(|d| match &d.kind {
            DiagnosticKind::InterpolationKeyNotFound { name, .. } => Some(name.as_str()),
            _ => None,
        })
        .collect()
}
