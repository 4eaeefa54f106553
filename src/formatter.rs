//! Renders an `EnvMap` back into text.

use crate::env_map::EnvMap;

/// Format `envs` as env file text, one `KEY=value` line per entry in
/// insertion order.
///
/// An `=` inside a key is written as `\=`. Everything else is written
/// as-is, and the env file syntax has no way to escape it, so these
/// entries do not parse back to themselves:
///
/// - a value ending in an odd run of backslashes continues onto the
///   next line;
/// - a value containing `\n` is split, and the text after the newline
///   is read as a new line;
/// - a key starting with `#` turns the line into a comment;
/// - a key with a backslash directly before an `=` (or at its end)
///   shifts where the key is split.
#[must_use]
pub fn format(envs: &EnvMap) -> String {
    let mut out = String::new();
    for (key, value) in envs {
        out.push_str(&key.replace('=', "\\="));
        out.push('=');
        out.push_str(value);
        out.push('\n');
    }
    out
}

/// Format `envs` as a pretty-printed JSON object in insertion order.
///
/// # Errors
///
/// Propagates `serde_json` serialization errors.
pub fn to_json(envs: &EnvMap) -> serde_json::Result<String> {
    serde_json::to_string_pretty(envs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotenv_lines_in_order() {
        let envs: EnvMap = [("B", "2"), ("A", "x y")].into_iter().collect();
        assert_eq!(format(&envs), "B=2\nA=x y\n");
    }

    #[test]
    fn escapes_operator_in_key() {
        let envs: EnvMap = [("A=B", "c")].into_iter().collect();
        assert_eq!(format(&envs), "A\\=B=c\n");
    }

    #[test]
    fn empty_map() {
        assert_eq!(format(&EnvMap::new()), "");
        assert_eq!(to_json(&EnvMap::new()).expect("json"), "{}");
    }

    #[test]
    fn json_object() {
        let envs: EnvMap = [("A", "1")].into_iter().collect();
        assert_eq!(to_json(&envs).expect("json"), "{\n  \"A\": \"1\"\n}");
    }
}
