use crate::env_map::EnvMap;

/// Required keys that ended up missing or empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "the following keys are marked as required but are undefined or empty \
     after all files were parsed: {}",
    keys.join(", ")
)]
pub struct MissingKeys {
    pub keys: Vec<String>,
}

/// Check that every key in `required` has a non-empty value in `envs`.
///
/// # Errors
///
/// Returns `MissingKeys` listing every offending key, in the order
/// they were required.
pub fn check_required<K: AsRef<str>>(required: &[K], envs: &EnvMap) -> Result<(), MissingKeys> {
    let keys: Vec<String> = required
        .iter()
        .map(AsRef::as_ref)
        .filter(|key| envs.get(key).is_none_or(str::is_empty))
        .map(str::to_string)
        .collect();

    if keys.is_empty() {
        Ok(())
    } else {
        Err(MissingKeys { keys })
    }
}
