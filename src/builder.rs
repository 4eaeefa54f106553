use std::path::{Path, PathBuf};

use crate::config::{Encoding, Options};

impl Options {
    /// Options with defaults: `.env` in the current directory, no
    /// override, UTF-8, nothing required, no debug output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base directory for relative file names.
    #[must_use]
    pub fn directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    /// Replace the list of files to parse.
    #[must_use]
    pub fn files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }

    /// Allow assignments to replace keys the store already holds.
    #[must_use]
    pub const fn override_existing(mut self, yes: bool) -> Self {
        self.override_existing = yes;
        self
    }

    #[must_use]
    pub const fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Replace the list of keys that must end up non-empty.
    #[must_use]
    pub fn required<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required = keys.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn debug(mut self, yes: bool) -> Self {
        self.debug = yes;
        self
    }

    /// Path of `file` relative to the configured directory.
    #[must_use]
    pub fn path_for(&self, file: &str) -> PathBuf {
        self.directory
            .as_deref()
            .map_or_else(|| Path::new(file).to_path_buf(), |dir| dir.join(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chains_every_option() {
        let options = Options::new()
            .directory("envs")
            .files(["base.env", "reference.env"])
            .override_existing(true)
            .encoding(Encoding::Latin1)
            .required(["BASE"])
            .debug(true);

        assert_eq!(options.directory, Some(PathBuf::from("envs")));
        assert_eq!(options.files, vec!["base.env", "reference.env"]);
        assert!(options.override_existing);
        assert_eq!(options.encoding, Encoding::Latin1);
        assert_eq!(options.required, vec!["BASE"]);
        assert!(options.debug);
    }

    #[test]
    fn paths_follow_directory() {
        assert_eq!(Options::new().path_for(".env"), PathBuf::from(".env"));
        assert_eq!(
            Options::new().directory("envs").path_for(".env"),
            PathBuf::from("envs").join(".env")
        );
    }
}
