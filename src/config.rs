//! Options for a parse call and the `env.config.json` file that can
//! hold named sets of them.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

/// File parsed when no files are given.
pub const DEFAULT_FILE: &str = ".env";

/// Name of the configuration file read by `load_config`.
pub const CONFIG_FILE: &str = "env.config.json";

/// Options for one parse call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Base path for relative file names. `None` means the current
    /// working directory.
    #[serde(alias = "dir")]
    pub directory: Option<PathBuf>,
    /// Files to parse, in order.
    pub files: Vec<String>,
    /// Whether assignments may replace keys the store already holds.
    #[serde(rename = "override")]
    pub override_existing: bool,
    pub encoding: Encoding,
    /// Keys that must end up with a non-empty value.
    pub required: Vec<String>,
    /// Emit debug diagnostics.
    pub debug: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            directory: None,
            files: vec![DEFAULT_FILE.to_string()],
            override_existing: false,
            encoding: Encoding::default(),
            required: Vec::new(),
            debug: false,
        }
    }
}

/// Text encoding of env files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Encoding {
    #[default]
    #[serde(rename = "utf-8", alias = "utf8")]
    Utf8,
    #[serde(rename = "utf-16le", alias = "utf16le")]
    Utf16Le,
    #[serde(rename = "latin1", alias = "binary")]
    Latin1,
}

/// The bytes are not valid in the chosen encoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {encoding} text")]
pub struct DecodeError {
    pub encoding: Encoding,
}

/// Unrecognized encoding name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown encoding '{0}', expected one of: utf-8, utf-16le, latin1")]
pub struct UnknownEncoding(pub String);

impl Encoding {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Utf16Le => "utf-16le",
            Self::Latin1 => "latin1",
        }
    }

    /// Decode raw file bytes.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` when the bytes are not valid in this
    /// encoding. Latin-1 never fails.
    pub fn decode(self, bytes: &[u8]) -> Result<String, DecodeError> {
        let err = DecodeError { encoding: self };
        match self {
            Self::Utf8 => String::from_utf8(bytes.to_vec()).map_err(|_| err),
            Self::Utf16Le => {
                if bytes.len() % 2 != 0 {
                    return Err(err);
                }
                let units: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                    .collect();
                String::from_utf16(&units).map_err(|_| err)
            }
            Self::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Encoding {
    type Err = UnknownEncoding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "utf-16le" | "utf16le" => Ok(Self::Utf16Le),
            "latin1" | "binary" => Ok(Self::Latin1),
            _ => Err(UnknownEncoding(s.to_string())),
        }
    }
}

/// Errors from loading `env.config.json`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unable to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to parse '{}', ensure it is valid JSON: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("'{}' must contain a JSON object of environments", path.display())]
    NotAnObject { path: PathBuf },

    #[error("unable to find a '{environment}' environment in '{}'", path.display())]
    EnvironmentNotFound { environment: String, path: PathBuf },

    #[error("the '{environment}' environment in '{}' must list at least one file", path.display())]
    NoFiles { environment: String, path: PathBuf },
}

/// Read `env.config.json` from `directory` (or the current working
/// directory) and return the options stored under `environment`.
///
/// # Errors
///
/// Returns `ConfigError` when the file cannot be read or parsed, or
/// the environment is absent or lists no files.
pub fn load_config(environment: &str, directory: Option<&Path>) -> Result<Options, ConfigError> {
    let path = directory.map_or_else(|| PathBuf::from(CONFIG_FILE), |d| d.join(CONFIG_FILE));
    let text = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let options = parse_config(environment, &text, &path)?;
    tracing::debug!(
        environment,
        path = %path.display(),
        ?options,
        "loaded environment configuration"
    );
    Ok(options)
}

/// Select `environment` from the JSON text of a configuration file.
/// `path` is only used in error messages.
///
/// # Errors
///
/// See `load_config`.
pub fn parse_config(environment: &str, json: &str, path: &Path) -> Result<Options, ConfigError> {
    let parse_err = |source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    };

    let value: serde_json::Value = serde_json::from_str(json).map_err(parse_err)?;
    let serde_json::Value::Object(mut environments) = value else {
        return Err(ConfigError::NotAnObject {
            path: path.to_path_buf(),
        });
    };
    let entry = environments
        .remove(environment)
        .ok_or_else(|| ConfigError::EnvironmentNotFound {
            environment: environment.to_string(),
            path: path.to_path_buf(),
        })?;
    let options: Options = serde_json::from_value(entry).map_err(parse_err)?;

    if options.files.is_empty() {
        return Err(ConfigError::NoFiles {
            environment: environment.to_string(),
            path: path.to_path_buf(),
        });
    }

    Ok(options)
}
