//! Parser for `.env` files.
//!
//! Reads `KEY=value` lines into an ordered map, resolving `${NAME}`
//! references against the process environment and earlier assignments,
//! joining `\`-continued lines, and merging every accepted assignment
//! into a caller-supplied store (normally the process environment).
//!
//! # Quick start
//!
//! ## Parse text against an in-memory store
//!
//! ```
//! use nvi_rs::{Diagnostic, EnvMap, MemoryStore, Parser};
//!
//! let mut store = MemoryStore::new();
//! let mut envs = EnvMap::new();
//! let mut diagnostics: Vec<Diagnostic> = Vec::new();
//!
//! Parser::new(&mut store, &mut envs, &mut diagnostics)
//!     .parse(".env", "BASE=hello\nREFERENCE=${BASE} world\n")
//!     .unwrap();
//!
//! assert_eq!(envs.get("REFERENCE"), Some("hello world"));
//! assert!(diagnostics.is_empty());
//! ```
//!
//! ## Load files into the process environment
//!
//! ```no_run
//! use nvi_rs::{Options, load_process_env};
//!
//! let options = Options::new()
//!     .directory("config")
//!     .files([".env", ".env.local"])
//!     .required(["DATABASE_URL"]);
//!
//! let envs = load_process_env(&options).unwrap();
//! println!("loaded {} keys", envs.len());
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod assignment;
pub mod builder;
pub mod config;
pub mod diagnostic;
pub mod env_map;
pub mod formatter;
pub mod interpolate;
pub mod line;
pub mod loader;
pub mod parser;
pub mod required;
pub mod scanner;
pub mod store;

pub use assignment::{Assignment, split_assignment};
pub use config::{
    CONFIG_FILE, ConfigError, DEFAULT_FILE, DecodeError, Encoding, Options, UnknownEncoding,
    load_config, parse_config,
};
pub use diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSink, Severity, TracingSink};
pub use env_map::EnvMap;
pub use formatter::{format, to_json};
pub use interpolate::{InterpolationError, Resolved, Unresolved, UnresolvedReason, resolve};
pub use line::{LogicalLine, Span};
pub use loader::{load, load_process_env};
pub use parser::{FileError, FileErrorKind, Parser};
pub use required::{MissingKeys, check_required};
pub use scanner::{Scanner, scan};
pub use store::{MemoryStore, ProcessEnv, Store, StoreError};

/// Unified error type for a load call.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// One or more files failed to read, decode, or parse. `missing`
    /// holds the required-key check that still ran afterwards.
    #[error("{}", describe_files(errors, missing.as_ref()))]
    Files {
        errors: Vec<FileError>,
        missing: Option<MissingKeys>,
    },
    /// Required keys are missing or empty after all files.
    #[error(transparent)]
    RequiredKeyMissing(#[from] MissingKeys),
    /// `env.config.json` could not be used.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<FileError> for Error {
    fn from(e: FileError) -> Self {
        Self::Files {
            errors: vec![e],
            missing: None,
        }
    }
}

fn describe_files(errors: &[FileError], missing: Option<&MissingKeys>) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .chain(missing.map(ToString::to_string))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Parse a single in-memory file against `store` in one step.
pub fn parse_str<S: Store + ?Sized>(
    file: &str,
    input: &str,
    store: &mut S,
    override_existing: bool,
) -> Result<(EnvMap, Vec<Diagnostic>), Error> {
    let mut envs = EnvMap::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    Parser::new(store, &mut envs, &mut diagnostics)
        .override_existing(override_existing)
        .parse(file, input)?;
    Ok((envs, diagnostics))
}
