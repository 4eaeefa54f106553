use std::fmt;
use std::path::PathBuf;

use crate::assignment::split_assignment;
use crate::diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::env_map::EnvMap;
use crate::interpolate::{self, InterpolationError, UnresolvedReason};
use crate::line::{LogicalLine, Span};
use crate::scanner::scan;
use crate::store::Store;

/// Classifies a fatal per-file error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileErrorKind {
    /// The file does not exist.
    NotFound { path: PathBuf },
    /// The file exists but could not be read.
    Read { path: PathBuf, reason: String },
    /// The bytes are not valid in the configured encoding.
    Decode { encoding: String },
    /// `${` without a closing `}` in the value of `key`.
    InterpolationUnclosed { key: String },
}

impl fmt::Display for FileErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => {
                write!(f, "unable to locate '{}', the file doesn't exist", path.display())
            }
            Self::Read { path, reason } => {
                write!(f, "unable to read '{}': {reason}", path.display())
            }
            Self::Decode { encoding } => {
                write!(f, "file is not valid {encoding}")
            }
            Self::InterpolationUnclosed { key } => {
                write!(
                    f,
                    "key '{key}' contains an interpolated '${{' \
                     without a closing '}}'"
                )
            }
        }
    }
}

/// Error that stops parsing of one file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}: {kind}", location(file, span.as_ref()))]
pub struct FileError {
    pub file: String,
    pub kind: FileErrorKind,
    pub span: Option<Span>,
}

fn location(file: &str, span: Option<&Span>) -> String {
    span.map_or_else(
        || file.to_string(),
        |s| format!("{file}:{}:{}", s.line, s.column),
    )
}

/// Parses env files into an `EnvMap` and a `Store`.
///
/// Every accepted assignment is written to both immediately, so later
/// lines and later files see it for override checks and lookups.
pub struct Parser<'a, S: ?Sized, D: ?Sized> {
    store: &'a mut S,
    envs: &'a mut EnvMap,
    sink: &'a mut D,
    override_existing: bool,
    debug: bool,
}

impl<'a, S, D> Parser<'a, S, D>
where
    S: Store + ?Sized,
    D: DiagnosticSink + ?Sized,
{
    pub const fn new(store: &'a mut S, envs: &'a mut EnvMap, sink: &'a mut D) -> Self {
        Self {
            store,
            envs,
            sink,
            override_existing: false,
            debug: false,
        }
    }

    /// Allow assignments to replace keys the store already holds.
    #[must_use]
    pub const fn override_existing(mut self, yes: bool) -> Self {
        self.override_existing = yes;
        self
    }

    /// Emit debug diagnostics for each committed key and each file.
    #[must_use]
    pub const fn debug(mut self, yes: bool) -> Self {
        self.debug = yes;
        self
    }

    /// Parse the text of one file.
    ///
    /// Assignments committed before an error stay committed.
    ///
    /// # Errors
    ///
    /// Returns `FileErrorKind::InterpolationUnclosed` and stops at the
    /// offending line when a value has an unclosed `${`.
    pub fn parse(&mut self, file: &str, input: &str) -> Result<(), FileError> {
        let mut scanner = scan(input);

        for line in scanner.by_ref() {
            self.assign(file, &line)?;
        }

        if self.debug {
            self.emit(
                file,
                None,
                DiagnosticKind::FileProcessed {
                    lines: scanner.lines(),
                    bytes: scanner.position(),
                },
            );
        }

        Ok(())
    }

    fn assign(&mut self, file: &str, line: &LogicalLine<'_>) -> Result<(), FileError> {
        let Some(assignment) = split_assignment(&line.content) else {
            self.emit(file, Some(line.span_at(0)), DiagnosticKind::MalformedLine);
            return Ok(());
        };
        let key = assignment.key.as_ref();

        if key.is_empty() {
            self.emit(file, Some(line.span_at(0)), DiagnosticKind::EmptyKey);
            return Ok(());
        }

        if !self.override_existing && self.store.has(key) {
            self.emit(
                file,
                Some(line.span_at(0)),
                DiagnosticKind::KeyAlreadyDefined {
                    key: key.to_string(),
                },
            );
            return Ok(());
        }

        let resolved = interpolate::resolve(assignment.value, &*self.store, &*self.envs).map_err(
            |InterpolationError::Unclosed { offset }| FileError {
                file: file.to_string(),
                kind: FileErrorKind::InterpolationUnclosed {
                    key: key.to_string(),
                },
                span: Some(line.span_at(assignment.value_offset + offset)),
            },
        )?;

        for unresolved in resolved.unresolved {
            let span = line.span_at(assignment.value_offset + unresolved.offset);
            let kind = match unresolved.reason {
                UnresolvedReason::NotFound => DiagnosticKind::InterpolationKeyNotFound {
                    key: key.to_string(),
                    name: unresolved.name,
                },
                UnresolvedReason::Cycle => DiagnosticKind::InterpolationCycle {
                    key: key.to_string(),
                    name: unresolved.name,
                },
            };
            self.emit(file, Some(span), kind);
        }

        self.commit(file, line, key, resolved.value);
        Ok(())
    }

    fn commit(&mut self, file: &str, line: &LogicalLine<'_>, key: &str, value: String) {
        if let Err(e) = self.store.set(key, &value) {
            self.emit(
                file,
                Some(line.span_at(0)),
                DiagnosticKind::InvalidKey {
                    key: key.to_string(),
                    reason: e.to_string(),
                },
            );
            return;
        }

        if self.debug {
            self.emit(
                file,
                Some(line.span_at(0)),
                DiagnosticKind::KeySet {
                    key: key.to_string(),
                    value: value.clone(),
                },
            );
        }

        self.envs.insert(key, value);
    }

    fn emit(&mut self, file: &str, span: Option<Span>, kind: DiagnosticKind) {
        self.sink.emit(Diagnostic {
            kind,
            file: file.to_string(),
            span,
        });
    }
}
