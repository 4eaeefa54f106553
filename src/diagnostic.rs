//! Non-fatal findings reported while parsing.
//!
//! The parser never logs on its own. It hands every warning and debug
//! note to a `DiagnosticSink` chosen by the caller.

use std::fmt;

use crate::line::Span;

/// How loud a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Warning,
}

/// Classifies a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// The store already holds `key` and override is off.
    KeyAlreadyDefined { key: String },
    /// `${name}` in the value of `key` has no value anywhere.
    InterpolationKeyNotFound { key: String, name: String },
    /// `${name}` in the value of `key` re-entered its own substitution.
    InterpolationCycle { key: String, name: String },
    /// A logical line without an unescaped `=`.
    MalformedLine,
    /// A line starting with `=`.
    EmptyKey,
    /// The store refused the key or value.
    InvalidKey { key: String, reason: String },
    /// `key` was committed with `value`.
    KeySet { key: String, value: String },
    /// A file finished parsing.
    FileProcessed { lines: usize, bytes: usize },
}

impl DiagnosticKind {
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::KeySet { .. } | Self::FileProcessed { .. } => Severity::Debug,
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyAlreadyDefined { key } => {
                write!(
                    f,
                    "key '{key}' is already defined, skipping (enable override to replace it)"
                )
            }
            Self::InterpolationKeyNotFound { key, name } => {
                write!(
                    f,
                    "key '{key}' references '${{{name}}}', which has no value; \
                     substituting an empty string"
                )
            }
            Self::InterpolationCycle { key, name } => {
                write!(
                    f,
                    "key '{key}' references '${{{name}}}' from within its own \
                     substitution; substituting an empty string"
                )
            }
            Self::MalformedLine => {
                write!(f, "line has no '=' assignment, skipping")
            }
            Self::EmptyKey => {
                write!(f, "assignment has an empty key, skipping")
            }
            Self::InvalidKey { key, reason } => {
                write!(f, "unable to set '{key}': {reason}")
            }
            Self::KeySet { key, value } => {
                write!(f, "set '{key}' to '{value}'")
            }
            Self::FileProcessed { lines, bytes } => {
                let s = if *lines == 1 { "" } else { "s" };
                write!(f, "processed {lines} line{s} and {bytes} bytes")
            }
        }
    }
}

/// A finding tied to a file and, when known, a location in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub file: String,
    pub span: Option<Span>,
}

impl Diagnostic {
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.span {
            Some(span) => write!(f, "{}:{}:{}: {}", self.file, span.line, span.column, self.kind),
            None => write!(f, "{}: {}", self.file, self.kind),
        }
    }
}

/// Receives diagnostics as they are produced.
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        let line = diagnostic.span.map(|s| s.line);
        let column = diagnostic.span.map(|s| s.column);
        match diagnostic.severity() {
            Severity::Warning => tracing::warn!(
                file = %diagnostic.file,
                line,
                column,
                "{}",
                diagnostic.kind
            ),
            Severity::Debug => tracing::debug!(
                file = %diagnostic.file,
                line,
                column,
                "{}",
                diagnostic.kind
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_location() {
        let d = Diagnostic {
            kind: DiagnosticKind::InterpolationKeyNotFound {
                key: "NO_INTERP".to_string(),
                name: "UNDEFINED_KEY".to_string(),
            },
            file: ".env".to_string(),
            span: Some(Span::new(4, 11)),
        };
        let msg = d.to_string();
        assert!(msg.starts_with(".env:4:11: "));
        assert!(msg.contains("${UNDEFINED_KEY}"));
        assert_eq!(d.severity(), Severity::Warning);
    }

    #[test]
    fn display_without_location() {
        let d = Diagnostic {
            kind: DiagnosticKind::FileProcessed { lines: 1, bytes: 4 },
            file: "a.env".to_string(),
            span: None,
        };
        assert_eq!(d.to_string(), "a.env: processed 1 line and 4 bytes");
        assert_eq!(d.severity(), Severity::Debug);
    }
}
