//! `${NAME}` substitution over a raw value.
//!
//! The value is scanned left to right. A resolved reference is spliced
//! into the pending text and scanning resumes at the start of the
//! spliced text, so references inside looked-up values are resolved in
//! the same pass. A reference that would re-enter a substitution still
//! in progress is cut off and reported as a cycle.

use std::borrow::Cow;
use std::fmt;

use crate::env_map::EnvMap;
use crate::store::Store;

const CONTINUATION: &str = "\\\n";
const OPEN: &str = "${";
const CLOSE: char = '}';

/// Fatal interpolation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InterpolationError {
    /// `${` without a closing `}`. `offset` is the byte offset of the
    /// outermost reference in the raw value.
    #[error("unclosed '${{' at offset {offset}")]
    Unclosed { offset: usize },
}

/// Why a reference resolved to an empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedReason {
    NotFound,
    Cycle,
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::Cycle => write!(f, "refers to itself"),
        }
    }
}

/// A reference that was replaced by an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unresolved {
    pub name: String,
    /// Byte offset of the outermost reference in the raw value.
    pub offset: usize,
    pub reason: UnresolvedReason,
}

/// Output of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Resolved {
    pub value: String,
    pub unresolved: Vec<Unresolved>,
}

/// Resolve every `${NAME}` in `raw`.
///
/// Names are looked up in `store` first, then in `envs`. Unknown names
/// become empty strings and are listed in `Resolved::unresolved`.
///
/// # Errors
///
/// Returns `InterpolationError::Unclosed` when a `${` has no matching
/// `}` in the remaining text.
pub fn resolve<S: Store + ?Sized>(
    raw: &str,
    store: &S,
    envs: &EnvMap,
) -> Result<Resolved, InterpolationError> {
    Resolver::new(raw, store, envs).run()
}

// A substitution whose text has not been fully scanned yet. `tail` is
// the length of pending text that followed the reference when it was
// spliced; the frame is active while more than `tail` bytes remain.
struct Frame {
    name: String,
    tail: usize,
}

struct Resolver<'a, S: ?Sized> {
    raw_len: usize,
    pending: Cow<'a, str>,
    pos: usize,
    frames: Vec<Frame>,
    origin: usize,
    out: String,
    unresolved: Vec<Unresolved>,
    store: &'a S,
    envs: &'a EnvMap,
}

impl<'a, S: Store + ?Sized> Resolver<'a, S> {
    fn new(raw: &'a str, store: &'a S, envs: &'a EnvMap) -> Self {
        Self {
            raw_len: raw.len(),
            pending: Cow::Borrowed(raw),
            pos: 0,
            frames: Vec::new(),
            origin: 0,
            out: String::with_capacity(raw.len()),
            unresolved: Vec::new(),
            store,
            envs,
        }
    }

    fn remaining(&self) -> usize {
        self.pending.len() - self.pos
    }

    fn run(mut self) -> Result<Resolved, InterpolationError> {
        while self.pos < self.pending.len() {
            let rest = &self.pending[self.pos..];
            let Some(next) = rest.find(['$', '\\']) else {
                self.out.push_str(rest);
                break;
            };
            self.out.push_str(&rest[..next]);
            self.pos += next;

            let rest = &self.pending[self.pos..];
            if rest.starts_with(CONTINUATION) {
                self.pos += CONTINUATION.len();
            } else if rest.starts_with(OPEN) {
                self.interpolate()?;
            } else {
                // '$' or '\' on its own
                self.out.push_str(&rest[..1]);
                self.pos += 1;
            }
        }

        Ok(Resolved {
            value: self.out,
            unresolved: self.unresolved,
        })
    }

    fn interpolate(&mut self) -> Result<(), InterpolationError> {
        let remaining = self.remaining();
        self.frames.retain(|f| f.tail < remaining);
        if self.frames.is_empty() {
            self.origin = self.raw_len - remaining;
        }

        let rest = &self.pending[self.pos..];
        let close = rest.find(CLOSE).ok_or(InterpolationError::Unclosed {
            offset: self.origin,
        })?;
        let name = rest[OPEN.len()..close].to_string();
        let tail = remaining - close - 1;

        // Only a reference lying wholly inside a substitution re-enters it.
        if self.frames.iter().any(|f| f.tail <= tail && f.name == name) {
            self.pos += close + 1;
            self.unresolved.push(Unresolved {
                name,
                offset: self.origin,
                reason: UnresolvedReason::Cycle,
            });
            return Ok(());
        }

        let found = self
            .store
            .get(&name)
            .or_else(|| self.envs.get(&name).map(str::to_string));

        match found {
            None => {
                self.pos += close + 1;
                self.unresolved.push(Unresolved {
                    name,
                    offset: self.origin,
                    reason: UnresolvedReason::NotFound,
                });
            }
            // Nothing inside can start a reference or a continuation,
            // so splicing would only copy it.
            Some(value) if !value.contains(['$', '\\']) => {
                self.out.push_str(&value);
                self.pos += close + 1;
            }
            Some(value) => {
                let mut next = String::with_capacity(value.len() + tail);
                next.push_str(&value);
                next.push_str(&self.pending[self.pending.len() - tail..]);
                self.pending = Cow::Owned(next);
                self.pos = 0;
                self.frames.push(Frame { name, tail });
            }
        }

        Ok(())
    }
}
