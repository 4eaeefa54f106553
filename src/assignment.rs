use std::borrow::Cow;

const ASSIGN_OP: u8 = b'=';
const BACKSLASH: u8 = b'\\';

/// A logical line split at its first unescaped `=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment<'a> {
    /// Text before the operator. `\=` inside it is unescaped to `=`.
    pub key: Cow<'a, str>,
    /// Raw text after the operator, before interpolation.
    pub value: &'a str,
    /// Byte offset of `value` within the logical line.
    pub value_offset: usize,
}

/// Split a logical line into key and raw value.
///
/// Returns `None` when the line has no unescaped `=`. An `=` preceded
/// by an odd run of backslashes is part of the key.
#[must_use]
pub fn split_assignment(line: &str) -> Option<Assignment<'_>> {
    let bytes = line.as_bytes();
    let mut escaped = false;
    let mut backslashes = 0;

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            BACKSLASH => backslashes += 1,
            ASSIGN_OP if backslashes % 2 == 1 => {
                escaped = true;
                backslashes = 0;
            }
            ASSIGN_OP => {
                let raw_key = &line[..i];
                let key = if escaped {
                    Cow::Owned(raw_key.replace("\\=", "="))
                } else {
                    Cow::Borrowed(raw_key)
                };
                return Some(Assignment {
                    key,
                    value: &line[i + 1..],
                    value_offset: i + 1,
                });
            }
            _ => backslashes = 0,
        }
    }

    None
}
