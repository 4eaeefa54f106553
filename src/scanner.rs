use std::borrow::Cow;
use std::iter::FusedIterator;

use crate::line::LogicalLine;

const BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const COMMENT: u8 = b'#';
const NEWLINE: u8 = b'\n';
const BACKSLASH: u8 = b'\\';

/// Scan env file text into logical lines.
///
/// Comment lines (first byte `#`) and blank lines are skipped. A
/// backslash directly before a newline joins the next physical line
/// and the backslash/newline pair is dropped from the content. The
/// last line does not need a terminating newline.
#[must_use]
pub fn scan(input: &str) -> Scanner<'_> {
    Scanner::new(input)
}

/// Lazy, single-pass cursor over the input that yields `LogicalLine`s.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Scanner<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        let start = if input.as_bytes().starts_with(BOM) {
            BOM.len()
        } else {
            0
        };
        Self {
            input,
            pos: start,
            line: 1,
        }
    }

    /// Bytes consumed so far, including skipped lines.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Physical lines consumed so far, including skipped lines.
    #[must_use]
    pub const fn lines(&self) -> usize {
        self.line - 1
    }

    const fn bytes(&self) -> &'a [u8] {
        self.input.as_bytes()
    }

    fn find_newline(&self, from: usize) -> Option<usize> {
        self.bytes()[from..]
            .iter()
            .position(|&b| b == NEWLINE)
            .map(|i| from + i)
    }

    // An odd run of backslashes before the newline ends in an
    // unescaped one.
    fn is_continuation(&self, segment_start: usize, newline: usize) -> bool {
        let run = self.bytes()[segment_start..newline]
            .iter()
            .rev()
            .take_while(|&&b| b == BACKSLASH)
            .count();
        run % 2 == 1
    }

    fn is_skippable(&self) -> bool {
        let rest = &self.bytes()[self.pos..];
        match rest.first() {
            Some(&COMMENT) => true,
            Some(_) => {
                let end = rest.iter().position(|&b| b == NEWLINE).unwrap_or(rest.len());
                rest[..end].iter().all(|&b| b == b' ' || b == b'\t')
            }
            None => false,
        }
    }

    fn skip_line(&mut self) {
        self.pos = self
            .find_newline(self.pos)
            .map_or(self.input.len(), |newline| newline + 1);
        self.line += 1;
    }

    fn read_logical_line(&mut self) -> LogicalLine<'a> {
        let start = self.pos;
        let first_line = self.line;
        let mut segment_start = start;
        let mut joined: Option<String> = None;
        let mut physical_lines = 0;

        let end = loop {
            physical_lines += 1;
            match self.find_newline(segment_start) {
                Some(newline) if self.is_continuation(segment_start, newline) => {
                    joined
                        .get_or_insert_with(String::new)
                        .push_str(&self.input[segment_start..newline - 1]);
                    segment_start = newline + 1;
                    if segment_start >= self.input.len() {
                        self.pos = self.input.len();
                        break self.input.len();
                    }
                }
                Some(newline) => {
                    self.pos = newline + 1;
                    break newline;
                }
                None => {
                    self.pos = self.input.len();
                    break self.input.len();
                }
            }
        };

        self.line += physical_lines;

        let content = match joined {
            Some(mut text) => {
                text.push_str(&self.input[segment_start.min(end)..end]);
                Cow::Owned(text)
            }
            None => Cow::Borrowed(&self.input[start..end]),
        };

        LogicalLine {
            content,
            start,
            end,
            line: first_line,
            physical_lines,
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = LogicalLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.input.len() {
            if self.is_skippable() {
                self.skip_line();
                continue;
            }
            return Some(self.read_logical_line());
        }
        None
    }
}

impl FusedIterator for Scanner<'_> {}
