use std::borrow::Cow;

/// Source location for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// 1-based physical line.
    pub line: usize,
    /// 1-based column within the logical line.
    pub column: usize,
}

impl Span {
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// One assignment statement after continuation-joining.
///
/// `content` borrows from the input unless the statement spanned
/// several physical lines, in which case the joined text is owned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine<'a> {
    pub content: Cow<'a, str>,
    /// Byte offset of the first byte in the input.
    pub start: usize,
    /// Byte offset one past the last byte, excluding the terminating newline.
    pub end: usize,
    /// 1-based line number of the first physical line.
    pub line: usize,
    /// Number of physical lines absorbed into this statement.
    pub physical_lines: usize,
}

impl LogicalLine<'_> {
    /// Location of the byte at `offset` within `content`.
    #[must_use]
    pub const fn span_at(&self, offset: usize) -> Span {
        Span {
            line: self.line,
            column: offset + 1,
        }
    }

    #[must_use]
    pub const fn is_continued(&self) -> bool {
        self.physical_lines > 1
    }
}
