//! Source location tracking for diagnostic reporting.
//!
//! Provides [`Position`] and [`SourceRange`] (what a diagnostic points at)
//! and [`Token`] (what the lowering step remembers about the concrete
//! syntax a node came from). Lines are 1-indexed, columns 0-indexed.

use std::fmt;

/// A single point in the source text.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (0-indexed, character-based).
    pub col: u32,
}

impl Position {
    #[inline]
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// A half-open range of source text, `begin` inclusive and `end` exclusive.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceRange {
    pub begin: Position,
    pub end: Position,
}

impl SourceRange {
    #[inline]
    pub fn new(begin: Position, end: Position) -> Self {
        Self { begin, end }
    }

    /// Merge two ranges into one that starts at `self` and ends at `other`.
    #[inline]
    pub fn to(self, other: SourceRange) -> SourceRange {
        SourceRange {
            begin: self.begin,
            end: other.end,
        }
    }

    /// Whether `begin` and `end` are the same point.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }
}

impl fmt::Debug for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}..{:?}", self.begin, self.end)
    }
}

impl fmt::Display for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.begin, self.end)
    }
}

/// A concrete-syntax token as recorded by the lowering step.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    /// Raw token text. String literals may span several lines.
    pub text: String,
    /// Line of the first character (1-indexed).
    pub line: u32,
    /// Column of the first character (0-indexed).
    pub col: u32,
}

impl Token {
    pub fn new(text: impl Into<String>, line: u32, col: u32) -> Self {
        Self {
            text: text.into(),
            line,
            col,
        }
    }

    /// Where the token starts.
    #[inline]
    pub fn begin(&self) -> Position {
        Position::new(self.line, self.col)
    }

    /// One past the token's last character.
    ///
    /// Embedded line breaks move the end onto a later line; the column is
    /// then counted from the last line break.
    pub fn end(&self) -> Position {
        match self.text.rfind('\n') {
            None => Position::new(self.line, self.col + self.text.chars().count() as u32),
            Some(last_break) => {
                let breaks = self.text.matches('\n').count() as u32;
                let tail = self.text[last_break + 1..].chars().count() as u32;
                Position::new(self.line + breaks, tail)
            }
        }
    }

    /// The range covered by this token alone.
    #[inline]
    pub fn range(&self) -> SourceRange {
        SourceRange::new(self.begin(), self.end())
    }
}
