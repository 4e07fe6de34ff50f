//! Operator definitions for expressions.
//!
//! Operators are grouped into the three families that type checking and
//! resolution care about: logical, comparison and arithmetic.

use std::fmt;

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Logical
    /// `or`
    Or,
    /// `and`
    And,

    // Comparison
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `=`
    Equal,
    /// `!=`
    NotEqual,

    // Arithmetic
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
}

/// Operator family, used by resolution and the operand checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpFamily {
    Logical,
    /// `<`, `<=`, `>`, `>=`
    Ordering,
    /// `=`, `!=`
    Equality,
    Arithmetic,
}

impl BinaryOp {
    pub fn family(self) -> OpFamily {
        match self {
            Self::Or | Self::And => OpFamily::Logical,
            Self::Less | Self::LessEqual | Self::Greater | Self::GreaterEqual => OpFamily::Ordering,
            Self::Equal | Self::NotEqual => OpFamily::Equality,
            Self::Add | Self::Sub | Self::Mul | Self::Div | Self::Mod => OpFamily::Arithmetic,
        }
    }

    /// Whether the result of this operator is always `logic`.
    #[inline]
    pub fn yields_logic(self) -> bool {
        !matches!(self.family(), OpFamily::Arithmetic)
    }

    /// Source spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Or => "or",
            Self::And => "and",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unary prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `not`
    Not,
    /// `~`, integer negation
    Negate,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Not => "not",
            Self::Negate => "~",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
