//! Variable and memory-word types.
//!
//! [`VarType`] is the type vocabulary of the source language: every
//! declaration, parameter, function return and resolved expression carries
//! one. [`WordType`] is the subset that can live in a memory word of the
//! target machine, where data is always typed at runtime.

use std::fmt;

/// A source-level type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VarType {
    /// `int`
    Int,
    /// `float`
    Float,
    /// `char`
    Char,
    /// `logic` (boolean)
    Logic,
    /// `void`, only meaningful as a function return type
    Void,
}

impl VarType {
    /// Whether this type takes part in arithmetic and ordering comparisons.
    #[inline]
    pub fn is_numeric(self) -> bool {
        matches!(self, VarType::Int | VarType::Float | VarType::Char)
    }

    /// Whether this type is `int` or `char`.
    #[inline]
    pub fn is_integral(self) -> bool {
        matches!(self, VarType::Int | VarType::Char)
    }

    /// Keyword used for this type in source code.
    pub fn keyword(self) -> &'static str {
        match self {
            VarType::Int => "int",
            VarType::Float => "float",
            VarType::Char => "char",
            VarType::Logic => "logic",
            VarType::Void => "void",
        }
    }

    /// The memory-word type used to store a value of this type.
    ///
    /// Returns `None` for `void`, which has no storage.
    pub fn word(self) -> Option<WordType> {
        match self {
            VarType::Int => Some(WordType::Int),
            VarType::Float => Some(WordType::Float),
            VarType::Char => Some(WordType::Char),
            VarType::Logic => Some(WordType::Logic),
            VarType::Void => None,
        }
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Type tag of a runtime memory word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordType {
    Int,
    Float,
    Char,
    Logic,
}

impl WordType {
    pub fn name(self) -> &'static str {
        match self {
            WordType::Int => "int",
            WordType::Float => "float",
            WordType::Char => "char",
            WordType::Logic => "logic",
        }
    }
}

impl From<WordType> for VarType {
    fn from(word: WordType) -> Self {
        match word {
            WordType::Int => VarType::Int,
            WordType::Float => VarType::Float,
            WordType::Char => VarType::Char,
            WordType::Logic => VarType::Logic,
        }
    }
}

impl fmt::Display for WordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_family() {
        assert!(VarType::Int.is_numeric());
        assert!(VarType::Char.is_numeric());
        assert!(VarType::Float.is_numeric());
        assert!(!VarType::Logic.is_numeric());
        assert!(!VarType::Void.is_numeric());
    }

    #[test]
    fn void_has_no_word() {
        assert_eq!(VarType::Void.word(), None);
        assert_eq!(VarType::Char.word(), Some(WordType::Char));
        assert_eq!(VarType::from(WordType::Logic), VarType::Logic);
    }

    #[test]
    fn display_uses_keywords() {
        assert_eq!(VarType::Logic.to_string(), "logic");
        assert_eq!(WordType::Float.to_string(), "float");
    }
}
