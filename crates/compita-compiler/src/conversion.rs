//! Implicit type conversions.
//!
//! The cast lattice has two families that never mix:
//!
//! ```text
//! int, char  ──► int, char, float
//! float      ──► float
//! logic      ──► logic
//! ```
//!
//! `void` casts to and from nothing.

use compita_core::VarType;

/// Whether a value of type `from` may be implicitly converted to `to`.
pub fn can_cast(from: VarType, to: VarType) -> bool {
    use VarType::*;
    match (from, to) {
        (Int | Char, Int | Char | Float) => true,
        (Float, Float) => true,
        (Logic, Logic) => true,
        _ => false,
    }
}

/// [`can_cast`] over possibly unresolved types.
///
/// An unresolved side has already been reported by another check, so it
/// counts as compatible.
pub fn can_cast_resolved(from: Option<VarType>, to: Option<VarType>) -> bool {
    match (from, to) {
        (Some(from), Some(to)) => can_cast(from, to),
        _ => true,
    }
}
