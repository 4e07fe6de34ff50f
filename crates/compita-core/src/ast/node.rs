//! Node identity and the resolved-type annotation slot.

use std::cell::Cell;
use std::fmt;

use crate::types::VarType;

/// Dense identity of an AST node.
///
/// Assigned by [`AstBuilder`](super::AstBuilder) in construction order and
/// used as the key of the diagnostic [`Backmap`](crate::Backmap).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Create a node ID with the given index.
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Get the underlying index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The `resolvedType` annotation of a typed node.
///
/// Unset until type resolution runs; stays unset when the node refers to an
/// undeclared name or to the wrong kind of symbol. Only the type resolver
/// writes it, everything after resolution reads it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeSlot(Cell<Option<VarType>>);

impl TypeSlot {
    pub const fn new() -> Self {
        Self(Cell::new(None))
    }

    /// The resolved type, if any.
    #[inline]
    pub fn get(&self) -> Option<VarType> {
        self.0.get()
    }

    /// Overwrite the annotation.
    #[inline]
    pub fn set(&self, ty: Option<VarType>) {
        self.0.set(ty);
    }

    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.0.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_starts_unset() {
        let slot = TypeSlot::new();
        assert!(!slot.is_resolved());
        slot.set(Some(VarType::Float));
        assert_eq!(slot.get(), Some(VarType::Float));
        slot.set(None);
        assert_eq!(slot.get(), None);
    }

    #[test]
    fn node_id_display() {
        assert_eq!(NodeId::new(7).to_string(), "#7");
        assert_eq!(NodeId::new(7).index(), 7);
    }
}
