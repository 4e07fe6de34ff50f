//! Storage layout for globals, function slots and stack frames.
//!
//! Storage is handed out downward from an anchor: `EHM` (or a fixed top
//! address) for globals and slots, `EBP` for locals. Each allocation moves
//! the offset down by the number of cells it takes, and the new offset is
//! the address of the first cell. Arrays are laid out row-major upward from
//! there.
//!
//! ```text
//! EBP + 1 + n   first parameter
//! EBP + 2       last parameter
//! EBP + 1       return address
//! EBP           caller's EBP
//! EBP - k       locals, declaration order
//! ```

use compita_core::ast::{Identifier, NodeId};
use compita_core::{CodegenError, Immediate, Instruction, MemoryAddress, Register};
use rustc_hash::FxHashMap;

use crate::options::GlobalBase;

/// Words of memory on the target machine.
pub(crate) const MEMORY_WORDS: i64 = 8096;

/// What allocated offsets are relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    Register(Register),
    Absolute(i64),
}

/// Hands out cells downward from an anchor.
#[derive(Debug)]
pub(crate) struct Allocator {
    anchor: Anchor,
    offset: i64,
}

impl Allocator {
    /// Allocator for global data and function slots.
    pub fn globals(base: GlobalBase) -> Self {
        let anchor = match base {
            GlobalBase::HighMemory => Anchor::Register(Register::Ehm),
            GlobalBase::Absolute(top) => Anchor::Absolute(top),
        };
        Self { anchor, offset: 0 }
    }

    /// Allocator for the locals of one frame.
    pub fn locals() -> Self {
        Self {
            anchor: Anchor::Register(Register::Ebp),
            offset: 0,
        }
    }

    /// Reserve `cells` consecutive cells; returns the lowest one.
    pub fn allocate(&mut self, cells: i64) -> MemoryAddress {
        self.offset -= cells;
        match self.anchor {
            Anchor::Register(base) => MemoryAddress::relative(base, self.offset),
            Anchor::Absolute(top) => MemoryAddress::Absolute(top + self.offset),
        }
    }

    /// Cells handed out so far.
    pub fn used(&self) -> i64 {
        -self.offset
    }
}

/// Addresses of the variables visible at one level (globals or a frame).
#[derive(Debug, Default)]
pub(crate) struct Frame {
    addresses: FxHashMap<NodeId, MemoryAddress>,
}

impl Frame {
    /// Allocate storage for a declared identifier and append the
    /// instructions that reserve and zero it.
    ///
    /// Storage handed out by one allocator never exceeds [`MEMORY_WORDS`].
    pub fn declare(
        &mut self,
        allocator: &mut Allocator,
        ident: &Identifier<'_>,
        code: &mut Vec<Instruction>,
    ) -> Result<MemoryAddress, CodegenError> {
        let word = ident.ty.word().ok_or_else(|| CodegenError::VoidStorage {
            name: ident.name.to_string(),
        })?;
        let cells = ident
            .cell_count()
            .filter(|&cells| cells <= MEMORY_WORDS - allocator.used())
            .ok_or_else(|| CodegenError::StorageTooLarge {
                name: ident.name.to_string(),
                limit: MEMORY_WORDS,
            })?;
        let address = allocator.allocate(cells);
        self.addresses.insert(ident.id, address);
        code.extend((0..cells).map(|_| Instruction::push(Immediate::zero(word))));
        log::trace!("'{}': {} cell(s) at {}", ident.name, cells, address);
        Ok(address)
    }

    /// Record an address allocated by the caller.
    pub fn bind(&mut self, id: NodeId, address: MemoryAddress) {
        self.addresses.insert(id, address);
    }

    pub fn get(&self, id: NodeId) -> Option<MemoryAddress> {
        self.addresses.get(&id).copied()
    }
}

/// Address of parameter `index` (0-based) out of `count`.
pub(crate) fn parameter_address(index: usize, count: usize) -> MemoryAddress {
    MemoryAddress::relative(Register::Ebp, 1 + (count - index) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use compita_core::VarType;
    use compita_core::ast::AstBuilder;

    #[test]
    fn globals_grow_down_from_ehm() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut allocator = Allocator::globals(GlobalBase::HighMemory);
        let mut frame = Frame::default();
        let mut code = Vec::new();

        let x = b.scalar("x", VarType::Int);
        let m = b.array("m", VarType::Float, &[2, 3]);
        frame.declare(&mut allocator, x, &mut code).unwrap();
        frame.declare(&mut allocator, m, &mut code).unwrap();

        assert_eq!(frame.get(x.id), Some(MemoryAddress::relative(Register::Ehm, -1)));
        assert_eq!(frame.get(m.id), Some(MemoryAddress::relative(Register::Ehm, -7)));
        assert_eq!(allocator.used(), 7);
        assert_eq!(code.len(), 7);
        assert_eq!(code[1], Instruction::push(Immediate::zero(compita_core::WordType::Float)));
    }

    #[test]
    fn absolute_base_counts_down_from_top() {
        let mut allocator = Allocator::globals(GlobalBase::Absolute(1000));
        assert_eq!(allocator.allocate(1), MemoryAddress::Absolute(999));
        assert_eq!(allocator.allocate(4), MemoryAddress::Absolute(995));
    }

    #[test]
    fn void_has_no_storage() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut code = Vec::new();
        let err = Frame::default()
            .declare(&mut Allocator::locals(), b.scalar("v", VarType::Void), &mut code)
            .unwrap_err();
        assert_eq!(err, CodegenError::VoidStorage { name: "v".into() });
        assert!(code.is_empty());
    }

    #[test]
    fn storage_is_bounded_by_memory() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut allocator = Allocator::globals(GlobalBase::HighMemory);
        let mut frame = Frame::default();
        let mut code = Vec::new();

        let huge = 1i64 << 32;
        let err = frame
            .declare(&mut allocator, b.array("a", VarType::Int, &[huge, huge]), &mut code)
            .unwrap_err();
        assert_eq!(
            err,
            CodegenError::StorageTooLarge {
                name: "a".into(),
                limit: MEMORY_WORDS
            }
        );
        assert!(code.is_empty());
        assert_eq!(allocator.used(), 0);

        let full = b.array("full", VarType::Char, &[MEMORY_WORDS - 1]);
        frame.declare(&mut allocator, full, &mut code).unwrap();
        frame.declare(&mut allocator, b.scalar("last", VarType::Int), &mut code).unwrap();
        let err = frame
            .declare(&mut allocator, b.scalar("extra", VarType::Int), &mut code)
            .unwrap_err();
        assert!(matches!(err, CodegenError::StorageTooLarge { ref name, .. } if name == "extra"));
        assert_eq!(code.len() as i64, MEMORY_WORDS);
    }

    #[test]
    fn parameters_above_return_address() {
        assert_eq!(parameter_address(0, 2), MemoryAddress::relative(Register::Ebp, 3));
        assert_eq!(parameter_address(1, 2), MemoryAddress::relative(Register::Ebp, 2));
    }
}
