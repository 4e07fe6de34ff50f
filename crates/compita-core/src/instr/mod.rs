//! Target machine instructions.
//!
//! This module contains:
//!
//! - [`Register`], [`Immediate`], [`MemoryAddress`] and [`Operand`]
//! - [`Instruction`] - The instruction set, with [`Opcode`] mnemonics
//! - [`serialize`] and [`listing`] - The textual wire format

mod display;
mod instruction;
mod operand;

pub use display::{ListingLine, listing, serialize};
pub use instruction::{BinaryOpcode, Instruction, Opcode};
pub use operand::{Immediate, MemoryAddress, Operand, Register};
