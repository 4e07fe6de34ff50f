//! COMPITA core types.
//!
//! Shared model for the compiler pipeline:
//!
//! - [`ast`]: arena-allocated syntax tree, builder and visitor
//! - [`types`]: source-level and memory-word types
//! - [`span`] and [`backmap`]: source positions and diagnostic localization
//! - [`error`]: semantic diagnostics and code generation errors
//! - [`instr`]: target machine instruction set and its textual form

pub mod ast;
pub mod backmap;
pub mod error;
pub mod instr;
pub mod span;
pub mod types;

pub use ast::NodeId;
pub use backmap::{Backmap, localize};
pub use error::{CodegenError, DiagnosticKind, SemanticError, Site};
pub use instr::{Immediate, Instruction, ListingLine, MemoryAddress, Operand, Register};
pub use span::{Position, SourceRange, Token};
pub use types::{VarType, WordType};
