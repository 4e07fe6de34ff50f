//! COMPITA
//!
//! Semantic analysis and code generation for the COMPITA teaching language.
//!
//! The front end (lexing, parsing, lowering) lives elsewhere: it hands over
//! an arena-allocated [`ast::Program`] and a [`Backmap`] relating tree nodes
//! to the tokens they came from. This crate checks the program and, when it
//! is clean, translates it for the stack machine.
//!
//! ## Crates
//!
//! - [`compita_core`]: tree, types, diagnostics, instruction set
//! - [`compita_compiler`]: symbol table, type resolution, checks, codegen
//!
//! # Example
//!
//! ```ignore
//! use compita::{AstBuilder, Backmap, Bump, CompileOptions, compile_report};
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let main = b.main_function(&[], &[b.write(&[b.text("ok")])]);
//! let program = b.program("hello", &[], &[main]);
//!
//! let report = compile_report(program, &Backmap::new(), &CompileOptions::default());
//! for line in &report.listing {
//!     println!("{line}");
//! }
//! ```

pub mod report;

pub use bumpalo::Bump;

pub use compita_core::ast::{self, AstBuilder};
pub use compita_core::instr::{self, listing, serialize};
pub use compita_core::{
    Backmap, CodegenError, DiagnosticKind, Immediate, Instruction, ListingLine, MemoryAddress, NodeId, Operand,
    Position, Register, SemanticError, Site, SourceRange, Token, VarType, WordType, localize,
};

pub use compita_compiler::{
    Check, CompilationResult, CompileOptions, Compiler, GlobalBase, ScopeDump, ScopeId, Symbol, SymbolTable,
    TypeResolver, can_cast, can_cast_resolved,
};

pub use report::{Report, ReportedDiagnostic, compile_report};
