//! Abstract Syntax Tree (AST) for COMPITA programs.
//!
//! This module provides:
//! - AST node definitions for declarations, statements and expressions
//! - Node identities and the resolved-type slot
//! - [`AstBuilder`] for arena-backed construction
//! - Visitor pattern for AST traversal
//!
//! Nodes live in a [`bumpalo::Bump`] arena and are referenced as `&'ast T`.
//! The tree is immutable apart from each typed node's [`TypeSlot`].

pub mod node;
pub mod ops;

pub mod decl;
pub mod expr;
pub mod stmt;

mod builder;
pub mod visitor;

pub use builder::AstBuilder;
pub use decl::*;
pub use expr::*;
pub use node::*;
pub use ops::*;
pub use stmt::*;
