//! Expression AST nodes.
//!
//! Every expression carries a [`TypeSlot`] holding its resolved type. The
//! [`Expr`] enum is a cheap `Copy` handle over arena-allocated nodes.

use crate::ast::{BinaryOp, NodeId, TypeSlot, UnaryOp};
use crate::types::VarType;

/// An expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'ast> {
    /// Constant value
    Literal(&'ast LiteralExpr<'ast>),
    /// Identifier reference, possibly subscripted
    Ident(&'ast IdentExpr<'ast>),
    /// Function call used as a value
    Call(&'ast CallExpr<'ast>),
    /// Binary operation
    Binary(&'ast BinaryExpr<'ast>),
    /// Unary prefix operation
    Unary(&'ast UnaryExpr<'ast>),
}

impl<'ast> Expr<'ast> {
    /// Identity of the underlying node.
    pub fn id(self) -> NodeId {
        match self {
            Self::Literal(e) => e.id,
            Self::Ident(e) => e.id,
            Self::Call(e) => e.id,
            Self::Binary(e) => e.id,
            Self::Unary(e) => e.id,
        }
    }

    /// The resolved-type slot of the underlying node.
    pub fn slot(self) -> &'ast TypeSlot {
        match self {
            Self::Literal(e) => &e.ty,
            Self::Ident(e) => &e.ty,
            Self::Call(e) => &e.ty,
            Self::Binary(e) => &e.ty,
            Self::Unary(e) => &e.ty,
        }
    }

    /// The resolved type, if resolution succeeded.
    #[inline]
    pub fn ty(self) -> Option<VarType> {
        self.slot().get()
    }
}

/// A constant.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr<'ast> {
    pub id: NodeId,
    pub kind: LiteralKind<'ast>,
    pub ty: TypeSlot,
}

/// The kind of constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralKind<'ast> {
    /// Integer literal
    Int(i64),
    /// Float literal
    Float(f64),
    /// Character literal: its code point and the source spelling
    Char { code: u32, text: &'ast str },
    /// `true` / `false`
    Logic(bool),
}

impl LiteralKind<'_> {
    /// The intrinsic type of this constant.
    pub fn intrinsic_type(&self) -> VarType {
        match self {
            Self::Int(_) => VarType::Int,
            Self::Float(_) => VarType::Float,
            Self::Char { .. } => VarType::Char,
            Self::Logic(_) => VarType::Logic,
        }
    }
}

/// A reference to a declared identifier.
///
/// `subscripts` is empty for a plain reference. Also used as the target of
/// assignments and as a `read` receptor.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentExpr<'ast> {
    pub id: NodeId,
    pub name: &'ast str,
    pub subscripts: &'ast [Expr<'ast>],
    pub ty: TypeSlot,
}

impl IdentExpr<'_> {
    #[inline]
    pub fn is_subscripted(&self) -> bool {
        !self.subscripts.is_empty()
    }
}

/// A function call.
///
/// The same node shape backs both call statements and calls used inside
/// expressions; `in_expression` tells them apart.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr<'ast> {
    pub id: NodeId,
    pub name: &'ast str,
    pub args: &'ast [Expr<'ast>],
    /// `true` when the call's value is consumed by an enclosing expression
    pub in_expression: bool,
    pub ty: TypeSlot,
}

/// A binary operation.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr<'ast> {
    pub id: NodeId,
    pub op: BinaryOp,
    pub left: Expr<'ast>,
    pub right: Expr<'ast>,
    pub ty: TypeSlot,
}

/// A unary prefix operation.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr<'ast> {
    pub id: NodeId,
    pub op: UnaryOp,
    pub operand: Expr<'ast>,
    pub ty: TypeSlot,
}
