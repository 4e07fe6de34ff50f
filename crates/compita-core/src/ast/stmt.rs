//! Statement AST nodes.
//!
//! Bodies are plain statement slices; the language has no nested block
//! scopes, so there is no block node.

use crate::ast::{CallExpr, Expr, IdentExpr, NodeId, TypeSlot};

/// A statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stmt<'ast> {
    If(&'ast IfStmt<'ast>),
    While(&'ast WhileStmt<'ast>),
    /// `do ... while`
    Do(&'ast DoStmt<'ast>),
    For(&'ast ForStmt<'ast>),
    Read(&'ast ReadStmt<'ast>),
    Write(&'ast WriteStmt<'ast>),
    /// `target <- value`
    Assign(&'ast AssignStmt<'ast>),
    /// CALL statement; the call's `in_expression` flag is `false`
    Call(&'ast CallExpr<'ast>),
    Return(&'ast ReturnStmt<'ast>),
}

impl<'ast> Stmt<'ast> {
    pub fn id(self) -> NodeId {
        match self {
            Self::If(s) => s.id,
            Self::While(s) => s.id,
            Self::Do(s) => s.id,
            Self::For(s) => s.id,
            Self::Read(s) => s.id,
            Self::Write(s) => s.id,
            Self::Assign(s) => s.id,
            Self::Call(s) => s.id,
            Self::Return(s) => s.id,
        }
    }
}

/// `if condition then ... else ...`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IfStmt<'ast> {
    pub id: NodeId,
    pub condition: Expr<'ast>,
    pub then_body: &'ast [Stmt<'ast>],
    /// Empty when there is no `else` branch
    pub else_body: &'ast [Stmt<'ast>],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhileStmt<'ast> {
    pub id: NodeId,
    pub condition: Expr<'ast>,
    pub body: &'ast [Stmt<'ast>],
}

/// Body runs once before the condition is first tested.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoStmt<'ast> {
    pub id: NodeId,
    pub body: &'ast [Stmt<'ast>],
    pub condition: Expr<'ast>,
}

/// `for initializer; condition; increment`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForStmt<'ast> {
    pub id: NodeId,
    pub initializer: &'ast AssignStmt<'ast>,
    pub condition: Expr<'ast>,
    pub increment: &'ast AssignStmt<'ast>,
    pub body: &'ast [Stmt<'ast>],
}

/// Reads one value per receptor from input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadStmt<'ast> {
    pub id: NodeId,
    pub receptors: &'ast [&'ast IdentExpr<'ast>],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WriteStmt<'ast> {
    pub id: NodeId,
    pub items: &'ast [WriteItem<'ast>],
}

/// One item of a `write` statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WriteItem<'ast> {
    /// String literal, already unescaped
    Text(&'ast StringLiteral<'ast>),
    Expr(Expr<'ast>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StringLiteral<'ast> {
    pub id: NodeId,
    pub value: &'ast str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignStmt<'ast> {
    pub id: NodeId,
    pub target: &'ast IdentExpr<'ast>,
    pub value: Expr<'ast>,
}

/// `return` with an optional value.
///
/// The resolved type is `void` for a bare return, otherwise the value's type.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt<'ast> {
    pub id: NodeId,
    pub value: Option<Expr<'ast>>,
    pub ty: TypeSlot,
}
