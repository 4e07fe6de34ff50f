//! Visitor pattern for traversing the AST.
//!
//! This module provides a `Visitor` trait and corresponding `walk_*`
//! functions. Traversal is pre-order and left to right, so a visitor sees
//! nodes in source order.
//!
//! # Example: Counting calls
//!
//! ```
//! use bumpalo::Bump;
//! use compita_core::ast::visitor::{Visitor, walk_call};
//! use compita_core::ast::{AstBuilder, CallExpr};
//!
//! struct CallCounter(usize);
//!
//! impl<'ast> Visitor<'ast> for CallCounter {
//!     fn visit_call(&mut self, call: &'ast CallExpr<'ast>) {
//!         self.0 += 1;
//!         walk_call(self, call);
//!     }
//! }
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let main = b.main_function(&[], &[b.call_stmt("f", &[b.call("g", &[])])]);
//! let program = b.program("p", &[], &[main]);
//!
//! let mut counter = CallCounter(0);
//! counter.visit_program(program);
//! assert_eq!(counter.0, 2);
//! ```

use crate::ast::*;

/// Visitor trait for traversing AST nodes.
///
/// Each `visit_*` method defaults to the matching `walk_*` function;
/// override one to act on that node type, calling the walker to continue
/// into its children.
pub trait Visitor<'ast>: Sized {
    // === Program and functions ===

    fn visit_program(&mut self, program: &'ast Program<'ast>) {
        walk_program(self, program);
    }

    fn visit_function(&mut self, function: Function<'ast>) {
        walk_function(self, function);
    }

    fn visit_declaration(&mut self, declaration: &'ast Declaration<'ast>) {
        walk_declaration(self, declaration);
    }

    /// Visit a declared identifier or a parameter.
    fn visit_identifier(&mut self, _identifier: &'ast Identifier<'ast>) {}

    // === Statements ===

    fn visit_stmt(&mut self, stmt: Stmt<'ast>) {
        walk_stmt(self, stmt);
    }

    fn visit_if(&mut self, stmt: &'ast IfStmt<'ast>) {
        walk_if(self, stmt);
    }

    fn visit_while(&mut self, stmt: &'ast WhileStmt<'ast>) {
        walk_while(self, stmt);
    }

    fn visit_do(&mut self, stmt: &'ast DoStmt<'ast>) {
        walk_do(self, stmt);
    }

    fn visit_for(&mut self, stmt: &'ast ForStmt<'ast>) {
        walk_for(self, stmt);
    }

    fn visit_read(&mut self, stmt: &'ast ReadStmt<'ast>) {
        walk_read(self, stmt);
    }

    fn visit_write(&mut self, stmt: &'ast WriteStmt<'ast>) {
        walk_write(self, stmt);
    }

    fn visit_assign(&mut self, stmt: &'ast AssignStmt<'ast>) {
        walk_assign(self, stmt);
    }

    fn visit_return(&mut self, stmt: &'ast ReturnStmt<'ast>) {
        walk_return(self, stmt);
    }

    // === Expressions ===

    fn visit_expr(&mut self, expr: Expr<'ast>) {
        walk_expr(self, expr);
    }

    fn visit_literal(&mut self, _expr: &'ast LiteralExpr<'ast>) {}

    /// Visit an identifier reference, including assignment targets and
    /// read receptors.
    fn visit_ident(&mut self, expr: &'ast IdentExpr<'ast>) {
        walk_ident(self, expr);
    }

    /// Visit a call, both as statement and inside expressions.
    fn visit_call(&mut self, expr: &'ast CallExpr<'ast>) {
        walk_call(self, expr);
    }

    fn visit_binary(&mut self, expr: &'ast BinaryExpr<'ast>) {
        walk_binary(self, expr);
    }

    fn visit_unary(&mut self, expr: &'ast UnaryExpr<'ast>) {
        walk_unary(self, expr);
    }
}

// ============================================================================
// Walk functions
// ============================================================================

/// Walk global declarations, then functions in program order.
pub fn walk_program<'ast, V: Visitor<'ast>>(visitor: &mut V, program: &'ast Program<'ast>) {
    for declaration in program.declarations {
        visitor.visit_declaration(declaration);
    }
    for function in program.functions {
        visitor.visit_function(*function);
    }
}

/// Walk parameters, local declarations, then the body.
pub fn walk_function<'ast, V: Visitor<'ast>>(visitor: &mut V, function: Function<'ast>) {
    for parameter in function.parameters() {
        visitor.visit_identifier(*parameter);
    }
    for declaration in function.declarations() {
        visitor.visit_declaration(declaration);
    }
    walk_body(visitor, function.body());
}

pub fn walk_declaration<'ast, V: Visitor<'ast>>(visitor: &mut V, declaration: &'ast Declaration<'ast>) {
    visitor.visit_identifier(declaration.identifier);
}

pub fn walk_body<'ast, V: Visitor<'ast>>(visitor: &mut V, body: &'ast [Stmt<'ast>]) {
    for stmt in body {
        visitor.visit_stmt(*stmt);
    }
}

pub fn walk_stmt<'ast, V: Visitor<'ast>>(visitor: &mut V, stmt: Stmt<'ast>) {
    match stmt {
        Stmt::If(s) => visitor.visit_if(s),
        Stmt::While(s) => visitor.visit_while(s),
        Stmt::Do(s) => visitor.visit_do(s),
        Stmt::For(s) => visitor.visit_for(s),
        Stmt::Read(s) => visitor.visit_read(s),
        Stmt::Write(s) => visitor.visit_write(s),
        Stmt::Assign(s) => visitor.visit_assign(s),
        Stmt::Call(s) => visitor.visit_call(s),
        Stmt::Return(s) => visitor.visit_return(s),
    }
}

pub fn walk_if<'ast, V: Visitor<'ast>>(visitor: &mut V, stmt: &'ast IfStmt<'ast>) {
    visitor.visit_expr(stmt.condition);
    walk_body(visitor, stmt.then_body);
    walk_body(visitor, stmt.else_body);
}

pub fn walk_while<'ast, V: Visitor<'ast>>(visitor: &mut V, stmt: &'ast WhileStmt<'ast>) {
    visitor.visit_expr(stmt.condition);
    walk_body(visitor, stmt.body);
}

pub fn walk_do<'ast, V: Visitor<'ast>>(visitor: &mut V, stmt: &'ast DoStmt<'ast>) {
    walk_body(visitor, stmt.body);
    visitor.visit_expr(stmt.condition);
}

/// Walk initializer, condition, increment, then the body (source order).
pub fn walk_for<'ast, V: Visitor<'ast>>(visitor: &mut V, stmt: &'ast ForStmt<'ast>) {
    visitor.visit_assign(stmt.initializer);
    visitor.visit_expr(stmt.condition);
    visitor.visit_assign(stmt.increment);
    walk_body(visitor, stmt.body);
}

pub fn walk_read<'ast, V: Visitor<'ast>>(visitor: &mut V, stmt: &'ast ReadStmt<'ast>) {
    for receptor in stmt.receptors {
        visitor.visit_ident(*receptor);
    }
}

pub fn walk_write<'ast, V: Visitor<'ast>>(visitor: &mut V, stmt: &'ast WriteStmt<'ast>) {
    for item in stmt.items {
        if let WriteItem::Expr(expr) = item {
            visitor.visit_expr(*expr);
        }
    }
}

/// Walk the target first, then the value.
pub fn walk_assign<'ast, V: Visitor<'ast>>(visitor: &mut V, stmt: &'ast AssignStmt<'ast>) {
    visitor.visit_ident(stmt.target);
    visitor.visit_expr(stmt.value);
}

pub fn walk_return<'ast, V: Visitor<'ast>>(visitor: &mut V, stmt: &'ast ReturnStmt<'ast>) {
    if let Some(value) = stmt.value {
        visitor.visit_expr(value);
    }
}

pub fn walk_expr<'ast, V: Visitor<'ast>>(visitor: &mut V, expr: Expr<'ast>) {
    match expr {
        Expr::Literal(e) => visitor.visit_literal(e),
        Expr::Ident(e) => visitor.visit_ident(e),
        Expr::Call(e) => visitor.visit_call(e),
        Expr::Binary(e) => visitor.visit_binary(e),
        Expr::Unary(e) => visitor.visit_unary(e),
    }
}

pub fn walk_ident<'ast, V: Visitor<'ast>>(visitor: &mut V, expr: &'ast IdentExpr<'ast>) {
    for subscript in expr.subscripts {
        visitor.visit_expr(*subscript);
    }
}

pub fn walk_call<'ast, V: Visitor<'ast>>(visitor: &mut V, expr: &'ast CallExpr<'ast>) {
    for arg in expr.args {
        visitor.visit_expr(*arg);
    }
}

pub fn walk_binary<'ast, V: Visitor<'ast>>(visitor: &mut V, expr: &'ast BinaryExpr<'ast>) {
    visitor.visit_expr(expr.left);
    visitor.visit_expr(expr.right);
}

pub fn walk_unary<'ast, V: Visitor<'ast>>(visitor: &mut V, expr: &'ast UnaryExpr<'ast>) {
    visitor.visit_expr(expr.operand);
}
