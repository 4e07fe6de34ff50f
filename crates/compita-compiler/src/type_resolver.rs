//! Type resolution: fills the resolved-type slot of every typed node.
//!
//! This module provides [`TypeResolver`], a single post-order pass over each
//! function body. Children are resolved before their parent, so a binary
//! operator sees its operands' types.
//!
//! ## Rules
//!
//! - Literals resolve to their intrinsic type
//! - References resolve to the variable's declared type, calls to the
//!   function's return type (`main` is void)
//! - Undeclared names and wrong-kind symbols stay unresolved; another check
//!   reports them
//! - Logical and comparison operators resolve to `logic`, `not` as well
//! - `~` resolves to `int`
//! - Arithmetic resolves to `float` if either operand is `float`, else `int`
//! - `return` resolves to `void` when bare, else to its value's type
//!
//! Running the resolver again overwrites every slot with the same value.

use compita_core::ast::visitor::{self, Visitor};
use compita_core::ast::{
    BinaryExpr, CallExpr, Function, IdentExpr, LiteralExpr, Program, ReturnStmt, UnaryExpr,
    UnaryOp,
};
use compita_core::VarType;

use crate::symbols::{ScopeId, Symbol, SymbolTable};

/// Writes resolved types into the tree.
pub struct TypeResolver<'a, 'ast> {
    table: &'a SymbolTable<'ast>,
    scope: ScopeId,
    resolved: usize,
}

impl<'a, 'ast> TypeResolver<'a, 'ast> {
    pub fn new(table: &'a SymbolTable<'ast>) -> Self {
        Self {
            table,
            scope: ScopeId::GLOBAL,
            resolved: 0,
        }
    }

    /// Resolve every typed node of `program`.
    ///
    /// Returns the number of nodes that received a type.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn resolve(table: &'a SymbolTable<'ast>, program: &'ast Program<'ast>) -> usize {
        let mut resolver = Self::new(table);
        resolver.visit_program(program);
        log::debug!("type resolution: {} node(s) resolved", resolver.resolved);
        resolver.resolved
    }

    fn record(&mut self, ty: Option<VarType>) -> Option<VarType> {
        if ty.is_some() {
            self.resolved += 1;
        }
        ty
    }
}

impl<'a, 'ast> Visitor<'ast> for TypeResolver<'a, 'ast> {
    fn visit_function(&mut self, function: Function<'ast>) {
        self.scope = self.table.scope_of(function.name()).unwrap_or(ScopeId::GLOBAL);
        visitor::walk_function(self, function);
        self.scope = ScopeId::GLOBAL;
    }

    fn visit_literal(&mut self, expr: &'ast LiteralExpr<'ast>) {
        let ty = self.record(Some(expr.kind.intrinsic_type()));
        expr.ty.set(ty);
    }

    fn visit_ident(&mut self, expr: &'ast IdentExpr<'ast>) {
        visitor::walk_ident(self, expr);
        let ty = match self.table.lookup(self.scope, expr.name, false) {
            Some(Symbol::Variable(ident)) => Some(ident.ty),
            _ => None,
        };
        let ty = self.record(ty);
        expr.ty.set(ty);
    }

    fn visit_call(&mut self, expr: &'ast CallExpr<'ast>) {
        visitor::walk_call(self, expr);
        let ty = match self.table.lookup(self.scope, expr.name, false) {
            Some(Symbol::Function(function)) => Some(function.return_type()),
            _ => None,
        };
        let ty = self.record(ty);
        expr.ty.set(ty);
    }

    fn visit_binary(&mut self, expr: &'ast BinaryExpr<'ast>) {
        visitor::walk_binary(self, expr);
        let ty = if expr.op.yields_logic() {
            VarType::Logic
        } else if expr.left.ty() == Some(VarType::Float) || expr.right.ty() == Some(VarType::Float) {
            VarType::Float
        } else {
            VarType::Int
        };
        let ty = self.record(Some(ty));
        expr.ty.set(ty);
    }

    fn visit_unary(&mut self, expr: &'ast UnaryExpr<'ast>) {
        visitor::walk_unary(self, expr);
        let ty = match expr.op {
            UnaryOp::Negate => VarType::Int,
            UnaryOp::Not => VarType::Logic,
        };
        let ty = self.record(Some(ty));
        expr.ty.set(ty);
    }

    fn visit_return(&mut self, stmt: &'ast ReturnStmt<'ast>) {
        visitor::walk_return(self, stmt);
        let ty = match stmt.value {
            None => Some(VarType::Void),
            Some(value) => value.ty(),
        };
        let ty = self.record(ty);
        stmt.ty.set(ty);
    }
}
