//! Initialization and reference tracking.
//!
//! Every declared variable must be written at least once and referenced at
//! least once. Parameters count as written on entry.
//!
//! A write is an assignment target (`for` headers included) or a read
//! receptor. Any other identifier reference is a reference, subscripts of a
//! write target among them. Uses are attributed to whatever declaration the
//! scope chain resolves the name to, so a local shadowing a global absorbs
//! the uses inside its function.

use bitflags::bitflags;
use compita_core::ast::visitor::{self, Visitor};
use compita_core::ast::{AssignStmt, Function, IdentExpr, NodeId, ReadStmt};
use compita_core::{SemanticError, Site};
use rustc_hash::{FxHashMap, FxHashSet};

use super::Cursor;
use crate::context::CompilationContext;

bitflags! {
    /// How a declared variable has been used so far.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Usage: u8 {
        const WRITTEN = 1 << 0;
        const REFERENCED = 1 << 1;
    }
}

struct UsageScan<'a, 'ast> {
    cursor: Cursor<'a, 'ast>,
    /// Declaring identifier to its accumulated usage
    usage: FxHashMap<NodeId, Usage>,
}

impl<'a, 'ast> UsageScan<'a, 'ast> {
    fn mark(&mut self, expr: &'ast IdentExpr<'ast>, flag: Usage) {
        if let Some(ident) = self.cursor.resolve(expr.name).and_then(|s| s.as_variable()) {
            *self.usage.entry(ident.id).or_insert(Usage::empty()) |= flag;
        }
    }

    fn write_target(&mut self, target: &'ast IdentExpr<'ast>) {
        self.mark(target, Usage::WRITTEN);
        for &subscript in target.subscripts {
            self.visit_expr(subscript);
        }
    }

    fn usage_of(&self, id: NodeId) -> Usage {
        self.usage.get(&id).copied().unwrap_or(Usage::empty())
    }
}

impl<'a, 'ast> Visitor<'ast> for UsageScan<'a, 'ast> {
    fn visit_function(&mut self, function: Function<'ast>) {
        self.cursor.enter(function);
        visitor::walk_function(self, function);
    }

    fn visit_assign(&mut self, stmt: &'ast AssignStmt<'ast>) {
        self.write_target(stmt.target);
        self.visit_expr(stmt.value);
    }

    fn visit_read(&mut self, stmt: &'ast ReadStmt<'ast>) {
        for &receptor in stmt.receptors {
            self.write_target(receptor);
        }
    }

    fn visit_ident(&mut self, expr: &'ast IdentExpr<'ast>) {
        self.mark(expr, Usage::REFERENCED);
        visitor::walk_ident(self, expr);
    }
}

/// Reports per registered variable, global scope first, then each local
/// scope in creation order.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn initialized_and_referenced(ctx: CompilationContext<'_, '_>) -> Vec<SemanticError> {
    let mut scan = UsageScan {
        cursor: Cursor::new(ctx),
        usage: FxHashMap::default(),
    };
    scan.visit_program(ctx.program);

    let parameters: FxHashSet<NodeId> = ctx
        .program
        .functions
        .iter()
        .flat_map(|f| f.parameters().iter().map(|p| p.id))
        .collect();

    let mut errors = Vec::new();
    for scope in ctx.table.scopes() {
        for ident in ctx.table.symbols(scope).iter().filter_map(|s| s.as_variable()) {
            let usage = scan.usage_of(ident.id);
            if !usage.contains(Usage::WRITTEN) && !parameters.contains(&ident.id) {
                errors.push(SemanticError::NeverInitialized {
                    name: ident.name.to_string(),
                    site: Site::Node(ident.id),
                });
            }
            if !usage.contains(Usage::REFERENCED) {
                errors.push(SemanticError::NeverReferenced {
                    name: ident.name.to_string(),
                    site: Site::Node(ident.id),
                });
            }
        }
    }
    errors
}
