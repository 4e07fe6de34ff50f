//! Typing rules over resolved expressions.
//!
//! Every rule here compares resolved types only. A node whose type slot is
//! unset is skipped, its cause has been reported by a reference rule. Void
//! values are left to `NoVoidInExpression`.

use compita_core::ast::visitor::{self, Visitor};
use compita_core::ast::{
    AssignStmt, BinaryExpr, BinaryOp, DoStmt, Expr, ForStmt, Function, IfStmt, OpFamily,
    ReturnStmt, UnaryExpr, UnaryOp, WhileStmt,
};
use compita_core::{SemanticError, Site, VarType};

use super::{Check, Cursor, value_type};
use crate::context::CompilationContext;
use crate::conversion::{can_cast, can_cast_resolved};

struct TypeScan<'a, 'ast> {
    cursor: Cursor<'a, 'ast>,
    rule: Check,
}

impl<'a, 'ast> TypeScan<'a, 'ast> {
    fn run(ctx: CompilationContext<'a, 'ast>, rule: Check) -> Vec<SemanticError> {
        let mut scan = Self {
            cursor: Cursor::new(ctx),
            rule,
        };
        scan.visit_program(ctx.program);
        scan.cursor.errors
    }

    fn condition(&mut self, condition: Expr<'ast>) {
        if self.rule != Check::LogicalConditions {
            return;
        }
        let Some(found) = value_type(condition) else { return };
        if found != VarType::Logic {
            self.cursor.report(SemanticError::NonLogicalCondition {
                found,
                site: Site::Node(condition.id()),
            });
        }
    }
}

/// Operand requirement of a binary operator, if violated.
fn binary_requirement(op: BinaryOp, left: VarType, right: VarType) -> Option<&'static str> {
    let holds = match op.family() {
        OpFamily::Logical => left == VarType::Logic && right == VarType::Logic,
        OpFamily::Ordering => left.is_numeric() && right.is_numeric(),
        OpFamily::Equality => {
            (left.is_numeric() && right.is_numeric())
                || (left == VarType::Logic && right == VarType::Logic)
        }
        OpFamily::Arithmetic if op == BinaryOp::Mod => left.is_integral() && right.is_integral(),
        OpFamily::Arithmetic => left.is_numeric() && right.is_numeric(),
    };
    if holds {
        return None;
    }
    Some(match op.family() {
        OpFamily::Logical => "logic",
        OpFamily::Equality => "both numeric or both logic",
        OpFamily::Arithmetic if op == BinaryOp::Mod => "int or char",
        _ => "numeric",
    })
}

impl<'a, 'ast> Visitor<'ast> for TypeScan<'a, 'ast> {
    fn visit_function(&mut self, function: Function<'ast>) {
        self.cursor.enter(function);
        visitor::walk_function(self, function);
    }

    fn visit_expr(&mut self, expr: Expr<'ast>) {
        if self.rule == Check::NoVoidInExpression && expr.ty() == Some(VarType::Void) {
            self.cursor.report(SemanticError::VoidInExpression {
                site: Site::Node(expr.id()),
            });
        }
        visitor::walk_expr(self, expr);
    }

    fn visit_binary(&mut self, expr: &'ast BinaryExpr<'ast>) {
        visitor::walk_binary(self, expr);
        if self.rule != Check::OperandsMatchOperators {
            return;
        }
        let (Some(left), Some(right)) = (value_type(expr.left), value_type(expr.right)) else {
            return;
        };
        if let Some(expected) = binary_requirement(expr.op, left, right) {
            self.cursor.report(SemanticError::IncompatibleOperands {
                operator: expr.op.as_str(),
                expected,
                site: Site::Node(expr.id),
            });
        }
    }

    fn visit_unary(&mut self, expr: &'ast UnaryExpr<'ast>) {
        visitor::walk_unary(self, expr);
        if self.rule != Check::OperandsMatchOperators {
            return;
        }
        let Some(operand) = value_type(expr.operand) else {
            return;
        };
        let (holds, expected) = match expr.op {
            UnaryOp::Negate => (operand.is_numeric(), "numeric"),
            UnaryOp::Not => (operand == VarType::Logic, "logic"),
        };
        if !holds {
            self.cursor.report(SemanticError::IncompatibleOperands {
                operator: expr.op.as_str(),
                expected,
                site: Site::Node(expr.id),
            });
        }
    }

    fn visit_assign(&mut self, stmt: &'ast AssignStmt<'ast>) {
        visitor::walk_assign(self, stmt);
        if self.rule != Check::AssignmentCompatible {
            return;
        }
        // a void target is a declaration error
        let to = stmt.target.ty.get().filter(|&ty| ty != VarType::Void);
        let from = value_type(stmt.value);
        if can_cast_resolved(from, to) {
            return;
        }
        if let (Some(from), Some(to)) = (from, to) {
            self.cursor.report(SemanticError::IncompatibleAssignment {
                from,
                to,
                site: Site::Between(stmt.target.id, stmt.value.id()),
            });
        }
    }

    fn visit_if(&mut self, stmt: &'ast IfStmt<'ast>) {
        self.condition(stmt.condition);
        visitor::walk_if(self, stmt);
    }

    fn visit_while(&mut self, stmt: &'ast WhileStmt<'ast>) {
        self.condition(stmt.condition);
        visitor::walk_while(self, stmt);
    }

    fn visit_do(&mut self, stmt: &'ast DoStmt<'ast>) {
        self.condition(stmt.condition);
        visitor::walk_do(self, stmt);
    }

    fn visit_for(&mut self, stmt: &'ast ForStmt<'ast>) {
        self.condition(stmt.condition);
        visitor::walk_for(self, stmt);
    }
}

pub fn operands_match_operators(ctx: CompilationContext<'_, '_>) -> Vec<SemanticError> {
    TypeScan::run(ctx, Check::OperandsMatchOperators)
}

/// Right side castable to the target, `for` headers included.
pub fn assignment_compatible(ctx: CompilationContext<'_, '_>) -> Vec<SemanticError> {
    TypeScan::run(ctx, Check::AssignmentCompatible)
}

pub fn logical_conditions(ctx: CompilationContext<'_, '_>) -> Vec<SemanticError> {
    TypeScan::run(ctx, Check::LogicalConditions)
}

/// Void values anywhere a value is consumed: operands, conditions,
/// subscripts, arguments, right sides, write items and return bodies.
pub fn no_void_in_expression(ctx: CompilationContext<'_, '_>) -> Vec<SemanticError> {
    TypeScan::run(ctx, Check::NoVoidInExpression)
}

// ============================================================================
// Returns
// ============================================================================

#[derive(Default)]
struct ReturnCollector<'ast> {
    returns: Vec<&'ast ReturnStmt<'ast>>,
}

impl<'ast> Visitor<'ast> for ReturnCollector<'ast> {
    fn visit_return(&mut self, stmt: &'ast ReturnStmt<'ast>) {
        self.returns.push(stmt);
    }
}

/// A non-void function returns at least once, and every `return` fits the
/// declared return type. Void functions and `main` take bare returns only.
pub fn returns_match_function(ctx: CompilationContext<'_, '_>) -> Vec<SemanticError> {
    let mut errors = Vec::new();
    for &function in ctx.program.functions {
        let expected = function.return_type();
        let mut collector = ReturnCollector::default();
        visitor::walk_body(&mut collector, function.body());

        if collector.returns.is_empty() && expected != VarType::Void {
            errors.push(SemanticError::MissingReturn {
                name: function.name().to_string(),
                expected,
                site: Site::Node(function.id()),
            });
        }

        for stmt in collector.returns {
            let Some(found) = stmt.ty.get() else { continue };
            if found == VarType::Void && stmt.value.is_some() {
                continue;
            }
            let fits = if expected == VarType::Void {
                found == VarType::Void
            } else {
                can_cast(found, expected)
            };
            if !fits {
                errors.push(SemanticError::IncompatibleReturn {
                    name: function.name().to_string(),
                    expected,
                    found,
                    site: Site::Node(stmt.id),
                });
            }
        }
    }
    errors
}
