//! Name reference rules.
//!
//! All of these inspect identifier references and calls as they resolve
//! through the scope of the function they appear in, so they share one
//! traversal parameterized by the rule being checked.

use compita_core::ast::visitor::{self, Visitor};
use compita_core::ast::{CallExpr, Function, IdentExpr};
use compita_core::{SemanticError, Site, VarType};

use super::{Check, Cursor, value_type};
use crate::context::CompilationContext;
use crate::conversion::can_cast;
use crate::symbols::Symbol;

struct ReferenceScan<'a, 'ast> {
    cursor: Cursor<'a, 'ast>,
    rule: Check,
}

impl<'a, 'ast> ReferenceScan<'a, 'ast> {
    fn run(ctx: CompilationContext<'a, 'ast>, rule: Check) -> Vec<SemanticError> {
        let mut scan = Self {
            cursor: Cursor::new(ctx),
            rule,
        };
        scan.visit_program(ctx.program);
        scan.cursor.errors
    }

    fn check_ident(&mut self, expr: &'ast IdentExpr<'ast>) {
        let symbol = self.cursor.resolve(expr.name);
        match (self.rule, symbol) {
            (Check::DeclareBeforeUse, None) => self.cursor.report(SemanticError::UndeclaredSymbol {
                name: expr.name.to_string(),
                site: Site::Node(expr.id),
            }),
            (Check::SubscriptArity, Some(Symbol::Variable(ident)))
                if ident.dimensions.len() != expr.subscripts.len() =>
            {
                self.cursor.report(SemanticError::MismatchingDimensionality {
                    name: expr.name.to_string(),
                    declared: ident.dimensions.len(),
                    used: expr.subscripts.len(),
                    site: Site::Node(expr.id),
                })
            }
            (Check::IntegralSubscripts, _) => {
                for subscript in expr.subscripts {
                    let Some(found) = value_type(*subscript) else { continue };
                    if !can_cast(found, VarType::Int) {
                        self.cursor.report(SemanticError::NonIntegralSubscript {
                            found,
                            site: Site::Node(subscript.id()),
                        });
                    }
                }
            }
            (Check::NoFunctionPointers, Some(Symbol::Function(_))) => {
                self.cursor.report(SemanticError::FunctionUsedAsVariable {
                    name: expr.name.to_string(),
                    site: Site::Node(expr.id),
                })
            }
            _ => {}
        }
    }

    fn check_call(&mut self, expr: &'ast CallExpr<'ast>) {
        let symbol = self.cursor.resolve(expr.name);
        match (self.rule, symbol) {
            (Check::DeclareBeforeUse, None) => self.cursor.report(SemanticError::UndeclaredSymbol {
                name: expr.name.to_string(),
                site: Site::Node(expr.id),
            }),
            (Check::CalledIsFunction, Some(Symbol::Variable(_))) => {
                self.cursor.report(SemanticError::NotAFunction {
                    name: expr.name.to_string(),
                    site: Site::Node(expr.id),
                })
            }
            _ => {}
        }
    }
}

impl<'a, 'ast> Visitor<'ast> for ReferenceScan<'a, 'ast> {
    fn visit_function(&mut self, function: Function<'ast>) {
        self.cursor.enter(function);
        visitor::walk_function(self, function);
    }

    fn visit_ident(&mut self, expr: &'ast IdentExpr<'ast>) {
        self.check_ident(expr);
        visitor::walk_ident(self, expr);
    }

    fn visit_call(&mut self, expr: &'ast CallExpr<'ast>) {
        self.check_call(expr);
        visitor::walk_call(self, expr);
    }
}

/// References and calls, read receptors and assignment targets included.
pub fn declare_before_use(ctx: CompilationContext<'_, '_>) -> Vec<SemanticError> {
    ReferenceScan::run(ctx, Check::DeclareBeforeUse)
}

pub fn called_is_function(ctx: CompilationContext<'_, '_>) -> Vec<SemanticError> {
    ReferenceScan::run(ctx, Check::CalledIsFunction)
}

pub fn subscript_arity(ctx: CompilationContext<'_, '_>) -> Vec<SemanticError> {
    ReferenceScan::run(ctx, Check::SubscriptArity)
}

pub fn integral_subscripts(ctx: CompilationContext<'_, '_>) -> Vec<SemanticError> {
    ReferenceScan::run(ctx, Check::IntegralSubscripts)
}

pub fn no_function_pointers(ctx: CompilationContext<'_, '_>) -> Vec<SemanticError> {
    ReferenceScan::run(ctx, Check::NoFunctionPointers)
}
