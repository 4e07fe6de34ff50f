//! Call rules: CALL statements discard nothing, arity and argument types
//! match the callee's parameters.

use compita_core::ast::visitor::{self, Visitor};
use compita_core::ast::{CallExpr, Function};
use compita_core::{SemanticError, Site, VarType};

use super::{Check, Cursor, value_type};
use crate::context::CompilationContext;
use crate::conversion::can_cast;

struct CallScan<'a, 'ast> {
    cursor: Cursor<'a, 'ast>,
    rule: Check,
}

impl<'a, 'ast> CallScan<'a, 'ast> {
    fn run(ctx: CompilationContext<'a, 'ast>, rule: Check) -> Vec<SemanticError> {
        let mut scan = Self {
            cursor: Cursor::new(ctx),
            rule,
        };
        scan.visit_program(ctx.program);
        scan.cursor.errors
    }

    fn check(&mut self, call: &'ast CallExpr<'ast>, callee: Function<'ast>) {
        let parameters = callee.parameters();
        match self.rule {
            Check::CallStatementReturnsVoid => {
                let return_type = callee.return_type();
                if !call.in_expression && return_type != VarType::Void {
                    self.cursor.report(SemanticError::CallStatementMustReturnVoid {
                        name: call.name.to_string(),
                        return_type,
                        site: Site::Node(call.id),
                    });
                }
            }
            Check::ArgumentCounts => {
                if call.args.len() != parameters.len() {
                    self.cursor.report(SemanticError::ArgumentCountMismatch {
                        name: call.name.to_string(),
                        expected: parameters.len(),
                        found: call.args.len(),
                        site: Site::Node(call.id),
                    });
                }
            }
            Check::ArgumentTypes => {
                // extra or missing arguments belong to the arity rule
                for (index, (arg, parameter)) in call.args.iter().zip(parameters).enumerate() {
                    let Some(found) = value_type(*arg) else { continue };
                    // a void parameter is a declaration error
                    if parameter.ty == VarType::Void {
                        continue;
                    }
                    if !can_cast(found, parameter.ty) {
                        self.cursor.report(SemanticError::IncompatibleArgument {
                            name: call.name.to_string(),
                            index,
                            expected: parameter.ty,
                            found,
                            site: Site::Node(arg.id()),
                        });
                    }
                }
            }
            _ => {}
        }
    }
}

impl<'a, 'ast> Visitor<'ast> for CallScan<'a, 'ast> {
    fn visit_function(&mut self, function: Function<'ast>) {
        self.cursor.enter(function);
        visitor::walk_function(self, function);
    }

    fn visit_call(&mut self, expr: &'ast CallExpr<'ast>) {
        if let Some(callee) = self.cursor.resolve(expr.name).and_then(|s| s.as_function()) {
            self.check(expr, callee);
        }
        visitor::walk_call(self, expr);
    }
}

pub fn call_statement_returns_void(ctx: CompilationContext<'_, '_>) -> Vec<SemanticError> {
    CallScan::run(ctx, Check::CallStatementReturnsVoid)
}

/// `main` takes no arguments.
pub fn argument_counts(ctx: CompilationContext<'_, '_>) -> Vec<SemanticError> {
    CallScan::run(ctx, Check::ArgumentCounts)
}

pub fn argument_types(ctx: CompilationContext<'_, '_>) -> Vec<SemanticError> {
    CallScan::run(ctx, Check::ArgumentTypes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::test_support::{kinds, run_check};
    use bumpalo::Bump;
    use compita_core::DiagnosticKind;
    use compita_core::ast::AstBuilder;

    #[test]
    fn call_statement_to_valued_function() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let f = b.function("f", &[], VarType::Float, &[], &[b.ret(Some(b.float(1.0)))]);
        let g = b.function("g", &[], VarType::Void, &[], &[]);
        let bad = b.call_stmt("f", &[]);
        let main = b.main_function(
            &[],
            &[bad, b.call_stmt("g", &[]), b.write(&[b.expr_item(b.call("f", &[]))])],
        );
        let program = b.program("p", &[], &[f, g, main]);

        assert_eq!(
            run_check(program, Check::CallStatementReturnsVoid),
            vec![SemanticError::CallStatementMustReturnVoid {
                name: "f".into(),
                return_type: VarType::Float,
                site: Site::Node(bad.id()),
            }]
        );
    }

    #[test]
    fn arity_mismatch_is_not_also_a_type_error() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let f = b.function(
            "f",
            &[b.scalar("a", VarType::Int), b.scalar("b", VarType::Logic)],
            VarType::Void,
            &[],
            &[],
        );
        let main = b.main_function(&[], &[b.call_stmt("f", &[b.int(1)]), b.call_stmt("main", &[b.int(2)])]);
        let program = b.program("p", &[], &[f, main]);

        let counts = run_check(program, Check::ArgumentCounts);
        assert_eq!(
            kinds(&counts),
            vec![DiagnosticKind::ArgumentCountMismatch, DiagnosticKind::ArgumentCountMismatch]
        );
        assert!(matches!(counts[0], SemanticError::ArgumentCountMismatch { expected: 2, found: 1, .. }));
        assert!(matches!(counts[1], SemanticError::ArgumentCountMismatch { expected: 0, found: 1, .. }));
        assert!(run_check(program, Check::ArgumentTypes).is_empty());
    }

    #[test]
    fn argument_types_follow_the_cast_lattice() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let f = b.function(
            "f",
            &[b.scalar("x", VarType::Float), b.scalar("y", VarType::Int)],
            VarType::Void,
            &[],
            &[],
        );
        let bad = b.logic(true);
        let main = b.main_function(
            &[],
            &[b.call_stmt("f", &[b.char('a'), b.int(2)]), b.call_stmt("f", &[b.int(1), bad])],
        );
        let program = b.program("p", &[], &[f, main]);

        let errors = run_check(program, Check::ArgumentTypes);
        assert_eq!(
            errors,
            vec![SemanticError::IncompatibleArgument {
                name: "f".into(),
                index: 1,
                expected: VarType::Int,
                found: VarType::Logic,
                site: Site::Node(bad.id()),
            }]
        );
        assert_eq!(
            errors[0].to_string(),
            "argument 2 of 'f' must be castable to int, found logic"
        );
    }
}
