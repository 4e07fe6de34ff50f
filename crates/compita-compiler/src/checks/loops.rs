//! `for` header rules.

use compita_core::ast::visitor::{self, Visitor};
use compita_core::ast::{ForStmt, Function};
use compita_core::{SemanticError, Site};

use super::{Check, Cursor};
use crate::context::CompilationContext;

struct ForScan<'a, 'ast> {
    cursor: Cursor<'a, 'ast>,
    rule: Check,
}

impl<'a, 'ast> Visitor<'ast> for ForScan<'a, 'ast> {
    fn visit_function(&mut self, function: Function<'ast>) {
        self.cursor.enter(function);
        visitor::walk_function(self, function);
    }

    fn visit_for(&mut self, stmt: &'ast ForStmt<'ast>) {
        let init = stmt.initializer.target;
        let incr = stmt.increment.target;
        match self.rule {
            Check::ForInitializerScalar => {
                let declared = self.cursor.resolve(init.name).and_then(|s| s.as_variable());
                let scalar = declared
                    .map(|ident| !ident.is_subscripted() && !init.is_subscripted() && ident.ty.is_integral());
                if scalar == Some(false) {
                    self.cursor.report(SemanticError::ForInitializerNotScalar {
                        name: init.name.to_string(),
                        site: Site::Node(init.id),
                    });
                }
            }
            Check::ForIncrementMatches if incr.name != init.name => {
                self.cursor.report(SemanticError::ForIncrementMismatch {
                    initializer: init.name.to_string(),
                    increment: incr.name.to_string(),
                    site: Site::Node(incr.id),
                });
            }
            _ => {}
        }
        visitor::walk_for(self, stmt);
    }
}

fn scan(ctx: CompilationContext<'_, '_>, rule: Check) -> Vec<SemanticError> {
    let mut scan = ForScan {
        cursor: Cursor::new(ctx),
        rule,
    };
    scan.visit_program(ctx.program);
    scan.cursor.errors
}

/// The initializer targets a non-subscripted int or char variable.
pub fn for_initializer_scalar(ctx: CompilationContext<'_, '_>) -> Vec<SemanticError> {
    scan(ctx, Check::ForInitializerScalar)
}

/// The increment updates the variable the initializer set.
pub fn for_increment_matches(ctx: CompilationContext<'_, '_>) -> Vec<SemanticError> {
    scan(ctx, Check::ForIncrementMatches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::test_support::run_check;
    use bumpalo::Bump;
    use compita_core::VarType;
    use compita_core::ast::{AssignStmt, AstBuilder, BinaryOp, IdentExpr};

    fn header<'ast>(
        b: &AstBuilder<'ast>,
        target: &'ast IdentExpr<'ast>,
    ) -> (&'ast AssignStmt<'ast>, &'ast AssignStmt<'ast>) {
        (b.assignment(target, b.int(0)), b.assignment(b.target(target.name, &[]), b.int(1)))
    }

    #[test]
    fn initializer_must_be_integral_scalar() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let cond = |name: &str| b.binary(BinaryOp::Less, b.var(name), b.int(3));

        let float_target = b.target("f", &[]);
        let array_target = b.target("a", &[b.int(0)]);
        let (fi, fn_) = header(&b, float_target);
        let (ai, an) = header(&b, array_target);
        let (ci, cn) = header(&b, b.target("c", &[]));
        let main = b.main_function(
            &[
                b.declaration(b.scalar("f", VarType::Float)),
                b.declaration(b.array("a", VarType::Int, &[2])),
                b.declaration(b.scalar("c", VarType::Char)),
            ],
            &[
                b.for_(fi, cond("f"), fn_, &[]),
                b.for_(ai, cond("c"), an, &[]),
                b.for_(ci, cond("c"), cn, &[]),
            ],
        );
        let program = b.program("p", &[], &[main]);

        let sites: Vec<_> = run_check(program, Check::ForInitializerScalar)
            .iter()
            .map(SemanticError::site)
            .collect();
        assert_eq!(sites, vec![Site::Node(float_target.id), Site::Node(array_target.id)]);
    }

    #[test]
    fn increment_must_match_initializer() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let stray = b.target("j", &[]);
        let outer = b.for_(
            b.assignment(b.target("i", &[]), b.int(0)),
            b.binary(BinaryOp::Less, b.var("i"), b.int(3)),
            b.assignment(stray, b.int(1)),
            &[],
        );
        let main = b.main_function(
            &[b.declaration(b.scalar("i", VarType::Int)), b.declaration(b.scalar("j", VarType::Int))],
            &[outer],
        );
        let program = b.program("p", &[], &[main]);

        assert_eq!(
            run_check(program, Check::ForIncrementMatches),
            vec![SemanticError::ForIncrementMismatch {
                initializer: "i".into(),
                increment: "j".into(),
                site: Site::Node(stray.id),
            }]
        );
    }
}
