//! Program-level rules: a `main` exists, and nothing is named like the
//! program.

use compita_core::{SemanticError, Site};

use crate::context::CompilationContext;

pub fn unique_main(ctx: CompilationContext<'_, '_>) -> Vec<SemanticError> {
    // a second main is a duplicate declaration, reported by the symbol table
    match ctx.program.main() {
        Some(_) => Vec::new(),
        None => vec![SemanticError::MissingMainFunction {
            site: Site::Node(ctx.program.id),
        }],
    }
}

/// Every registered symbol, global or local, sharing the program's name.
pub fn no_program_name_clash(ctx: CompilationContext<'_, '_>) -> Vec<SemanticError> {
    let program_name = ctx.program.name;
    ctx.table
        .scopes()
        .flat_map(|scope| ctx.table.symbols(scope).iter())
        .filter(|symbol| symbol.name() == program_name)
        .map(|symbol| SemanticError::ClashesWithProgramName {
            name: program_name.to_string(),
            site: Site::Node(symbol.node()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::Check;
    use crate::checks::test_support::{kinds, run_check};
    use bumpalo::Bump;
    use compita_core::ast::AstBuilder;
    use compita_core::{DiagnosticKind, VarType};

    #[test]
    fn missing_main_points_at_program() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let f = b.function("f", &[], VarType::Void, &[], &[]);
        let program = b.program("p", &[], &[f]);

        let errors = run_check(program, Check::UniqueMain);
        assert_eq!(errors, vec![SemanticError::MissingMainFunction { site: Site::Node(program.id) }]);
    }

    #[test]
    fn main_present() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let program = b.program("p", &[], &[b.main_function(&[], &[])]);
        assert!(run_check(program, Check::UniqueMain).is_empty());
    }

    #[test]
    fn clashes_in_every_scope() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let global = b.scalar("demo", VarType::Int);
        let function = b.function("demo", &[], VarType::Void, &[], &[]);
        let local = b.scalar("demo", VarType::Char);
        let main = b.main_function(&[b.declaration(local)], &[]);
        let program = b.program("demo", &[b.declaration(global)], &[function, main]);

        let errors = run_check(program, Check::NoProgramNameClash);
        // the function is a duplicate of the global and never registered
        assert_eq!(
            kinds(&errors),
            vec![DiagnosticKind::ClashesWithProgramName, DiagnosticKind::ClashesWithProgramName]
        );
        assert_eq!(errors[0].site(), Site::Node(global.id));
        assert_eq!(errors[1].site(), Site::Node(local.id));
    }
}
