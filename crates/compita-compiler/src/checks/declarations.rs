//! Declaration rules: no void identifiers, positive array extents.

use compita_core::ast::{Identifier, Program};
use compita_core::{SemanticError, Site, VarType};

use crate::context::CompilationContext;

/// Global identifiers, then each function's parameters and locals, in
/// program order.
pub(crate) fn declared_identifiers<'ast>(
    program: &'ast Program<'ast>,
) -> impl Iterator<Item = &'ast Identifier<'ast>> {
    let globals = program.declarations.iter().map(|decl| decl.identifier);
    let locals = program.functions.iter().flat_map(|function| {
        function
            .parameters()
            .iter()
            .copied()
            .chain(function.declarations().iter().map(|decl| decl.identifier))
    });
    globals.chain(locals)
}

pub fn no_void_identifier(ctx: CompilationContext<'_, '_>) -> Vec<SemanticError> {
    declared_identifiers(ctx.program)
        .filter(|ident| ident.ty == VarType::Void)
        .map(|ident| SemanticError::VoidIdentifier {
            name: ident.name.to_string(),
            site: Site::Node(ident.id),
        })
        .collect()
}

/// One diagnostic per non-positive extent.
pub fn positive_dimensions(ctx: CompilationContext<'_, '_>) -> Vec<SemanticError> {
    let mut errors = Vec::new();
    for ident in declared_identifiers(ctx.program) {
        for &dimension in ident.dimensions.iter().filter(|&&d| d <= 0) {
            errors.push(SemanticError::NonPositiveDimension {
                name: ident.name.to_string(),
                dimension,
                site: Site::Node(ident.id),
            });
        }
    }
    errors
}
