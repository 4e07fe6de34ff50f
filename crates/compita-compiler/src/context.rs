//! CompilationContext - what every check reads.

use compita_core::ast::{Function, Program};

use crate::options::CompileOptions;
use crate::symbols::{ScopeId, Symbol, SymbolTable};

/// The program, its symbol table and the options of one compilation.
///
/// Created fresh per compilation; nothing in it outlives the call.
#[derive(Clone, Copy)]
pub struct CompilationContext<'a, 'ast> {
    pub program: &'ast Program<'ast>,
    pub table: &'a SymbolTable<'ast>,
    pub options: &'a CompileOptions,
}

impl<'a, 'ast> CompilationContext<'a, 'ast> {
    pub fn new(
        program: &'ast Program<'ast>,
        table: &'a SymbolTable<'ast>,
        options: &'a CompileOptions,
    ) -> Self {
        Self {
            program,
            table,
            options,
        }
    }

    /// Local scope of a function; global when it has none.
    pub fn scope_of(&self, function: Function<'ast>) -> ScopeId {
        self.table.scope_of(function.name()).unwrap_or(ScopeId::GLOBAL)
    }

    /// Scope-following lookup from inside `scope`.
    #[inline]
    pub fn resolve(&self, scope: ScopeId, name: &str) -> Option<Symbol<'ast>> {
        self.table.lookup(scope, name, false)
    }
}
