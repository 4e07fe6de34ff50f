//! Symbol table: the global scope plus one local scope per function.
//!
//! This module provides `SymbolTable` for tracking declared names. It
//! handles:
//! - Scope creation, idempotent by function name
//! - Symbol registration with duplicate detection
//! - Lookup with fallback from a local scope to the global scope
//! - A display-only dump of every scope's symbols
//!
//! The table is filled once per compilation by [`SymbolTable::fill`] and is
//! read-only afterward.

use compita_core::ast::{Function, Identifier, NodeId, Program};
use compita_core::{SemanticError, Site, VarType};
use rustc_hash::FxHashMap;

// ============================================================================
// Types
// ============================================================================

/// Identity of a scope within one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

impl ScopeId {
    /// The program-wide scope.
    pub const GLOBAL: ScopeId = ScopeId(0);

    #[inline]
    pub fn is_global(self) -> bool {
        self == Self::GLOBAL
    }
}

/// A declared name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Symbol<'ast> {
    /// Variable or parameter
    Variable(&'ast Identifier<'ast>),
    Function(Function<'ast>),
}

impl<'ast> Symbol<'ast> {
    pub fn name(self) -> &'ast str {
        match self {
            Symbol::Variable(ident) => ident.name,
            Symbol::Function(function) => function.name(),
        }
    }

    /// Node the symbol was declared by.
    pub fn node(self) -> NodeId {
        match self {
            Symbol::Variable(ident) => ident.id,
            Symbol::Function(function) => function.id(),
        }
    }

    /// Declared type of a variable, return type of a function.
    pub fn ty(self) -> VarType {
        match self {
            Symbol::Variable(ident) => ident.ty,
            Symbol::Function(function) => function.return_type(),
        }
    }

    pub fn as_variable(self) -> Option<&'ast Identifier<'ast>> {
        match self {
            Symbol::Variable(ident) => Some(ident),
            Symbol::Function(_) => None,
        }
    }

    pub fn as_function(self) -> Option<Function<'ast>> {
        match self {
            Symbol::Function(function) => Some(function),
            Symbol::Variable(_) => None,
        }
    }
}

/// One namespace of symbol names.
#[derive(Debug)]
struct Scope<'ast> {
    /// Owning function's name; `None` for the global scope
    owner: Option<&'ast str>,
    /// Symbols in registration order
    symbols: Vec<Symbol<'ast>>,
    /// Name to position in `symbols`
    index: FxHashMap<&'ast str, usize>,
}

impl<'ast> Scope<'ast> {
    fn new(owner: Option<&'ast str>) -> Self {
        Self {
            owner,
            symbols: Vec::new(),
            index: FxHashMap::default(),
        }
    }
}

/// Display-only snapshot of one scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeDump {
    /// `"global"` or the owning function's name
    pub scope: String,
    /// Symbol names in registration order
    pub symbols: Vec<String>,
}

// ============================================================================
// SymbolTable
// ============================================================================

/// Scopes and their symbols for one compilation.
#[derive(Debug)]
pub struct SymbolTable<'ast> {
    /// Scopes in creation order; index 0 is global
    scopes: Vec<Scope<'ast>>,
    /// Function name to its local scope
    locals: FxHashMap<&'ast str, ScopeId>,
}

impl<'ast> SymbolTable<'ast> {
    /// A table holding only an empty global scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new(None)],
            locals: FxHashMap::default(),
        }
    }

    /// Build the table for a program.
    ///
    /// Registers global declarations, then functions, then each function's
    /// parameters followed by its locals. Duplicates are reported and not
    /// registered.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn fill(program: &'ast Program<'ast>) -> (Self, Vec<SemanticError>) {
        let mut table = Self::new();
        let mut errors = Vec::new();

        let globals = program
            .declarations
            .iter()
            .map(|decl| Symbol::Variable(decl.identifier))
            .chain(program.functions.iter().map(|f| Symbol::Function(*f)));
        for symbol in globals {
            if let Err(err) = table.register(ScopeId::GLOBAL, symbol) {
                errors.push(err);
            }
        }

        for function in program.functions {
            let scope = table.create_scope(*function);
            let locals = function
                .parameters()
                .iter()
                .copied()
                .chain(function.declarations().iter().map(|decl| decl.identifier));
            for ident in locals {
                if let Err(err) = table.register(scope, Symbol::Variable(ident)) {
                    errors.push(err);
                }
            }
        }

        log::debug!(
            "symbol table filled: {} scope(s), {} duplicate(s)",
            table.scopes.len(),
            errors.len()
        );
        (table, errors)
    }

    /// The global scope.
    #[inline]
    pub fn global(&self) -> ScopeId {
        ScopeId::GLOBAL
    }

    /// Create the local scope of a function, or return the existing one if
    /// a function of the same name already has a scope.
    pub fn create_scope(&mut self, function: Function<'ast>) -> ScopeId {
        let name = function.name();
        if let Some(&existing) = self.locals.get(name) {
            return existing;
        }
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(Some(name)));
        self.locals.insert(name, id);
        log::debug!("created local scope for '{}'", name);
        id
    }

    /// The local scope of the named function, if created.
    pub fn scope_of(&self, function: &str) -> Option<ScopeId> {
        self.locals.get(function).copied()
    }

    /// Add a symbol to a scope.
    ///
    /// A name already present in that scope (local-only lookup) is not
    /// overwritten; the duplicate is returned as a diagnostic instead.
    pub fn register(&mut self, scope: ScopeId, symbol: Symbol<'ast>) -> Result<(), SemanticError> {
        let name = symbol.name();
        if self.lookup(scope, name, true).is_some() {
            log::debug!("duplicate symbol '{}' in {:?}", name, scope);
            return Err(SemanticError::DuplicateDeclaration {
                name: name.to_string(),
                site: Site::Node(symbol.node()),
            });
        }

        let target = &mut self.scopes[scope.0 as usize];
        target.index.insert(name, target.symbols.len());
        target.symbols.push(symbol);
        log::debug!("registered '{}' in {:?}", name, scope);
        Ok(())
    }

    /// Find a symbol by name.
    ///
    /// Unless `local_only` is set, a miss in a local scope retries in the
    /// global scope.
    pub fn lookup(&self, scope: ScopeId, name: &str, local_only: bool) -> Option<Symbol<'ast>> {
        let here = self.scopes.get(scope.0 as usize)?;
        if let Some(&index) = here.index.get(name) {
            return Some(here.symbols[index]);
        }
        if local_only || scope.is_global() {
            return None;
        }
        self.lookup(ScopeId::GLOBAL, name, true)
    }

    /// Symbols of a scope in registration order.
    pub fn symbols(&self, scope: ScopeId) -> &[Symbol<'ast>] {
        self.scopes
            .get(scope.0 as usize)
            .map(|s| s.symbols.as_slice())
            .unwrap_or(&[])
    }

    /// Number of scopes, global included.
    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    /// Every scope in creation order, global first.
    pub fn scopes(&self) -> impl Iterator<Item = ScopeId> + '_ {
        (0..self.scopes.len() as u32).map(ScopeId)
    }

    /// Every scope with its symbol names, global first, then local scopes
    /// in creation order.
    pub fn dump(&self) -> Vec<ScopeDump> {
        self.scopes
            .iter()
            .map(|scope| ScopeDump {
                scope: scope.owner.unwrap_or("global").to_string(),
                symbols: scope.symbols.iter().map(|s| s.name().to_string()).collect(),
            })
            .collect()
    }
}

impl Default for SymbolTable<'_> {
    fn default() -> Self {
        Self::new()
    }
}
