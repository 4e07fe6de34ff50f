//! COMPITA Compiler
//!
//! Semantic analysis and code generation for COMPITA programs.
//!
//! ## Pipeline
//!
//! 1. **Symbol table**: register globals, functions, parameters and locals
//! 2. **Type resolution**: annotate every typed node, bottom-up
//! 3. **Checks**: run the checker battery, collecting diagnostics
//! 4. **Code generation**: only when no diagnostic was produced
//!
//! ## Modules
//!
//! - [`symbols`]: Global and per-function scopes
//! - [`type_resolver`]: Resolved-type annotation of the tree
//! - [`conversion`]: The implicit cast lattice
//! - [`checks`]: The checker battery, recursion detection included
//! - [`emit`]: Code generation for the target machine
//! - [`context`]: What every pass reads
//! - [`options`]: Compilation options

pub mod checks;
pub mod context;
pub mod conversion;
pub mod emit;
pub mod options;
pub mod symbols;
pub mod type_resolver;

pub use checks::{Check, run_all};
pub use context::CompilationContext;
pub use conversion::{can_cast, can_cast_resolved};
pub use emit::CodeGenerator;
pub use options::{CompileOptions, GlobalBase};
pub use symbols::{ScopeDump, ScopeId, Symbol, SymbolTable};
pub use type_resolver::TypeResolver;

pub use compita_core::{CodegenError, SemanticError};

use compita_core::Instruction;
use compita_core::ast::Program;

/// Result of compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilationResult {
    /// Scopes and their symbols, for display
    pub symbols: Vec<ScopeDump>,
    /// Symbol table diagnostics followed by the checkers' findings
    pub diagnostics: Vec<SemanticError>,
    /// The generated program; only attempted without diagnostics
    pub program: Option<Vec<Instruction>>,
    /// Set when code generation was attempted and failed
    pub codegen_error: Option<CodegenError>,
}

impl CompilationResult {
    /// Check if compilation succeeded (no diagnostics, code generated).
    pub fn is_success(&self) -> bool {
        self.diagnostics.is_empty() && self.program.is_some()
    }
}

/// The main compiler entry point.
pub struct Compiler;

impl Compiler {
    /// Compile a lowered program.
    ///
    /// Never fails: every problem ends up in the returned result.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile<'ast>(program: &'ast Program<'ast>, options: &CompileOptions) -> CompilationResult {
        let (table, mut diagnostics) = SymbolTable::fill(program);
        TypeResolver::resolve(&table, program);

        let ctx = CompilationContext::new(program, &table, options);
        diagnostics.extend(run_all(ctx));
        log::debug!("semantic analysis: {} diagnostic(s)", diagnostics.len());

        let (program, codegen_error) = if diagnostics.is_empty() {
            match CodeGenerator::generate(ctx) {
                Ok(code) => (Some(code), None),
                Err(err) => {
                    log::debug!("code generation failed: {}", err);
                    (None, Some(err))
                }
            }
        } else {
            (None, None)
        };

        CompilationResult {
            symbols: table.dump(),
            diagnostics,
            program,
            codegen_error,
        }
    }
}
