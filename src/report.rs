//! Report-level compilation: diagnostics in source coordinates and the
//! address-annotated listing.

use compita_compiler::{CompilationResult, CompileOptions, Compiler, ScopeDump};
use compita_core::ast::Program;
use compita_core::instr::listing;
use compita_core::{Backmap, CodegenError, DiagnosticKind, ListingLine, SemanticError, SourceRange, localize};

/// One diagnostic as shown to the student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportedDiagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    /// `None` when the lowering step recorded no tokens for the site
    pub range: Option<SourceRange>,
}

impl ReportedDiagnostic {
    fn new(error: &SemanticError, backmap: &Backmap) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
            range: localize(error, backmap),
        }
    }
}

/// Everything a compilation produces, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Report {
    pub symbols: Vec<ScopeDump>,
    pub diagnostics: Vec<ReportedDiagnostic>,
    /// Empty unless the program compiled cleanly
    pub listing: Vec<ListingLine>,
    pub codegen_error: Option<CodegenError>,
}

impl Report {
    pub fn is_success(&self) -> bool {
        self.diagnostics.is_empty() && self.codegen_error.is_none() && !self.listing.is_empty()
    }

    fn from_result(result: CompilationResult, backmap: &Backmap) -> Self {
        let diagnostics = result
            .diagnostics
            .iter()
            .map(|error| ReportedDiagnostic::new(error, backmap))
            .collect();
        let listing = result.program.as_deref().map(listing).unwrap_or_default();

        Self {
            symbols: result.symbols,
            diagnostics,
            listing,
            codegen_error: result.codegen_error,
        }
    }
}

/// Compile `program` and localize the outcome against `backmap`.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn compile_report<'ast>(program: &'ast Program<'ast>, backmap: &Backmap, options: &CompileOptions) -> Report {
    log::debug!("compiling program '{}'", program.name);
    let report = Report::from_result(Compiler::compile(program, options), backmap);
    log::debug!(
        "program '{}': {} diagnostic(s), {} instruction(s)",
        program.name,
        report.diagnostics.len(),
        report.listing.len()
    );
    report
}
