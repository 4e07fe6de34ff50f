//! The checker battery.
//!
//! Each [`Check`] is an independent validator reading the resolved tree and
//! the symbol table. No check depends on another's output: a node whose
//! type is unresolved has already been reported elsewhere and is skipped.
//! A void value in a consumed position is skipped the same way, as
//! [`Check::NoVoidInExpression`] reports it.
//! Checks run in the fixed order of [`Check::ALL`], which only fixes the
//! order diagnostics come out in.
//!
//! - [`program`]: unique main, program-name clashes
//! - [`declarations`]: void identifiers, dimension extents
//! - [`usage`]: initialized and referenced identifiers
//! - [`references`]: declare-before-use, symbol kinds, subscripts
//! - [`calls`]: call statements, argument counts and types
//! - [`typing`]: operands, assignments, conditions, void values, returns
//! - [`loops`]: `for` headers
//! - [`recursion`]: call-graph cycles

pub mod calls;
pub mod declarations;
pub mod loops;
pub mod program;
pub mod recursion;
pub mod references;
pub mod typing;
pub mod usage;

use compita_core::ast::{Expr, Function};
use compita_core::{SemanticError, VarType};

use crate::context::CompilationContext;
use crate::symbols::{ScopeId, Symbol};

/// One semantic rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Check {
    UniqueMain,
    DeclareBeforeUse,
    CalledIsFunction,
    CallStatementReturnsVoid,
    NoVoidIdentifier,
    OperandsMatchOperators,
    PositiveDimensions,
    InitializedAndReferenced,
    AssignmentCompatible,
    SubscriptArity,
    LogicalConditions,
    ForInitializerScalar,
    ForIncrementMatches,
    IntegralSubscripts,
    NoVoidInExpression,
    NoProgramNameClash,
    NoFunctionPointers,
    ArgumentCounts,
    ArgumentTypes,
    ReturnsMatchFunction,
    NoRecursion,
}

impl Check {
    /// Every check, in run order.
    pub const ALL: [Check; 21] = [
        Check::UniqueMain,
        Check::DeclareBeforeUse,
        Check::CalledIsFunction,
        Check::CallStatementReturnsVoid,
        Check::NoVoidIdentifier,
        Check::OperandsMatchOperators,
        Check::PositiveDimensions,
        Check::InitializedAndReferenced,
        Check::AssignmentCompatible,
        Check::SubscriptArity,
        Check::LogicalConditions,
        Check::ForInitializerScalar,
        Check::ForIncrementMatches,
        Check::IntegralSubscripts,
        Check::NoVoidInExpression,
        Check::NoProgramNameClash,
        Check::NoFunctionPointers,
        Check::ArgumentCounts,
        Check::ArgumentTypes,
        Check::ReturnsMatchFunction,
        Check::NoRecursion,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Check::UniqueMain => "UniqueMain",
            Check::DeclareBeforeUse => "DeclareBeforeUse",
            Check::CalledIsFunction => "CalledIsFunction",
            Check::CallStatementReturnsVoid => "CallStatementReturnsVoid",
            Check::NoVoidIdentifier => "NoVoidIdentifier",
            Check::OperandsMatchOperators => "OperandsMatchOperators",
            Check::PositiveDimensions => "PositiveDimensions",
            Check::InitializedAndReferenced => "InitializedAndReferenced",
            Check::AssignmentCompatible => "AssignmentCompatible",
            Check::SubscriptArity => "SubscriptArity",
            Check::LogicalConditions => "LogicalConditions",
            Check::ForInitializerScalar => "ForInitializerScalar",
            Check::ForIncrementMatches => "ForIncrementMatches",
            Check::IntegralSubscripts => "IntegralSubscripts",
            Check::NoVoidInExpression => "NoVoidInExpression",
            Check::NoProgramNameClash => "NoProgramNameClash",
            Check::NoFunctionPointers => "NoFunctionPointers",
            Check::ArgumentCounts => "ArgumentCounts",
            Check::ArgumentTypes => "ArgumentTypes",
            Check::ReturnsMatchFunction => "ReturnsMatchFunction",
            Check::NoRecursion => "NoRecursion",
        }
    }

    /// Whether the options turn this check on.
    pub fn is_enabled(self, ctx: &CompilationContext<'_, '_>) -> bool {
        match self {
            Check::NoRecursion => ctx.options.rejects_recursion(),
            _ => true,
        }
    }

    /// Run this check alone.
    pub fn run<'ast>(self, ctx: CompilationContext<'_, 'ast>) -> Vec<SemanticError> {
        match self {
            Check::UniqueMain => program::unique_main(ctx),
            Check::DeclareBeforeUse => references::declare_before_use(ctx),
            Check::CalledIsFunction => references::called_is_function(ctx),
            Check::CallStatementReturnsVoid => calls::call_statement_returns_void(ctx),
            Check::NoVoidIdentifier => declarations::no_void_identifier(ctx),
            Check::OperandsMatchOperators => typing::operands_match_operators(ctx),
            Check::PositiveDimensions => declarations::positive_dimensions(ctx),
            Check::InitializedAndReferenced => usage::initialized_and_referenced(ctx),
            Check::AssignmentCompatible => typing::assignment_compatible(ctx),
            Check::SubscriptArity => references::subscript_arity(ctx),
            Check::LogicalConditions => typing::logical_conditions(ctx),
            Check::ForInitializerScalar => loops::for_initializer_scalar(ctx),
            Check::ForIncrementMatches => loops::for_increment_matches(ctx),
            Check::IntegralSubscripts => references::integral_subscripts(ctx),
            Check::NoVoidInExpression => typing::no_void_in_expression(ctx),
            Check::NoProgramNameClash => program::no_program_name_clash(ctx),
            Check::NoFunctionPointers => references::no_function_pointers(ctx),
            Check::ArgumentCounts => calls::argument_counts(ctx),
            Check::ArgumentTypes => calls::argument_types(ctx),
            Check::ReturnsMatchFunction => typing::returns_match_function(ctx),
            Check::NoRecursion => recursion::no_recursion(ctx),
        }
    }
}

/// Run every enabled check in order and concatenate their findings.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn run_all(ctx: CompilationContext<'_, '_>) -> Vec<SemanticError> {
    let mut errors = Vec::new();
    for check in Check::ALL {
        if !check.is_enabled(&ctx) {
            log::debug!("check {} disabled", check.name());
            continue;
        }
        let found = check.run(ctx);
        log::debug!("check {}: {} diagnostic(s)", check.name(), found.len());
        errors.extend(found);
    }
    errors
}

/// Resolved type of a consumed value; `None` when unresolved or void.
#[inline]
pub(crate) fn value_type(expr: Expr<'_>) -> Option<VarType> {
    expr.ty().filter(|&ty| ty != VarType::Void)
}

// ============================================================================
// Cursor
// ============================================================================

/// Traversal state shared by the visitor-based checks: the function being
/// walked, its scope, and the diagnostics found so far.
pub(crate) struct Cursor<'a, 'ast> {
    pub ctx: CompilationContext<'a, 'ast>,
    pub function: Option<Function<'ast>>,
    pub scope: ScopeId,
    pub errors: Vec<SemanticError>,
}

impl<'a, 'ast> Cursor<'a, 'ast> {
    pub fn new(ctx: CompilationContext<'a, 'ast>) -> Self {
        Self {
            ctx,
            function: None,
            scope: ScopeId::GLOBAL,
            errors: Vec::new(),
        }
    }

    /// Make `function` the one being walked.
    pub fn enter(&mut self, function: Function<'ast>) {
        self.function = Some(function);
        self.scope = self.ctx.scope_of(function);
    }

    /// Scope-following lookup from the current function.
    #[inline]
    pub fn resolve(&self, name: &str) -> Option<Symbol<'ast>> {
        self.ctx.resolve(self.scope, name)
    }

    #[inline]
    pub fn report(&mut self, error: SemanticError) {
        self.errors.push(error);
    }
}
