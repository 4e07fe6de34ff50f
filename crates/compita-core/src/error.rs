//! Error types for semantic analysis and code generation.
//!
//! ## Error Hierarchy
//!
//! ```text
//! SemanticError  - collected diagnostics, one per finding; never thrown
//! CodegenError   - violated code generator preconditions, returned as Err
//! ```
//!
//! A [`SemanticError`] points at the offending node through a [`Site`]
//! rather than at source text. Turning a site into a line/column range is
//! done separately by [`localize`](crate::localize) against a
//! [`Backmap`](crate::Backmap).

use std::fmt;

use thiserror::Error;

use crate::ast::NodeId;
use crate::types::VarType;

// ============================================================================
// Sites
// ============================================================================

/// What a diagnostic points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Site {
    /// A single node
    Node(NodeId),
    /// A range spanning from the first node to the second
    Between(NodeId, NodeId),
}

impl Site {
    /// The node the range starts at.
    pub fn first(self) -> NodeId {
        match self {
            Site::Node(id) | Site::Between(id, _) => id,
        }
    }
}

impl From<NodeId> for Site {
    fn from(id: NodeId) -> Self {
        Site::Node(id)
    }
}

// ============================================================================
// Semantic Errors
// ============================================================================

/// A semantic diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
    /// A name registered twice in the same scope.
    #[error("symbol '{name}' declared more than once")]
    DuplicateDeclaration { name: String, site: Site },

    /// The program defines no `main` function.
    #[error("program has no main function")]
    MissingMainFunction { site: Site },

    /// A reference or call to a name with no visible declaration.
    #[error("symbol '{name}' is used but never declared")]
    UndeclaredSymbol { name: String, site: Site },

    /// A call whose target is a variable.
    #[error("'{name}' is called but is not a function")]
    NotAFunction { name: String, site: Site },

    /// A CALL statement whose target returns a value.
    #[error("CALL statement target '{name}' must return void, but returns {return_type}")]
    CallStatementMustReturnVoid {
        name: String,
        return_type: VarType,
        site: Site,
    },

    /// A variable or parameter declared with type `void`.
    #[error("identifier '{name}' cannot be declared void")]
    VoidIdentifier { name: String, site: Site },

    /// Operand types not accepted by an operator.
    #[error("operator '{operator}' requires {expected} operands")]
    IncompatibleOperands {
        operator: &'static str,
        expected: &'static str,
        site: Site,
    },

    /// An array extent that is zero or negative.
    #[error("dimension {dimension} of '{name}' must be positive")]
    NonPositiveDimension { name: String, dimension: i64, site: Site },

    /// A variable that is never written to or read into.
    #[error("'{name}' is never initialized")]
    NeverInitialized { name: String, site: Site },

    /// A declared name that is never referenced.
    #[error("'{name}' is never referenced")]
    NeverReferenced { name: String, site: Site },

    /// An assignment whose value cannot be cast to the target's type.
    #[error("cannot assign {from} value to {to} target")]
    IncompatibleAssignment { from: VarType, to: VarType, site: Site },

    /// A reference with the wrong number of subscripts.
    #[error("'{name}' declared with {declared} dimension(s) but used with {used}")]
    MismatchingDimensionality {
        name: String,
        declared: usize,
        used: usize,
        site: Site,
    },

    /// A branch or loop condition that is not `logic`.
    #[error("condition must be logic, found {found}")]
    NonLogicalCondition { found: VarType, site: Site },

    /// A `for` initializer that is not an int/char scalar.
    #[error("for loop must be initialized by an int or char scalar, '{name}' is not one")]
    ForInitializerNotScalar { name: String, site: Site },

    /// A `for` increment that updates a different variable.
    #[error("for loop increments '{increment}' but initializes '{initializer}'")]
    ForIncrementMismatch {
        initializer: String,
        increment: String,
        site: Site,
    },

    /// A subscript that cannot be cast to `int`.
    #[error("subscript must be int-like, found {found}")]
    NonIntegralSubscript { found: VarType, site: Site },

    /// A void-typed value in expression position.
    #[error("void value used in expression")]
    VoidInExpression { site: Site },

    /// A symbol named like the program itself.
    #[error("symbol '{name}' clashes with the program name")]
    ClashesWithProgramName { name: String, site: Site },

    /// A function named where a variable is expected.
    #[error("function '{name}' used as a variable")]
    FunctionUsedAsVariable { name: String, site: Site },

    /// A call with the wrong number of arguments.
    #[error("'{name}' expects {expected} argument(s), got {found}")]
    ArgumentCountMismatch {
        name: String,
        expected: usize,
        found: usize,
        site: Site,
    },

    /// An argument that cannot be cast to its parameter's type.
    #[error("argument {} of '{name}' must be castable to {expected}, found {found}", .index + 1)]
    IncompatibleArgument {
        name: String,
        index: usize,
        expected: VarType,
        found: VarType,
        site: Site,
    },

    /// A non-void function without any `return`.
    #[error("function '{name}' must return a {expected} value")]
    MissingReturn {
        name: String,
        expected: VarType,
        site: Site,
    },

    /// A `return` whose value does not fit the function's return type.
    #[error("function '{name}' returns {expected}, but return statement yields {found}")]
    IncompatibleReturn {
        name: String,
        expected: VarType,
        found: VarType,
        site: Site,
    },

    /// A call site that closes a cycle in the call graph.
    #[error("recursive calls are not supported: {}", .chain.join(" -> "))]
    RecursiveCall { chain: Vec<String>, site: Site },
}

impl SemanticError {
    /// What this diagnostic points at.
    pub fn site(&self) -> Site {
        match self {
            Self::DuplicateDeclaration { site, .. }
            | Self::MissingMainFunction { site }
            | Self::UndeclaredSymbol { site, .. }
            | Self::NotAFunction { site, .. }
            | Self::CallStatementMustReturnVoid { site, .. }
            | Self::VoidIdentifier { site, .. }
            | Self::IncompatibleOperands { site, .. }
            | Self::NonPositiveDimension { site, .. }
            | Self::NeverInitialized { site, .. }
            | Self::NeverReferenced { site, .. }
            | Self::IncompatibleAssignment { site, .. }
            | Self::MismatchingDimensionality { site, .. }
            | Self::NonLogicalCondition { site, .. }
            | Self::ForInitializerNotScalar { site, .. }
            | Self::ForIncrementMismatch { site, .. }
            | Self::NonIntegralSubscript { site, .. }
            | Self::VoidInExpression { site }
            | Self::ClashesWithProgramName { site, .. }
            | Self::FunctionUsedAsVariable { site, .. }
            | Self::ArgumentCountMismatch { site, .. }
            | Self::IncompatibleArgument { site, .. }
            | Self::MissingReturn { site, .. }
            | Self::IncompatibleReturn { site, .. }
            | Self::RecursiveCall { site, .. } => *site,
        }
    }

    /// Stable kind tag.
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Self::DuplicateDeclaration { .. } => DiagnosticKind::DuplicateDeclaration,
            Self::MissingMainFunction { .. } => DiagnosticKind::MissingMainFunction,
            Self::UndeclaredSymbol { .. } => DiagnosticKind::UndeclaredSymbol,
            Self::NotAFunction { .. } => DiagnosticKind::NotAFunction,
            Self::CallStatementMustReturnVoid { .. } => DiagnosticKind::CallStatementMustReturnVoid,
            Self::VoidIdentifier { .. } => DiagnosticKind::VoidIdentifier,
            Self::IncompatibleOperands { .. } => DiagnosticKind::IncompatibleOperands,
            Self::NonPositiveDimension { .. } => DiagnosticKind::NonPositiveDimension,
            Self::NeverInitialized { .. } => DiagnosticKind::NeverInitialized,
            Self::NeverReferenced { .. } => DiagnosticKind::NeverReferenced,
            Self::IncompatibleAssignment { .. } => DiagnosticKind::IncompatibleAssignment,
            Self::MismatchingDimensionality { .. } => DiagnosticKind::MismatchingDimensionality,
            Self::NonLogicalCondition { .. } => DiagnosticKind::NonLogicalCondition,
            Self::ForInitializerNotScalar { .. } => DiagnosticKind::ForInitializerNotScalar,
            Self::ForIncrementMismatch { .. } => DiagnosticKind::ForIncrementMismatch,
            Self::NonIntegralSubscript { .. } => DiagnosticKind::NonIntegralSubscript,
            Self::VoidInExpression { .. } => DiagnosticKind::VoidInExpression,
            Self::ClashesWithProgramName { .. } => DiagnosticKind::ClashesWithProgramName,
            Self::FunctionUsedAsVariable { .. } => DiagnosticKind::FunctionUsedAsVariable,
            Self::ArgumentCountMismatch { .. } => DiagnosticKind::ArgumentCountMismatch,
            Self::IncompatibleArgument { .. } => DiagnosticKind::IncompatibleArgument,
            Self::MissingReturn { .. } => DiagnosticKind::MissingReturn,
            Self::IncompatibleReturn { .. } => DiagnosticKind::IncompatibleReturn,
            Self::RecursiveCall { .. } => DiagnosticKind::RecursiveCall,
        }
    }
}

/// Kind tag of a [`SemanticError`], stable across message wording changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    DuplicateDeclaration,
    MissingMainFunction,
    UndeclaredSymbol,
    NotAFunction,
    CallStatementMustReturnVoid,
    VoidIdentifier,
    IncompatibleOperands,
    NonPositiveDimension,
    NeverInitialized,
    NeverReferenced,
    IncompatibleAssignment,
    MismatchingDimensionality,
    NonLogicalCondition,
    ForInitializerNotScalar,
    ForIncrementMismatch,
    NonIntegralSubscript,
    VoidInExpression,
    ClashesWithProgramName,
    FunctionUsedAsVariable,
    ArgumentCountMismatch,
    IncompatibleArgument,
    MissingReturn,
    IncompatibleReturn,
    RecursiveCall,
}

impl DiagnosticKind {
    /// Tag used in reports.
    pub fn name(self) -> &'static str {
        match self {
            Self::DuplicateDeclaration => "DuplicateDeclaration",
            Self::MissingMainFunction => "MissingMainFunction",
            Self::UndeclaredSymbol => "UndeclaredSymbol",
            Self::NotAFunction => "NotAFunction",
            Self::CallStatementMustReturnVoid => "CallStatementMustReturnVoid",
            Self::VoidIdentifier => "VoidIdentifier",
            Self::IncompatibleOperands => "IncompatibleOperands",
            Self::NonPositiveDimension => "NonPositiveDimension",
            Self::NeverInitialized => "NeverInitialized",
            Self::NeverReferenced => "NeverReferenced",
            Self::IncompatibleAssignment => "IncompatibleAssignment",
            Self::MismatchingDimensionality => "MismatchingDimensionality",
            Self::NonLogicalCondition => "NonLogicalCondition",
            Self::ForInitializerNotScalar => "ForInitializerNotScalar",
            Self::ForIncrementMismatch => "ForIncrementMismatch",
            Self::NonIntegralSubscript => "NonIntegralSubscript",
            Self::VoidInExpression => "VoidInExpression",
            Self::ClashesWithProgramName => "ClashesWithProgramName",
            Self::FunctionUsedAsVariable => "FunctionUsedAsVariable",
            Self::ArgumentCountMismatch => "ArgumentCountMismatch",
            Self::IncompatibleArgument => "IncompatibleArgument",
            Self::MissingReturn => "MissingReturn",
            Self::IncompatibleReturn => "IncompatibleReturn",
            Self::RecursiveCall => "RecursiveCall",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Code Generation Errors
// ============================================================================

/// A violated code generator precondition.
///
/// The generator expects a diagnostic-free, fully resolved tree. Feeding it
/// anything else is a driver bug; it is reported, not recovered from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    /// No function called `main` to call from the entry sequence.
    #[error("program has no main function")]
    MissingMain,

    /// A name with no address in the current frame or in global memory.
    #[error("no storage allocated for '{name}'")]
    UnresolvedName { name: String },

    /// A name that resolves to the wrong kind of symbol.
    #[error("'{name}' is not a {expected}")]
    WrongSymbolKind { name: String, expected: &'static str },

    /// A declaration or constant that would need void storage.
    #[error("'{name}' has no storage type")]
    VoidStorage { name: String },

    /// A node whose type was never resolved.
    #[error("unresolved type at node {node}")]
    UnresolvedType { node: NodeId },

    /// A declaration that does not fit in the machine's memory.
    #[error("'{name}' does not fit in {limit} words of memory")]
    StorageTooLarge { name: String, limit: i64 },

    /// An integer literal a memory word cannot hold exactly.
    #[error("integer literal {value} is not representable in a memory word")]
    InexactInteger { value: i64 },
}
