//! Declaration AST nodes: identifiers, functions and the program root.

use crate::ast::{NodeId, Stmt};
use crate::types::VarType;

/// Name under which the `main` function is known to the symbol table.
pub const MAIN_NAME: &str = "main";

/// A declared name: global or local variable, or function parameter.
///
/// `dimensions` is empty for scalars; otherwise one extent per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Identifier<'ast> {
    pub id: NodeId,
    pub name: &'ast str,
    pub ty: VarType,
    pub dimensions: &'ast [i64],
}

impl Identifier<'_> {
    #[inline]
    pub fn is_subscripted(&self) -> bool {
        !self.dimensions.is_empty()
    }

    /// Number of memory words the identifier occupies.
    ///
    /// One for scalars, the product of the extents for arrays; `None` when
    /// the product does not fit an `i64`.
    pub fn cell_count(&self) -> Option<i64> {
        self.dimensions.iter().try_fold(1i64, |cells, &extent| cells.checked_mul(extent))
    }
}

/// A declaration statement. Declares exactly one identifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Declaration<'ast> {
    pub id: NodeId,
    pub identifier: &'ast Identifier<'ast>,
}

/// A function definition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Function<'ast> {
    /// The entry point: no name, no parameters, no return type
    Main(&'ast MainFunction<'ast>),
    Regular(&'ast RegularFunction<'ast>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MainFunction<'ast> {
    pub id: NodeId,
    pub declarations: &'ast [Declaration<'ast>],
    pub body: &'ast [Stmt<'ast>],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegularFunction<'ast> {
    pub id: NodeId,
    pub name: &'ast str,
    pub parameters: &'ast [&'ast Identifier<'ast>],
    pub return_type: VarType,
    pub declarations: &'ast [Declaration<'ast>],
    pub body: &'ast [Stmt<'ast>],
}

impl<'ast> Function<'ast> {
    pub fn id(self) -> NodeId {
        match self {
            Self::Main(f) => f.id,
            Self::Regular(f) => f.id,
        }
    }

    /// Symbol name of the function; `"main"` for the entry point.
    pub fn name(self) -> &'ast str {
        match self {
            Self::Main(_) => MAIN_NAME,
            Self::Regular(f) => f.name,
        }
    }

    #[inline]
    pub fn is_main(self) -> bool {
        matches!(self, Self::Main(_))
    }

    pub fn parameters(self) -> &'ast [&'ast Identifier<'ast>] {
        match self {
            Self::Main(_) => &[],
            Self::Regular(f) => f.parameters,
        }
    }

    /// Declared return type; `main` returns `void`.
    pub fn return_type(self) -> VarType {
        match self {
            Self::Main(_) => VarType::Void,
            Self::Regular(f) => f.return_type,
        }
    }

    pub fn declarations(self) -> &'ast [Declaration<'ast>] {
        match self {
            Self::Main(f) => f.declarations,
            Self::Regular(f) => f.declarations,
        }
    }

    pub fn body(self) -> &'ast [Stmt<'ast>] {
        match self {
            Self::Main(f) => f.body,
            Self::Regular(f) => f.body,
        }
    }
}

/// The root of the tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Program<'ast> {
    pub id: NodeId,
    pub name: &'ast str,
    pub declarations: &'ast [Declaration<'ast>],
    pub functions: &'ast [Function<'ast>],
}

impl<'ast> Program<'ast> {
    /// The first function called `main`, if any.
    pub fn main(&self) -> Option<Function<'ast>> {
        self.functions.iter().copied().find(|f| f.name() == MAIN_NAME)
    }
}
