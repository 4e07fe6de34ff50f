//! Arena-backed tree construction.
//!
//! [`AstBuilder`] is the single place node identities are handed out. The
//! lowering step uses it to turn a parse tree into an AST, and tests use it
//! to write trees by hand.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use compita_core::ast::{AstBuilder, BinaryOp};
//! use compita_core::VarType;
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//!
//! let x = b.scalar("x", VarType::Int);
//! let body = [
//!     b.assign(b.target("x", &[]), b.binary(BinaryOp::Add, b.int(1), b.int(2))),
//!     b.write(&[b.expr_item(b.var("x"))]),
//! ];
//! let main = b.main_function(&[b.declaration(x)], &body);
//! let program = b.program("sum", &[], &[main]);
//! assert_eq!(program.functions.len(), 1);
//! ```

use std::cell::Cell;

use bumpalo::Bump;

use crate::ast::*;
use crate::types::VarType;

/// Builds AST nodes inside a bump arena.
pub struct AstBuilder<'ast> {
    arena: &'ast Bump,
    next_id: Cell<u32>,
}

impl<'ast> AstBuilder<'ast> {
    pub fn new(arena: &'ast Bump) -> Self {
        Self {
            arena,
            next_id: Cell::new(0),
        }
    }

    /// The arena nodes are allocated in.
    pub fn arena(&self) -> &'ast Bump {
        self.arena
    }

    /// Hand out the next node identity.
    pub fn next_id(&self) -> NodeId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        NodeId::new(id)
    }

    /// Number of identities handed out so far.
    pub fn node_count(&self) -> u32 {
        self.next_id.get()
    }

    fn str(&self, s: &str) -> &'ast str {
        self.arena.alloc_str(s)
    }

    // ==========================================================================
    // Declarations
    // ==========================================================================

    /// A scalar identifier (also used for parameters).
    pub fn scalar(&self, name: &str, ty: VarType) -> &'ast Identifier<'ast> {
        self.array(name, ty, &[])
    }

    /// An identifier with the given extents.
    pub fn array(&self, name: &str, ty: VarType, dimensions: &[i64]) -> &'ast Identifier<'ast> {
        let id = self.next_id();
        self.arena.alloc(Identifier {
            id,
            name: self.str(name),
            ty,
            dimensions: self.arena.alloc_slice_copy(dimensions),
        })
    }

    pub fn declaration(&self, identifier: &'ast Identifier<'ast>) -> Declaration<'ast> {
        Declaration {
            id: self.next_id(),
            identifier,
        }
    }

    pub fn main_function(&self, declarations: &[Declaration<'ast>], body: &[Stmt<'ast>]) -> Function<'ast> {
        let id = self.next_id();
        Function::Main(self.arena.alloc(MainFunction {
            id,
            declarations: self.arena.alloc_slice_copy(declarations),
            body: self.arena.alloc_slice_copy(body),
        }))
    }

    pub fn function(
        &self,
        name: &str,
        parameters: &[&'ast Identifier<'ast>],
        return_type: VarType,
        declarations: &[Declaration<'ast>],
        body: &[Stmt<'ast>],
    ) -> Function<'ast> {
        let id = self.next_id();
        Function::Regular(self.arena.alloc(RegularFunction {
            id,
            name: self.str(name),
            parameters: self.arena.alloc_slice_copy(parameters),
            return_type,
            declarations: self.arena.alloc_slice_copy(declarations),
            body: self.arena.alloc_slice_copy(body),
        }))
    }

    pub fn program(
        &self,
        name: &str,
        declarations: &[Declaration<'ast>],
        functions: &[Function<'ast>],
    ) -> &'ast Program<'ast> {
        let id = self.next_id();
        self.arena.alloc(Program {
            id,
            name: self.str(name),
            declarations: self.arena.alloc_slice_copy(declarations),
            functions: self.arena.alloc_slice_copy(functions),
        })
    }

    // ==========================================================================
    // Expressions
    // ==========================================================================

    fn literal(&self, kind: LiteralKind<'ast>) -> Expr<'ast> {
        let id = self.next_id();
        Expr::Literal(self.arena.alloc(LiteralExpr {
            id,
            kind,
            ty: TypeSlot::new(),
        }))
    }

    pub fn int(&self, value: i64) -> Expr<'ast> {
        self.literal(LiteralKind::Int(value))
    }

    pub fn float(&self, value: f64) -> Expr<'ast> {
        self.literal(LiteralKind::Float(value))
    }

    /// A character literal, spelled `'c'`.
    pub fn char(&self, value: char) -> Expr<'ast> {
        let text = self.arena.alloc_str(&format!("'{}'", value));
        self.literal(LiteralKind::Char {
            code: value as u32,
            text,
        })
    }

    pub fn logic(&self, value: bool) -> Expr<'ast> {
        self.literal(LiteralKind::Logic(value))
    }

    /// An identifier reference node, for assignment targets and receptors.
    pub fn target(&self, name: &str, subscripts: &[Expr<'ast>]) -> &'ast IdentExpr<'ast> {
        let id = self.next_id();
        self.arena.alloc(IdentExpr {
            id,
            name: self.str(name),
            subscripts: self.arena.alloc_slice_copy(subscripts),
            ty: TypeSlot::new(),
        })
    }

    /// A plain reference to `name`.
    pub fn var(&self, name: &str) -> Expr<'ast> {
        Expr::Ident(self.target(name, &[]))
    }

    /// A subscripted reference `name[s0, s1, ...]`.
    pub fn indexed(&self, name: &str, subscripts: &[Expr<'ast>]) -> Expr<'ast> {
        Expr::Ident(self.target(name, subscripts))
    }

    fn call_node(&self, name: &str, args: &[Expr<'ast>], in_expression: bool) -> &'ast CallExpr<'ast> {
        let id = self.next_id();
        self.arena.alloc(CallExpr {
            id,
            name: self.str(name),
            args: self.arena.alloc_slice_copy(args),
            in_expression,
            ty: TypeSlot::new(),
        })
    }

    /// A call whose value is used.
    pub fn call(&self, name: &str, args: &[Expr<'ast>]) -> Expr<'ast> {
        Expr::Call(self.call_node(name, args, true))
    }

    pub fn binary(&self, op: BinaryOp, left: Expr<'ast>, right: Expr<'ast>) -> Expr<'ast> {
        let id = self.next_id();
        Expr::Binary(self.arena.alloc(BinaryExpr {
            id,
            op,
            left,
            right,
            ty: TypeSlot::new(),
        }))
    }

    pub fn unary(&self, op: UnaryOp, operand: Expr<'ast>) -> Expr<'ast> {
        let id = self.next_id();
        Expr::Unary(self.arena.alloc(UnaryExpr {
            id,
            op,
            operand,
            ty: TypeSlot::new(),
        }))
    }

    // ==========================================================================
    // Statements
    // ==========================================================================

    /// An assignment node, for `for` headers.
    pub fn assignment(&self, target: &'ast IdentExpr<'ast>, value: Expr<'ast>) -> &'ast AssignStmt<'ast> {
        let id = self.next_id();
        self.arena.alloc(AssignStmt { id, target, value })
    }

    pub fn assign(&self, target: &'ast IdentExpr<'ast>, value: Expr<'ast>) -> Stmt<'ast> {
        Stmt::Assign(self.assignment(target, value))
    }

    pub fn if_(&self, condition: Expr<'ast>, then_body: &[Stmt<'ast>], else_body: &[Stmt<'ast>]) -> Stmt<'ast> {
        let id = self.next_id();
        Stmt::If(self.arena.alloc(IfStmt {
            id,
            condition,
            then_body: self.arena.alloc_slice_copy(then_body),
            else_body: self.arena.alloc_slice_copy(else_body),
        }))
    }

    pub fn while_(&self, condition: Expr<'ast>, body: &[Stmt<'ast>]) -> Stmt<'ast> {
        let id = self.next_id();
        Stmt::While(self.arena.alloc(WhileStmt {
            id,
            condition,
            body: self.arena.alloc_slice_copy(body),
        }))
    }

    pub fn do_while(&self, body: &[Stmt<'ast>], condition: Expr<'ast>) -> Stmt<'ast> {
        let id = self.next_id();
        Stmt::Do(self.arena.alloc(DoStmt {
            id,
            body: self.arena.alloc_slice_copy(body),
            condition,
        }))
    }

    pub fn for_(
        &self,
        initializer: &'ast AssignStmt<'ast>,
        condition: Expr<'ast>,
        increment: &'ast AssignStmt<'ast>,
        body: &[Stmt<'ast>],
    ) -> Stmt<'ast> {
        let id = self.next_id();
        Stmt::For(self.arena.alloc(ForStmt {
            id,
            initializer,
            condition,
            increment,
            body: self.arena.alloc_slice_copy(body),
        }))
    }

    pub fn read(&self, receptors: &[&'ast IdentExpr<'ast>]) -> Stmt<'ast> {
        let id = self.next_id();
        Stmt::Read(self.arena.alloc(ReadStmt {
            id,
            receptors: self.arena.alloc_slice_copy(receptors),
        }))
    }

    /// A string item of a `write`.
    pub fn text(&self, value: &str) -> WriteItem<'ast> {
        let id = self.next_id();
        WriteItem::Text(self.arena.alloc(StringLiteral {
            id,
            value: self.str(value),
        }))
    }

    /// An expression item of a `write`.
    pub fn expr_item(&self, expr: Expr<'ast>) -> WriteItem<'ast> {
        WriteItem::Expr(expr)
    }

    pub fn write(&self, items: &[WriteItem<'ast>]) -> Stmt<'ast> {
        let id = self.next_id();
        Stmt::Write(self.arena.alloc(WriteStmt {
            id,
            items: self.arena.alloc_slice_copy(items),
        }))
    }

    /// A CALL statement.
    pub fn call_stmt(&self, name: &str, args: &[Expr<'ast>]) -> Stmt<'ast> {
        Stmt::Call(self.call_node(name, args, false))
    }

    pub fn ret(&self, value: Option<Expr<'ast>>) -> Stmt<'ast> {
        let id = self.next_id();
        Stmt::Return(self.arena.alloc(ReturnStmt {
            id,
            value,
            ty: TypeSlot::new(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_dense_and_unique() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let one = b.int(1);
        let two = b.int(2);
        let sum = b.binary(BinaryOp::Add, one, two);
        assert_eq!(one.id(), NodeId::new(0));
        assert_eq!(two.id(), NodeId::new(1));
        assert_eq!(sum.id(), NodeId::new(2));
        assert_eq!(b.node_count(), 3);
    }

    #[test]
    fn new_nodes_are_unresolved() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let call = b.call("f", &[b.var("x")]);
        assert_eq!(call.ty(), None);
        match call {
            Expr::Call(c) => {
                assert!(c.in_expression);
                assert_eq!(c.args.len(), 1);
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn char_literal_keeps_code_and_spelling() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        match b.char('A') {
            Expr::Literal(lit) => {
                assert_eq!(lit.kind, LiteralKind::Char { code: 65, text: "'A'" });
                assert_eq!(lit.kind.intrinsic_type(), VarType::Char);
            }
            other => panic!("expected literal, got {:?}", other),
        }
    }

    #[test]
    fn functions_expose_uniform_accessors() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let a = b.scalar("a", VarType::Int);
        let f = b.function("f", &[a], VarType::Float, &[], &[b.ret(Some(b.var("a")))]);
        let main = b.main_function(&[], &[]);
        assert_eq!(f.name(), "f");
        assert_eq!(f.parameters().len(), 1);
        assert_eq!(f.return_type(), VarType::Float);
        assert_eq!(main.name(), MAIN_NAME);
        assert!(main.parameters().is_empty());
        assert_eq!(main.return_type(), VarType::Void);

        let program = b.program("p", &[], &[f, main]);
        assert_eq!(program.main().map(|m| m.id()), Some(main.id()));
    }

    #[test]
    fn array_cell_count() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        assert_eq!(b.array("m", VarType::Char, &[3, 4]).cell_count(), Some(12));
        assert_eq!(b.scalar("s", VarType::Char).cell_count(), Some(1));
        let huge = 1i64 << 32;
        assert_eq!(b.array("h", VarType::Int, &[huge, huge]).cell_count(), None);
    }
}
