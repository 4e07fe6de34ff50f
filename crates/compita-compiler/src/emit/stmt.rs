//! Statement emission.
//!
//! Statements leave the stack as they found it. `for` is emitted as its
//! initializer followed by a `while` whose body ends with the increment.

use compita_core::ast::{AssignStmt, Expr, Stmt, WriteItem};
use compita_core::{CodegenError, Immediate, Instruction, MemoryAddress, Register};

use super::{Code, FunctionEmitter, jumps};

impl<'g, 'a, 'ast> FunctionEmitter<'g, 'a, 'ast> {
    pub(crate) fn block(&self, body: &'ast [Stmt<'ast>]) -> Result<Code, CodegenError> {
        let mut code = Vec::new();
        for &stmt in body {
            code.extend(self.stmt(stmt)?);
        }
        Ok(code)
    }

    pub(crate) fn stmt(&self, stmt: Stmt<'ast>) -> Result<Code, CodegenError> {
        match stmt {
            Stmt::Assign(assign) => self.assign(assign),

            Stmt::If(s) => Ok(jumps::branch(
                self.expr(s.condition)?,
                self.block(s.then_body)?,
                self.block(s.else_body)?,
            )),

            Stmt::While(s) => Ok(jumps::while_loop(self.expr(s.condition)?, self.block(s.body)?)),

            Stmt::Do(s) => Ok(jumps::do_while(self.block(s.body)?, self.expr(s.condition)?)),

            Stmt::For(s) => {
                let mut body = self.block(s.body)?;
                body.extend(self.assign(s.increment)?);
                let mut code = self.assign(s.initializer)?;
                code.extend(jumps::while_loop(self.expr(s.condition)?, body));
                Ok(code)
            }

            Stmt::Read(s) => {
                let mut code = Vec::new();
                for &receptor in s.receptors {
                    code.extend(self.address(receptor)?);
                    code.push(Instruction::pop(Register::R1));
                    code.push(Instruction::Read {
                        destination: MemoryAddress::at(Register::R1).into(),
                    });
                }
                Ok(code)
            }

            Stmt::Write(s) => {
                let mut code = Vec::new();
                for item in s.items {
                    match *item {
                        WriteItem::Text(text) => {
                            code.extend(text.value.chars().map(|c| Instruction::Write {
                                source: Immediate::char(u32::from(c)).into(),
                            }));
                        }
                        WriteItem::Expr(expr) => {
                            code.extend(self.expr(expr)?);
                            code.push(Instruction::pop(Register::R1));
                            code.push(Instruction::Write {
                                source: Register::R1.into(),
                            });
                        }
                    }
                }
                Ok(code)
            }

            Stmt::Call(call) => self.call(call),

            Stmt::Return(s) => self.return_sequence(s.value),
        }
    }

    /// `RHS; ADDR; POP R1; POP R2; ASS R2 M[R1]`
    fn assign(&self, stmt: &AssignStmt<'ast>) -> Result<Code, CodegenError> {
        let mut code = self.expr(stmt.value)?;
        code.extend(self.address(stmt.target)?);
        code.push(Instruction::pop(Register::R1));
        code.push(Instruction::pop(Register::R2));
        code.push(Instruction::Ass {
            source: Register::R2.into(),
            destination: MemoryAddress::at(Register::R1).into(),
        });
        Ok(code)
    }

    /// Move the value (or `-1` when there is none) into `ERV`, tag it with
    /// the declared return type, tear down the frame and return.
    pub(crate) fn return_sequence(&self, value: Option<Expr<'ast>>) -> Result<Code, CodegenError> {
        let mut code = match value {
            Some(value) => self.expr(value)?,
            None => vec![Instruction::push(Immediate::int(-1))],
        };
        code.push(Instruction::pop(Register::Erv));
        code.push(Instruction::Cast {
            ty: self.return_word(),
            target: Register::Erv.into(),
        });
        code.push(Instruction::mov(Register::Ebp, Register::Esp));
        code.push(Instruction::pop(Register::Ebp));
        code.push(Instruction::Ret);
        Ok(code)
    }
}
