//! Expression emission.

use compita_core::ast::{BinaryOp, CallExpr, Expr, LiteralKind, UnaryOp};
use compita_core::instr::BinaryOpcode;
use compita_core::{CodegenError, Immediate, Instruction, MemoryAddress, Register};

use super::{Code, FunctionEmitter};

fn opcode(op: BinaryOp) -> BinaryOpcode {
    match op {
        BinaryOp::Or => BinaryOpcode::Or,
        BinaryOp::And => BinaryOpcode::And,
        BinaryOp::Less => BinaryOpcode::Clt,
        BinaryOp::LessEqual => BinaryOpcode::Cle,
        BinaryOp::Greater => BinaryOpcode::Cgt,
        BinaryOp::GreaterEqual => BinaryOpcode::Cge,
        BinaryOp::Equal => BinaryOpcode::Ceq,
        BinaryOp::NotEqual => BinaryOpcode::Cne,
        BinaryOp::Add => BinaryOpcode::Add,
        BinaryOp::Sub => BinaryOpcode::Sub,
        BinaryOp::Mul => BinaryOpcode::Mult,
        BinaryOp::Div => BinaryOpcode::Div,
        BinaryOp::Mod => BinaryOpcode::Mod,
    }
}

fn constant(kind: LiteralKind<'_>) -> Result<Immediate, CodegenError> {
    Ok(match kind {
        LiteralKind::Int(value) => Immediate::exact_int(value).ok_or(CodegenError::InexactInteger { value })?,
        LiteralKind::Float(value) => Immediate::float(value),
        LiteralKind::Char { code, .. } => Immediate::char(code),
        LiteralKind::Logic(value) => Immediate::logic(value),
    })
}

impl<'g, 'a, 'ast> FunctionEmitter<'g, 'a, 'ast> {
    /// Evaluate an expression, leaving its value on top of the stack.
    pub(crate) fn expr(&self, expr: Expr<'ast>) -> Result<Code, CodegenError> {
        if expr.ty().is_none() {
            return Err(CodegenError::UnresolvedType { node: expr.id() });
        }
        let top = MemoryAddress::stack_top();

        let code = match expr {
            Expr::Literal(literal) => vec![Instruction::push(constant(literal.kind)?)],

            Expr::Ident(ident) => {
                let mut code = self.address(ident)?;
                code.push(Instruction::pop(Register::R1));
                code.push(Instruction::push(MemoryAddress::at(Register::R1)));
                code
            }

            Expr::Call(call) => self.call(call)?,

            Expr::Binary(binary) => {
                let mut code = self.expr(binary.left)?;
                code.extend(self.expr(binary.right)?);
                code.push(Instruction::binary(
                    opcode(binary.op),
                    MemoryAddress::relative(Register::Esp, 1),
                    top,
                    Register::R1,
                ));
                code.push(Instruction::pop(Register::R0));
                code.push(Instruction::pop(Register::R0));
                code.push(Instruction::push(Register::R1));
                code
            }

            Expr::Unary(unary) => {
                let mut code = self.expr(unary.operand)?;
                let operand = top.into();
                let destination = Register::R1.into();
                code.push(match unary.op {
                    UnaryOp::Negate => Instruction::Neg { operand, destination },
                    UnaryOp::Not => Instruction::Not { operand, destination },
                });
                code.push(Instruction::pop(Register::R0));
                code.push(Instruction::push(Register::R1));
                code
            }
        };
        Ok(code)
    }

    /// Push the arguments left to right, call through the callee's slot,
    /// then drop the arguments. In expression position the return value is
    /// pushed afterwards.
    pub(crate) fn call(&self, call: &CallExpr<'ast>) -> Result<Code, CodegenError> {
        let slot = self.callee_slot(call.name)?;
        let mut code = Vec::new();
        for &arg in call.args {
            code.extend(self.expr(arg)?);
        }
        code.push(Instruction::Call { slot });
        code.extend(call.args.iter().map(|_| Instruction::pop(Register::R0)));
        if call.in_expression {
            code.push(Instruction::push(Register::Erv));
        }
        Ok(code)
    }
}
