//! Control-flow linearization with relative jumps.
//!
//! The machine only jumps through registers, so every jump is preceded by
//! `ADD EIP <int>k R2`. While that ADD executes, `EIP` already holds the
//! address of the next instruction (the jump itself), so `k` counts from
//! there. Offsets are computed from the lengths of sequences that are
//! already fully emitted; nothing is patched afterwards.

use compita_core::instr::BinaryOpcode;
use compita_core::{Immediate, Instruction, Register};

use super::Code;

/// `ADD EIP <int>offset R2`
fn jump_target(offset: i64) -> Instruction {
    Instruction::binary(BinaryOpcode::Add, Register::Eip, Immediate::int(offset), Register::R2)
}

#[inline]
fn len(code: &Code) -> i64 {
    code.len() as i64
}

/// Two-way branch on a condition that leaves one logic value on the stack.
///
/// ```text
/// C; POP R1; ADD EIP <int>(|T|+3) R2; JEQ R1 R2
/// T; ADD EIP <int>(|E|+1) R2; JMP R2
/// E
/// ```
pub(crate) fn branch(condition: Code, then_code: Code, else_code: Code) -> Code {
    let skip_else = len(&else_code) + 1;
    let mut code = condition;
    code.push(Instruction::pop(Register::R1));
    code.push(jump_target(len(&then_code) + 3));
    code.push(Instruction::Jeq {
        test: Register::R1.into(),
        target: Register::R2.into(),
    });
    code.extend(then_code);
    code.push(jump_target(skip_else));
    code.push(Instruction::Jmp {
        target: Register::R2.into(),
    });
    code.extend(else_code);
    code
}

/// Pre-tested loop.
///
/// ```text
/// C; POP R1; ADD EIP <int>(|B|+3) R2; JEQ R1 R2
/// B; ADD EIP <int>-(|C|+|B|+4) R2; JMP R2
/// ```
pub(crate) fn while_loop(condition: Code, body: Code) -> Code {
    let back = -(len(&condition) + len(&body) + 4);
    let mut code = condition;
    code.push(Instruction::pop(Register::R1));
    code.push(jump_target(len(&body) + 3));
    code.push(Instruction::Jeq {
        test: Register::R1.into(),
        target: Register::R2.into(),
    });
    code.extend(body);
    code.push(jump_target(back));
    code.push(Instruction::Jmp {
        target: Register::R2.into(),
    });
    code
}

/// Post-tested loop.
///
/// ```text
/// B; C; POP R1; ADD EIP <int>-(|B|+|C|+2) R2; JNE R1 R2
/// ```
pub(crate) fn do_while(body: Code, condition: Code) -> Code {
    let back = -(len(&body) + len(&condition) + 2);
    let mut code = body;
    code.extend(condition);
    code.push(Instruction::pop(Register::R1));
    code.push(jump_target(back));
    code.push(Instruction::Jne {
        test: Register::R1.into(),
        target: Register::R2.into(),
    });
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use compita_core::{Operand, WordType};

    fn marker(n: i64) -> Instruction {
        Instruction::push(Immediate::new(WordType::Int, n as f64))
    }

    fn block(n: usize) -> Code {
        (0..n as i64).map(marker).collect()
    }

    /// Follow the relative offset of the ADD at `at` as the machine would.
    fn landing(code: &Code, at: usize) -> i64 {
        match code[at] {
            Instruction::Binary {
                right: Operand::Immediate(imm),
                ..
            } => (at as i64 + 1) + imm.value.0 as i64,
            other => panic!("no jump target at {at}: {other}"),
        }
    }

    #[test]
    fn branch_lands_on_else_and_after() {
        let code = branch(block(2), block(3), block(4));
        // C(2) POP ADD JEQ T(3) ADD JMP E(4)
        assert_eq!(code.len(), 2 + 3 + 3 + 2 + 4);
        assert_eq!(landing(&code, 3), 10, "false condition skips to else");
        assert_eq!(landing(&code, 8), 14, "then part skips past else");
        assert!(matches!(code[9], Instruction::Jmp { .. }));
    }

    #[test]
    fn empty_else_falls_through() {
        let code = branch(block(1), block(1), Vec::new());
        assert_eq!(landing(&code, 5), code.len() as i64);
    }

    #[test]
    fn while_jumps_back_to_condition() {
        let code = while_loop(block(2), block(3));
        assert_eq!(code.len(), 2 + 3 + 3 + 2);
        assert_eq!(landing(&code, 3), code.len() as i64, "exit");
        assert_eq!(landing(&code, 8), 0, "back edge");
    }

    #[test]
    fn do_while_jumps_back_to_body() {
        let code = do_while(block(3), block(2));
        assert_eq!(code.len(), 3 + 2 + 3);
        assert_eq!(landing(&code, 6), 0);
        assert!(matches!(code[7], Instruction::Jne { .. }));
    }
}
