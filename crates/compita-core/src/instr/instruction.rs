//! The instruction set of the target machine.
//!
//! Addresses in jumps are register values, so control transfer is always
//! computed at run time (typically `ADD EIP <int>k R2` followed by a jump
//! through `R2`). Instructions are plain values and are never patched after
//! being emitted.

use crate::instr::{MemoryAddress, Operand};
use crate::types::WordType;

/// Three-operand instructions: `OP left right destination`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOpcode {
    Add,
    Sub,
    Mult,
    Div,
    Mod,
    Or,
    And,
    /// Compare less than
    Clt,
    /// Compare less or equal
    Cle,
    /// Compare greater than
    Cgt,
    /// Compare greater or equal
    Cge,
    /// Compare equal
    Ceq,
    /// Compare not equal
    Cne,
}

/// Instruction mnemonics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Mov,
    Ass,
    Cast,
    Add,
    Sub,
    Mult,
    Div,
    Mod,
    Neg,
    Not,
    Or,
    And,
    Jmp,
    Jne,
    Jeq,
    Push,
    Pop,
    Clt,
    Cle,
    Cgt,
    Cge,
    Ceq,
    Cne,
    Read,
    Write,
    Call,
    Ret,
    Halt,
}

impl Opcode {
    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Mov => "MOV",
            Self::Ass => "ASS",
            Self::Cast => "CAST",
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::Mult => "MULT",
            Self::Div => "DIV",
            Self::Mod => "MOD",
            Self::Neg => "NEG",
            Self::Not => "NOT",
            Self::Or => "OR",
            Self::And => "AND",
            Self::Jmp => "JMP",
            Self::Jne => "JNE",
            Self::Jeq => "JEQ",
            Self::Push => "PUSH",
            Self::Pop => "POP",
            Self::Clt => "CLT",
            Self::Cle => "CLE",
            Self::Cgt => "CGT",
            Self::Cge => "CGE",
            Self::Ceq => "CEQ",
            Self::Cne => "CNE",
            Self::Read => "READ",
            Self::Write => "WRITE",
            Self::Call => "CALL",
            Self::Ret => "RET",
            Self::Halt => "HALT",
        }
    }
}

impl From<BinaryOpcode> for Opcode {
    fn from(op: BinaryOpcode) -> Self {
        match op {
            BinaryOpcode::Add => Opcode::Add,
            BinaryOpcode::Sub => Opcode::Sub,
            BinaryOpcode::Mult => Opcode::Mult,
            BinaryOpcode::Div => Opcode::Div,
            BinaryOpcode::Mod => Opcode::Mod,
            BinaryOpcode::Or => Opcode::Or,
            BinaryOpcode::And => Opcode::And,
            BinaryOpcode::Clt => Opcode::Clt,
            BinaryOpcode::Cle => Opcode::Cle,
            BinaryOpcode::Cgt => Opcode::Cgt,
            BinaryOpcode::Cge => Opcode::Cge,
            BinaryOpcode::Ceq => Opcode::Ceq,
            BinaryOpcode::Cne => Opcode::Cne,
        }
    }
}

/// A machine instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// Copy a word; the destination takes the source's type.
    Mov { source: Operand, destination: Operand },
    /// Copy a value; the destination keeps its own type.
    Ass { source: Operand, destination: Operand },
    /// Retag `target` with `ty`, converting its value.
    Cast { ty: WordType, target: Operand },
    Binary {
        opcode: BinaryOpcode,
        left: Operand,
        right: Operand,
        destination: Operand,
    },
    /// Integer bitwise complement.
    Neg { operand: Operand, destination: Operand },
    /// Logical negation.
    Not { operand: Operand, destination: Operand },
    /// Jump to the address held by `target`.
    Jmp { target: Operand },
    /// Jump when `test` is zero.
    Jeq { test: Operand, target: Operand },
    /// Jump when `test` is non-zero.
    Jne { test: Operand, target: Operand },
    Push { source: Operand },
    Pop { destination: Operand },
    Read { destination: Operand },
    Write { source: Operand },
    /// Push the return address and jump to the address stored at `slot`.
    Call { slot: MemoryAddress },
    Ret,
    Halt,
}

impl Instruction {
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::Mov { .. } => Opcode::Mov,
            Self::Ass { .. } => Opcode::Ass,
            Self::Cast { .. } => Opcode::Cast,
            Self::Binary { opcode, .. } => (*opcode).into(),
            Self::Neg { .. } => Opcode::Neg,
            Self::Not { .. } => Opcode::Not,
            Self::Jmp { .. } => Opcode::Jmp,
            Self::Jeq { .. } => Opcode::Jeq,
            Self::Jne { .. } => Opcode::Jne,
            Self::Push { .. } => Opcode::Push,
            Self::Pop { .. } => Opcode::Pop,
            Self::Read { .. } => Opcode::Read,
            Self::Write { .. } => Opcode::Write,
            Self::Call { .. } => Opcode::Call,
            Self::Ret => Opcode::Ret,
            Self::Halt => Opcode::Halt,
        }
    }

    /// Net number of words this instruction leaves on the stack, as seen by
    /// the code around it. A `CALL` counts as balanced because the callee's
    /// `RET` pops the return address it pushed.
    pub fn stack_effect(&self) -> i64 {
        match self {
            Self::Push { .. } => 1,
            Self::Pop { .. } => -1,
            _ => 0,
        }
    }

    // =========================================================================
    // Constructors
    // =========================================================================

    pub fn push(source: impl Into<Operand>) -> Self {
        Self::Push {
            source: source.into(),
        }
    }

    pub fn pop(destination: impl Into<Operand>) -> Self {
        Self::Pop {
            destination: destination.into(),
        }
    }

    pub fn mov(source: impl Into<Operand>, destination: impl Into<Operand>) -> Self {
        Self::Mov {
            source: source.into(),
            destination: destination.into(),
        }
    }

    pub fn binary(
        opcode: BinaryOpcode,
        left: impl Into<Operand>,
        right: impl Into<Operand>,
        destination: impl Into<Operand>,
    ) -> Self {
        Self::Binary {
            opcode,
            left: left.into(),
            right: right.into(),
            destination: destination.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instr::{Immediate, Register};

    #[test]
    fn binary_opcode_maps_to_mnemonic() {
        let inst = Instruction::binary(
            BinaryOpcode::Mult,
            MemoryAddress::stack_top(),
            Immediate::int(4),
            MemoryAddress::stack_top(),
        );
        assert_eq!(inst.opcode(), Opcode::Mult);
        assert_eq!(inst.opcode().mnemonic(), "MULT");
    }

    #[test]
    fn stack_effects() {
        assert_eq!(Instruction::push(Register::R1).stack_effect(), 1);
        assert_eq!(Instruction::pop(Register::R0).stack_effect(), -1);
        assert_eq!(Instruction::Halt.stack_effect(), 0);
        assert_eq!(
            Instruction::Call {
                slot: MemoryAddress::relative(Register::Ehm, -1)
            }
            .stack_effect(),
            0
        );
    }
}
