//! Textual form of instructions.
//!
//! One instruction per line, `OPCODE operand operand ...`, with operands
//! rendered as:
//!
//! ```text
//! EBP, R1          register
//! <int>5           immediate, tagged with its runtime type
//! M[ESP]           register-relative, zero displacement
//! M[EBP + 2]       register-relative, positive displacement
//! M[EHM - 3]       register-relative, negative displacement
//! M[1023]          absolute
//! ```

use std::fmt;

use crate::instr::{Immediate, Instruction, MemoryAddress, Operand, Register};

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Immediate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>{}", self.ty, self.value)
    }
}

impl fmt::Display for MemoryAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MemoryAddress::Absolute(address) => write!(f, "M[{}]", address),
            MemoryAddress::Relative { base, displacement } if displacement < 0 => {
                write!(f, "M[{} - {}]", base, -displacement)
            }
            MemoryAddress::Relative { base, displacement } if displacement > 0 => {
                write!(f, "M[{} + {}]", base, displacement)
            }
            MemoryAddress::Relative { base, .. } => write!(f, "M[{}]", base),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Register(r) => r.fmt(f),
            Operand::Immediate(i) => i.fmt(f),
            Operand::Memory(m) => m.fmt(f),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mnemonic = self.opcode().mnemonic();
        match self {
            Instruction::Mov {
                source,
                destination,
            }
            | Instruction::Ass {
                source,
                destination,
            } => write!(f, "{} {} {}", mnemonic, source, destination),
            Instruction::Cast { ty, target } => write!(f, "{} <{}>0 {}", mnemonic, ty, target),
            Instruction::Binary {
                left,
                right,
                destination,
                ..
            } => write!(f, "{} {} {} {}", mnemonic, left, right, destination),
            Instruction::Neg {
                operand,
                destination,
            }
            | Instruction::Not {
                operand,
                destination,
            } => write!(f, "{} {} {}", mnemonic, operand, destination),
            Instruction::Jmp { target } => write!(f, "{} {}", mnemonic, target),
            Instruction::Jeq { test, target } | Instruction::Jne { test, target } => {
                write!(f, "{} {} {}", mnemonic, test, target)
            }
            Instruction::Push { source } | Instruction::Write { source } => {
                write!(f, "{} {}", mnemonic, source)
            }
            Instruction::Pop { destination } | Instruction::Read { destination } => {
                write!(f, "{} {}", mnemonic, destination)
            }
            Instruction::Call { slot } => write!(f, "{} {}", mnemonic, slot),
            Instruction::Ret | Instruction::Halt => f.write_str(mnemonic),
        }
    }
}

/// Render a program, one instruction per line, with a trailing newline.
pub fn serialize(program: &[Instruction]) -> String {
    let mut out = String::new();
    for instruction in program {
        out.push_str(&instruction.to_string());
        out.push('\n');
    }
    out
}

/// One line of an address-annotated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingLine {
    /// Instruction index, the address `EIP` uses
    pub address: usize,
    pub text: String,
}

impl fmt::Display for ListingLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.address, self.text)
    }
}

/// The listing handed to the execution sandbox: serialized lines with blank
/// lines dropped, each tagged with its address.
pub fn listing(program: &[Instruction]) -> Vec<ListingLine> {
    serialize(program)
        .lines()
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(address, text)| ListingLine {
            address,
            text: text.to_string(),
        })
        .collect()
}
