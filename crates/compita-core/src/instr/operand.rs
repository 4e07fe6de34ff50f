//! Instruction operands: registers, typed immediates and memory addresses.

use ordered_float::OrderedFloat;

use crate::types::WordType;

/// Machine registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    /// Instruction pointer, already advanced past the executing instruction
    Eip,
    /// Stack pointer; the stack grows toward lower addresses
    Esp,
    /// Frame base
    Ebp,
    /// Return value
    Erv,
    /// Highest usable memory address, base of static data
    Ehm,
    R0,
    R1,
    R2,
}

impl Register {
    pub fn name(self) -> &'static str {
        match self {
            Self::Eip => "EIP",
            Self::Esp => "ESP",
            Self::Ebp => "EBP",
            Self::Erv => "ERV",
            Self::Ehm => "EHM",
            Self::R0 => "R0",
            Self::R1 => "R1",
            Self::R2 => "R2",
        }
    }
}

/// A value embedded in an instruction, tagged with its runtime type.
///
/// Values are stored as `f64` like every memory word of the machine; the
/// tag decides how the machine interprets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Immediate {
    pub ty: WordType,
    pub value: OrderedFloat<f64>,
}

impl Immediate {
    pub fn new(ty: WordType, value: f64) -> Self {
        Self {
            ty,
            value: OrderedFloat(value),
        }
    }

    /// Largest magnitude an integer word holds exactly.
    pub const EXACT_INT_LIMIT: i64 = 1 << 53;

    /// An integer word. Magnitudes above [`Self::EXACT_INT_LIMIT`] are
    /// rounded to the nearest `f64`; use [`Self::exact_int`] for values
    /// that come from source text.
    pub fn int(value: i64) -> Self {
        Self::new(WordType::Int, value as f64)
    }

    /// An integer word, or `None` when `value` cannot be stored exactly.
    pub fn exact_int(value: i64) -> Option<Self> {
        (-Self::EXACT_INT_LIMIT..=Self::EXACT_INT_LIMIT)
            .contains(&value)
            .then(|| Self::int(value))
    }

    pub fn float(value: f64) -> Self {
        Self::new(WordType::Float, value)
    }

    /// A character, by code point.
    pub fn char(code: u32) -> Self {
        Self::new(WordType::Char, f64::from(code))
    }

    /// `true` is stored as 1, `false` as 0.
    pub fn logic(value: bool) -> Self {
        Self::new(WordType::Logic, if value { 1.0 } else { 0.0 })
    }

    /// The zero of a word type, used to reserve storage.
    pub fn zero(ty: WordType) -> Self {
        Self::new(ty, 0.0)
    }
}

/// A memory location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryAddress {
    /// `M[address]`
    Absolute(i64),
    /// `M[base + displacement]`
    Relative { base: Register, displacement: i64 },
}

impl MemoryAddress {
    #[inline]
    pub fn relative(base: Register, displacement: i64) -> Self {
        Self::Relative { base, displacement }
    }

    /// The word at the top of the stack, `M[ESP]`.
    #[inline]
    pub fn stack_top() -> Self {
        Self::relative(Register::Esp, 0)
    }

    /// The word a register points at, `M[reg]`.
    #[inline]
    pub fn at(base: Register) -> Self {
        Self::relative(base, 0)
    }
}

/// An instruction operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    Register(Register),
    Immediate(Immediate),
    Memory(MemoryAddress),
}

impl From<Register> for Operand {
    fn from(register: Register) -> Self {
        Operand::Register(register)
    }
}

impl From<Immediate> for Operand {
    fn from(immediate: Immediate) -> Self {
        Operand::Immediate(immediate)
    }
}

impl From<MemoryAddress> for Operand {
    fn from(address: MemoryAddress) -> Self {
        Operand::Memory(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn immediates_store_words() {
        assert_eq!(Immediate::logic(true).value, OrderedFloat(1.0));
        assert_eq!(Immediate::char('a' as u32).value, OrderedFloat(97.0));
        assert_eq!(Immediate::int(-1).ty, WordType::Int);
        assert_eq!(Immediate::zero(WordType::Float), Immediate::float(0.0));
    }

    #[test]
    fn integers_beyond_53_bits_are_inexact() {
        let limit = Immediate::EXACT_INT_LIMIT;
        assert_eq!(Immediate::exact_int(limit).map(|i| i.value), Some(OrderedFloat(9007199254740992.0)));
        assert_eq!(Immediate::exact_int(-limit).map(|i| i.ty), Some(WordType::Int));
        assert_eq!(Immediate::exact_int(limit + 1), None);
        assert_eq!(Immediate::exact_int(i64::MIN), None);
    }

    #[test]
    fn stack_top_is_esp_relative() {
        assert_eq!(
            MemoryAddress::stack_top(),
            MemoryAddress::Relative {
                base: Register::Esp,
                displacement: 0
            }
        );
    }
}
