use crate::cpu::z80::Flag;
use crate::cpu::z80::registers::{Index, IndexHalf, Reg8, Reg16};

/// An 8-bit operand after prefix resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    Reg(Reg8),
    IndexHalf(IndexHalf),
    /// (HL)
    Hl,
    /// (IX+d) / (IY+d)
    Indexed(Index, i8),
}

impl Operand {
    /// Map the 3-bit register field, honouring an active DD/FD prefix.
    /// The displacement for field 6 must already be fetched.
    pub fn from_field(field: u8, prefix: Option<Index>, disp: i8) -> Self {
        match (field & 0x07, prefix) {
            (6, None) => Operand::Hl,
            (6, Some(index)) => Operand::Indexed(index, disp),
            (4, Some(index)) => Operand::IndexHalf(IndexHalf::high(index)),
            (5, Some(index)) => Operand::IndexHalf(IndexHalf::low(index)),
            (f, _) => Reg8::from_field(f).map_or(Operand::Hl, Operand::Reg),
        }
    }

    /// Plain register for fields other than 6, ignoring any prefix.
    pub fn plain(field: u8) -> Self {
        Reg8::from_field(field).map_or(Operand::Hl, Operand::Reg)
    }

    pub fn is_memory(self) -> bool {
        matches!(self, Operand::Hl | Operand::Indexed(..))
    }

    /// T-states of an instruction by addressing mode. The IXh/IXl forms
    /// cost the register form plus the prefix fetch.
    pub(crate) fn cost(self, reg: u32, hl: u32, indexed: u32) -> u32 {
        match self {
            Operand::Reg(_) => reg,
            Operand::IndexHalf(_) => reg + 4,
            Operand::Hl => hl,
            Operand::Indexed(..) => indexed,
        }
    }
}

/// 16-bit register operands: dd/ss (BC, DE, HL, SP), qq (AF instead of SP)
/// and the index registers that replace HL under a prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegPair {
    BC,
    DE,
    HL,
    SP,
    AF,
    IX,
    IY,
}

impl RegPair {
    /// `p` field selecting BC, DE, HL or SP.
    pub fn dd(p: u8, prefix: Option<Index>) -> Self {
        match p & 0x03 {
            0 => RegPair::BC,
            1 => RegPair::DE,
            2 => RegPair::hl_or(prefix),
            _ => RegPair::SP,
        }
    }

    /// `p` field selecting BC, DE, HL or AF, as used by PUSH and POP.
    pub fn qq(p: u8, prefix: Option<Index>) -> Self {
        match p & 0x03 {
            3 => RegPair::AF,
            p => RegPair::dd(p, prefix),
        }
    }

    pub fn hl_or(prefix: Option<Index>) -> Self {
        match prefix {
            None => RegPair::HL,
            Some(Index::IX) => RegPair::IX,
            Some(Index::IY) => RegPair::IY,
        }
    }

    pub fn is_index(self) -> bool {
        matches!(self, RegPair::IX | RegPair::IY)
    }

    pub(crate) fn bank_pair(self) -> Option<Reg16> {
        match self {
            RegPair::BC => Some(Reg16::BC),
            RegPair::DE => Some(Reg16::DE),
            RegPair::HL => Some(Reg16::HL),
            RegPair::AF => Some(Reg16::AF),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    NZ,
    Z,
    NC,
    C,
    PO,
    PE,
    P,
    M,
}

impl Condition {
    pub fn from_field(y: u8) -> Self {
        match y & 0x07 {
            0 => Condition::NZ,
            1 => Condition::Z,
            2 => Condition::NC,
            3 => Condition::C,
            4 => Condition::PO,
            5 => Condition::PE,
            6 => Condition::P,
            _ => Condition::M,
        }
    }

    /// Evaluate against a flags byte.
    pub fn holds(self, f: u8) -> bool {
        let set = |flag: Flag| f & flag as u8 != 0;
        match self {
            Condition::NZ => !set(Flag::Z),
            Condition::Z => set(Flag::Z),
            Condition::NC => !set(Flag::C),
            Condition::C => set(Flag::C),
            Condition::PO => !set(Flag::PV),
            Condition::PE => set(Flag::PV),
            Condition::P => !set(Flag::S),
            Condition::M => set(Flag::S),
        }
    }
}
