use crate::cpu::z80::Flag;

/// 8-bit registers held in the main and shadow banks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reg8 {
    B,
    C,
    D,
    E,
    H,
    L,
    A,
    F,
}

impl Reg8 {
    /// Storage slot inside a bank. The bank is laid out `[C, B, E, D, L, H, F, A]`
    /// so every pair's low-order register sits at the lower index.
    const fn slot(self) -> usize {
        match self {
            Reg8::C => 0,
            Reg8::B => 1,
            Reg8::E => 2,
            Reg8::D => 3,
            Reg8::L => 4,
            Reg8::H => 5,
            Reg8::F => 6,
            Reg8::A => 7,
        }
    }

    /// Decode the 3-bit `r` field of an opcode (B,C,D,E,H,L,-,A).
    /// Field 6 selects (HL) and has no register, so it yields `None`.
    pub const fn from_field(field: u8) -> Option<Reg8> {
        match field & 0x07 {
            0 => Some(Reg8::B),
            1 => Some(Reg8::C),
            2 => Some(Reg8::D),
            3 => Some(Reg8::E),
            4 => Some(Reg8::H),
            5 => Some(Reg8::L),
            7 => Some(Reg8::A),
            _ => None,
        }
    }
}

/// 16-bit views over the register banks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reg16 {
    BC,
    DE,
    HL,
    AF,
}

impl Reg16 {
    const fn low_slot(self) -> usize {
        match self {
            Reg16::BC => 0,
            Reg16::DE => 2,
            Reg16::HL => 4,
            Reg16::AF => 6,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Index {
    IX,
    IY,
}

/// Undocumented 8-bit halves of the index registers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IndexHalf {
    IXh,
    IXl,
    IYh,
    IYl,
}

impl IndexHalf {
    pub const fn high(index: Index) -> Self {
        match index {
            Index::IX => IndexHalf::IXh,
            Index::IY => IndexHalf::IYh,
        }
    }

    pub const fn low(index: Index) -> Self {
        match index {
            Index::IX => IndexHalf::IXl,
            Index::IY => IndexHalf::IYl,
        }
    }

    pub const fn index(self) -> Index {
        match self {
            IndexHalf::IXh | IndexHalf::IXl => Index::IX,
            IndexHalf::IYh | IndexHalf::IYl => Index::IY,
        }
    }

    const fn is_high(self) -> bool {
        matches!(self, IndexHalf::IXh | IndexHalf::IYh)
    }
}

/// Z80 register file: main bank, shadow bank and the special-purpose registers.
///
/// The general-purpose registers of each bank share storage with their pair
/// views, so `set(Reg8::B, ..)` is immediately visible through `pair(Reg16::BC)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterFile {
    main: [u8; 8],
    alt: [u8; 8],
    pub ix: u16,
    pub iy: u16,
    pub i: u8,
    pub r: u8,
    pub sp: u16,
    pub pc: u16,
    pub iff1: bool,
    pub iff2: bool,
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterFile {
    /// Power-on state: general registers, IX, IY and SP read as all ones.
    pub fn new() -> Self {
        Self {
            main: [0xFF; 8],
            alt: [0xFF; 8],
            ix: 0xFFFF,
            iy: 0xFFFF,
            i: 0,
            r: 0,
            sp: 0xFFFF,
            pc: 0x0000,
            iff1: false,
            iff2: false,
        }
    }

    #[inline]
    pub fn get(&self, reg: Reg8) -> u8 {
        self.main[reg.slot()]
    }

    #[inline]
    pub fn set(&mut self, reg: Reg8, val: u8) {
        self.main[reg.slot()] = val;
    }

    pub fn get_alt(&self, reg: Reg8) -> u8 {
        self.alt[reg.slot()]
    }

    pub fn set_alt(&mut self, reg: Reg8, val: u8) {
        self.alt[reg.slot()] = val;
    }

    #[inline]
    pub fn pair(&self, rr: Reg16) -> u16 {
        let lo = rr.low_slot();
        u16::from_le_bytes([self.main[lo], self.main[lo + 1]])
    }

    #[inline]
    pub fn set_pair(&mut self, rr: Reg16, val: u16) {
        let lo = rr.low_slot();
        self.main[lo..lo + 2].copy_from_slice(&val.to_le_bytes());
    }

    pub fn pair_alt(&self, rr: Reg16) -> u16 {
        let lo = rr.low_slot();
        u16::from_le_bytes([self.alt[lo], self.alt[lo + 1]])
    }

    pub fn set_pair_alt(&mut self, rr: Reg16, val: u16) {
        let lo = rr.low_slot();
        self.alt[lo..lo + 2].copy_from_slice(&val.to_le_bytes());
    }

    pub fn index(&self, index: Index) -> u16 {
        match index {
            Index::IX => self.ix,
            Index::IY => self.iy,
        }
    }

    pub fn set_index(&mut self, index: Index, val: u16) {
        match index {
            Index::IX => self.ix = val,
            Index::IY => self.iy = val,
        }
    }

    pub fn index_half(&self, half: IndexHalf) -> u8 {
        let [lo, hi] = self.index(half.index()).to_le_bytes();
        if half.is_high() { hi } else { lo }
    }

    pub fn set_index_half(&mut self, half: IndexHalf, val: u8) {
        let mut bytes = self.index(half.index()).to_le_bytes();
        bytes[if half.is_high() { 1 } else { 0 }] = val;
        self.set_index(half.index(), u16::from_le_bytes(bytes));
    }

    // --- Shorthands for the hot registers ---

    #[inline]
    pub fn a(&self) -> u8 {
        self.get(Reg8::A)
    }

    #[inline]
    pub fn set_a(&mut self, val: u8) {
        self.set(Reg8::A, val);
    }

    #[inline]
    pub fn f(&self) -> u8 {
        self.get(Reg8::F)
    }

    #[inline]
    pub fn set_f(&mut self, val: u8) {
        self.set(Reg8::F, val);
    }

    pub fn bc(&self) -> u16 {
        self.pair(Reg16::BC)
    }

    pub fn de(&self) -> u16 {
        self.pair(Reg16::DE)
    }

    pub fn hl(&self) -> u16 {
        self.pair(Reg16::HL)
    }

    pub fn af(&self) -> u16 {
        self.pair(Reg16::AF)
    }

    pub fn flag(&self, flag: Flag) -> bool {
        self.f() & flag as u8 != 0
    }

    pub fn set_flag(&mut self, flag: Flag, on: bool) {
        let f = self.f();
        self.set_f(if on { f | flag as u8 } else { f & !(flag as u8) });
    }

    /// EX AF,AF'
    pub fn exchange_af(&mut self) {
        for reg in [Reg8::A, Reg8::F] {
            let s = reg.slot();
            std::mem::swap(&mut self.main[s], &mut self.alt[s]);
        }
    }

    /// EXX: swap BC, DE and HL with their shadows.
    pub fn exchange_main(&mut self) {
        let (main, alt) = (&mut self.main[0..6], &mut self.alt[0..6]);
        main.swap_with_slice(alt);
    }

    /// Memory refresh: the low 7 bits of R count opcode fetches, bit 7 is sticky.
    pub fn increment_r(&mut self) {
        self.r = (self.r & 0x80) | (self.r.wrapping_add(1) & 0x7F);
    }
}
