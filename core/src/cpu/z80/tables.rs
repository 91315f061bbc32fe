//! Precomputed flag tables.
//!
//! Binary tables are indexed by `(operand1 << 8) | operand2` and hold the
//! complete F value the operation produces, undocumented F3/F5 included.
//! They are pure functions of their inputs, built once and then shared
//! read-only between CPUs.

use crate::cpu::z80::Flag;

const TABLE_SIZE: usize = 0x10000;

/// S, F5 and F3 are straight copies of result bits 7, 5 and 3.
const SXY: u8 = Flag::S as u8 | Flag::Y as u8 | Flag::X as u8;

#[inline]
pub const fn key(n1: u8, n2: u8) -> usize {
    ((n1 as usize) << 8) | n2 as usize
}

fn binary_table(f: impl Fn(u8, u8) -> u8) -> Box<[u8]> {
    (0..TABLE_SIZE)
        .map(|i| f((i >> 8) as u8, i as u8))
        .collect()
}

fn add_with_carry(n1: u8, n2: u8, carry: u8) -> u8 {
    let result = n1 as u16 + n2 as u16 + carry as u16;
    let lo = result as u8;
    let mut f = lo & SXY;
    if lo == 0 { f |= Flag::Z as u8; }
    if carry == 0 {
        if (n1 & 0x0F) > (lo & 0x0F) { f |= Flag::H as u8; }
    } else if (n1 & 0x0F) + (n2 & 0x0F) + carry > 0x0F {
        f |= Flag::H as u8;
    }
    if (n1 ^ lo) & (n2 ^ lo) & 0x80 != 0 { f |= Flag::PV as u8; }
    if result > 0xFF { f |= Flag::C as u8; }
    f
}

fn sub_with_carry(n1: u8, n2: u8, carry: u8) -> u8 {
    let lo = n1.wrapping_sub(n2).wrapping_sub(carry);
    let mut f = (lo & SXY) | Flag::N as u8;
    if lo == 0 { f |= Flag::Z as u8; }
    if (n1 & 0x0F) < (n2 & 0x0F) + carry { f |= Flag::H as u8; }
    if (n1 ^ n2) & (n1 ^ lo) & 0x80 != 0 { f |= Flag::PV as u8; }
    if (n1 as u16) < n2 as u16 + carry as u16 { f |= Flag::C as u8; }
    f
}

fn logic(result: u8, half_carry: bool) -> u8 {
    let mut f = result & SXY;
    if result == 0 { f |= Flag::Z as u8; }
    if result.count_ones() % 2 == 0 { f |= Flag::PV as u8; }
    if half_carry { f |= Flag::H as u8; }
    f
}

pub fn generate_add_flags() -> Box<[u8]> {
    binary_table(|n1, n2| add_with_carry(n1, n2, 0))
}

pub fn generate_adc_flags() -> Box<[u8]> {
    binary_table(|n1, n2| add_with_carry(n1, n2, 1))
}

pub fn generate_sub_flags() -> Box<[u8]> {
    binary_table(|n1, n2| sub_with_carry(n1, n2, 0))
}

pub fn generate_sbc_flags() -> Box<[u8]> {
    binary_table(|n1, n2| sub_with_carry(n1, n2, 1))
}

pub fn generate_and_flags() -> Box<[u8]> {
    binary_table(|n1, n2| logic(n1 & n2, true))
}

pub fn generate_or_flags() -> Box<[u8]> {
    binary_table(|n1, n2| logic(n1 | n2, false))
}

pub fn generate_xor_flags() -> Box<[u8]> {
    binary_table(|n1, n2| logic(n1 ^ n2, false))
}

/// One byte per value: 1 when the value has an even number of set bits.
pub fn generate_parity() -> Box<[u8]> {
    (0..=0xFFu8).map(|n| (n.count_ones() % 2 == 0) as u8).collect()
}

/// DAA outcomes keyed by `(nch << 8) | a`, where `nch` packs N (bit 2),
/// C (bit 1) and H (bit 0). Each entry is the new AF: A high, F low.
pub fn generate_daa() -> Box<[u16]> {
    (0..8 * 256)
        .map(|i| {
            let nch = (i >> 8) as u8;
            let a = i as u8;
            let n = nch & 0x04 != 0;
            let c = nch & 0x02 != 0;
            let h = nch & 0x01 != 0;

            let mut correction = 0u8;
            let mut carry = c;
            if h || (a & 0x0F) > 9 {
                correction |= 0x06;
            }
            if c || a > 0x99 {
                correction |= 0x60;
                carry = true;
            }
            let result = if n {
                a.wrapping_sub(correction)
            } else {
                a.wrapping_add(correction)
            };
            let half = if n { h && (a & 0x0F) < 6 } else { (a & 0x0F) > 9 };

            let mut f = logic(result, half);
            if n { f |= Flag::N as u8; }
            if carry { f |= Flag::C as u8; }
            ((result as u16) << 8) | f as u16
        })
        .collect()
}

/// The full set of lookup tables consulted by the 8-bit ALU.
#[derive(Clone, PartialEq, Eq)]
pub struct FlagTables {
    add: Box<[u8]>,
    adc: Box<[u8]>,
    sub: Box<[u8]>,
    sbc: Box<[u8]>,
    and: Box<[u8]>,
    or: Box<[u8]>,
    xor: Box<[u8]>,
    parity: Box<[u8]>,
    daa: Box<[u16]>,
}

impl FlagTables {
    pub fn generate() -> Self {
        Self {
            add: generate_add_flags(),
            adc: generate_adc_flags(),
            sub: generate_sub_flags(),
            sbc: generate_sbc_flags(),
            and: generate_and_flags(),
            or: generate_or_flags(),
            xor: generate_xor_flags(),
            parity: generate_parity(),
            daa: generate_daa(),
        }
    }

    /// Flags for `n1 + n2 + carry`.
    #[inline]
    pub fn add(&self, n1: u8, n2: u8, carry: bool) -> u8 {
        if carry { self.adc[key(n1, n2)] } else { self.add[key(n1, n2)] }
    }

    /// Flags for `n1 - n2 - carry`.
    #[inline]
    pub fn sub(&self, n1: u8, n2: u8, carry: bool) -> u8 {
        if carry { self.sbc[key(n1, n2)] } else { self.sub[key(n1, n2)] }
    }

    #[inline]
    pub fn and(&self, n1: u8, n2: u8) -> u8 {
        self.and[key(n1, n2)]
    }

    #[inline]
    pub fn or(&self, n1: u8, n2: u8) -> u8 {
        self.or[key(n1, n2)]
    }

    #[inline]
    pub fn xor(&self, n1: u8, n2: u8) -> u8 {
        self.xor[key(n1, n2)]
    }

    #[inline]
    pub fn parity_even(&self, n: u8) -> bool {
        self.parity[n as usize] != 0
    }

    /// S, Z, F5, F3 and parity of a value; H, N and C clear.
    #[inline]
    pub fn szp(&self, n: u8) -> u8 {
        self.or(n, 0)
    }

    /// New AF after DAA given the current A and F.
    pub fn daa(&self, a: u8, f: u8) -> u16 {
        let mut nch = 0usize;
        if f & Flag::N as u8 != 0 { nch |= 0x04; }
        if f & Flag::C as u8 != 0 { nch |= 0x02; }
        if f & Flag::H as u8 != 0 { nch |= 0x01; }
        self.daa[(nch << 8) | a as usize]
    }
}

impl std::fmt::Debug for FlagTables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlagTables").finish_non_exhaustive()
    }
}

impl Default for FlagTables {
    fn default() -> Self {
        Self::generate()
    }
}
