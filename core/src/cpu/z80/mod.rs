mod alu;
mod alu16;
mod bit;
mod block;
mod call;
mod control;
mod decode;
mod io;
mod jump;
mod load16;
mod load8;
pub mod operand;
pub mod registers;
mod rotate;
pub mod tables;

use std::sync::Arc;

use crate::core::{AddressSpace, ClockConfig};
use crate::cpu::{
    Cpu,
    state::{CpuStateTrait, Z80State},
};

pub use alu::AluOp;
pub use decode::{DecodeError, Opcode};
pub use operand::{Condition, Operand, RegPair};
pub use registers::{Index, IndexHalf, Reg8, Reg16, RegisterFile};
pub use rotate::RotOp;
pub use tables::FlagTables;

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flag {
    C = 0x01,  // Carry
    N = 0x02,  // Add/Subtract
    PV = 0x04, // Parity/Overflow
    X = 0x08,  // Undocumented, copy of bit 3
    H = 0x10,  // Half Carry
    Y = 0x20,  // Undocumented, copy of bit 5
    Z = 0x40,  // Zero
    S = 0x80,  // Sign
}

/// Z80 CPU with its own 64KB memory and 64KB port space.
///
/// Execution is instruction-granular: [`Z80::step`] runs one complete
/// instruction and reports how many T-states it took. Bus timing inside an
/// instruction is not modelled.
pub struct Z80 {
    pub regs: RegisterFile,
    pub memory: AddressSpace,
    pub ports: AddressSpace,
    pub(crate) tables: Arc<FlagTables>,
    /// T-states consumed by the current (or last) instruction.
    pub t_cycles: u32,
    clock: ClockConfig,
    pub im: u8,
    pub halted: bool,
}

impl Default for Z80 {
    fn default() -> Self {
        Self::new()
    }
}

impl Z80 {
    pub fn new() -> Self {
        Self::with_clock(ClockConfig::default())
    }

    pub fn with_clock(clock: ClockConfig) -> Self {
        Self::with_tables(clock, Arc::new(FlagTables::generate()))
    }

    /// Build a CPU that shares an already generated set of flag tables.
    pub fn with_tables(clock: ClockConfig, tables: Arc<FlagTables>) -> Self {
        Self {
            regs: RegisterFile::new(),
            memory: AddressSpace::new(),
            ports: AddressSpace::new(),
            tables,
            t_cycles: 0,
            clock,
            im: 0,
            halted: false,
        }
    }

    pub fn tables(&self) -> &Arc<FlagTables> {
        &self.tables
    }

    /// Copy a byte image into memory at `address`, wrapping past 0xFFFF.
    pub fn load(&mut self, bytes: &[u8], address: u16) {
        self.memory.load(address, bytes);
    }

    /// Execute one instruction. Opcodes the core does not implement are
    /// consumed, logged and otherwise behave as a no-op.
    pub fn step(&mut self) -> u32 {
        match self.try_step() {
            Ok(cycles) => cycles,
            Err(err) => {
                log::warn!("{err}");
                self.t_cycles
            }
        }
    }

    /// Execute one instruction, surfacing unimplemented opcodes as errors.
    /// PC, R and `t_cycles` are advanced even when an error is returned.
    pub fn try_step(&mut self) -> Result<u32, DecodeError> {
        self.t_cycles = 0;
        if self.halted {
            self.regs.increment_r();
            self.t_cycles = 4;
            return Ok(self.t_cycles);
        }
        let pc = self.regs.pc;
        let opcode = self.fetch_opcode();
        log::trace!("{pc:04X}: {opcode:02X} {:?}", self.regs);
        self.execute(pc, opcode, None)?;
        Ok(self.t_cycles)
    }

    // --- Fetch helpers ---

    /// M1 fetch: read at PC, advance PC and refresh R.
    pub(crate) fn fetch_opcode(&mut self) -> u8 {
        let op = self.get_byte();
        self.regs.increment_r();
        op
    }

    /// Operand fetch: read at PC and advance PC.
    pub(crate) fn get_byte(&mut self) -> u8 {
        let data = self.memory.read(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        data
    }

    pub(crate) fn fetch_word(&mut self) -> u16 {
        let lo = self.get_byte();
        let hi = self.get_byte();
        u16::from_le_bytes([lo, hi])
    }

    pub(crate) fn fetch_displacement(&mut self) -> i8 {
        self.get_byte() as i8
    }

    // --- Operand access ---

    pub(crate) fn index_address(&self, index: Index, disp: i8) -> u16 {
        self.regs.index(index).wrapping_add(disp as i16 as u16)
    }

    /// Memory address of a memory operand, `None` for registers.
    pub(crate) fn operand_address(&self, op: Operand) -> Option<u16> {
        match op {
            Operand::Hl => Some(self.regs.hl()),
            Operand::Indexed(index, disp) => Some(self.index_address(index, disp)),
            Operand::Reg(_) | Operand::IndexHalf(_) => None,
        }
    }

    pub(crate) fn read_operand(&self, op: Operand) -> u8 {
        match op {
            Operand::Reg(r) => self.regs.get(r),
            Operand::IndexHalf(h) => self.regs.index_half(h),
            Operand::Hl => self.memory.read(self.regs.hl()),
            Operand::Indexed(index, disp) => self.memory.read(self.index_address(index, disp)),
        }
    }

    pub(crate) fn write_operand(&mut self, op: Operand, val: u8) {
        match op {
            Operand::Reg(r) => self.regs.set(r, val),
            Operand::IndexHalf(h) => self.regs.set_index_half(h, val),
            Operand::Hl => self.memory.write(self.regs.hl(), val),
            Operand::Indexed(index, disp) => {
                let addr = self.index_address(index, disp);
                self.memory.write(addr, val);
            }
        }
    }

    pub(crate) fn get_pair(&self, rr: RegPair) -> u16 {
        match rr {
            RegPair::SP => self.regs.sp,
            RegPair::IX => self.regs.ix,
            RegPair::IY => self.regs.iy,
            RegPair::BC => self.regs.bc(),
            RegPair::DE => self.regs.de(),
            RegPair::HL => self.regs.hl(),
            RegPair::AF => self.regs.af(),
        }
    }

    pub(crate) fn set_pair(&mut self, rr: RegPair, val: u16) {
        match (rr, rr.bank_pair()) {
            (_, Some(pair)) => self.regs.set_pair(pair, val),
            (RegPair::SP, None) => self.regs.sp = val,
            (RegPair::IX, None) => self.regs.ix = val,
            (_, None) => self.regs.iy = val,
        }
    }

    // --- Stack ---

    pub(crate) fn push_word(&mut self, val: u16) {
        self.regs.sp = self.regs.sp.wrapping_sub(2);
        self.memory.write_word(self.regs.sp, val);
    }

    pub(crate) fn pop_word(&mut self) -> u16 {
        let val = self.memory.read_word(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(2);
        val
    }

    // --- Flag helpers ---

    #[inline]
    pub(crate) fn flag(&self, flag: Flag) -> bool {
        self.regs.flag(flag)
    }

    /// Replace the flag bits selected by `mask` with those from `value`.
    #[inline]
    pub(crate) fn merge_flags(&mut self, mask: u8, value: u8) {
        let f = self.regs.f();
        self.regs.set_f((f & !mask) | (value & mask));
    }
}

impl Cpu for Z80 {
    fn step(&mut self) -> u32 {
        Z80::step(self)
    }

    fn reset(&mut self) {
        self.regs = RegisterFile::new();
        self.im = 0;
        self.halted = false;
        self.t_cycles = 0;
    }

    fn is_halted(&self) -> bool {
        self.halted
    }

    fn clock(&self) -> ClockConfig {
        self.clock
    }
}

impl CpuStateTrait for Z80 {
    type Snapshot = Z80State;

    fn snapshot(&self) -> Z80State {
        let r = &self.regs;
        Z80State {
            a: r.get(Reg8::A),
            f: r.get(Reg8::F),
            b: r.get(Reg8::B),
            c: r.get(Reg8::C),
            d: r.get(Reg8::D),
            e: r.get(Reg8::E),
            h: r.get(Reg8::H),
            l: r.get(Reg8::L),
            af_alt: r.pair_alt(Reg16::AF),
            bc_alt: r.pair_alt(Reg16::BC),
            de_alt: r.pair_alt(Reg16::DE),
            hl_alt: r.pair_alt(Reg16::HL),
            ix: r.ix,
            iy: r.iy,
            sp: r.sp,
            pc: r.pc,
            i: r.i,
            r: r.r,
            iff1: r.iff1,
            iff2: r.iff2,
            im: self.im,
            halted: self.halted,
        }
    }
}

impl Z80 {
    /// Load every register from a snapshot; the inverse of `snapshot()`.
    pub fn restore(&mut self, state: &Z80State) {
        let r = &mut self.regs;
        for (reg, val) in [
            (Reg8::A, state.a),
            (Reg8::F, state.f),
            (Reg8::B, state.b),
            (Reg8::C, state.c),
            (Reg8::D, state.d),
            (Reg8::E, state.e),
            (Reg8::H, state.h),
            (Reg8::L, state.l),
        ] {
            r.set(reg, val);
        }
        r.set_pair_alt(Reg16::AF, state.af_alt);
        r.set_pair_alt(Reg16::BC, state.bc_alt);
        r.set_pair_alt(Reg16::DE, state.de_alt);
        r.set_pair_alt(Reg16::HL, state.hl_alt);
        r.ix = state.ix;
        r.iy = state.iy;
        r.sp = state.sp;
        r.pc = state.pc;
        r.i = state.i;
        r.r = state.r;
        r.iff1 = state.iff1;
        r.iff2 = state.iff2;
        self.im = state.im;
        self.halted = state.halted;
    }
}
