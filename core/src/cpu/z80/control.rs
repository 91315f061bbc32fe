use crate::cpu::z80::{Flag, Reg16, Z80};

const XY: u8 = Flag::X as u8 | Flag::Y as u8;

impl Z80 {
    // --- General-purpose arithmetic ---

    /// DAA: 4 T. Adjusts A to packed BCD using the precomputed table.
    pub fn op_daa(&mut self) {
        self.t_cycles += 4;
        let af = self.tables.daa(self.regs.a(), self.regs.f());
        self.regs.set_pair(Reg16::AF, af);
    }

    /// CPL: 4 T. H and N set, S/Z/PV/C preserved.
    pub fn op_cpl(&mut self) {
        self.t_cycles += 4;
        let a = !self.regs.a();
        self.regs.set_a(a);
        self.merge_flags(XY | Flag::H as u8 | Flag::N as u8, (a & XY) | Flag::H as u8 | Flag::N as u8);
    }

    /// NEG: 8 T. Same flags as 0 - A.
    pub fn op_neg(&mut self) {
        self.t_cycles += 8;
        let a = self.regs.a();
        let f = self.tables.sub(0, a, false);
        self.regs.set_a(0u8.wrapping_sub(a));
        self.regs.set_f(f);
    }

    /// CCF: 4 T. H takes the old carry.
    pub fn op_ccf(&mut self) {
        self.t_cycles += 4;
        let carry = self.flag(Flag::C);
        let mut f = self.regs.a() & XY;
        if carry { f |= Flag::H as u8; } else { f |= Flag::C as u8; }
        self.merge_flags(XY | Flag::H as u8 | Flag::N as u8 | Flag::C as u8, f);
    }

    /// SCF: 4 T
    pub fn op_scf(&mut self) {
        self.t_cycles += 4;
        let f = (self.regs.a() & XY) | Flag::C as u8;
        self.merge_flags(XY | Flag::H as u8 | Flag::N as u8 | Flag::C as u8, f);
    }

    // --- CPU control ---

    /// NOP: 4 T
    pub fn op_nop(&mut self) {
        self.t_cycles += 4;
    }

    /// HALT: 4 T. PC is left after the HALT; later steps idle until reset.
    pub fn op_halt(&mut self) {
        self.t_cycles += 4;
        self.halted = true;
        log::debug!("HALT at {:04X}", self.regs.pc.wrapping_sub(1));
    }

    /// DI: 4 T
    pub fn op_di(&mut self) {
        self.t_cycles += 4;
        self.regs.iff1 = false;
        self.regs.iff2 = false;
    }

    /// EI: 4 T
    pub fn op_ei(&mut self) {
        self.t_cycles += 4;
        self.regs.iff1 = true;
        self.regs.iff2 = true;
    }

    /// IM 0/1/2: 8 T
    pub fn op_im(&mut self, mode: u8) {
        self.t_cycles += 8;
        self.im = mode;
    }
}
