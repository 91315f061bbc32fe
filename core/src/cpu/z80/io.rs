use crate::cpu::z80::{Flag, Reg8, RegPair, Z80};

impl Z80 {
    /// IN A, (n): 11 T. A supplies the high byte of the port address.
    pub fn op_in_a_n(&mut self, n: u8) {
        self.t_cycles += 11;
        let port = u16::from_be_bytes([self.regs.a(), n]);
        let val = self.ports.read(port);
        self.regs.set_a(val);
    }

    /// OUT (n), A: 11 T
    pub fn op_out_n_a(&mut self, n: u8) {
        self.t_cycles += 11;
        let port = u16::from_be_bytes([self.regs.a(), n]);
        self.ports.write(port, self.regs.a());
    }

    /// IN r, (C): 12 T. The full BC is the port address.
    /// S, Z, F3, F5 and parity from the value, H and N cleared, C preserved.
    pub fn op_in_r_c(&mut self, r: Reg8) {
        self.t_cycles += 12;
        let val = self.ports.read(self.regs.bc());
        self.regs.set(r, val);
        let f = self.tables.szp(val);
        self.merge_flags(!(Flag::C as u8), f);
    }

    /// OUT (C), r: 12 T
    pub fn op_out_c_r(&mut self, r: Reg8) {
        self.t_cycles += 12;
        self.ports.write(self.regs.bc(), self.regs.get(r));
    }

    // --- Block I/O ---

    /// Flags shared by INI/IND/OUTI/OUTD. `k` is the transferred value plus
    /// C±1 (input) or the updated L (output).
    fn block_io_flags(&mut self, val: u8, k: u16) {
        let b = self.regs.get(Reg8::B);
        let mut f = b & (Flag::S as u8 | Flag::X as u8 | Flag::Y as u8);
        if b == 0 { f |= Flag::Z as u8; }
        if val & 0x80 != 0 { f |= Flag::N as u8; }
        if k > 0xFF { f |= Flag::H as u8 | Flag::C as u8; }
        if self.tables.parity_even((k as u8 & 0x07) ^ b) { f |= Flag::PV as u8; }
        self.regs.set_f(f);
    }

    /// One INI/IND iteration: read port BC into (HL), then decrement B.
    /// Returns B != 0.
    fn block_in(&mut self, delta: u16) -> bool {
        let val = self.ports.read(self.regs.bc());
        let hl = self.regs.hl();
        self.memory.write(hl, val);
        self.set_pair(RegPair::HL, hl.wrapping_add(delta));
        let b = self.regs.get(Reg8::B).wrapping_sub(1);
        self.regs.set(Reg8::B, b);

        let c = self.regs.get(Reg8::C).wrapping_add(delta as u8);
        self.block_io_flags(val, val as u16 + c as u16);
        b != 0
    }

    /// One OUTI/OUTD iteration: B is decremented before the port write.
    fn block_out(&mut self, delta: u16) -> bool {
        let b = self.regs.get(Reg8::B).wrapping_sub(1);
        self.regs.set(Reg8::B, b);
        let hl = self.regs.hl();
        let val = self.memory.read(hl);
        self.ports.write(self.regs.bc(), val);
        self.set_pair(RegPair::HL, hl.wrapping_add(delta));

        let l = self.regs.get(Reg8::L);
        self.block_io_flags(val, val as u16 + l as u16);
        b != 0
    }

    /// INI: 16 T
    pub fn op_ini(&mut self) {
        self.t_cycles += 16;
        self.block_in(1);
    }

    /// IND: 16 T
    pub fn op_ind(&mut self) {
        self.t_cycles += 16;
        self.block_in(0xFFFF);
    }

    /// INIR: 21 T while B != 0, 16 T on the last iteration.
    pub fn op_inir(&mut self) {
        let again = self.block_in(1);
        self.block_repeat(again);
    }

    /// INDR: 21 / 16 T
    pub fn op_indr(&mut self) {
        let again = self.block_in(0xFFFF);
        self.block_repeat(again);
    }

    /// OUTI: 16 T
    pub fn op_outi(&mut self) {
        self.t_cycles += 16;
        self.block_out(1);
    }

    /// OUTD: 16 T
    pub fn op_outd(&mut self) {
        self.t_cycles += 16;
        self.block_out(0xFFFF);
    }

    /// OTIR: 21 / 16 T
    pub fn op_otir(&mut self) {
        let again = self.block_out(1);
        self.block_repeat(again);
    }

    /// OTDR: 21 / 16 T
    pub fn op_otdr(&mut self) {
        let again = self.block_out(0xFFFF);
        self.block_repeat(again);
    }
}
