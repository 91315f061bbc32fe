use crate::cpu::z80::{Flag, Operand, Reg16, Z80};

impl Z80 {
    /// LD r, r' and every (HL)/(IX+d)/IXh variant.
    /// 4 T register to register, 8 T with IXh/IXl, 7 T via (HL), 19 T via (IX+d).
    pub fn op_ld_r_r(&mut self, dst: Operand, src: Operand) {
        let mem = if dst.is_memory() { dst } else { src };
        self.t_cycles += match mem {
            Operand::Hl => 7,
            Operand::Indexed(..) => 19,
            _ if matches!(dst, Operand::IndexHalf(_)) || matches!(src, Operand::IndexHalf(_)) => 8,
            _ => 4,
        };
        let val = self.read_operand(src);
        self.write_operand(dst, val);
    }

    /// LD r, n: 7 T. LD IXh, n 11 T, LD (HL), n 10 T, LD (IX+d), n 19 T.
    pub fn op_ld_r_n(&mut self, dst: Operand, n: u8) {
        self.t_cycles += dst.cost(7, 10, 19);
        self.write_operand(dst, n);
    }

    /// LD A, (BC) / LD A, (DE): 7 T
    pub fn op_ld_a_pair(&mut self, rr: Reg16) {
        self.t_cycles += 7;
        let val = self.memory.read(self.regs.pair(rr));
        self.regs.set_a(val);
    }

    /// LD (BC), A / LD (DE), A: 7 T
    pub fn op_ld_pair_a(&mut self, rr: Reg16) {
        self.t_cycles += 7;
        self.memory.write(self.regs.pair(rr), self.regs.a());
    }

    /// LD A, (nn): 13 T
    pub fn op_ld_a_mem(&mut self, addr: u16) {
        self.t_cycles += 13;
        let val = self.memory.read(addr);
        self.regs.set_a(val);
    }

    /// LD (nn), A: 13 T
    pub fn op_ld_mem_a(&mut self, addr: u16) {
        self.t_cycles += 13;
        self.memory.write(addr, self.regs.a());
    }

    /// LD I, A: 9 T
    pub fn op_ld_i_a(&mut self) {
        self.t_cycles += 9;
        self.regs.i = self.regs.a();
    }

    /// LD R, A: 9 T
    pub fn op_ld_r_a(&mut self) {
        self.t_cycles += 9;
        self.regs.r = self.regs.a();
    }

    /// LD A, I: 9 T
    pub fn op_ld_a_i(&mut self) {
        self.t_cycles += 9;
        self.ld_a_special(self.regs.i);
    }

    /// LD A, R: 9 T. R has already been bumped by both M1 fetches.
    pub fn op_ld_a_r(&mut self) {
        self.t_cycles += 9;
        self.ld_a_special(self.regs.r);
    }

    /// PV reflects IFF2; H and N cleared; C preserved.
    fn ld_a_special(&mut self, val: u8) {
        self.regs.set_a(val);
        let mut f = self.tables.szp(val) & !(Flag::PV as u8);
        if self.regs.iff2 {
            f |= Flag::PV as u8;
        }
        self.merge_flags(!(Flag::C as u8), f);
    }
}
