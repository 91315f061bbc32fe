use crate::cpu::z80::{Condition, Z80};

impl Z80 {
    /// CALL nn: 17 T
    pub fn op_call(&mut self, nn: u16) {
        self.t_cycles += 17;
        self.push_word(self.regs.pc);
        self.regs.pc = nn;
    }

    /// CALL cc, nn: 17 T taken, 10 T not taken.
    pub fn op_call_cc(&mut self, cc: Condition, nn: u16) {
        if cc.holds(self.regs.f()) {
            self.op_call(nn);
        } else {
            self.t_cycles += 10;
        }
    }

    /// RET: 10 T
    pub fn op_ret(&mut self) {
        self.t_cycles += 10;
        self.regs.pc = self.pop_word();
    }

    /// RET cc: 11 T taken, 5 T not taken.
    pub fn op_ret_cc(&mut self, cc: Condition) {
        if cc.holds(self.regs.f()) {
            self.t_cycles += 11;
            self.regs.pc = self.pop_word();
        } else {
            self.t_cycles += 5;
        }
    }

    /// RETI: 14 T. Restores IFF1 from IFF2 like RETN.
    pub fn op_reti(&mut self) {
        self.op_retn();
    }

    /// RETN: 14 T
    pub fn op_retn(&mut self) {
        self.t_cycles += 14;
        self.regs.iff1 = self.regs.iff2;
        self.regs.pc = self.pop_word();
    }

    /// RST p: 11 T. `addr` is one of 0x00, 0x08, .., 0x38.
    pub fn op_rst(&mut self, addr: u8) {
        self.t_cycles += 11;
        self.push_word(self.regs.pc);
        self.regs.pc = addr as u16;
    }
}
