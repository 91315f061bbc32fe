use crate::cpu::z80::{Condition, Reg8, RegPair, Z80};

impl Z80 {
    fn jump_relative(&mut self, d: i8) {
        self.regs.pc = self.regs.pc.wrapping_add(d as i16 as u16);
    }

    /// JP nn: 10 T
    pub fn op_jp(&mut self, nn: u16) {
        self.t_cycles += 10;
        self.regs.pc = nn;
    }

    /// JP cc, nn: 10 T whether or not the jump is taken.
    pub fn op_jp_cc(&mut self, cc: Condition, nn: u16) {
        self.t_cycles += 10;
        if cc.holds(self.regs.f()) {
            self.regs.pc = nn;
        }
    }

    /// JR e: 12 T. The offset is relative to the following instruction.
    pub fn op_jr(&mut self, d: i8) {
        self.t_cycles += 12;
        self.jump_relative(d);
    }

    /// JR cc, e: 12 T taken, 7 T not taken. Only NZ, Z, NC and C exist.
    pub fn op_jr_cc(&mut self, cc: Condition, d: i8) {
        if cc.holds(self.regs.f()) {
            self.t_cycles += 12;
            self.jump_relative(d);
        } else {
            self.t_cycles += 7;
        }
    }

    /// DJNZ e: 13 T taken, 8 T when B reaches zero.
    pub fn op_djnz(&mut self, d: i8) {
        let b = self.regs.get(Reg8::B).wrapping_sub(1);
        self.regs.set(Reg8::B, b);
        if b != 0 {
            self.t_cycles += 13;
            self.jump_relative(d);
        } else {
            self.t_cycles += 8;
        }
    }

    /// JP (HL): 4 T. JP (IX): 8 T. Jumps to the register value, no memory read.
    pub fn op_jp_hl(&mut self, rr: RegPair) {
        self.t_cycles += if rr.is_index() { 8 } else { 4 };
        self.regs.pc = self.get_pair(rr);
    }
}
