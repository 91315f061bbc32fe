use crate::cpu::z80::{Flag, Operand, Reg8, Z80};

impl Z80 {
    /// BIT b, m: 8 T register, 12 T (HL), 20 T (IX+d).
    ///
    /// Z and PV are the inverse of the tested bit, S is set only for bit 7.
    /// F3/F5 come from the register for register forms; for memory forms
    /// they come from the high byte of the effective address.
    pub fn op_bit(&mut self, n: u8, src: Operand) {
        self.t_cycles += src.cost(8, 12, 20);
        let val = self.read_operand(src);
        let xy_source = match self.operand_address(src) {
            Some(addr) => (addr >> 8) as u8,
            None => val,
        };
        let tested = val & (1 << n);

        let mut f = Flag::H as u8 | (xy_source & (Flag::X as u8 | Flag::Y as u8));
        if tested == 0 {
            f |= Flag::Z as u8 | Flag::PV as u8;
        }
        if n == 7 && tested != 0 {
            f |= Flag::S as u8;
        }
        self.merge_flags(!(Flag::C as u8), f);
    }

    /// SET b, m: 8 / 15 / 23 T. No flags.
    pub fn op_set(&mut self, n: u8, target: Operand, copy: Option<Reg8>) {
        let val = self.read_operand(target) | (1 << n);
        self.bit_write(target, copy, val);
    }

    /// RES b, m: 8 / 15 / 23 T. No flags.
    pub fn op_res(&mut self, n: u8, target: Operand, copy: Option<Reg8>) {
        let val = self.read_operand(target) & !(1 << n);
        self.bit_write(target, copy, val);
    }

    fn bit_write(&mut self, target: Operand, copy: Option<Reg8>, val: u8) {
        self.t_cycles += target.cost(8, 15, 23);
        self.write_operand(target, val);
        if let Some(reg) = copy {
            self.regs.set(reg, val);
        }
    }
}
