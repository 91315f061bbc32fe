use crate::cpu::z80::{Flag, Operand, Z80};

/// Eight-bit accumulator operations, in opcode `y` field order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

impl AluOp {
    pub fn from_field(y: u8) -> Self {
        match y & 0x07 {
            0 => AluOp::Add,
            1 => AluOp::Adc,
            2 => AluOp::Sub,
            3 => AluOp::Sbc,
            4 => AluOp::And,
            5 => AluOp::Xor,
            6 => AluOp::Or,
            _ => AluOp::Cp,
        }
    }
}

const XY: u8 = Flag::X as u8 | Flag::Y as u8;

impl Z80 {
    fn alu_apply(&mut self, op: AluOp, val: u8) {
        let a = self.regs.a();
        let carry = self.flag(Flag::C);
        let t = &self.tables;
        let (result, f) = match op {
            AluOp::Add => (a.wrapping_add(val), t.add(a, val, false)),
            AluOp::Adc => (a.wrapping_add(val).wrapping_add(carry as u8), t.add(a, val, carry)),
            AluOp::Sub => (a.wrapping_sub(val), t.sub(a, val, false)),
            AluOp::Sbc => (a.wrapping_sub(val).wrapping_sub(carry as u8), t.sub(a, val, carry)),
            AluOp::And => (a & val, t.and(a, val)),
            AluOp::Xor => (a ^ val, t.xor(a, val)),
            AluOp::Or => (a | val, t.or(a, val)),
            AluOp::Cp => {
                // A is untouched; F3/F5 come from the operand, not the result
                let f = (t.sub(a, val, false) & !XY) | (val & XY);
                self.regs.set_f(f);
                return;
            }
        };
        self.regs.set_a(result);
        self.regs.set_f(f);
    }

    /// ADD/ADC/SUB/SBC/AND/XOR/OR/CP with r, IXh, (HL) or (IX+d).
    /// 4 T for r, 8 T for IXh, 7 T for (HL), 19 T for (IX+d).
    pub fn op_alu(&mut self, op: AluOp, src: Operand) {
        self.t_cycles += src.cost(4, 7, 19);
        let val = self.read_operand(src);
        self.alu_apply(op, val);
    }

    /// ALU op with an immediate: 7 T.
    pub fn op_alu_n(&mut self, op: AluOp, n: u8) {
        self.t_cycles += 7;
        self.alu_apply(op, n);
    }

    /// INC r / (HL) / (IX+d): 4 / 11 / 23 T. C is preserved.
    pub fn op_inc8(&mut self, dst: Operand) {
        self.t_cycles += dst.cost(4, 11, 23);
        let val = self.read_operand(dst);
        let f = self.tables.add(val, 1, false);
        self.write_operand(dst, val.wrapping_add(1));
        self.merge_flags(!(Flag::C as u8), f);
    }

    /// DEC r / (HL) / (IX+d): 4 / 11 / 23 T. C is preserved.
    pub fn op_dec8(&mut self, dst: Operand) {
        self.t_cycles += dst.cost(4, 11, 23);
        let val = self.read_operand(dst);
        let f = self.tables.sub(val, 1, false);
        self.write_operand(dst, val.wrapping_sub(1));
        self.merge_flags(!(Flag::C as u8), f);
    }
}
