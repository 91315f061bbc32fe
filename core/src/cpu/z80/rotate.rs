use crate::cpu::z80::{Flag, Operand, Reg8, Z80};

/// CB-page rotates and shifts. SLL (field 6) is not implemented.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RotOp {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Srl,
}

impl RotOp {
    pub fn from_field(y: u8) -> Option<Self> {
        match y & 0x07 {
            0 => Some(RotOp::Rlc),
            1 => Some(RotOp::Rrc),
            2 => Some(RotOp::Rl),
            3 => Some(RotOp::Rr),
            4 => Some(RotOp::Sla),
            5 => Some(RotOp::Sra),
            7 => Some(RotOp::Srl),
            _ => None,
        }
    }

    /// Returns (result, carry out).
    pub fn apply(self, val: u8, carry_in: bool) -> (u8, bool) {
        let c = carry_in as u8;
        match self {
            RotOp::Rlc => (val.rotate_left(1), val & 0x80 != 0),
            RotOp::Rrc => (val.rotate_right(1), val & 0x01 != 0),
            RotOp::Rl => ((val << 1) | c, val & 0x80 != 0),
            RotOp::Rr => ((val >> 1) | (c << 7), val & 0x01 != 0),
            RotOp::Sla => (val << 1, val & 0x80 != 0),
            RotOp::Sra => ((val >> 1) | (val & 0x80), val & 0x01 != 0),
            RotOp::Srl => (val >> 1, val & 0x01 != 0),
        }
    }
}

const XY: u8 = Flag::X as u8 | Flag::Y as u8;

impl Z80 {
    /// Accumulator rotates leave S, Z and PV alone and clear H and N.
    fn rotate_a(&mut self, op: RotOp) {
        self.t_cycles += 4;
        let (result, carry) = op.apply(self.regs.a(), self.flag(Flag::C));
        self.regs.set_a(result);
        let f = (result & XY) | if carry { Flag::C as u8 } else { 0 };
        self.merge_flags(XY | Flag::H as u8 | Flag::N as u8 | Flag::C as u8, f);
    }

    /// RLCA: 4 T
    pub fn op_rlca(&mut self) {
        self.rotate_a(RotOp::Rlc);
    }

    /// RRCA: 4 T
    pub fn op_rrca(&mut self) {
        self.rotate_a(RotOp::Rrc);
    }

    /// RLA: 4 T
    pub fn op_rla(&mut self) {
        self.rotate_a(RotOp::Rl);
    }

    /// RRA: 4 T
    pub fn op_rra(&mut self) {
        self.rotate_a(RotOp::Rr);
    }

    /// RLC/RRC/RL/RR/SLA/SRA/SRL m: 8 T on a register, 15 T on (HL),
    /// 23 T on (IX+d). `copy` is the undocumented DDCB register target.
    pub fn op_rotate(&mut self, op: RotOp, target: Operand, copy: Option<Reg8>) {
        self.t_cycles += target.cost(8, 15, 23);
        let (result, carry) = op.apply(self.read_operand(target), self.flag(Flag::C));
        self.write_operand(target, result);
        if let Some(reg) = copy {
            self.regs.set(reg, result);
        }
        let f = self.tables.szp(result) | if carry { Flag::C as u8 } else { 0 };
        self.regs.set_f(f);
    }

    /// RLD: 18 T. Rotates the low nibble of A and both nibbles of (HL) left.
    pub fn op_rld(&mut self) {
        self.t_cycles += 18;
        let hl = self.regs.hl();
        let m = self.memory.read(hl);
        let a = self.regs.a();
        self.memory.write(hl, (m << 4) | (a & 0x0F));
        self.digit_result((a & 0xF0) | (m >> 4));
    }

    /// RRD: 18 T
    pub fn op_rrd(&mut self) {
        self.t_cycles += 18;
        let hl = self.regs.hl();
        let m = self.memory.read(hl);
        let a = self.regs.a();
        self.memory.write(hl, (a << 4) | (m >> 4));
        self.digit_result((a & 0xF0) | (m & 0x0F));
    }

    fn digit_result(&mut self, a: u8) {
        self.regs.set_a(a);
        let f = self.tables.szp(a);
        self.merge_flags(!(Flag::C as u8), f);
    }
}
