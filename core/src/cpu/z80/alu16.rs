use crate::cpu::z80::{Flag, RegPair, Z80};

const XY: u8 = Flag::X as u8 | Flag::Y as u8;

impl Z80 {
    /// ADD HL, ss: 11 T. ADD IX, pp: 15 T.
    /// H from bit 11, C from bit 15, N cleared; S, Z and PV preserved.
    pub fn op_add_hl_rr(&mut self, dst: RegPair, src: RegPair) {
        self.t_cycles += if dst.is_index() { 15 } else { 11 };
        let a = self.get_pair(dst);
        let b = self.get_pair(src);
        let result = a as u32 + b as u32;
        let hi = (result >> 8) as u8;

        let mut f = hi & XY;
        if (a & 0x0FFF) + (b & 0x0FFF) > 0x0FFF { f |= Flag::H as u8; }
        if result > 0xFFFF { f |= Flag::C as u8; }
        self.merge_flags(XY | Flag::H as u8 | Flag::N as u8 | Flag::C as u8, f);
        self.set_pair(dst, result as u16);
    }

    /// ADC HL, ss: 15 T
    pub fn op_adc_hl_rr(&mut self, src: RegPair) {
        self.t_cycles += 15;
        let a = self.regs.hl();
        let b = self.get_pair(src);
        let c = self.flag(Flag::C) as u32;
        let wide = a as u32 + b as u32 + c;
        let result = wide as u16;

        let mut f = Self::flags16(result);
        if (a & 0x0FFF) as u32 + (b & 0x0FFF) as u32 + c > 0x0FFF { f |= Flag::H as u8; }
        if (a ^ result) & (b ^ result) & 0x8000 != 0 { f |= Flag::PV as u8; }
        if wide > 0xFFFF { f |= Flag::C as u8; }
        self.regs.set_f(f);
        self.set_pair(RegPair::HL, result);
    }

    /// SBC HL, ss: 15 T
    pub fn op_sbc_hl_rr(&mut self, src: RegPair) {
        self.t_cycles += 15;
        let a = self.regs.hl();
        let b = self.get_pair(src);
        let c = self.flag(Flag::C) as u16;
        let result = a.wrapping_sub(b).wrapping_sub(c);

        let mut f = Self::flags16(result) | Flag::N as u8;
        if (a & 0x0FFF) < (b & 0x0FFF) + c { f |= Flag::H as u8; }
        if (a ^ b) & (a ^ result) & 0x8000 != 0 { f |= Flag::PV as u8; }
        if (a as u32) < b as u32 + c as u32 { f |= Flag::C as u8; }
        self.regs.set_f(f);
        self.set_pair(RegPair::HL, result);
    }

    /// S and Z over all 16 bits, F3/F5 from the high byte.
    fn flags16(result: u16) -> u8 {
        let hi = (result >> 8) as u8;
        let mut f = hi & (XY | Flag::S as u8);
        if result == 0 { f |= Flag::Z as u8; }
        f
    }

    /// INC ss: 6 T. INC IX: 10 T. No flags.
    pub fn op_inc_rr(&mut self, rr: RegPair) {
        self.t_cycles += if rr.is_index() { 10 } else { 6 };
        self.set_pair(rr, self.get_pair(rr).wrapping_add(1));
    }

    /// DEC ss: 6 T. DEC IX: 10 T. No flags.
    pub fn op_dec_rr(&mut self, rr: RegPair) {
        self.t_cycles += if rr.is_index() { 10 } else { 6 };
        self.set_pair(rr, self.get_pair(rr).wrapping_sub(1));
    }
}
