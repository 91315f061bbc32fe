//! Opcode dispatch for the unprefixed, CB, ED, DD/FD and DDCB/FDCB pages.
//!
//! Opcodes are split into the usual bit fields: `x = op >> 6`,
//! `y = (op >> 3) & 7`, `z = op & 7`, `p = y >> 1`, `q = y & 1`.

use std::fmt;

use thiserror::Error;

use crate::cpu::z80::{
    AluOp, Condition, Index, Operand, Reg8, Reg16, RegPair, RotOp, Z80,
};

/// Fully decoded opcode bytes, used for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opcode {
    Cb(u8),
    Ed(u8),
    IndexCb { index: Index, disp: i8, op: u8 },
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Opcode::Cb(op) => write!(f, "CB {op:02X}"),
            Opcode::Ed(op) => write!(f, "ED {op:02X}"),
            Opcode::IndexCb { index, disp, op } => {
                let prefix = match index {
                    Index::IX => "DD",
                    Index::IY => "FD",
                };
                write!(f, "{prefix} CB {:02X} {op:02X}", *disp as u8)
            }
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unimplemented opcode {opcode} at {pc:#06x}")]
    Unimplemented { pc: u16, opcode: Opcode },
}

/// Whether a DD/FD prefix changes the meaning of `op`. Everything else runs
/// as the unprefixed instruction with 4 extra T-states for the prefix.
pub(crate) fn index_affects(op: u8) -> bool {
    let (x, y, z) = (op >> 6, (op >> 3) & 7, op & 7);
    match x {
        0 => match z {
            1 => y & 1 == 1 || y == 4,
            2 => matches!(op, 0x22 | 0x2A),
            3 => y >> 1 == 2,
            4..=6 => (4..=6).contains(&y),
            _ => false,
        },
        1 => op != 0x76 && ((4..=6).contains(&y) || (4..=6).contains(&z)),
        2 => (4..=6).contains(&z),
        _ => matches!(op, 0xCB | 0xE1 | 0xE3 | 0xE5 | 0xE9 | 0xF9),
    }
}

impl Z80 {
    /// Charge the fetch cost of an opcode the core does not implement.
    fn gap(&mut self, pc: u16, opcode: Opcode, cost: u32) -> DecodeError {
        self.t_cycles += cost;
        DecodeError::Unimplemented { pc, opcode }
    }

    /// Resolve a register field, fetching the displacement for (IX+d).
    fn operand(&mut self, field: u8, prefix: Option<Index>) -> Operand {
        let disp = match (field, prefix) {
            (6, Some(_)) => self.fetch_displacement(),
            _ => 0,
        };
        Operand::from_field(field, prefix, disp)
    }

    /// Execute an opcode from the main page. `prefix` is the active DD/FD
    /// prefix, already fetched; `pc` is where the instruction started.
    pub(super) fn execute(
        &mut self,
        pc: u16,
        op: u8,
        prefix: Option<Index>,
    ) -> Result<(), DecodeError> {
        let prefix = match prefix {
            Some(_) if !index_affects(op) => {
                self.t_cycles += 4;
                None
            }
            prefix => prefix,
        };
        let y = (op >> 3) & 0x07;
        let z = op & 0x07;
        let p = y >> 1;
        let hl = RegPair::hl_or(prefix);

        match op {
            0x00 => self.op_nop(),
            0x08 => self.op_ex_af_af(),
            0x10 => {
                let d = self.fetch_displacement();
                self.op_djnz(d);
            }
            0x18 => {
                let d = self.fetch_displacement();
                self.op_jr(d);
            }
            op if op & 0xE7 == 0x20 => {
                let d = self.fetch_displacement();
                self.op_jr_cc(Condition::from_field(y - 4), d);
            }
            op if op & 0xCF == 0x01 => {
                let nn = self.fetch_word();
                self.op_ld_rp_nn(RegPair::dd(p, prefix), nn);
            }
            op if op & 0xCF == 0x09 => self.op_add_hl_rr(hl, RegPair::dd(p, prefix)),
            0x02 => self.op_ld_pair_a(Reg16::BC),
            0x12 => self.op_ld_pair_a(Reg16::DE),
            0x0A => self.op_ld_a_pair(Reg16::BC),
            0x1A => self.op_ld_a_pair(Reg16::DE),
            0x22 => {
                let nn = self.fetch_word();
                self.op_ld_mem_hl(hl, nn);
            }
            0x2A => {
                let nn = self.fetch_word();
                self.op_ld_hl_mem(hl, nn);
            }
            0x32 => {
                let nn = self.fetch_word();
                self.op_ld_mem_a(nn);
            }
            0x3A => {
                let nn = self.fetch_word();
                self.op_ld_a_mem(nn);
            }
            op if op & 0xCF == 0x03 => self.op_inc_rr(RegPair::dd(p, prefix)),
            op if op & 0xCF == 0x0B => self.op_dec_rr(RegPair::dd(p, prefix)),
            op if op & 0xC7 == 0x04 => {
                let dst = self.operand(y, prefix);
                self.op_inc8(dst);
            }
            op if op & 0xC7 == 0x05 => {
                let dst = self.operand(y, prefix);
                self.op_dec8(dst);
            }
            op if op & 0xC7 == 0x06 => {
                // (IX+d) fetches d before n
                let dst = self.operand(y, prefix);
                let n = self.get_byte();
                self.op_ld_r_n(dst, n);
            }
            0x07 => self.op_rlca(),
            0x0F => self.op_rrca(),
            0x17 => self.op_rla(),
            0x1F => self.op_rra(),
            0x27 => self.op_daa(),
            0x2F => self.op_cpl(),
            0x37 => self.op_scf(),
            0x3F => self.op_ccf(),

            0x76 => self.op_halt(),
            op if op & 0xC0 == 0x40 => {
                // LD r,(IX+d) and LD (IX+d),r keep plain H and L
                let (dst, src) = if y == 6 {
                    (self.operand(6, prefix), Operand::plain(z))
                } else if z == 6 {
                    (Operand::plain(y), self.operand(6, prefix))
                } else {
                    (Operand::from_field(y, prefix, 0), Operand::from_field(z, prefix, 0))
                };
                self.op_ld_r_r(dst, src);
            }
            op if op & 0xC0 == 0x80 => {
                let src = self.operand(z, prefix);
                self.op_alu(AluOp::from_field(y), src);
            }

            op if op & 0xC7 == 0xC0 => self.op_ret_cc(Condition::from_field(y)),
            op if op & 0xCF == 0xC1 => self.op_pop(RegPair::qq(p, prefix)),
            0xC9 => self.op_ret(),
            0xD9 => self.op_exx(),
            0xE9 => self.op_jp_hl(hl),
            0xF9 => self.op_ld_sp_hl(hl),
            op if op & 0xC7 == 0xC2 => {
                let nn = self.fetch_word();
                self.op_jp_cc(Condition::from_field(y), nn);
            }
            0xC3 => {
                let nn = self.fetch_word();
                self.op_jp(nn);
            }
            0xCB => {
                return match prefix {
                    None => self.execute_cb(pc),
                    Some(index) => self.execute_index_cb(pc, index),
                };
            }
            0xD3 => {
                let n = self.get_byte();
                self.op_out_n_a(n);
            }
            0xDB => {
                let n = self.get_byte();
                self.op_in_a_n(n);
            }
            0xE3 => self.op_ex_sp_hl(hl),
            0xEB => self.op_ex_de_hl(),
            0xF3 => self.op_di(),
            0xFB => self.op_ei(),
            op if op & 0xC7 == 0xC4 => {
                let nn = self.fetch_word();
                self.op_call_cc(Condition::from_field(y), nn);
            }
            op if op & 0xCF == 0xC5 => self.op_push(RegPair::qq(p, prefix)),
            0xCD => {
                let nn = self.fetch_word();
                self.op_call(nn);
            }
            0xDD => return self.execute_prefixed(pc, Index::IX),
            0xFD => return self.execute_prefixed(pc, Index::IY),
            0xED => return self.execute_ed(pc),
            op if op & 0xC7 == 0xC6 => {
                let n = self.get_byte();
                self.op_alu_n(AluOp::from_field(y), n);
            }
            // RST p: the only remaining pattern, op & 0xC7 == 0xC7
            _ => self.op_rst(op & 0x38),
        }
        Ok(())
    }

    /// DD/FD prefix. A prefix followed by another DD, FD or ED does nothing
    /// but burn 4 T-states; the next step starts at the following prefix.
    fn execute_prefixed(&mut self, pc: u16, index: Index) -> Result<(), DecodeError> {
        match self.memory.read(self.regs.pc) {
            0xDD | 0xFD | 0xED => {
                self.t_cycles += 4;
                Ok(())
            }
            _ => {
                let op = self.fetch_opcode();
                self.execute(pc, op, Some(index))
            }
        }
    }

    fn execute_cb(&mut self, pc: u16) -> Result<(), DecodeError> {
        let op = self.fetch_opcode();
        let y = (op >> 3) & 0x07;
        let target = Operand::plain(op);

        match op >> 6 {
            0 => match RotOp::from_field(y) {
                Some(rot) => self.op_rotate(rot, target, None),
                None => return Err(self.gap(pc, Opcode::Cb(op), 8)),
            },
            1 => self.op_bit(y, target),
            2 => self.op_res(y, target, None),
            _ => self.op_set(y, target, None),
        }
        Ok(())
    }

    /// DDCB/FDCB: displacement first, then the sub-opcode. The sub-opcode
    /// is read as data, so R is not refreshed for it. A register field other
    /// than 6 receives an undocumented copy of the result.
    fn execute_index_cb(&mut self, pc: u16, index: Index) -> Result<(), DecodeError> {
        let disp = self.fetch_displacement();
        let op = self.get_byte();
        let y = (op >> 3) & 0x07;
        let target = Operand::Indexed(index, disp);
        let copy = Reg8::from_field(op);

        match op >> 6 {
            0 => match RotOp::from_field(y) {
                Some(rot) => self.op_rotate(rot, target, copy),
                None => {
                    return Err(self.gap(pc, Opcode::IndexCb { index, disp, op }, 23));
                }
            },
            1 => self.op_bit(y, target),
            2 => self.op_res(y, target, copy),
            _ => self.op_set(y, target, copy),
        }
        Ok(())
    }

    fn execute_ed(&mut self, pc: u16) -> Result<(), DecodeError> {
        let op = self.fetch_opcode();
        let y = (op >> 3) & 0x07;
        let z = op & 0x07;
        let p = y >> 1;
        let q = y & 1;

        match (op, z, Reg8::from_field(y)) {
            (0x40..=0x7F, 0, Some(r)) => self.op_in_r_c(r),
            (0x40..=0x7F, 1, Some(r)) => self.op_out_c_r(r),
            (0x40..=0x7F, 2, _) => {
                let rr = RegPair::dd(p, None);
                if q == 0 { self.op_sbc_hl_rr(rr) } else { self.op_adc_hl_rr(rr) }
            }
            (0x40..=0x7F, 3, _) => {
                let nn = self.fetch_word();
                let rr = RegPair::dd(p, None);
                if q == 0 { self.op_ld_mem_rr(rr, nn) } else { self.op_ld_rr_mem(rr, nn) }
            }
            (0x44, ..) => self.op_neg(),
            (0x45, ..) => self.op_retn(),
            (0x4D, ..) => self.op_reti(),
            (0x46, ..) => self.op_im(0),
            (0x56, ..) => self.op_im(1),
            (0x5E, ..) => self.op_im(2),
            (0x47, ..) => self.op_ld_i_a(),
            (0x4F, ..) => self.op_ld_r_a(),
            (0x57, ..) => self.op_ld_a_i(),
            (0x5F, ..) => self.op_ld_a_r(),
            (0x67, ..) => self.op_rrd(),
            (0x6F, ..) => self.op_rld(),

            (0xA0, ..) => self.op_ldi(),
            (0xA1, ..) => self.op_cpi(),
            (0xA2, ..) => self.op_ini(),
            (0xA3, ..) => self.op_outi(),
            (0xA8, ..) => self.op_ldd(),
            (0xA9, ..) => self.op_cpd(),
            (0xAA, ..) => self.op_ind(),
            (0xAB, ..) => self.op_outd(),
            (0xB0, ..) => self.op_ldir(),
            (0xB1, ..) => self.op_cpir(),
            (0xB2, ..) => self.op_inir(),
            (0xB3, ..) => self.op_otir(),
            (0xB8, ..) => self.op_lddr(),
            (0xB9, ..) => self.op_cpdr(),
            (0xBA, ..) => self.op_indr(),
            (0xBB, ..) => self.op_otdr(),

            _ => return Err(self.gap(pc, Opcode::Ed(op), 8)),
        }
        Ok(())
    }
}
