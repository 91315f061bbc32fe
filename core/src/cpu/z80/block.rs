use crate::cpu::z80::{Flag, RegPair, Z80};

const KEEP_SZC: u8 = Flag::S as u8 | Flag::Z as u8 | Flag::C as u8;

impl Z80 {
    // --- Exchange ---

    /// EX DE, HL: 4 T. Never affected by a DD/FD prefix.
    pub fn op_ex_de_hl(&mut self) {
        self.t_cycles += 4;
        let de = self.regs.de();
        self.set_pair(RegPair::DE, self.regs.hl());
        self.set_pair(RegPair::HL, de);
    }

    /// EX AF, AF': 4 T
    pub fn op_ex_af_af(&mut self) {
        self.t_cycles += 4;
        self.regs.exchange_af();
    }

    /// EXX: 4 T
    pub fn op_exx(&mut self) {
        self.t_cycles += 4;
        self.regs.exchange_main();
    }

    /// EX (SP), HL: 19 T. EX (SP), IX: 23 T.
    pub fn op_ex_sp_hl(&mut self, rr: RegPair) {
        self.t_cycles += if rr.is_index() { 23 } else { 19 };
        let sp = self.regs.sp;
        let from_stack = self.memory.read_word(sp);
        self.memory.write_word(sp, self.get_pair(rr));
        self.set_pair(rr, from_stack);
    }

    // --- Block transfer ---

    /// One LDI/LDD iteration. Returns BC != 0.
    fn block_load(&mut self, delta: u16) -> bool {
        let hl = self.regs.hl();
        let de = self.regs.de();
        let val = self.memory.read(hl);
        self.memory.write(de, val);
        self.set_pair(RegPair::HL, hl.wrapping_add(delta));
        self.set_pair(RegPair::DE, de.wrapping_add(delta));
        let bc = self.regs.bc().wrapping_sub(1);
        self.set_pair(RegPair::BC, bc);

        // F3 is bit 3 and F5 is bit 1 of (value + A)
        let n = val.wrapping_add(self.regs.a());
        let mut f = (n & 0x08) | ((n & 0x02) << 4);
        if bc != 0 {
            f |= Flag::PV as u8;
        }
        self.merge_flags(!KEEP_SZC, f);
        bc != 0
    }

    /// Rewind to the ED prefix so the instruction runs again: 21 T, else 16 T.
    pub(super) fn block_repeat(&mut self, again: bool) {
        if again {
            self.regs.pc = self.regs.pc.wrapping_sub(2);
            self.t_cycles += 21;
        } else {
            self.t_cycles += 16;
        }
    }

    /// LDI: 16 T
    pub fn op_ldi(&mut self) {
        self.t_cycles += 16;
        self.block_load(1);
    }

    /// LDD: 16 T
    pub fn op_ldd(&mut self) {
        self.t_cycles += 16;
        self.block_load(0xFFFF);
    }

    /// LDIR: 21 T while BC != 0, 16 T on the last iteration.
    /// BC = 0 on entry wraps and copies 65536 bytes.
    pub fn op_ldir(&mut self) {
        let again = self.block_load(1);
        self.block_repeat(again);
    }

    /// LDDR: 21 / 16 T
    pub fn op_lddr(&mut self) {
        let again = self.block_load(0xFFFF);
        self.block_repeat(again);
    }

    // --- Search ---

    /// One CPI/CPD iteration. Returns (BC != 0, match found).
    fn block_compare(&mut self, delta: u16) -> (bool, bool) {
        let hl = self.regs.hl();
        let a = self.regs.a();
        let val = self.memory.read(hl);
        let result = a.wrapping_sub(val);
        self.set_pair(RegPair::HL, hl.wrapping_add(delta));
        let bc = self.regs.bc().wrapping_sub(1);
        self.set_pair(RegPair::BC, bc);

        let sub = self.tables.sub(a, val, false);
        let half = sub & Flag::H as u8;
        let n = result.wrapping_sub((half != 0) as u8);
        let mut f = (sub & (Flag::S as u8 | Flag::Z as u8 | Flag::H as u8))
            | Flag::N as u8
            | (n & 0x08)
            | ((n & 0x02) << 4);
        if bc != 0 {
            f |= Flag::PV as u8;
        }
        self.merge_flags(!(Flag::C as u8), f);
        (bc != 0, result == 0)
    }

    /// CPI: 16 T
    pub fn op_cpi(&mut self) {
        self.t_cycles += 16;
        self.block_compare(1);
    }

    /// CPD: 16 T
    pub fn op_cpd(&mut self) {
        self.t_cycles += 16;
        self.block_compare(0xFFFF);
    }

    /// CPIR: repeats until BC = 0 or A = (HL). 21 / 16 T.
    pub fn op_cpir(&mut self) {
        let (more, found) = self.block_compare(1);
        self.block_repeat(more && !found);
    }

    /// CPDR: 21 / 16 T
    pub fn op_cpdr(&mut self) {
        let (more, found) = self.block_compare(0xFFFF);
        self.block_repeat(more && !found);
    }
}
