use crate::cpu::z80::{RegPair, Z80};

/// Index-register forms pay 4 T for the DD/FD prefix.
fn with_prefix(rr: RegPair, base: u32) -> u32 {
    if rr.is_index() { base + 4 } else { base }
}

impl Z80 {
    /// LD dd, nn: 10 T. LD IX, nn: 14 T.
    pub fn op_ld_rp_nn(&mut self, rr: RegPair, nn: u16) {
        self.t_cycles += with_prefix(rr, 10);
        self.set_pair(rr, nn);
    }

    /// LD HL, (nn): 16 T. LD IX, (nn): 20 T.
    pub fn op_ld_hl_mem(&mut self, rr: RegPair, addr: u16) {
        self.t_cycles += with_prefix(rr, 16);
        let val = self.memory.read_word(addr);
        self.set_pair(rr, val);
    }

    /// LD (nn), HL: 16 T. LD (nn), IX: 20 T.
    pub fn op_ld_mem_hl(&mut self, rr: RegPair, addr: u16) {
        self.t_cycles += with_prefix(rr, 16);
        self.memory.write_word(addr, self.get_pair(rr));
    }

    /// ED form LD dd, (nn): 20 T
    pub fn op_ld_rr_mem(&mut self, rr: RegPair, addr: u16) {
        self.t_cycles += 20;
        let val = self.memory.read_word(addr);
        self.set_pair(rr, val);
    }

    /// ED form LD (nn), dd: 20 T
    pub fn op_ld_mem_rr(&mut self, rr: RegPair, addr: u16) {
        self.t_cycles += 20;
        self.memory.write_word(addr, self.get_pair(rr));
    }

    /// LD SP, HL: 6 T. LD SP, IX: 10 T.
    pub fn op_ld_sp_hl(&mut self, src: RegPair) {
        self.t_cycles += with_prefix(src, 6);
        self.regs.sp = self.get_pair(src);
    }

    /// PUSH qq: 11 T. PUSH IX: 15 T.
    pub fn op_push(&mut self, rr: RegPair) {
        self.t_cycles += with_prefix(rr, 11);
        self.push_word(self.get_pair(rr));
    }

    /// POP qq: 10 T. POP IX: 14 T. POP AF loads F verbatim.
    pub fn op_pop(&mut self, rr: RegPair) {
        self.t_cycles += with_prefix(rr, 10);
        let val = self.pop_word();
        self.set_pair(rr, val);
    }
}
