#![allow(dead_code)]

use z80emu_core::cpu::z80::{Flag, Reg16, Z80};

/// CPU with `program` loaded at 0x0000. PC starts at 0.
pub fn cpu_with(program: &[u8]) -> Z80 {
    let mut cpu = Z80::new();
    cpu.load(program, 0);
    cpu
}

pub fn set_bc(cpu: &mut Z80, v: u16) {
    cpu.regs.set_pair(Reg16::BC, v);
}

pub fn set_de(cpu: &mut Z80, v: u16) {
    cpu.regs.set_pair(Reg16::DE, v);
}

pub fn set_hl(cpu: &mut Z80, v: u16) {
    cpu.regs.set_pair(Reg16::HL, v);
}

/// Step until PC equals `pc`, returning (steps, total T-states).
/// Panics after `limit` steps so a broken loop fails instead of hanging.
pub fn run_until_pc(cpu: &mut Z80, pc: u16, limit: usize) -> (usize, u64) {
    let mut cycles = 0u64;
    for steps in 1..=limit {
        cycles += cpu.step() as u64;
        if cpu.regs.pc == pc {
            return (steps, cycles);
        }
    }
    panic!("PC never reached {pc:#06x} within {limit} steps");
}

pub fn flag(cpu: &Z80, f: Flag) -> bool {
    cpu.regs.f() & f as u8 != 0
}
