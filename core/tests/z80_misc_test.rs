use z80emu_core::cpu::{Cpu, CpuStateTrait};
use z80emu_core::cpu::z80::Reg8;
mod common;
use common::cpu_with;

#[test]
fn test_power_on_state() {
    let cpu = cpu_with(&[]);
    let s = cpu.snapshot();
    assert_eq!(s.pc, 0x0000);
    assert_eq!(s.sp, 0xFFFF);
    assert_eq!(s.a, 0xFF);
    assert_eq!(s.af() >> 8, 0xFF);
    assert_eq!(s.ix, 0xFFFF);
    assert_eq!(s.i, 0);
    assert!(!s.iff1 && !s.iff2);
    assert_eq!(s.im, 0);
    assert!(!s.halted);
}

#[test]
fn test_nop_refreshes_r() {
    let mut cpu = cpu_with(&[0x00, 0x00]);
    cpu.regs.r = 0x80;
    assert_eq!(cpu.step(), 4);
    assert_eq!(cpu.step(), 4);
    assert_eq!(cpu.regs.r, 0x82, "bit 7 of R is sticky");
    assert_eq!(cpu.regs.pc, 2);
}

#[test]
fn test_prefixed_fetches_refresh_r_twice() {
    let mut cpu = cpu_with(&[0xCB, 0x00, 0xED, 0x44]); // RLC B; NEG
    cpu.regs.r = 0;
    cpu.step();
    assert_eq!(cpu.regs.r, 2);
    cpu.step();
    assert_eq!(cpu.regs.r, 4);
}

#[test]
fn test_halt_idles() {
    let mut cpu = cpu_with(&[0x76, 0x3C]); // HALT; INC A
    cpu.regs.set_a(0x00);
    assert_eq!(cpu.step(), 4);
    assert!(cpu.halted);
    assert!(cpu.is_halted());
    assert_eq!(cpu.regs.pc, 0x0001, "PC is left after the HALT");

    let r = cpu.regs.r;
    for _ in 0..3 {
        assert_eq!(cpu.step(), 4);
    }
    assert_eq!(cpu.regs.pc, 0x0001);
    assert_eq!(cpu.regs.a(), 0x00, "nothing executes while halted");
    assert_eq!(cpu.regs.r, r.wrapping_add(3));
}

#[test]
fn test_reset_clears_halt_and_registers() {
    let mut cpu = cpu_with(&[0x3E, 0x12, 0x76]); // LD A,0x12; HALT
    cpu.step();
    cpu.step();
    assert!(cpu.halted);
    Cpu::reset(&mut cpu);
    assert!(!cpu.halted);
    assert_eq!(cpu.regs.pc, 0);
    assert_eq!(cpu.regs.a(), 0xFF);
    assert_eq!(cpu.memory[0x0001], 0x12, "memory survives reset");
}

#[test]
fn test_di_ei() {
    let mut cpu = cpu_with(&[0xFB, 0xF3]); // EI; DI
    assert_eq!(cpu.step(), 4);
    assert!(cpu.regs.iff1 && cpu.regs.iff2);
    assert_eq!(cpu.step(), 4);
    assert!(!cpu.regs.iff1 && !cpu.regs.iff2);
}

#[test]
fn test_interrupt_modes() {
    let mut cpu = cpu_with(&[0xED, 0x5E, 0xED, 0x56, 0xED, 0x46]); // IM 2; IM 1; IM 0
    assert_eq!(cpu.step(), 8);
    assert_eq!(cpu.im, 2);
    cpu.step();
    assert_eq!(cpu.im, 1);
    cpu.step();
    assert_eq!(cpu.im, 0);
}

#[test]
fn test_snapshot_restore_round_trip() {
    let mut cpu = cpu_with(&[]);
    cpu.regs.set(Reg8::D, 0x44);
    cpu.regs.set_alt(Reg8::H, 0x55);
    cpu.regs.iy = 0x1234;
    cpu.im = 2;
    let snap = cpu.snapshot();
    assert_eq!(snap.hl_alt >> 8, 0x55);
    assert_eq!(snap.de() >> 8, 0x44);

    let mut other = cpu_with(&[]);
    other.restore(&snap);
    assert_eq!(other.snapshot(), snap);
    assert_eq!(other.regs.get_alt(Reg8::H), 0x55);
}

#[test]
fn test_pc_wraps_at_top_of_memory() {
    let mut cpu = cpu_with(&[0x00]);
    cpu.memory[0xFFFF] = 0x3E; // LD A, n with n at 0x0000
    cpu.regs.pc = 0xFFFF;
    cpu.step();
    assert_eq!(cpu.regs.a(), 0x00);
    assert_eq!(cpu.regs.pc, 0x0001);
}
