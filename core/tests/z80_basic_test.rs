use z80emu_core::core::{ClockConfig, Scheduler, StopReason};
use z80emu_core::cpu::z80::{Reg8, Z80};
mod common;
use common::{cpu_with, run_until_pc};

#[test]
fn test_store_through_de() {
    // LD B, 0x12; LD DE, 0x1C23; LD (DE), A
    let mut cpu = cpu_with(&[0x06, 0x12, 0x11, 0x23, 0x1C, 0x12]);
    cpu.regs.set_a(0x32);
    let cycles: u32 = (0..3).map(|_| cpu.step()).sum();
    assert_eq!(cycles, 7 + 10 + 7);
    assert_eq!(cpu.regs.get(Reg8::B), 0x12);
    assert_eq!(cpu.regs.de(), 0x1C23);
    assert_eq!(cpu.memory[0x1C23], 0x32);
    assert_eq!(cpu.regs.pc, 6);
}

#[test]
fn test_sum_loop() {
    // LD A,0; LD B,10; loop: ADD A,B; DJNZ loop; HALT
    let mut cpu = cpu_with(&[0x3E, 0x00, 0x06, 0x0A, 0x80, 0x10, 0xFD, 0x76]);
    let (steps, cycles) = run_until_pc(&mut cpu, 0x0008, 100);
    assert_eq!(steps, 2 + 20 + 1);
    assert_eq!(cycles, 7 + 7 + 10 * 4 + 9 * 13 + 8 + 4);
    assert_eq!(cpu.regs.a(), 55);
    assert!(cpu.halted);
}

#[test]
fn test_subroutine_copies_block() {
    // main:  LD SP,0x8000; CALL copy; HALT
    // copy:  LD HL,0x0100; LD DE,0x0200; LD BC,4; LDIR; RET
    let mut cpu = cpu_with(&[
        0x31, 0x00, 0x80, //
        0xCD, 0x10, 0x00, //
        0x76,
    ]);
    cpu.load(
        &[0x21, 0x00, 0x01, 0x11, 0x00, 0x02, 0x01, 0x04, 0x00, 0xED, 0xB0, 0xC9],
        0x0010,
    );
    cpu.load(&[0xDE, 0xAD, 0xBE, 0xEF], 0x0100);

    run_until_pc(&mut cpu, 0x0007, 50);
    assert!(cpu.halted);
    assert_eq!(&cpu.memory.as_slice()[0x0200..0x0204], &[0xDE, 0xAD, 0xBE, 0xEF]);
    assert_eq!(cpu.regs.sp, 0x8000);
    assert_eq!(cpu.regs.bc(), 0);
}

#[test]
fn test_scheduler_runs_to_halt() {
    let clock = ClockConfig { mhz: 4.0, realtime: false };
    let mut cpu = Z80::with_clock(clock);
    cpu.load(&[0x3E, 0x07, 0x3C, 0x76], 0); // LD A,7; INC A; HALT

    let mut scheduler = Scheduler::new(cpu);
    scheduler.start();
    assert_eq!(scheduler.run_until(|_| false), StopReason::Halted);
    assert_eq!(scheduler.steps(), 3);
    assert_eq!(scheduler.total_cycles(), 7 + 4 + 4);
    assert_eq!(scheduler.cpu().regs.a(), 8);
}

#[test]
fn test_scheduler_stops_on_predicate() {
    let clock = ClockConfig { mhz: 4.0, realtime: false };
    let mut cpu = Z80::with_clock(clock);
    cpu.load(&[0x3C, 0x18, 0xFD], 0); // loop: INC A; JR loop

    let mut scheduler = Scheduler::new(cpu);
    scheduler.start();
    let reason = scheduler.run_until(|cpu: &Z80| cpu.regs.a() == 0x10);
    assert_eq!(reason, StopReason::Predicate);
    // A starts at 0xFF, so 0x11 increments reach 0x10
    assert_eq!(scheduler.steps(), 0x11 * 2 - 1);

    scheduler.exit();
    assert_eq!(scheduler.run_until(|_| false), StopReason::Exited);
}
