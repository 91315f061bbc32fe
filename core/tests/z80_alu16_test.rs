use z80emu_core::cpu::z80::Flag;
mod common;
use common::{cpu_with, flag, set_bc, set_de, set_hl};

// --- ADD HL, rr ---

#[test]
fn test_add_hl_bc() {
    let mut cpu = cpu_with(&[0x09]); // ADD HL, BC
    set_hl(&mut cpu, 0x1000);
    set_bc(&mut cpu, 0x2000);
    cpu.regs.set_f(0x00);
    assert_eq!(cpu.step(), 11, "ADD HL,rr should be 11 T-states");
    assert_eq!(cpu.regs.hl(), 0x3000);
    assert!(!flag(&cpu, Flag::C));
    assert!(!flag(&cpu, Flag::N));
    assert!(flag(&cpu, Flag::Y), "F5 comes from the high byte");
}

#[test]
fn test_add_hl_de_carry() {
    let mut cpu = cpu_with(&[0x19]); // ADD HL, DE
    set_hl(&mut cpu, 0x8000);
    set_de(&mut cpu, 0x8000);
    cpu.step();
    assert_eq!(cpu.regs.hl(), 0x0000);
    assert!(flag(&cpu, Flag::C), "C should be set");
}

#[test]
fn test_add_hl_half_carry_from_bit_11() {
    let mut cpu = cpu_with(&[0x09]);
    set_hl(&mut cpu, 0x0FFF);
    set_bc(&mut cpu, 0x0001);
    cpu.step();
    assert_eq!(cpu.regs.hl(), 0x1000);
    assert!(flag(&cpu, Flag::H));
}

#[test]
fn test_add_hl_preserves_szpv() {
    let mut cpu = cpu_with(&[0x29]); // ADD HL, HL
    set_hl(&mut cpu, 0x0001);
    cpu.regs.set_f(0xC4);
    cpu.step();
    assert_eq!(cpu.regs.hl(), 0x0002);
    assert_eq!(cpu.regs.f(), 0xC4);
}

#[test]
fn test_add_hl_sp() {
    let mut cpu = cpu_with(&[0x39]);
    set_hl(&mut cpu, 0x0010);
    cpu.regs.sp = 0x0020;
    cpu.step();
    assert_eq!(cpu.regs.hl(), 0x0030);
}

// --- ADC / SBC HL ---

#[test]
fn test_adc_hl_wraps_to_zero() {
    let mut cpu = cpu_with(&[0xED, 0x4A]); // ADC HL, BC
    set_hl(&mut cpu, 0xFFFF);
    set_bc(&mut cpu, 0x0000);
    cpu.regs.set_f(Flag::C as u8);
    assert_eq!(cpu.step(), 15);
    assert_eq!(cpu.regs.hl(), 0x0000);
    assert_eq!(cpu.regs.f(), 0x51, "Z, H and C set");
}

#[test]
fn test_adc_hl_overflow() {
    let mut cpu = cpu_with(&[0xED, 0x5A]); // ADC HL, DE
    set_hl(&mut cpu, 0x7FFF);
    set_de(&mut cpu, 0x0000);
    cpu.regs.set_f(Flag::C as u8);
    cpu.step();
    assert_eq!(cpu.regs.hl(), 0x8000);
    assert!(flag(&cpu, Flag::PV));
    assert!(flag(&cpu, Flag::S));
    assert!(!flag(&cpu, Flag::C));
}

#[test]
fn test_sbc_hl_borrow() {
    let mut cpu = cpu_with(&[0xED, 0x52]); // SBC HL, DE
    set_hl(&mut cpu, 0x0000);
    set_de(&mut cpu, 0x0001);
    cpu.regs.set_f(0x00);
    assert_eq!(cpu.step(), 15);
    assert_eq!(cpu.regs.hl(), 0xFFFF);
    assert!(flag(&cpu, Flag::S));
    assert!(flag(&cpu, Flag::N));
    assert!(flag(&cpu, Flag::C));
    assert!(flag(&cpu, Flag::H));
    assert!(!flag(&cpu, Flag::Z));
}

#[test]
fn test_sbc_hl_hl_with_carry() {
    let mut cpu = cpu_with(&[0xED, 0x62]); // SBC HL, HL
    set_hl(&mut cpu, 0x1234);
    cpu.regs.set_f(Flag::C as u8);
    cpu.step();
    assert_eq!(cpu.regs.hl(), 0xFFFF);
}

#[test]
fn test_sbc_hl_overflow_and_zero() {
    let mut cpu = cpu_with(&[0xED, 0x42, 0xED, 0x72]); // SBC HL,BC; SBC HL,SP
    set_hl(&mut cpu, 0x8000);
    set_bc(&mut cpu, 0x0001);
    cpu.regs.set_f(0x00);
    cpu.step();
    assert_eq!(cpu.regs.hl(), 0x7FFF);
    assert!(flag(&cpu, Flag::PV), "sign change from negative to positive");

    cpu.regs.sp = 0x7FFF;
    cpu.step();
    assert_eq!(cpu.regs.hl(), 0x0000);
    assert!(flag(&cpu, Flag::Z), "Z covers all 16 bits");
}

// --- INC / DEC rr ---

#[test]
fn test_inc_dec_rr_leave_flags() {
    let mut cpu = cpu_with(&[0x03, 0x3B]); // INC BC; DEC SP
    set_bc(&mut cpu, 0xFFFF);
    cpu.regs.sp = 0x0000;
    cpu.regs.set_f(0xA5);
    assert_eq!(cpu.step(), 6);
    assert_eq!(cpu.regs.bc(), 0x0000);
    assert_eq!(cpu.step(), 6);
    assert_eq!(cpu.regs.sp, 0xFFFF);
    assert_eq!(cpu.regs.f(), 0xA5);
}
