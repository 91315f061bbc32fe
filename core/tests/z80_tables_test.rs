use z80emu_core::cpu::z80::Flag;
use z80emu_core::cpu::z80::tables::{FlagTables, generate_daa, generate_parity};

const S: u8 = Flag::S as u8;
const Z: u8 = Flag::Z as u8;
const H: u8 = Flag::H as u8;
const PV: u8 = Flag::PV as u8;
const N: u8 = Flag::N as u8;
const C: u8 = Flag::C as u8;
const XY: u8 = Flag::X as u8 | Flag::Y as u8;

/// Flags computed straight from the arithmetic definitions.
fn reference(n1: u8, n2: u8, carry: u8, subtract: bool) -> u8 {
    let (wide, signed) = if subtract {
        (
            (n1 as i32) - (n2 as i32) - carry as i32,
            (n1 as i8 as i32) - (n2 as i8 as i32) - carry as i32,
        )
    } else {
        (
            (n1 as i32) + (n2 as i32) + carry as i32,
            (n1 as i8 as i32) + (n2 as i8 as i32) + carry as i32,
        )
    };
    let r = wide as u8;
    let mut f = r & (S | XY);
    if r == 0 { f |= Z; }
    if (n1 ^ n2 ^ r) & 0x10 != 0 { f |= H; }
    if !(-128..=127).contains(&signed) { f |= PV; }
    if !(0..=0xFF).contains(&wide) { f |= C; }
    if subtract { f |= N; }
    f
}

fn bcd(n: u32) -> u8 {
    (((n / 10) << 4) | (n % 10)) as u8
}

#[test]
fn test_add_and_sub_tables_match_reference() {
    let t = FlagTables::generate();
    for n1 in 0..=0xFFu8 {
        for n2 in 0..=0xFFu8 {
            for carry in [false, true] {
                let c = carry as u8;
                assert_eq!(t.add(n1, n2, carry), reference(n1, n2, c, false),
                    "ADD/ADC {n1:02X} {n2:02X} carry={carry}");
                assert_eq!(t.sub(n1, n2, carry), reference(n1, n2, c, true),
                    "SUB/SBC {n1:02X} {n2:02X} carry={carry}");
            }
        }
    }
}

#[test]
fn test_logic_tables() {
    let t = FlagTables::generate();
    for n1 in 0..=0xFFu8 {
        for n2 in 0..=0xFFu8 {
            let and = t.and(n1, n2);
            assert_ne!(and & H, 0, "AND always sets H");
            assert_eq!(and & (N | C), 0);
            assert_eq!(and & !H, t.szp(n1 & n2));

            assert_eq!(t.or(n1, n2), t.szp(n1 | n2));
            assert_eq!(t.xor(n1, n2), t.szp(n1 ^ n2));
        }
    }
}

#[test]
fn test_szp() {
    let t = FlagTables::generate();
    assert_eq!(t.szp(0x00), Z | PV);
    assert_eq!(t.szp(0x80), S);
    assert_eq!(t.szp(0x28), XY | PV);
    assert_eq!(t.szp(0x01), 0);
}

#[test]
fn test_parity() {
    let parity = generate_parity();
    assert_eq!(parity.len(), 256);
    for n in 0..=0xFFu8 {
        assert_eq!(parity[n as usize] == 1, n.count_ones() % 2 == 0, "{n:02X}");
    }
}

#[test]
fn test_daa_after_bcd_add() {
    let t = FlagTables::generate();
    for a in 0..100u32 {
        for b in 0..100u32 {
            let (x, y) = (bcd(a), bcd(b));
            let sum = x.wrapping_add(y);
            let af = t.daa(sum, t.add(x, y, false));
            assert_eq!((af >> 8) as u8, bcd((a + b) % 100), "{a} + {b}");
            assert_eq!(af as u8 & C != 0, a + b >= 100, "{a} + {b} carry");
            assert_eq!(af as u8 & N, 0);
        }
    }
}

#[test]
fn test_daa_after_bcd_sub() {
    let t = FlagTables::generate();
    for a in 0..100u32 {
        for b in 0..100u32 {
            let (x, y) = (bcd(a), bcd(b));
            let diff = x.wrapping_sub(y);
            let af = t.daa(diff, t.sub(x, y, false));
            assert_eq!((af >> 8) as u8, bcd((a + 100 - b) % 100), "{a} - {b}");
            assert_eq!(af as u8 & C != 0, a < b, "{a} - {b} borrow");
            assert_ne!(af as u8 & N, 0, "N survives DAA");
        }
    }
}

#[test]
fn test_daa_table_shape() {
    assert_eq!(generate_daa().len(), 8 * 256);
}

#[test]
fn test_generation_is_deterministic() {
    assert_eq!(FlagTables::generate(), FlagTables::generate());
}
