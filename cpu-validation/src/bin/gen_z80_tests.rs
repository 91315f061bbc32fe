use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use rand::Rng;
use z80emu_core::cpu::Z80;
use z80emu_validation::{Z80CpuState, Z80TestCase, apply_initial, capture};

const NUM_TESTS: usize = 1000;

/// Unprefixed opcodes only; the prefix bytes themselves are not instructions.
fn supported(opcode: u8) -> bool {
    !matches!(opcode, 0xCB | 0xDD | 0xED | 0xFD)
}

fn random_state(rng: &mut impl Rng) -> Z80CpuState {
    Z80CpuState {
        pc: rng.gen_range(0..=0xFFFC),
        sp: rng.r#gen(),
        a: rng.r#gen(),
        b: rng.r#gen(),
        c: rng.r#gen(),
        d: rng.r#gen(),
        e: rng.r#gen(),
        f: rng.r#gen(),
        h: rng.r#gen(),
        l: rng.r#gen(),
        i: rng.r#gen(),
        r: rng.r#gen(),
        ix: rng.r#gen(),
        iy: rng.r#gen(),
        af_prime: rng.r#gen(),
        bc_prime: rng.r#gen(),
        de_prime: rng.r#gen(),
        hl_prime: rng.r#gen(),
        im: rng.gen_range(0..=2),
        iff1: rng.gen_range(0..=1),
        iff2: rng.gen_range(0..=1),
        ..Default::default()
    }
}

/// Fill every address an unprefixed instruction may read with random data:
/// the instruction bytes, the pointer registers, the stack top and the
/// absolute address in an `nn` operand.
fn seed_ram(rng: &mut impl Rng, state: &mut Z80CpuState, opcode: u8) -> BTreeSet<u16> {
    let mut seeded = BTreeSet::new();
    let mut ram = Vec::new();
    let mut put = |addr: u16, val: u8, ram: &mut Vec<(u16, u8)>| {
        if seeded.insert(addr) {
            ram.push((addr, val));
        }
    };

    put(state.pc, opcode, &mut ram);
    let operand: [u8; 3] = rng.r#gen();
    for (i, &b) in operand.iter().enumerate() {
        put(state.pc.wrapping_add(i as u16 + 1), b, &mut ram);
    }
    let nn = u16::from_le_bytes([ram[1].1, ram[2].1]);
    let bc = u16::from_le_bytes([state.c, state.b]);
    let de = u16::from_le_bytes([state.e, state.d]);
    let hl = u16::from_le_bytes([state.l, state.h]);
    for addr in [bc, de, hl, state.sp, state.sp.wrapping_add(1), nn, nn.wrapping_add(1)] {
        put(addr, rng.r#gen(), &mut ram);
    }

    state.ram = ram;
    seeded
}

fn generate_case(rng: &mut impl Rng, opcode: u8) -> Z80TestCase {
    let mut initial = random_state(rng);
    let mut touched = seed_ram(rng, &mut initial, opcode);

    let mut cpu = Z80::new();
    apply_initial(&mut cpu, &initial);

    // IN A,(n) and IN r,(C) read these two ports
    let n = initial.ram[1].1;
    let ports_read = [
        (u16::from_le_bytes([n, initial.a]), rng.r#gen::<u8>()),
        (u16::from_le_bytes([initial.c, initial.b]), rng.r#gen::<u8>()),
    ];
    for &(addr, val) in &ports_read {
        cpu.ports[addr] = val;
    }
    let pre_memory = cpu.memory.clone();
    let pre_ports = cpu.ports.clone();

    let cycles = cpu.step();

    let mut final_state = capture(&cpu);
    for (addr, (&before, &after)) in pre_memory
        .as_slice()
        .iter()
        .zip(cpu.memory.as_slice())
        .enumerate()
    {
        if before != after {
            touched.insert(addr as u16);
        }
    }
    final_state.ram = touched.iter().map(|&a| (a, cpu.memory[a])).collect();

    let mut ports: Vec<(u16, u8, String)> = ports_read
        .iter()
        .map(|&(addr, val)| (addr, val, "r".to_string()))
        .collect();
    for (addr, (&before, &after)) in pre_ports
        .as_slice()
        .iter()
        .zip(cpu.ports.as_slice())
        .enumerate()
    {
        if before != after {
            ports.push((addr as u16, after, "w".to_string()));
        }
    }

    let name = (0..4u16)
        .map(|i| format!("{:02x}", pre_memory[initial.pc.wrapping_add(i)]))
        .collect::<Vec<_>>()
        .join(" ");

    Z80TestCase {
        name,
        initial,
        final_state,
        // Bus timing is not traced; one placeholder entry per T-state.
        cycles: vec![(None, None, "----".to_string()); cycles as usize],
        ports,
    }
}

fn generate_and_write(rng: &mut impl Rng, opcode: u8, out_dir: &Path) {
    let tests: Vec<Z80TestCase> = (0..NUM_TESTS).map(|_| generate_case(rng, opcode)).collect();
    let out_path = out_dir.join(format!("{:02x}.json", opcode));
    let json = serde_json::to_string_pretty(&tests).expect("Failed to serialize test cases");
    fs::write(&out_path, json).expect("Failed to write output file");
    println!(
        "Generated {} tests for 0x{:02X} -> {}",
        tests.len(),
        opcode,
        out_path.display()
    );
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: gen_z80_tests <opcode_hex | all>");
        eprintln!("Examples:");
        eprintln!("  gen_z80_tests 0x86");
        eprintln!("  gen_z80_tests all");
        std::process::exit(1);
    }

    let out_dir = Path::new("test_data/z80/regression");
    fs::create_dir_all(out_dir).expect("Failed to create output directory");

    let mut rng = rand::thread_rng();

    if args[1] == "all" {
        let mut count = 0;
        for opcode in (0x00..=0xFFu8).filter(|&op| supported(op)) {
            generate_and_write(&mut rng, opcode, out_dir);
            count += 1;
        }
        println!("Generated tests for {} opcodes", count);
    } else {
        let opcode_str = args[1].trim_start_matches("0x").trim_start_matches("0X");
        let opcode = u8::from_str_radix(opcode_str, 16).unwrap_or_else(|_| {
            eprintln!("Invalid hex opcode: {}", args[1]);
            std::process::exit(1);
        });
        if !supported(opcode) {
            eprintln!("Opcode 0x{:02X} is a prefix, not an instruction", opcode);
            std::process::exit(1);
        }
        generate_and_write(&mut rng, opcode, out_dir);
    }
}
