use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;
use z80emu_core::core::ImageError;
use z80emu_core::cpu::{CpuStateTrait, Z80};

mod config;
mod emulator;

use config::{ConfigError, RunnerConfig, parse_address};

/// Run a raw Z80 binary image headlessly and report the final CPU state.
#[derive(Parser, Debug)]
#[command(name = "z80emu", version)]
struct Cli {
    /// Raw binary image to load.
    image: PathBuf,

    /// Config file (default: <config_dir>/z80emu/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_parser = parse_address)]
    load_address: Option<u16>,

    /// Initial PC (default: the load address).
    #[arg(long, value_parser = parse_address)]
    entry: Option<u16>,

    #[arg(long)]
    max_steps: Option<u64>,

    /// Clock speed in MHz.
    #[arg(long)]
    mhz: Option<f64>,

    /// Run flat out instead of pacing to the clock.
    #[arg(long)]
    fast: bool,

    /// Keep stepping through HALT until --max-steps is reached.
    #[arg(long)]
    no_stop_on_halt: bool,

    /// Log every instruction (same as RUST_LOG=trace).
    #[arg(long)]
    trace: bool,

    /// Print the final register state as JSON.
    #[arg(long)]
    dump_state: bool,
}

#[derive(Error, Debug)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to load {path}: {source}")]
    Image { path: PathBuf, source: ImageError },
    #[error("failed to encode state: {0}")]
    Json(#[from] serde_json::Error),
}

impl Cli {
    fn apply(&self, cfg: &mut RunnerConfig) {
        if let Some(addr) = self.load_address {
            cfg.load_address = addr;
        }
        if let Some(pc) = self.entry {
            cfg.entry_point = Some(pc);
        }
        if let Some(max) = self.max_steps {
            cfg.max_steps = Some(max);
        }
        if let Some(mhz) = self.mhz {
            cfg.clock.mhz = mhz;
        }
        if self.fast {
            cfg.clock.realtime = false;
        }
        if self.no_stop_on_halt {
            cfg.stop_on_halt = false;
        }
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let mut cfg = RunnerConfig::load(cli.config.as_deref())?;
    cli.apply(&mut cfg);

    let mut cpu = Z80::with_clock(cfg.clock);
    let len = cpu
        .memory
        .load_file(&cli.image, cfg.load_address)
        .map_err(|source| AppError::Image {
            path: cli.image.clone(),
            source,
        })?;
    cpu.regs.pc = cfg.entry();
    log::info!(
        "loaded {len} bytes at {:#06x}, entry {:#06x}, {} MHz",
        cfg.load_address,
        cfg.entry(),
        cfg.clock.mhz
    );

    let out = emulator::run(cpu, &cfg);
    let state = out.cpu.snapshot();
    if cli.dump_state {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        println!(
            "PC={:04X} SP={:04X} AF={:04X} BC={:04X} DE={:04X} HL={:04X} IX={:04X} IY={:04X}",
            state.pc,
            state.sp,
            state.af(),
            state.bc(),
            state.de(),
            state.hl(),
            state.ix,
            state.iy
        );
        println!("{:?} after {} steps, {} T-states", out.reason, out.steps, out.cycles);
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.trace { "trace" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("z80emu: {e}");
            ExitCode::FAILURE
        }
    }
}
