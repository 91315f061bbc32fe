use crate::core::clock::ClockConfig;

/// Generic CPU interface used by the host-side scheduler.
pub trait Cpu: CpuStateTrait {
    /// Execute one whole instruction and return the T-states it consumed.
    fn step(&mut self) -> u32;

    /// Return to the power-on register state. Memory is left untouched.
    fn reset(&mut self);

    /// Query if the CPU is parked in a HALT instruction
    fn is_halted(&self) -> bool;

    /// Clock configuration used to pace this CPU in real time.
    fn clock(&self) -> ClockConfig;
}

// Re-export state types
pub mod state;
pub use state::{CpuStateTrait, Z80State};

// Z80 CPU
pub mod z80;
pub use z80::Z80;
