pub mod core;
pub mod cpu;

pub mod prelude {
    pub use crate::core::{AddressSpace, ClockConfig, Pacer, Scheduler, StopReason};
    pub use crate::cpu::Cpu;
    pub use crate::cpu::z80::{DecodeError, Flag, Z80};
}
