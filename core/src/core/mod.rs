pub mod clock;
pub mod memory;

pub use clock::{ClockConfig, Pacer, Scheduler, StopReason};
pub use memory::{AddressSpace, ImageError};
