//! Real-time pacing for instruction-stepped CPUs.
//!
//! The CPU itself never sleeps: `step()` reports T-states and the host decides
//! when to issue the next instruction. [`Pacer`] turns T-states into wall-clock
//! delays, [`Scheduler`] is a small host loop built on top of it.

use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::cpu::Cpu;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Clock speed in MHz.
    pub mhz: f64,
    /// When false the host runs flat out and every delay is zero.
    pub realtime: bool,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            mhz: 4.0,
            realtime: true,
        }
    }
}

impl ClockConfig {
    pub fn cycle_micros(&self) -> f64 {
        1.0 / self.mhz
    }

    /// Wall-clock time of `t_cycles` T-states. A non-positive or non-finite
    /// clock speed yields zero.
    pub fn duration_of(&self, t_cycles: u64) -> Duration {
        let nanos = t_cycles as f64 * self.cycle_micros() * 1_000.0;
        if nanos.is_finite() && nanos > 0.0 {
            Duration::from_nanos(nanos.round() as u64)
        } else {
            Duration::ZERO
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Pacer {
    clock: ClockConfig,
}

impl Pacer {
    pub fn new(clock: ClockConfig) -> Self {
        Self { clock }
    }

    /// How long to wait before the next instruction, given that `elapsed`
    /// has already passed since this one started.
    pub fn delay(&self, t_cycles: u32, elapsed: Duration) -> Duration {
        if !self.clock.realtime {
            return Duration::ZERO;
        }
        self.clock
            .duration_of(t_cycles as u64)
            .saturating_sub(elapsed)
    }
}

/// Why [`Scheduler::run_until`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    Exited,
    Halted,
    Predicate,
}

/// Owns a CPU and issues one instruction whenever the previous one's time
/// has elapsed.
pub struct Scheduler<C: Cpu> {
    cpu: C,
    pacer: Pacer,
    running: bool,
    next_due: Option<Instant>,
    total_cycles: u64,
    steps: u64,
}

impl<C: Cpu> Scheduler<C> {
    pub fn new(cpu: C) -> Self {
        let pacer = Pacer::new(cpu.clock());
        Self {
            cpu,
            pacer,
            running: false,
            next_due: None,
            total_cycles: 0,
            steps: 0,
        }
    }

    pub fn cpu(&self) -> &C {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut C {
        &mut self.cpu
    }

    pub fn into_inner(self) -> C {
        self.cpu
    }

    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        log::debug!("scheduler start");
        self.running = true;
        self.next_due = None;
    }

    /// Stop issuing instructions. A pending step is dropped.
    pub fn exit(&mut self) {
        log::debug!(
            "scheduler exit after {} steps, {} T-states",
            self.steps,
            self.total_cycles
        );
        self.running = false;
        self.next_due = None;
    }

    /// Run one instruction if the scheduler is running and the next step is
    /// due at `now`. Returns the T-states executed.
    pub fn poll(&mut self, now: Instant) -> Option<u32> {
        if !self.running {
            return None;
        }
        if let Some(due) = self.next_due
            && now < due
        {
            return None;
        }
        let cycles = self.cpu.step();
        self.total_cycles += cycles as u64;
        self.steps += 1;

        let finished = Instant::now();
        let elapsed = finished.saturating_duration_since(now);
        self.next_due = Some(finished + self.pacer.delay(cycles, elapsed));
        Some(cycles)
    }

    /// Blocking loop: sleep until each step is due, then run it. Returns when
    /// the scheduler is not running, the CPU halts, or `stop` returns true.
    pub fn run_until<F: FnMut(&C) -> bool>(&mut self, mut stop: F) -> StopReason {
        loop {
            if !self.running {
                return StopReason::Exited;
            }
            if self.cpu.is_halted() {
                return StopReason::Halted;
            }
            if stop(&self.cpu) {
                return StopReason::Predicate;
            }
            if let Some(due) = self.next_due {
                let now = Instant::now();
                if due > now {
                    thread::sleep(due - now);
                }
            }
            self.poll(Instant::now());
        }
    }
}
