use std::thread;
use std::time::Instant;

use z80emu_core::core::{Scheduler, StopReason};
use z80emu_core::cpu::Z80;

use crate::config::RunnerConfig;

pub struct Outcome {
    pub cpu: Z80,
    pub reason: StopReason,
    pub steps: u64,
    pub cycles: u64,
}

/// Drive `cpu` until it halts or the step budget runs out.
pub fn run(cpu: Z80, cfg: &RunnerConfig) -> Outcome {
    let mut scheduler = Scheduler::new(cpu);
    scheduler.start();

    let limit = cfg.max_steps;
    let mut issued = 0u64;
    let mut reason = scheduler.run_until(|_| {
        let done = limit.is_some_and(|max| issued >= max);
        issued += 1;
        done
    });

    // Nothing can wake a halted CPU, so keep idling only while a budget remains.
    if reason == StopReason::Halted && !cfg.stop_on_halt {
        match limit {
            Some(max) => {
                while scheduler.steps() < max {
                    if scheduler.poll(Instant::now()).is_none() {
                        thread::yield_now();
                    }
                }
                reason = StopReason::Predicate;
            }
            None => log::warn!("CPU halted with no step limit; stopping"),
        }
    }
    scheduler.exit();

    let steps = scheduler.steps();
    let cycles = scheduler.total_cycles();
    log::info!("stopped ({reason:?}) after {steps} steps, {cycles} T-states");
    Outcome {
        cpu: scheduler.into_inner(),
        reason,
        steps,
        cycles,
    }
}
