#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic clock that turns variable frame time into fixed simulation steps.

use std::time::Duration;

use invader_wave_core::{Command, Event, TimingTuning};

/// Configuration parameters required to construct the fixed-step clock.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    step: Duration,
    max_catch_up: u32,
}

impl Config {
    /// Creates a new configuration using the provided step length and catch-up limit.
    #[must_use]
    pub const fn new(step: Duration, max_catch_up: u32) -> Self {
        Self { step, max_catch_up }
    }

    /// Derives the configuration from the shared timing tuning.
    ///
    /// A step length that cannot be represented collapses to zero, which
    /// disables the clock.
    #[must_use]
    pub fn from_tuning(tuning: &TimingTuning) -> Self {
        let step = Duration::try_from_secs_f32(tuning.fixed_step).unwrap_or(Duration::ZERO);
        Self::new(step, tuning.max_catch_up_steps)
    }
}

/// Pure system that emits `Command::FixedTick` at a constant cadence.
#[derive(Debug)]
pub struct FixedStep {
    step: Duration,
    max_catch_up: u32,
    accumulator: Duration,
}

impl FixedStep {
    /// Creates a new fixed-step clock using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            step: config.step,
            max_catch_up: config.max_catch_up.max(1),
            accumulator: Duration::ZERO,
        }
    }

    /// Consumes frame events and emits one fixed tick per elapsed step.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        if self.step.is_zero() {
            return;
        }

        for event in events {
            match event {
                Event::RoundStarted => self.accumulator = Duration::ZERO,
                Event::TimeAdvanced { dt } => {
                    self.accumulator = self.accumulator.saturating_add(*dt);
                }
                _ => {}
            }
        }

        let steps = self.resolve_steps();
        for _ in 0..steps {
            out.push(Command::FixedTick { dt: self.step });
        }
    }

    fn resolve_steps(&mut self) -> u32 {
        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_catch_up {
            self.accumulator -= self.step;
            steps += 1;
        }

        if self.accumulator >= self.step {
            let backlog = self.accumulator;
            let remainder = self.accumulator.as_nanos() % self.step.as_nanos();
            self.accumulator = Duration::from_nanos(u64::try_from(remainder).unwrap_or(0));
            log::debug!("dropping {backlog:?} of fixed-step backlog after {steps} steps");
        }

        steps
    }
}
