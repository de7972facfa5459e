#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomized launcher for the flying bonus target.
//!
//! Runs on the same accumulate-and-compare timer pattern as the formation,
//! but independently of it: each launch draws a fresh delay from the
//! configured window and a fresh height inside the launch band.

use glam::Vec2;
use invader_wave_core::{BonusTuning, Command, Event};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Pure system that emits `Command::LaunchBonusTarget` while a round is running.
#[derive(Debug)]
pub struct BonusSpawner {
    tuning: BonusTuning,
    rng: ChaCha8Rng,
    active: bool,
    elapsed: f32,
    next_launch: f32,
}

impl BonusSpawner {
    /// Creates an idle spawner; it arms itself on the next `Event::RoundStarted`.
    #[must_use]
    pub fn new(tuning: BonusTuning, rng_seed: u64) -> Self {
        Self {
            tuning,
            rng: ChaCha8Rng::seed_from_u64(rng_seed),
            active: false,
            elapsed: 0.0,
            next_launch: 0.0,
        }
    }

    /// Reports whether the spawner is counting towards a launch.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Seconds remaining until the next launch while active.
    #[must_use]
    pub fn time_until_launch(&self) -> Option<f32> {
        self.active.then(|| (self.next_launch - self.elapsed).max(0.0))
    }

    /// Consumes world events and emits launch commands.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::RoundStarted => {
                    self.active = true;
                    self.rearm();
                }
                Event::RoundEnded { .. } => self.active = false,
                Event::TimeAdvanced { dt } if self.active => {
                    self.elapsed += dt.as_secs_f32();
                    if self.elapsed > self.next_launch {
                        let position = self.launch_position();
                        log::debug!("launching bonus target at {position}");
                        out.push(Command::LaunchBonusTarget { position });
                        self.rearm();
                    }
                }
                _ => {}
            }
        }
    }

    fn rearm(&mut self) {
        self.elapsed = 0.0;
        self.next_launch = sample(&mut self.rng, self.tuning.min_delay, self.tuning.max_delay);
    }

    fn launch_position(&mut self) -> Vec2 {
        let half = self.tuning.launch_height_range * 0.5;
        let offset = sample(&mut self.rng, -half, half);
        self.tuning.launch_origin + Vec2::new(0.0, offset)
    }
}

fn sample(rng: &mut ChaCha8Rng, low: f32, high: f32) -> f32 {
    if low < high {
        rng.gen_range(low..=high)
    } else {
        low
    }
}
