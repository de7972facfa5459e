#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that tallies the player's score from world events.

use invader_wave_core::{BonusOutcome, Event, ScoreTuning};

/// Running score for the current round.
#[derive(Debug)]
pub struct Scoreboard {
    tuning: ScoreTuning,
    score: u32,
    units_destroyed: u32,
    bonus_destroyed: u32,
}

impl Scoreboard {
    /// Creates an empty scoreboard awarding points per the provided tuning.
    #[must_use]
    pub fn new(tuning: ScoreTuning) -> Self {
        Self {
            tuning,
            score: 0,
            units_destroyed: 0,
            bonus_destroyed: 0,
        }
    }

    /// Points earned this round.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Formation units destroyed this round.
    #[must_use]
    pub fn units_destroyed(&self) -> u32 {
        self.units_destroyed
    }

    /// Bonus targets shot down this round.
    #[must_use]
    pub fn bonus_destroyed(&self) -> u32 {
        self.bonus_destroyed
    }

    /// Score formatted the way the HUD shows it.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{:05}", self.score)
    }

    /// Consumes world events, updating the tally.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::RoundStarted => {
                    self.score = 0;
                    self.units_destroyed = 0;
                    self.bonus_destroyed = 0;
                }
                Event::UnitDestroyed { .. } => {
                    self.units_destroyed += 1;
                    self.score = self.score.saturating_add(self.tuning.per_unit);
                }
                Event::BonusTargetResolved {
                    outcome: BonusOutcome::Destroyed,
                    ..
                } => {
                    self.bonus_destroyed += 1;
                    self.score = self.score.saturating_add(self.tuning.per_bonus);
                }
                _ => {}
            }
        }
    }
}
