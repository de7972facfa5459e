#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that decides when a round starts and how it ends.

use invader_wave_core::{Command, Event};

/// Message shown when the player clears the formation.
pub const WIN_MESSAGE: &str = "You Win!!!";
/// Message shown when the player is destroyed.
pub const LOSS_MESSAGE: &str = "Game Over";

/// Screen the experience is currently on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Waiting for the player to start the first round.
    #[default]
    StartScreen,
    /// A round is running.
    Playing,
    /// The last round ended.
    GameOver {
        /// Whether the player won.
        won: bool,
    },
}

/// Round lifecycle system translating outcomes into round commands.
#[derive(Debug, Default)]
pub struct RoundFlow {
    phase: Phase,
}

impl RoundFlow {
    /// Creates a round flow showing the start screen.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase of the experience.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Outcome text for the game-over screen, if a round has ended.
    #[must_use]
    pub fn message(&self) -> Option<&'static str> {
        match self.phase {
            Phase::GameOver { won: true } => Some(WIN_MESSAGE),
            Phase::GameOver { won: false } => Some(LOSS_MESSAGE),
            _ => None,
        }
    }

    /// Requests a new round unless one is already running.
    pub fn start(&mut self, out: &mut Vec<Command>) {
        if self.phase != Phase::Playing {
            out.push(Command::StartRound);
        }
    }

    /// Reports that the player was destroyed by a hazard.
    pub fn player_destroyed(&mut self, out: &mut Vec<Command>) {
        self.finish(false, out);
    }

    /// Consumes world events and emits round-ending commands.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::RoundStarted => self.phase = Phase::Playing,
                Event::AllUnitsDestroyed => self.finish(true, out),
                Event::RoundEnded { won } => self.phase = Phase::GameOver { won: *won },
                _ => {}
            }
        }
    }

    fn finish(&mut self, won: bool, out: &mut Vec<Command>) {
        if self.phase != Phase::Playing {
            return;
        }
        log::info!("round over; won: {won}");
        self.phase = Phase::GameOver { won };
        out.push(Command::EndRound { won });
    }
}
