#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Invader Wave engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::{fmt, time::Duration};

use glam::Vec2;

mod config;

pub use config::{
    BonusTuning, CadenceTuning, ConfigError, FieldBounds, FormationLayout, MotionTuning,
    ScoreTuning, TimingTuning, WaveConfig,
};

/// Lifecycle of the enemy formation within a single round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoundState {
    /// Formation is idle, either before the first round or after a round ended.
    Inactive,
    /// Formation is stepping and firing.
    Active,
    /// Every unit was destroyed; terminal until the next round starts.
    AllDestroyed,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Restores the formation and begins a new round.
    StartRound,
    /// Halts the formation without restoring it.
    EndRound {
        /// Whether the player won the round.
        won: bool,
    },
    /// Advances the variable-rate frame clock by the provided delta time.
    Tick {
        /// Duration of rendered time that elapsed since the previous frame.
        dt: Duration,
    },
    /// Advances the fixed-rate simulation clock by one constant step.
    FixedTick {
        /// Length of the fixed simulation step.
        dt: Duration,
    },
    /// Reports that a hazard made qualifying contact with a unit.
    DestroyUnit {
        /// Identifier of the unit that was hit.
        unit: UnitId,
    },
    /// Requests that the bonus target be launched at the provided position.
    LaunchBonusTarget {
        /// World position the bonus target starts from.
        position: Vec2,
    },
    /// Reports how a previously launched bonus target left the field.
    ResolveBonusTarget {
        /// Handle returned when the bonus target was spawned.
        target: ProjectileHandle,
        /// Whether the target was shot down or escaped.
        outcome: BonusOutcome,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that a new round began and the formation was restored.
    RoundStarted,
    /// Announces that the round ended.
    RoundEnded {
        /// Whether the player won the round.
        won: bool,
    },
    /// Indicates that the frame clock advanced.
    TimeAdvanced {
        /// Duration of rendered time that elapsed in the frame.
        dt: Duration,
    },
    /// Confirms that the formation performed a single step.
    FormationStepped {
        /// Translation applied to the formation during the step.
        delta: Vec2,
        /// Sweep direction after the step.
        moving_left: bool,
    },
    /// Confirms that a unit died.
    UnitDestroyed {
        /// Identifier of the unit that died.
        unit: UnitId,
        /// Number of units still alive across the whole formation.
        remaining: u32,
    },
    /// Confirms that the last surviving unit of a column died.
    ColumnDestroyed {
        /// Identifier of the emptied column.
        column: ColumnId,
    },
    /// Announces that every unit of the formation was destroyed.
    AllUnitsDestroyed,
    /// Confirms that a unit fired a projectile.
    UnitFired {
        /// Identifier of the unit that fired.
        unit: UnitId,
        /// World position the projectile was spawned at.
        position: Vec2,
        /// Handle returned by the projectile spawner.
        projectile: ProjectileHandle,
    },
    /// Confirms that the bonus target was spawned.
    BonusTargetLaunched {
        /// Handle returned by the projectile spawner.
        target: ProjectileHandle,
        /// World position the bonus target started from.
        position: Vec2,
    },
    /// Reports how a bonus target left the field.
    BonusTargetResolved {
        /// Handle of the resolved bonus target.
        target: ProjectileHandle,
        /// Whether the target was shot down or escaped.
        outcome: BonusOutcome,
    },
}

/// Ways a bonus target can leave the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BonusOutcome {
    /// The player shot the target down.
    Destroyed,
    /// The target crossed the field untouched.
    Escaped,
}

/// Kinds of entities the projectile spawner can be asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpawnKind {
    /// Downward shot fired by a formation unit.
    EnemyShot,
    /// Flying bonus target crossing the top of the field.
    BonusTarget,
}

/// Collaborator that allocates visual entities on behalf of the world.
///
/// Pooling and failure handling are the implementor's concern; the world
/// never retries a spawn.
pub trait ProjectileSpawner: fmt::Debug {
    /// Spawns an entity of the provided kind at the provided world position.
    fn spawn(&mut self, kind: SpawnKind, position: Vec2) -> ProjectileHandle;
}

/// Opaque handle identifying an entity produced by a [`ProjectileSpawner`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileHandle(u64);

impl ProjectileHandle {
    /// Creates a new handle with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Index of a column within the formation, counted left to right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnId(u32);

impl ColumnId {
    /// Creates a new column identifier with the provided index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the zero-based column index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a unit, stable for the formation's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId {
    column: ColumnId,
    row: u32,
}

impl UnitId {
    /// Creates a unit identifier from its column and row.
    ///
    /// Row zero is the bottom of the column.
    #[must_use]
    pub const fn new(column: ColumnId, row: u32) -> Self {
        Self { column, row }
    }

    /// Column that owns the unit.
    #[must_use]
    pub const fn column(&self) -> ColumnId {
        self.column
    }

    /// Zero-based row of the unit, counted from the bottom.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}
