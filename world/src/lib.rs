#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative enemy wave state for Invader Wave.

mod column;
mod formation;
mod unit;

use invader_wave_core::{Command, Event, ProjectileSpawner, SpawnKind, WaveConfig};

pub use formation::BOUNDARY_EPSILON;

use formation::Formation;

/// Represents the authoritative wave state together with its collaborators.
#[derive(Debug)]
pub struct World {
    formation: Formation,
    spawner: Box<dyn ProjectileSpawner>,
}

impl World {
    /// Builds the formation described by `config`.
    ///
    /// The formation stays inactive until [`Command::StartRound`] is applied.
    #[must_use]
    pub fn new(config: &WaveConfig, spawner: Box<dyn ProjectileSpawner>) -> Self {
        Self {
            formation: Formation::new(config),
            spawner,
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartRound => {
            out_events.push(Event::RoundStarted);
            world.formation.reset_round(out_events);
        }
        Command::EndRound { won } => {
            world.formation.end_round();
            log::info!("round ended; won: {won}");
            out_events.push(Event::RoundEnded { won });
        }
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            world
                .formation
                .advance_frame(dt.as_secs_f32(), world.spawner.as_mut(), out_events);
        }
        Command::FixedTick { dt } => {
            world.formation.advance_fixed(dt.as_secs_f32(), out_events);
        }
        Command::DestroyUnit { unit } => {
            world.formation.destroy_unit(unit, out_events);
        }
        Command::LaunchBonusTarget { position } => {
            let target = world.spawner.spawn(SpawnKind::BonusTarget, position);
            log::debug!("bonus target {target:?} launched at {position}");
            out_events.push(Event::BonusTargetLaunched { target, position });
        }
        Command::ResolveBonusTarget { target, outcome } => {
            out_events.push(Event::BonusTargetResolved { target, outcome });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use glam::Vec2;
    use invader_wave_core::{ColumnId, RoundState, UnitId};

    use super::World;

    /// Current lifecycle state of the formation.
    #[must_use]
    pub fn round_state(world: &World) -> RoundState {
        world.formation.state()
    }

    /// Translation of the formation away from its original placement.
    #[must_use]
    pub fn position(world: &World) -> Vec2 {
        world.formation.position()
    }

    /// World position of the formation origin, the bottom of the leftmost column.
    #[must_use]
    pub fn origin(world: &World) -> Vec2 {
        world.formation.origin()
    }

    /// Reports whether the formation is currently sweeping left.
    #[must_use]
    pub fn moving_left(world: &World) -> bool {
        world.formation.moving_left()
    }

    /// Indices of the leftmost and rightmost non-empty columns.
    ///
    /// Returns `None` once every column is empty.
    #[must_use]
    pub fn boundary_indices(world: &World) -> Option<(usize, usize)> {
        world.formation.boundary_indices()
    }

    /// World x coordinates of the outer edges of the surviving formation.
    #[must_use]
    pub fn edges(world: &World) -> Option<(f32, f32)> {
        world
            .formation
            .boundary_indices()
            .map(|_| (world.formation.left_edge(), world.formation.right_edge()))
    }

    /// Identifiers of every column that still has survivors, in ascending order.
    #[must_use]
    pub fn active_columns(world: &World) -> Vec<ColumnId> {
        let columns = world.formation.columns();
        let mut active: Vec<ColumnId> = world
            .formation
            .active_indices()
            .iter()
            .filter_map(|&index| columns.get(index).map(|column| column.id()))
            .collect();
        active.sort();
        active
    }

    /// Time currently required between formation steps, in seconds.
    #[must_use]
    pub fn step_interval(world: &World) -> f32 {
        world.formation.step_interval()
    }

    /// Time currently required between shots, in seconds.
    #[must_use]
    pub fn fire_interval(world: &World) -> f32 {
        world.formation.fire_interval()
    }

    /// Number of units the formation was built with.
    #[must_use]
    pub fn total_units(world: &World) -> u32 {
        world.formation.total_units()
    }

    /// Number of units destroyed during the current round.
    #[must_use]
    pub fn destroyed_units(world: &World) -> u32 {
        world.formation.destroyed_units()
    }

    /// Number of units still alive during the current round.
    #[must_use]
    pub fn remaining_units(world: &World) -> u32 {
        world.formation.remaining_units()
    }

    /// Captures a read-only view of every column in left-to-right order.
    #[must_use]
    pub fn column_view(world: &World) -> Vec<ColumnSnapshot> {
        world
            .formation
            .columns()
            .iter()
            .map(|column| ColumnSnapshot {
                id: column.id(),
                units: column.len(),
                destroyed: column.destroyed_count(),
                survivors: column.enemy_count(),
                is_empty: column.is_empty(),
                bottom: column.bottom_unit().map(|unit| unit.id()),
            })
            .collect()
    }

    /// Captures a read-only view of every unit, ordered by column then row.
    #[must_use]
    pub fn unit_view(world: &World) -> Vec<UnitSnapshot> {
        let origin = world.formation.origin();
        world
            .formation
            .columns()
            .iter()
            .flat_map(|column| {
                let column_origin = origin + column.offset();
                column.units().iter().map(move |unit| UnitSnapshot {
                    id: unit.id(),
                    alive: unit.is_alive(),
                    position: column_origin + unit.offset(),
                })
            })
            .collect()
    }

    /// Identifiers of every unit still alive, ordered by column then row.
    #[must_use]
    pub fn alive_units(world: &World) -> Vec<UnitId> {
        unit_view(world)
            .into_iter()
            .filter(|unit| unit.alive)
            .map(|unit| unit.id)
            .collect()
    }

    /// Immutable representation of a single column used for queries.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct ColumnSnapshot {
        /// Position of the column in the left-to-right order.
        pub id: ColumnId,
        /// Number of units the column was built with.
        pub units: u32,
        /// Number of units destroyed this round.
        pub destroyed: u32,
        /// Number of units still alive.
        pub survivors: u32,
        /// Whether every unit of the column is dead.
        pub is_empty: bool,
        /// Lowest surviving unit, the only one allowed to fire.
        pub bottom: Option<UnitId>,
    }

    /// Immutable representation of a single unit used for queries.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct UnitSnapshot {
        /// Identifier of the unit.
        pub id: UnitId,
        /// Whether the unit is alive.
        pub alive: bool,
        /// Current world position of the unit.
        pub position: Vec2,
    }
}
