//! Coordinator that sweeps the formation, fires from random columns, and
//! speeds both up as units die.
//!
//! Columns live in a fixed left-to-right array for the formation's whole
//! lifetime. The coordinator tracks the outermost non-empty columns through
//! two indices that only ever move inward during a round, so the horizontal
//! extent of the survivors is available without rescanning the grid on every
//! step. A separate unordered set of non-empty columns backs the uniform
//! random choice of shooter.

use glam::Vec2;
use invader_wave_core::{
    CadenceTuning, ColumnId, Event, FieldBounds, MotionTuning, ProjectileSpawner, RoundState,
    UnitId, WaveConfig,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::column::{Column, UnitLoss};

/// Distance from a field boundary, in world units, treated as touching it.
pub const BOUNDARY_EPSILON: f32 = 1.0e-4;

#[derive(Debug)]
pub(crate) struct Formation {
    columns: Vec<Column>,
    /// Indices into `columns`; order is irrelevant.
    active: Vec<usize>,
    left_most: usize,
    right_most: usize,
    moving_left: bool,
    placement: Vec2,
    position: Vec2,
    half_unit_width: f32,
    step_timer: f32,
    fire_timer: f32,
    step_interval: f32,
    fire_interval: f32,
    total_units: u32,
    destroyed_units: u32,
    state: RoundState,
    cadence: CadenceTuning,
    motion: MotionTuning,
    field: FieldBounds,
    rng: ChaCha8Rng,
}

impl Formation {
    pub(crate) fn new(config: &WaveConfig) -> Self {
        let layout = &config.layout;
        let columns: Vec<Column> = (0..layout.columns)
            .map(|index| {
                Column::new(
                    ColumnId::new(index),
                    Vec2::new(index as f32 * layout.column_spacing, 0.0),
                    layout.rows,
                    layout.row_spacing,
                )
            })
            .collect();
        let total_units = columns.iter().map(Column::len).sum();
        let right_most = columns.len().saturating_sub(1);

        Self {
            columns,
            active: Vec::new(),
            left_most: 0,
            right_most,
            moving_left: false,
            placement: layout.origin,
            position: Vec2::ZERO,
            half_unit_width: layout.unit_width * 0.5,
            step_timer: 0.0,
            fire_timer: 0.0,
            step_interval: config.cadence.step_interval_slow,
            fire_interval: config.cadence.fire_interval_slow,
            total_units,
            destroyed_units: 0,
            state: RoundState::Inactive,
            cadence: config.cadence.clone(),
            motion: config.motion.clone(),
            field: config.field.clone(),
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Restores every column and counter and activates the formation.
    pub(crate) fn reset_round(&mut self, out_events: &mut Vec<Event>) {
        for column in &mut self.columns {
            column.reset();
        }

        self.active = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, column)| !column.is_empty())
            .map(|(index, _)| index)
            .collect();
        self.left_most = 0;
        self.right_most = self.columns.len().saturating_sub(1);
        self.moving_left = false;
        self.position = Vec2::ZERO;
        self.step_timer = 0.0;
        self.fire_timer = 0.0;
        self.step_interval = self.cadence.step_interval_slow;
        self.fire_interval = self.cadence.fire_interval_slow;
        self.destroyed_units = 0;

        if self.active.is_empty() {
            log::info!("formation has no units; round is over before it began");
            self.finish(out_events);
            return;
        }

        self.recompute_boundaries();
        self.state = RoundState::Active;
        log::debug!(
            "round started with {} units in {} columns",
            self.total_units,
            self.active.len()
        );
    }

    /// Halts ticking without touching the formation.
    pub(crate) fn end_round(&mut self) {
        if self.state == RoundState::Active {
            self.state = RoundState::Inactive;
        }
    }

    /// Variable-rate bookkeeping: advances the fire timer.
    pub(crate) fn advance_frame(
        &mut self,
        dt: f32,
        spawner: &mut dyn ProjectileSpawner,
        out_events: &mut Vec<Event>,
    ) {
        if self.state != RoundState::Active {
            return;
        }

        self.fire_timer += dt;
        if self.fire_timer >= self.fire_interval {
            self.fire_random(spawner, out_events);
            self.fire_timer = 0.0;
        }
    }

    /// Fixed-rate bookkeeping: advances the step timer and moves on expiry.
    pub(crate) fn advance_fixed(&mut self, dt: f32, out_events: &mut Vec<Event>) {
        if self.state != RoundState::Active {
            return;
        }

        self.step_timer += dt;
        if self.step_timer >= self.step_interval {
            let delta = self.step();
            self.step_timer = 0.0;
            out_events.push(Event::FormationStepped {
                delta,
                moving_left: self.moving_left,
            });
        }
    }

    /// Applies a hazard hit to the identified unit.
    pub(crate) fn destroy_unit(&mut self, unit: UnitId, out_events: &mut Vec<Event>) {
        if self.state != RoundState::Active {
            log::debug!("ignoring hit on {unit:?} while {:?}", self.state);
            return;
        }

        let Some(index) = usize::try_from(unit.column().get()).ok() else {
            return;
        };
        let Some(column) = self.columns.get_mut(index) else {
            return;
        };

        let loss = column.destroy_unit(unit.row());
        if loss == UnitLoss::Unchanged {
            return;
        }

        self.on_unit_destroyed();
        out_events.push(Event::UnitDestroyed {
            unit,
            remaining: self.remaining_units(),
        });

        if loss == UnitLoss::ColumnEmptied {
            self.on_column_destroyed(index, out_events);
        }
    }

    pub(crate) fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub(crate) fn active_indices(&self) -> &[usize] {
        &self.active
    }

    pub(crate) fn state(&self) -> RoundState {
        self.state
    }

    pub(crate) fn moving_left(&self) -> bool {
        self.moving_left
    }

    pub(crate) fn position(&self) -> Vec2 {
        self.position
    }

    /// World position of the formation origin.
    pub(crate) fn origin(&self) -> Vec2 {
        self.placement + self.position
    }

    pub(crate) fn boundary_indices(&self) -> Option<(usize, usize)> {
        if self.active.is_empty() {
            None
        } else {
            Some((self.left_most, self.right_most))
        }
    }

    pub(crate) fn step_interval(&self) -> f32 {
        self.step_interval
    }

    pub(crate) fn fire_interval(&self) -> f32 {
        self.fire_interval
    }

    pub(crate) fn total_units(&self) -> u32 {
        self.total_units
    }

    pub(crate) fn destroyed_units(&self) -> u32 {
        self.destroyed_units
    }

    pub(crate) fn remaining_units(&self) -> u32 {
        self.total_units.saturating_sub(self.destroyed_units)
    }

    pub(crate) fn left_edge(&self) -> f32 {
        self.column_x(self.left_most) - self.half_unit_width
    }

    pub(crate) fn right_edge(&self) -> f32 {
        self.column_x(self.right_most) + self.half_unit_width
    }

    fn column_x(&self, index: usize) -> f32 {
        let offset = self
            .columns
            .get(index)
            .map_or(Vec2::ZERO, Column::offset);
        self.origin().x + offset.x
    }

    fn fire_random(&mut self, spawner: &mut dyn ProjectileSpawner, out_events: &mut Vec<Event>) {
        if self.active.is_empty() {
            return;
        }

        let pick = self.active[self.rng.gen_range(0..self.active.len())];
        let origin = self.origin();
        if let Some(shot) = self.columns[pick].fire_from_bottom(origin, spawner) {
            out_events.push(Event::UnitFired {
                unit: shot.unit,
                position: shot.position,
                projectile: shot.projectile,
            });
        }
    }

    fn on_unit_destroyed(&mut self) {
        self.destroyed_units = (self.destroyed_units + 1).min(self.total_units);
        let (step, fire) = cadence_at(&self.cadence, self.destroyed_units, self.total_units);
        self.step_interval = step;
        self.fire_interval = fire;
    }

    fn on_column_destroyed(&mut self, index: usize, out_events: &mut Vec<Event>) {
        if let Some(slot) = self.active.iter().position(|&active| active == index) {
            let _ = self.active.swap_remove(slot);
        }
        out_events.push(Event::ColumnDestroyed {
            column: self.columns[index].id(),
        });

        if self.active.is_empty() {
            self.finish(out_events);
        } else {
            self.recompute_boundaries();
        }
    }

    fn finish(&mut self, out_events: &mut Vec<Event>) {
        self.state = RoundState::AllDestroyed;
        log::info!("all units destroyed");
        out_events.push(Event::AllUnitsDestroyed);
    }

    /// Walks each boundary inward past emptied columns.
    ///
    /// Requires at least one non-empty column.
    fn recompute_boundaries(&mut self) {
        let last = self.columns.len().saturating_sub(1);
        while self.left_most < last && self.columns[self.left_most].is_empty() {
            self.left_most += 1;
        }
        while self.right_most > self.left_most && self.columns[self.right_most].is_empty() {
            self.right_most -= 1;
        }
    }

    /// Performs one bounce/descent step and returns the applied translation.
    fn step(&mut self) -> Vec2 {
        let horizontal = self.motion.step_horizontal_distance;
        let descent = Vec2::new(0.0, -self.motion.step_vertical_distance);

        let delta = if self.moving_left {
            let edge = self.left_edge();
            if (edge - self.field.left).abs() <= BOUNDARY_EPSILON {
                self.moving_left = false;
                log::trace!("formation reached left boundary; descending");
                descent
            } else {
                let projected = edge - horizontal;
                let distance = if projected > self.field.left {
                    horizontal
                } else {
                    horizontal - (self.field.left - projected)
                };
                Vec2::new(-distance, 0.0)
            }
        } else {
            let edge = self.right_edge();
            if (edge - self.field.right).abs() <= BOUNDARY_EPSILON {
                self.moving_left = true;
                log::trace!("formation reached right boundary; descending");
                descent
            } else {
                let projected = edge + horizontal;
                let distance = if projected < self.field.right {
                    horizontal
                } else {
                    horizontal - (projected - self.field.right)
                };
                Vec2::new(distance, 0.0)
            }
        };

        self.position += delta;
        delta
    }
}

/// Step and fire intervals after `destroyed` of `total` units have died.
///
/// Both intervals interpolate from the slow extreme towards the fast one as
/// the formation thins out. A lone survivor steps at the fast interval
/// divided by the last-unit multiplier; firing never takes that boost.
pub(crate) fn cadence_at(cadence: &CadenceTuning, destroyed: u32, total: u32) -> (f32, f32) {
    let progress = if total == 0 {
        0.0
    } else {
        (destroyed as f32 / total as f32).clamp(0.0, 1.0)
    };

    let fire = lerp(
        cadence.fire_interval_slow,
        cadence.fire_interval_fast,
        progress,
    );

    let step = if total.saturating_sub(destroyed) == 1 {
        if cadence.last_unit_multiplier > 0.0 {
            cadence.step_interval_fast / cadence.last_unit_multiplier
        } else {
            cadence.step_interval_fast
        }
    } else {
        lerp(
            cadence.step_interval_slow,
            cadence.step_interval_fast,
            progress,
        )
    };

    (step, fire)
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}
