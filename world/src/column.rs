//! Vertical stack of units that fires from its lowest survivor.

use glam::Vec2;
use invader_wave_core::{ColumnId, ProjectileSpawner, UnitId};

use crate::unit::{Shot, Unit};

/// Outcome of reporting a unit death to its column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum UnitLoss {
    /// The unit was unknown or already dead.
    Unchanged,
    /// The unit died and the column still has survivors.
    UnitLost,
    /// The unit died and it was the column's last survivor.
    ColumnEmptied,
}

#[derive(Clone, Debug)]
pub(crate) struct Column {
    id: ColumnId,
    offset: Vec2,
    /// Bottom to top; never reordered.
    units: Vec<Unit>,
    destroyed: u32,
    emptied_reported: bool,
}

impl Column {
    /// Stacks `rows` units upward from the column origin.
    pub(crate) fn new(id: ColumnId, offset: Vec2, rows: u32, row_spacing: f32) -> Self {
        let units = (0..rows)
            .map(|row| {
                Unit::new(
                    UnitId::new(id, row),
                    Vec2::new(0.0, row as f32 * row_spacing),
                )
            })
            .collect::<Vec<_>>();
        let emptied_reported = units.is_empty();
        Self {
            id,
            offset,
            units,
            destroyed: 0,
            emptied_reported,
        }
    }

    pub(crate) fn id(&self) -> ColumnId {
        self.id
    }

    /// Offset of the column origin from the formation origin.
    pub(crate) fn offset(&self) -> Vec2 {
        self.offset
    }

    pub(crate) fn units(&self) -> &[Unit] {
        &self.units
    }

    pub(crate) fn len(&self) -> u32 {
        self.units.len() as u32
    }

    pub(crate) fn destroyed_count(&self) -> u32 {
        self.destroyed
    }

    pub(crate) fn enemy_count(&self) -> u32 {
        self.len() - self.destroyed
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.destroyed == self.len()
    }

    pub(crate) fn reset(&mut self) {
        for unit in &mut self.units {
            unit.reset();
        }
        self.destroyed = 0;
        self.emptied_reported = self.units.is_empty();
    }

    /// Kills the unit at `row`, forwarding the death to the column at most once.
    pub(crate) fn destroy_unit(&mut self, row: u32) -> UnitLoss {
        let Some(unit) = usize::try_from(row)
            .ok()
            .and_then(|index| self.units.get_mut(index))
        else {
            return UnitLoss::Unchanged;
        };

        if !unit.die() {
            return UnitLoss::Unchanged;
        }

        if self.on_unit_died() {
            UnitLoss::ColumnEmptied
        } else {
            UnitLoss::UnitLost
        }
    }

    /// Lowest surviving unit, scanning upward from the bottom.
    pub(crate) fn bottom_unit(&self) -> Option<&Unit> {
        self.units.iter().find(|unit| unit.is_alive())
    }

    /// Fires from the lowest survivor, if any.
    pub(crate) fn fire_from_bottom(
        &self,
        formation_origin: Vec2,
        spawner: &mut dyn ProjectileSpawner,
    ) -> Option<Shot> {
        let origin = formation_origin + self.offset;
        self.bottom_unit().map(|unit| unit.fire(origin, spawner))
    }

    fn on_unit_died(&mut self) -> bool {
        self.destroyed = (self.destroyed + 1).min(self.len());
        if self.is_empty() && !self.emptied_reported {
            self.emptied_reported = true;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invader_wave_core::{ProjectileHandle, SpawnKind};

    #[derive(Debug, Default)]
    struct Recorder {
        positions: Vec<Vec2>,
    }

    impl ProjectileSpawner for Recorder {
        fn spawn(&mut self, _kind: SpawnKind, position: Vec2) -> ProjectileHandle {
            self.positions.push(position);
            ProjectileHandle::new(self.positions.len() as u64)
        }
    }

    fn column(rows: u32) -> Column {
        Column::new(ColumnId::new(0), Vec2::new(2.0, 0.0), rows, 1.0)
    }

    #[test]
    fn emptied_is_reported_once() {
        let mut column = column(2);
        assert_eq!(column.destroy_unit(1), UnitLoss::UnitLost);
        assert_eq!(column.destroy_unit(1), UnitLoss::Unchanged);
        assert_eq!(column.destroy_unit(0), UnitLoss::ColumnEmptied);
        assert_eq!(column.destroy_unit(0), UnitLoss::Unchanged);
        assert!(column.is_empty());
        assert_eq!(column.destroyed_count(), 2);
        assert_eq!(column.enemy_count(), 0);
    }

    #[test]
    fn unknown_rows_are_ignored() {
        let mut column = column(3);
        assert_eq!(column.destroy_unit(3), UnitLoss::Unchanged);
        assert_eq!(column.destroyed_count(), 0);
    }

    #[test]
    fn reset_rearms_the_emptied_report() {
        let mut column = column(1);
        assert_eq!(column.destroy_unit(0), UnitLoss::ColumnEmptied);

        column.reset();

        assert!(!column.is_empty());
        assert_eq!(column.enemy_count(), 1);
        assert_eq!(column.destroy_unit(0), UnitLoss::ColumnEmptied);
    }

    #[test]
    fn fires_from_lowest_survivor() {
        let mut column = column(3);
        let _ = column.destroy_unit(0);
        let mut recorder = Recorder::default();

        let shot = column
            .fire_from_bottom(Vec2::new(1.0, 1.0), &mut recorder)
            .expect("column has survivors");

        assert_eq!(shot.unit, UnitId::new(ColumnId::new(0), 1));
        assert_eq!(shot.position, Vec2::new(3.0, 2.0));

        let _ = column.destroy_unit(1);
        let _ = column.destroy_unit(2);
        assert!(column.fire_from_bottom(Vec2::ZERO, &mut recorder).is_none());
        assert_eq!(recorder.positions.len(), 1);
    }

    #[test]
    fn empty_column_is_empty_from_the_start() {
        let mut column = column(0);
        assert!(column.is_empty());
        assert_eq!(column.destroy_unit(0), UnitLoss::Unchanged);
    }
}
