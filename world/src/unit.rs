//! Single destructible member of the formation.

use glam::Vec2;
use invader_wave_core::{ProjectileHandle, ProjectileSpawner, SpawnKind, UnitId};

/// Projectile request issued by a unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Shot {
    pub(crate) unit: UnitId,
    pub(crate) position: Vec2,
    pub(crate) projectile: ProjectileHandle,
}

#[derive(Clone, Debug)]
pub(crate) struct Unit {
    id: UnitId,
    offset: Vec2,
    alive: bool,
}

impl Unit {
    /// Creates a living unit placed at a fixed offset from its column origin.
    pub(crate) fn new(id: UnitId, offset: Vec2) -> Self {
        Self {
            id,
            offset,
            alive: true,
        }
    }

    pub(crate) fn id(&self) -> UnitId {
        self.id
    }

    pub(crate) fn offset(&self) -> Vec2 {
        self.offset
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.alive
    }

    pub(crate) fn reset(&mut self) {
        self.alive = true;
    }

    /// Marks the unit dead, reporting whether this call caused the transition.
    pub(crate) fn die(&mut self) -> bool {
        let was_alive = self.alive;
        self.alive = false;
        was_alive
    }

    /// Requests a projectile at the unit's world position.
    pub(crate) fn fire(&self, column_origin: Vec2, spawner: &mut dyn ProjectileSpawner) -> Shot {
        let position = column_origin + self.offset;
        let projectile = spawner.spawn(SpawnKind::EnemyShot, position);
        Shot {
            unit: self.id,
            position,
            projectile,
        }
    }
}
