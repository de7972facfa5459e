use std::time::Duration;

use glam::Vec2;
use invader_wave_core::{
    BonusOutcome, Command, Event, ProjectileHandle, ProjectileSpawner, RoundState, SpawnKind,
};
use invader_wave_world::{query, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Height at which a descending unit reaches the player's row.
const PLAYER_LINE: f32 = -4.0;

/// Seconds a bonus target stays in flight before its outcome is decided.
const BONUS_FLIGHT_SECONDS: f32 = 3.0;

/// Mixed into the configured seed so the hazard does not mirror the world's draws.
const HAZARD_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Projectile pool without a physics layer; it only hands out fresh handles.
#[derive(Debug, Default)]
pub(crate) struct HeadlessPool {
    next: u64,
}

impl ProjectileSpawner for HeadlessPool {
    fn spawn(&mut self, kind: SpawnKind, position: Vec2) -> ProjectileHandle {
        self.next += 1;
        log::trace!("spawned {kind:?} #{} at {position}", self.next);
        ProjectileHandle::new(self.next)
    }
}

/// Scripted stand-in for the player's weapon and the enemy's bullets.
///
/// Kills a random surviving unit on a fixed cadence, settles each bonus
/// target after a short flight, and reports the player destroyed once the
/// formation descends to the player line.
#[derive(Debug)]
pub(crate) struct AutoHazard {
    kill_every: Duration,
    since_kill: Duration,
    bonus_in_flight: Vec<(ProjectileHandle, f32)>,
    rng: ChaCha8Rng,
}

impl AutoHazard {
    pub(crate) fn new(kill_every: Duration, seed: u64) -> Self {
        Self {
            kill_every,
            since_kill: Duration::ZERO,
            bonus_in_flight: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed ^ HAZARD_SEED_SALT),
        }
    }

    /// Tracks bonus launches and round resets reported by the world.
    pub(crate) fn observe(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::RoundStarted => {
                    self.since_kill = Duration::ZERO;
                    self.bonus_in_flight.clear();
                }
                Event::BonusTargetLaunched { target, .. } => {
                    self.bonus_in_flight.push((*target, 0.0));
                }
                _ => {}
            }
        }
    }

    /// Schedules kills and bonus resolutions for a frame of `dt`.
    ///
    /// Returns `true` when the player has been overrun.
    pub(crate) fn plan(&mut self, dt: Duration, world: &World, out: &mut Vec<Command>) -> bool {
        if query::round_state(world) != RoundState::Active {
            return false;
        }

        self.plan_kills(dt, world, out);
        self.plan_bonus(dt.as_secs_f32(), out);

        query::unit_view(world)
            .iter()
            .any(|unit| unit.alive && unit.position.y <= PLAYER_LINE)
    }

    fn plan_kills(&mut self, dt: Duration, world: &World, out: &mut Vec<Command>) {
        if self.kill_every.is_zero() {
            return;
        }

        self.since_kill = self.since_kill.saturating_add(dt);
        let mut alive = query::alive_units(world);
        while self.since_kill >= self.kill_every && !alive.is_empty() {
            self.since_kill -= self.kill_every;
            let unit = alive.swap_remove(self.rng.gen_range(0..alive.len()));
            out.push(Command::DestroyUnit { unit });
        }
    }

    fn plan_bonus(&mut self, elapsed: f32, out: &mut Vec<Command>) {
        let mut index = 0;
        while index < self.bonus_in_flight.len() {
            let (target, age) = &mut self.bonus_in_flight[index];
            *age += elapsed;
            if *age < BONUS_FLIGHT_SECONDS {
                index += 1;
                continue;
            }

            let target = *target;
            let _ = self.bonus_in_flight.swap_remove(index);
            let outcome = if self.rng.gen_bool(0.5) {
                BonusOutcome::Destroyed
            } else {
                BonusOutcome::Escaped
            };
            out.push(Command::ResolveBonusTarget { target, outcome });
        }
    }
}
