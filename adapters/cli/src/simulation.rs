use std::{fmt, time::Duration};

use invader_wave_core::{Command, Event, WaveConfig};
use invader_wave_system_bonus_spawner::BonusSpawner;
use invader_wave_system_fixed_step::{Config as FixedStepConfig, FixedStep};
use invader_wave_system_round_flow::{Phase, RoundFlow};
use invader_wave_system_scoring::Scoreboard;
use invader_wave_world::{self as world, query, World};

use crate::hazard::{AutoHazard, HeadlessPool};

/// World plus every system, pumped through the command/event bus.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    fixed_step: FixedStep,
    bonus: BonusSpawner,
    scoreboard: Scoreboard,
    round_flow: RoundFlow,
    hazard: AutoHazard,
    frames: u32,
    steps: u32,
    enemy_shots: u32,
    bonus_launched: u32,
}

impl Simulation {
    pub(crate) fn new(config: &WaveConfig, kill_every: Duration) -> Self {
        Self {
            world: World::new(config, Box::<HeadlessPool>::default()),
            fixed_step: FixedStep::new(FixedStepConfig::from_tuning(&config.timing)),
            bonus: BonusSpawner::new(config.bonus.clone(), config.rng_seed),
            scoreboard: Scoreboard::new(config.scoring.clone()),
            round_flow: RoundFlow::new(),
            hazard: AutoHazard::new(kill_every, config.rng_seed),
            frames: 0,
            steps: 0,
            enemy_shots: 0,
            bonus_launched: 0,
        }
    }

    /// Plays one round for at most `frames` frames of `frame_time` each.
    pub(crate) fn run(&mut self, frames: u32, frame_time: Duration) -> Summary {
        let mut commands = Vec::new();
        self.round_flow.start(&mut commands);
        self.pump(commands);

        while self.frames < frames && self.round_flow.phase() == Phase::Playing {
            self.frame(frame_time);
        }

        self.summary()
    }

    fn frame(&mut self, dt: Duration) {
        self.frames += 1;
        let mut commands = vec![Command::Tick { dt }];
        if self.hazard.plan(dt, &self.world, &mut commands) {
            log::info!("formation reached the player on frame {}", self.frames);
            self.round_flow.player_destroyed(&mut commands);
        }
        self.pump(commands);
    }

    fn pump(&mut self, mut pending: Vec<Command>) {
        let mut events = Vec::new();
        while !pending.is_empty() {
            events.clear();
            for command in pending.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }

            self.record(&events);
            self.hazard.observe(&events);
            self.scoreboard.handle(&events);
            self.fixed_step.handle(&events, &mut pending);
            self.bonus.handle(&events, &mut pending);
            self.round_flow.handle(&events, &mut pending);
        }
    }

    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::FormationStepped { .. } => self.steps += 1,
                Event::UnitFired { .. } => self.enemy_shots += 1,
                Event::BonusTargetLaunched { .. } => self.bonus_launched += 1,
                Event::ColumnDestroyed { column } => {
                    log::debug!("column {} cleared", column.get());
                }
                _ => {}
            }
        }
    }

    fn summary(&self) -> Summary {
        Summary {
            frames: self.frames,
            message: self.round_flow.message(),
            score: self.scoreboard.display(),
            destroyed: query::destroyed_units(&self.world),
            total: query::total_units(&self.world),
            steps: self.steps,
            enemy_shots: self.enemy_shots,
            bonus_launched: self.bonus_launched,
            bonus_destroyed: self.scoreboard.bonus_destroyed(),
        }
    }
}

/// Outcome of a headless round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Summary {
    frames: u32,
    message: Option<&'static str>,
    score: String,
    destroyed: u32,
    total: u32,
    steps: u32,
    enemy_shots: u32,
    bonus_launched: u32,
    bonus_destroyed: u32,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} after {} frames",
            self.message.unwrap_or("Round unfinished"),
            self.frames
        )?;
        writeln!(f, "score          {}", self.score)?;
        writeln!(f, "units          {}/{}", self.destroyed, self.total)?;
        writeln!(f, "steps          {}", self.steps)?;
        writeln!(f, "enemy shots    {}", self.enemy_shots)?;
        write!(
            f,
            "bonus targets  {} launched, {} destroyed",
            self.bonus_launched, self.bonus_destroyed
        )
    }
}
