use std::{cell::RefCell, rc::Rc, time::Duration};

use glam::Vec2;
use invader_wave_core::{
    CadenceTuning, ColumnId, Command, Event, FieldBounds, FormationLayout, MotionTuning,
    ProjectileHandle, ProjectileSpawner, RoundState, SpawnKind, UnitId, WaveConfig,
};
use invader_wave_world::{self as world, query, World, BOUNDARY_EPSILON};

#[derive(Debug, Default, Clone)]
struct RecordingSpawner {
    spawned: Rc<RefCell<Vec<(SpawnKind, Vec2)>>>,
}

impl ProjectileSpawner for RecordingSpawner {
    fn spawn(&mut self, kind: SpawnKind, position: Vec2) -> ProjectileHandle {
        let mut spawned = self.spawned.borrow_mut();
        spawned.push((kind, position));
        ProjectileHandle::new(spawned.len() as u64)
    }
}

fn grid(columns: u32, rows: u32) -> WaveConfig {
    WaveConfig {
        layout: FormationLayout {
            columns,
            rows,
            column_spacing: 1.0,
            row_spacing: 1.0,
            unit_width: 1.0,
            origin: Vec2::ZERO,
        },
        cadence: CadenceTuning {
            step_interval_slow: 0.1,
            step_interval_fast: 0.05,
            fire_interval_slow: 1.5,
            fire_interval_fast: 0.5,
            last_unit_multiplier: 2.0,
        },
        motion: MotionTuning {
            step_horizontal_distance: 0.5,
            step_vertical_distance: 0.5,
        },
        field: FieldBounds {
            left: -1.5,
            right: 3.5,
        },
        ..WaveConfig::default()
    }
}

fn started(config: &WaveConfig) -> (World, RecordingSpawner) {
    let spawner = RecordingSpawner::default();
    let mut world = World::new(config, Box::new(spawner.clone()));
    let mut events = Vec::new();
    world::apply(&mut world, Command::StartRound, &mut events);
    assert_eq!(events, vec![Event::RoundStarted]);
    assert_eq!(query::round_state(&world), RoundState::Active);
    (world, spawner)
}

fn unit(column: u32, row: u32) -> UnitId {
    UnitId::new(ColumnId::new(column), row)
}

fn destroy(world: &mut World, target: UnitId) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::DestroyUnit { unit: target }, &mut events);
    events
}

fn fixed_tick(world: &mut World) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::FixedTick {
            dt: Duration::from_millis(100),
        },
        &mut events,
    );
    events
}

fn stepped_delta(events: &[Event]) -> Option<Vec2> {
    events.iter().find_map(|event| match event {
        Event::FormationStepped { delta, .. } => Some(*delta),
        _ => None,
    })
}

#[test]
fn last_survivor_steps_at_boosted_interval() {
    let mut config = grid(1, 3);
    config.cadence.step_interval_fast = 0.1;
    config.cadence.last_unit_multiplier = 2.0;
    let (mut world, _) = started(&config);

    let _ = destroy(&mut world, unit(0, 2));
    let _ = destroy(&mut world, unit(0, 0));

    assert_eq!(query::remaining_units(&world), 1);
    assert!((query::step_interval(&world) - 0.05).abs() < 1.0e-6);
}

#[test]
fn emptying_leftmost_column_advances_left_boundary_only() {
    let (mut world, _) = started(&grid(5, 3));
    assert_eq!(query::boundary_indices(&world), Some((0, 4)));

    for row in 0..3 {
        let _ = destroy(&mut world, unit(0, row));
    }

    assert_eq!(query::boundary_indices(&world), Some((1, 4)));
    assert_eq!(query::active_columns(&world).len(), 4);
}

#[test]
fn touching_left_boundary_flips_and_descends() {
    let (mut world, _) = started(&grid(3, 1));

    let mut guard = 0;
    while !query::moving_left(&world) {
        let _ = fixed_tick(&mut world);
        guard += 1;
        assert!(guard < 100, "formation never turned around");
    }

    loop {
        let (left_edge, _) = query::edges(&world).expect("formation has survivors");
        if (left_edge - -1.5).abs() <= BOUNDARY_EPSILON {
            break;
        }
        let _ = fixed_tick(&mut world);
        guard += 1;
        assert!(guard < 100, "formation never reached the left boundary");
    }
    assert!(query::moving_left(&world));

    let before = query::position(&world);
    let events = fixed_tick(&mut world);

    assert!(!query::moving_left(&world));
    assert_eq!(stepped_delta(&events), Some(Vec2::new(0.0, -0.5)));
    assert_eq!(query::position(&world) - before, Vec2::new(0.0, -0.5));
}

#[test]
fn destroying_every_unit_reports_all_destroyed_once() {
    let (mut world, _) = started(&grid(3, 2));
    let mut events = Vec::new();

    for column in 0..3 {
        for row in 0..2 {
            events.extend(destroy(&mut world, unit(column, row)));
        }
    }
    events.extend(destroy(&mut world, unit(1, 1)));

    let all_destroyed = events
        .iter()
        .filter(|event| matches!(event, Event::AllUnitsDestroyed))
        .count();
    let columns_destroyed = events
        .iter()
        .filter(|event| matches!(event, Event::ColumnDestroyed { .. }))
        .count();
    assert_eq!(all_destroyed, 1);
    assert_eq!(columns_destroyed, 3);
    assert_eq!(events.last(), Some(&Event::AllUnitsDestroyed));
    assert!(query::active_columns(&world).is_empty());
    assert_eq!(query::boundary_indices(&world), None);
    assert_eq!(query::round_state(&world), RoundState::AllDestroyed);
}

#[test]
fn starting_a_new_round_restores_the_formation() {
    let config = grid(2, 2);
    let (mut world, _) = started(&config);
    for _ in 0..3 {
        let _ = fixed_tick(&mut world);
    }
    assert_ne!(query::position(&world), Vec2::ZERO);

    for column in 0..2 {
        for row in 0..2 {
            let _ = destroy(&mut world, unit(column, row));
        }
    }
    assert_eq!(query::round_state(&world), RoundState::AllDestroyed);

    let mut events = Vec::new();
    world::apply(&mut world, Command::StartRound, &mut events);

    assert_eq!(query::round_state(&world), RoundState::Active);
    assert!(query::column_view(&world)
        .iter()
        .all(|column| column.destroyed == 0 && !column.is_empty));
    assert_eq!(
        query::active_columns(&world),
        vec![ColumnId::new(0), ColumnId::new(1)]
    );
    assert_eq!(query::position(&world), Vec2::ZERO);
    assert_eq!(query::origin(&world), config.layout.origin);
    assert!(!query::moving_left(&world));
    assert_eq!(query::destroyed_units(&world), 0);
    assert!((query::step_interval(&world) - 0.1).abs() < f32::EPSILON);
    assert!((query::fire_interval(&world) - 1.5).abs() < f32::EPSILON);
}

#[test]
fn repeated_hits_on_a_dead_unit_count_once() {
    let (mut world, _) = started(&grid(2, 3));

    let first = destroy(&mut world, unit(1, 1));
    let second = destroy(&mut world, unit(1, 1));

    assert_eq!(
        first,
        vec![Event::UnitDestroyed {
            unit: unit(1, 1),
            remaining: 5,
        }]
    );
    assert!(second.is_empty());
    assert_eq!(query::column_view(&world)[1].destroyed, 1);
    assert_eq!(query::destroyed_units(&world), 1);
}

#[test]
fn unknown_units_are_ignored() {
    let (mut world, _) = started(&grid(2, 2));
    assert!(destroy(&mut world, unit(7, 0)).is_empty());
    assert!(destroy(&mut world, unit(0, 9)).is_empty());
    assert_eq!(query::destroyed_units(&world), 0);
}

#[test]
fn shots_come_from_the_lowest_survivor() {
    let (mut world, spawner) = started(&grid(1, 3));
    let _ = destroy(&mut world, unit(0, 0));

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_secs(2),
        },
        &mut events,
    );

    let expected_position = Vec2::new(0.0, 1.0);
    assert_eq!(
        events,
        vec![
            Event::TimeAdvanced {
                dt: Duration::from_secs(2),
            },
            Event::UnitFired {
                unit: unit(0, 1),
                position: expected_position,
                projectile: ProjectileHandle::new(1),
            },
        ]
    );
    assert_eq!(
        spawner.spawned.borrow().as_slice(),
        &[(SpawnKind::EnemyShot, expected_position)]
    );
}

#[test]
fn every_remaining_column_fires_from_its_bottom_survivor() {
    let (mut world, spawner) = started(&grid(5, 3));
    for row in 0..3 {
        let _ = destroy(&mut world, unit(1, row));
        let _ = destroy(&mut world, unit(3, row));
    }
    let _ = destroy(&mut world, unit(0, 0));

    let columns = query::column_view(&world);
    let mut fired_columns = Vec::new();
    let mut shots = 0;
    for _ in 0..200 {
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(2),
            },
            &mut events,
        );
        for event in &events {
            let Event::UnitFired { unit: shooter, .. } = event else {
                continue;
            };
            shots += 1;
            let column = &columns[shooter.column().get() as usize];
            assert!(!column.is_empty, "emptied column fired: {shooter:?}");
            assert_eq!(column.bottom, Some(*shooter));
            fired_columns.push(shooter.column());
        }
    }

    assert_eq!(shots, 200, "every expired fire timer produces a shot");
    assert_eq!(spawner.spawned.borrow().len(), 200);
    fired_columns.sort();
    fired_columns.dedup();
    assert_eq!(
        fired_columns,
        vec![ColumnId::new(0), ColumnId::new(2), ColumnId::new(4)]
    );
    assert_eq!(columns[0].bottom, Some(unit(0, 1)));
}

#[test]
fn frame_ticks_below_fire_interval_accumulate() {
    let (mut world, spawner) = started(&grid(2, 1));

    for _ in 0..14 {
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(100),
            },
            &mut events,
        );
        assert_eq!(events.len(), 1, "only time advances before 1.5s");
    }
    assert!(spawner.spawned.borrow().is_empty());

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_millis(200),
        },
        &mut events,
    );
    assert!(matches!(events.last(), Some(Event::UnitFired { .. })));
}

#[test]
fn fixed_ticks_never_fire_and_frame_ticks_never_step() {
    let (mut world, spawner) = started(&grid(2, 1));

    let events = fixed_tick(&mut world);
    assert!(stepped_delta(&events).is_some());
    assert!(spawner.spawned.borrow().is_empty());

    let position = query::position(&world);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_secs(5),
        },
        &mut events,
    );
    assert_eq!(query::position(&world), position);
}

#[test]
fn ending_a_round_halts_without_resetting() {
    let (mut world, _) = started(&grid(3, 1));
    let _ = fixed_tick(&mut world);
    let _ = destroy(&mut world, unit(0, 0));
    let position = query::position(&world);

    let mut events = Vec::new();
    world::apply(&mut world, Command::EndRound { won: false }, &mut events);
    assert_eq!(events, vec![Event::RoundEnded { won: false }]);
    assert_eq!(query::round_state(&world), RoundState::Inactive);

    assert!(fixed_tick(&mut world).is_empty());
    assert!(destroy(&mut world, unit(1, 0)).is_empty());
    assert_eq!(query::position(&world), position);
    assert_eq!(query::destroyed_units(&world), 1);
    assert_eq!(query::boundary_indices(&world), Some((1, 2)));
}

#[test]
fn empty_formation_is_destroyed_as_soon_as_it_starts() {
    let config = grid(0, 4);
    let mut world = World::new(&config, Box::new(RecordingSpawner::default()));
    let mut events = Vec::new();

    world::apply(&mut world, Command::StartRound, &mut events);

    assert_eq!(events, vec![Event::RoundStarted, Event::AllUnitsDestroyed]);
    assert_eq!(query::round_state(&world), RoundState::AllDestroyed);
    assert_eq!(query::edges(&world), None);
}

#[test]
fn formation_never_leaves_the_field() {
    let (mut world, _) = started(&WaveConfig {
        cadence: CadenceTuning {
            step_interval_slow: 0.1,
            step_interval_fast: 0.05,
            ..CadenceTuning::default()
        },
        motion: MotionTuning {
            step_horizontal_distance: 0.7,
            step_vertical_distance: 0.25,
        },
        ..WaveConfig::default()
    });

    let mut flips = 0;
    let mut moving_left = query::moving_left(&world);
    for _ in 0..400 {
        let _ = fixed_tick(&mut world);
        let (left, right) = query::edges(&world).expect("formation has survivors");
        assert!(left >= -8.0 - BOUNDARY_EPSILON, "left edge overshot: {left}");
        assert!(right <= 8.0 + BOUNDARY_EPSILON, "right edge overshot: {right}");
        if query::moving_left(&world) != moving_left {
            flips += 1;
            moving_left = query::moving_left(&world);
        }
    }
    assert!(flips >= 4, "expected several bounces, saw {flips}");
}

#[test]
fn bonus_targets_are_spawned_through_the_collaborator() {
    let (mut world, spawner) = started(&grid(1, 1));
    let mut events = Vec::new();

    world::apply(
        &mut world,
        Command::LaunchBonusTarget {
            position: Vec2::new(-9.0, 5.0),
        },
        &mut events,
    );

    assert_eq!(
        events,
        vec![Event::BonusTargetLaunched {
            target: ProjectileHandle::new(1),
            position: Vec2::new(-9.0, 5.0),
        }]
    );
    assert_eq!(
        spawner.spawned.borrow().as_slice(),
        &[(SpawnKind::BonusTarget, Vec2::new(-9.0, 5.0))]
    );
}
