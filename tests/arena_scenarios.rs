//! Integration tests for the arena driven by a scripted physics engine.
//!
//! Collisions are forced by scripting collision-start batches, so every
//! scenario is exact and independent of motion.

mod common;

use glam::Vec2;
use proptest::prelude::*;

use common::*;
use rps_arena::consts::SIM_DT;
use rps_arena::{
    Arena, ArenaError, CollisionPair, Counts, Cue, CueLog, Kind, MatchState, NullAudio,
    PhysicsEngine, Runner, Tuning, World,
};

fn ambience_cues(arena: &TestArena) -> Vec<Cue> {
    arena
        .audio()
        .cues()
        .iter()
        .copied()
        .filter(|c| matches!(c, Cue::StartAmbience(_) | Cue::StopAmbience))
        .collect()
}

#[test]
fn forced_match_reports_one_winner_once() {
    let (mut arena, fired) = scripted_arena(42);
    assert_eq!(arena.bounds().size, 500.0);
    assert_eq!(arena.scoreboard(), Counts::even(33));

    // Scissors cut every paper
    let scissors = handles_of(&arena, Kind::Scissors);
    let papers = handles_of(&arena, Kind::Paper);
    let report = run_batch(&mut arena, fan(scissors[0], &papers));
    assert_eq!(report.conversions, 33);
    assert_eq!(
        arena.scoreboard(),
        Counts {
            rock: 33,
            paper: 0,
            scissors: 66
        }
    );
    assert_eq!(arena.state(), MatchState::Running);

    // Rock breaks every scissors
    let rock = handles_of(&arena, Kind::Rock)[0];
    let scissors = handles_of(&arena, Kind::Scissors);
    let report = run_batch(&mut arena, fan(rock, &scissors));
    assert_eq!(report.conversions, 66);
    assert_eq!(
        arena.scoreboard(),
        Counts {
            rock: 99,
            paper: 0,
            scissors: 0
        }
    );
    assert_eq!(arena.state(), MatchState::Over);
    assert_eq!(arena.winner(), Some(Kind::Rock));
    assert_eq!(fired.get(), 1);

    // More contacts after the end change nothing
    let rocks = handles_of(&arena, Kind::Rock);
    run_batch(&mut arena, fan(rocks[0], &rocks[1..]));
    for _ in 0..120 {
        arena.tick(SIM_DT);
        assert_counts_hold(&arena);
    }
    assert_eq!(fired.get(), 1);
    assert_eq!(arena.winner(), Some(Kind::Rock));
}

#[test]
fn kinds_are_reread_within_a_batch() {
    let (mut arena, _) = scripted_arena(1);
    let rock = handles_of(&arena, Kind::Rock)[0];
    let scissors = handles_of(&arena, Kind::Scissors)[0];
    let paper = handles_of(&arena, Kind::Paper)[0];

    // Scissors becomes rock, then loses to paper as a rock
    let report = run_batch(
        &mut arena,
        vec![CollisionPair::new(rock, scissors), CollisionPair::new(scissors, paper)],
    );
    assert_eq!(report.conversions, 2);
    assert_eq!(
        arena.scoreboard(),
        Counts {
            rock: 33,
            paper: 34,
            scissors: 32
        }
    );

    let converted = arena.particles().iter().find(|p| p.id == scissors).map(|p| p.kind);
    assert_eq!(converted, Some(Kind::Paper));
}

#[test]
fn walls_and_same_kind_pairs_convert_nothing() {
    let (mut arena, _) = scripted_arena(1);
    let wall = arena.walls()[0].id;
    let rocks = handles_of(&arena, Kind::Rock);

    let report = run_batch(
        &mut arena,
        vec![
            CollisionPair::new(wall, rocks[0]),
            CollisionPair::new(rocks[1], wall),
            CollisionPair::new(rocks[0], rocks[1]),
        ],
    );
    assert_eq!(report.conversions, 0);
    assert_eq!(arena.scoreboard(), Counts::even(33));
}

#[test]
fn dominance_ambience_is_edge_triggered() {
    let (mut arena, _) = scripted_arena(5);

    // Paper takes ten rocks: 23 / 43 / 33
    let paper = handles_of(&arena, Kind::Paper)[0];
    let rocks = handles_of(&arena, Kind::Rock);
    run_batch(&mut arena, fan(paper, &rocks[..10]));
    assert!(ambience_cues(&arena).is_empty());

    // Scissors take every paper: 23 / 0 / 76 -> scissors dominate
    let scissor = handles_of(&arena, Kind::Scissors)[0];
    let papers = handles_of(&arena, Kind::Paper);
    run_batch(&mut arena, fan(scissor, &papers));
    assert_eq!(arena.dominant(), Some(Kind::Scissors));

    // Same dominant kind again: no new cue
    run_batch(&mut arena, Vec::new());

    // Rock takes ten scissors: 33 / 0 / 66 -> nobody dominates
    let rock = handles_of(&arena, Kind::Rock)[0];
    let scissors = handles_of(&arena, Kind::Scissors);
    run_batch(&mut arena, fan(rock, &scissors[..10]));
    assert_eq!(arena.dominant(), None);

    // Rock takes 37 more: 70 / 0 / 29 -> rock dominates
    let scissors = handles_of(&arena, Kind::Scissors);
    run_batch(&mut arena, fan(rock, &scissors[..37]));
    assert_eq!(arena.dominant(), Some(Kind::Rock));
    assert_eq!(arena.state(), MatchState::Running);

    assert_eq!(
        ambience_cues(&arena),
        vec![
            Cue::StartAmbience(Kind::Scissors),
            Cue::StopAmbience,
            Cue::StartAmbience(Kind::Rock)
        ]
    );
}

#[test]
fn transform_cues_follow_conversions() {
    let (mut arena, _) = scripted_arena(3);
    let rock = handles_of(&arena, Kind::Rock)[0];
    let scissors = handles_of(&arena, Kind::Scissors)[0];
    run_batch(&mut arena, vec![CollisionPair::new(scissors, rock)]);

    assert!(
        arena
            .audio()
            .cues()
            .contains(&Cue::Transform { from: Kind::Scissors, to: Kind::Rock })
    );
}

#[test]
fn escaped_particle_is_pulled_back() {
    let (mut arena, _) = scripted_arena(11);
    let bounds = *arena.bounds();
    let tuning = arena.tuning().clone();
    let id = arena.particles()[0].id;

    let outside = Vec2::new(bounds.origin.x - tuning.containment_buffer - 1.0, bounds.center().y);
    arena.physics_mut().set_position(id, outside);
    let report = run_batch(&mut arena, Vec::new());
    assert_eq!(report.escaped, 1);

    let pos = arena.physics().position(id).unwrap();
    assert_eq!(pos.x, bounds.origin.x + tuning.containment_inset);
    assert!(bounds.rect().contains(pos));

    let vel = arena.physics().velocity(id).unwrap();
    assert!((vel.length() - tuning.recovery_speed).abs() < 1e-4);
    assert!(vel.x > 0.0, "heads back toward the center: {vel:?}");
}

#[test]
fn particle_just_inside_tolerance_is_left_alone() {
    let (mut arena, _) = scripted_arena(11);
    let bounds = *arena.bounds();
    let id = arena.particles()[0].id;

    let edge = Vec2::new(bounds.origin.x - arena.tuning().containment_buffer + 1.0, bounds.center().y);
    arena.physics_mut().set_position(id, edge);
    let report = run_batch(&mut arena, Vec::new());
    assert_eq!(report.escaped, 0);
    assert_eq!(arena.physics().position(id), Some(edge));
}

#[test]
fn stalled_particle_is_relaunched() {
    let (mut arena, _) = scripted_arena(13);
    let ids: Vec<_> = arena.particles().iter().take(3).map(|p| p.id).collect();
    arena.physics_mut().set_velocity(ids[0], Vec2::ZERO);
    arena.physics_mut().set_velocity(ids[1], Vec2::new(0.5, 0.0));

    let report = run_batch(&mut arena, Vec::new());
    assert_eq!(report.stalled, 2);

    let min_speed = arena.tuning().min_speed;
    for &id in &ids[..2] {
        let speed = arena.physics().speed(id).unwrap();
        assert!((speed - min_speed).abs() < 1e-4, "speed {speed}");
    }
    // Slow but moving keeps its heading
    let v = arena.physics().velocity(ids[1]).unwrap();
    assert!(v.x > 0.0 && v.y.abs() < 1e-6);
}

#[test]
fn stop_is_idempotent() {
    let (arena, _) = scripted_arena(2);
    let mut runner = Runner::new(arena);
    runner.frame(0.0);
    runner.frame(100.0);

    runner.stop();
    runner.stop();
    assert!(!runner.is_scheduled());
    assert!(!runner.frame(200.0));

    let arena = runner.arena();
    assert_eq!(arena.physics().stops, 1);
    let stops = arena
        .audio()
        .cues()
        .iter()
        .filter(|c| matches!(c, Cue::StopAmbience))
        .count();
    assert_eq!(stops, 1);
}

#[test]
fn speed_boost_fires_once_and_walls_fade() {
    let (mut arena, _) = scripted_arena(21);
    let tuning = arena.tuning().clone();
    let boosted_speed = tuning.launch_speed * tuning.boost_factor;

    let mut boosts = 0;
    while boosts == 0 {
        assert!(arena.elapsed() < tuning.boost_after_secs + 1.0, "boost never fired");
        if run_batch(&mut arena, Vec::new()).boosted {
            boosts += 1;
        }
    }
    assert!(arena.elapsed() > tuning.boost_after_secs);
    assert!(arena.boosted());

    for p in arena.particles() {
        let speed = arena.physics().speed(p.id).unwrap();
        assert!((speed - boosted_speed).abs() < 1e-4, "body {} at {speed}", p.id);
    }
    // Set to the boost value, then one decay step in the same tick
    for wall in arena.walls() {
        assert!((wall.impact - (tuning.boost_wall_impact - tuning.wall_impact_decay)).abs() < 1e-6);
    }

    for _ in 0..60 {
        assert!(!run_batch(&mut arena, Vec::new()).boosted);
    }
    assert!(arena.walls().iter().all(|w| w.impact == 0.0));
    for p in arena.particles() {
        let speed = arena.physics().speed(p.id).unwrap();
        assert!((speed - boosted_speed).abs() < 1e-4);
    }
}

#[test]
fn paused_arena_ignores_collisions() {
    let (mut arena, _) = scripted_arena(4);
    let rock = handles_of(&arena, Kind::Rock)[0];
    let scissors = handles_of(&arena, Kind::Scissors);

    arena.toggle_pause();
    arena.physics_mut().script(fan(rock, &scissors));
    for _ in 0..10 {
        arena.tick(SIM_DT);
    }
    assert_eq!(arena.physics().steps, 0);
    assert_eq!(arena.elapsed(), 0.0);
    assert_eq!(arena.scoreboard(), Counts::even(33));

    arena.toggle_pause();
    arena.tick(SIM_DT);
    assert_eq!(arena.scoreboard().rock, 66);
}

#[test]
fn restart_begins_a_fresh_match() {
    let (mut arena, fired) = scripted_arena(8);
    let scissors = handles_of(&arena, Kind::Scissors)[0];
    let papers = handles_of(&arena, Kind::Paper);
    run_batch(&mut arena, fan(scissors, &papers));
    let rock = handles_of(&arena, Kind::Rock)[0];
    let all_scissors = handles_of(&arena, Kind::Scissors);
    run_batch(&mut arena, fan(rock, &all_scissors));
    assert_eq!(arena.state(), MatchState::Over);

    arena.restart(9).unwrap();
    assert_eq!(arena.state(), MatchState::Running);
    assert_eq!(arena.winner(), None);
    assert_eq!(arena.scoreboard(), Counts::even(33));
    assert_counts_hold(&arena);

    // The new match can end too
    let scissors = handles_of(&arena, Kind::Scissors)[0];
    let papers = handles_of(&arena, Kind::Paper);
    run_batch(&mut arena, fan(scissors, &papers));
    let rock = handles_of(&arena, Kind::Rock)[0];
    let all_scissors = handles_of(&arena, Kind::Scissors);
    run_batch(&mut arena, fan(rock, &all_scissors));
    assert_eq!(fired.get(), 2);
}

#[test]
fn physics_failure_is_fatal() {
    let result = Arena::start(
        Tuning::default(),
        VIEWPORT,
        ScriptedPhysics::failing(),
        CueLog::new(),
        1,
        |_| {},
    );
    assert!(matches!(result, Err(ArenaError::Physics(_))));
}

#[test]
fn audio_failure_is_not_fatal() {
    let mut arena = Arena::start(
        Tuning::default(),
        VIEWPORT,
        ScriptedPhysics::new(),
        BrokenAudio::default(),
        1,
        |_| {},
    )
    .unwrap();

    let rock = handles_of(&arena, Kind::Rock)[0];
    let scissors = handles_of(&arena, Kind::Scissors);
    arena.physics_mut().script(fan(rock, &scissors));
    arena.tick(SIM_DT);
    assert_eq!(arena.scoreboard().rock, 66);
}

#[test]
fn bad_setup_is_rejected() {
    let zero = Arena::start(Tuning::default(), Vec2::new(100.0, 600.0), World::new(), NullAudio::default(), 1, |_| {});
    assert!(matches!(zero, Err(ArenaError::DegenerateArena { .. })));

    let tuning = Tuning {
        population: 0,
        ..Default::default()
    };
    let empty = Arena::start(tuning, VIEWPORT, World::new(), NullAudio::default(), 1, |_| {});
    assert!(matches!(empty, Err(ArenaError::InvalidPopulation(0))));
}

#[test]
fn snapshot_lists_every_body() {
    let (arena, _) = scripted_arena(6);
    let snapshot = arena.snapshot();
    assert_eq!(snapshot.particles.len(), 99);
    assert_eq!(snapshot.walls.len(), 4);
    assert!(snapshot.walls.iter().all(|w| w.impact == 0.0));

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["counts"]["rock"], 33);
    assert_eq!(json["state"], "Running");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn counts_hold_under_real_physics(seed in any::<u64>()) {
        let mut arena = Arena::start(
            Tuning::default(),
            VIEWPORT,
            World::new(),
            NullAudio::default(),
            seed,
            |_| {},
        )
        .unwrap();

        for _ in 0..240 {
            arena.tick(SIM_DT);
            prop_assert_eq!(arena.scoreboard().total(), 99);
        }
        assert_counts_hold(&arena);

        // Containment keeps everything near the arena
        let outer = arena.bounds().rect().expand(arena.tuning().containment_buffer);
        for p in arena.snapshot().particles {
            prop_assert!(outer.expand(arena.tuning().recovery_speed * 2.0).contains(p.position));
        }
    }
}
