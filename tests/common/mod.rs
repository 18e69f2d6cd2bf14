//! Shared doubles for arena integration tests.

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use glam::Vec2;

use rps_arena::audio::AudioError;
use rps_arena::{
    Arena, AudioSink, BodyHandle, CollisionPair, CueLog, Kind, PhysicsEngine, PhysicsError, Rect,
    Tuning,
};

/// Physics double: bodies never move on their own and collision-start
/// batches are scripted, one batch per step.
#[derive(Debug, Default)]
pub struct ScriptedPhysics {
    bodies: BTreeMap<BodyHandle, (Vec2, Vec2)>,
    next: BodyHandle,
    script: VecDeque<Vec<CollisionPair>>,
    pending: Vec<CollisionPair>,
    fail_init: bool,
    pub steps: u32,
    pub stops: u32,
}

impl ScriptedPhysics {
    pub fn new() -> Self {
        Self {
            next: 1,
            ..Default::default()
        }
    }

    /// Engine whose `init` always fails
    pub fn failing() -> Self {
        Self {
            fail_init: true,
            ..Self::new()
        }
    }

    /// Queue a batch to be emitted by a future step
    pub fn script(&mut self, batch: Vec<CollisionPair>) {
        self.script.push_back(batch);
    }
}

impl PhysicsEngine for ScriptedPhysics {
    fn init(&mut self) -> Result<(), PhysicsError> {
        if self.fail_init {
            return Err(PhysicsError::Unavailable("scripted failure".into()));
        }
        Ok(())
    }

    fn create_static_boundary(&mut self, rect: Rect, thickness: f32) -> Vec<(BodyHandle, Rect)> {
        let t = thickness;
        [
            Rect::new(rect.x - t, rect.y - t, rect.w + t * 2.0, t),
            Rect::new(rect.x - t, rect.y + rect.h, rect.w + t * 2.0, t),
            Rect::new(rect.x - t, rect.y - t, t, rect.h + t * 2.0),
            Rect::new(rect.x + rect.w, rect.y - t, t, rect.h + t * 2.0),
        ]
        .into_iter()
        .map(|wall| {
            let id = self.add_particle(wall.center(), Vec2::ZERO, 0.0);
            (id, wall)
        })
        .collect()
    }

    fn add_particle(&mut self, position: Vec2, velocity: Vec2, _radius: f32) -> BodyHandle {
        let id = self.next;
        self.next += 1;
        self.bodies.insert(id, (position, velocity));
        id
    }

    fn step(&mut self) {
        self.steps += 1;
        if let Some(batch) = self.script.pop_front() {
            self.pending.extend(batch);
        }
    }

    fn drain_collision_starts(&mut self) -> Vec<CollisionPair> {
        std::mem::take(&mut self.pending)
    }

    fn position(&self, body: BodyHandle) -> Option<Vec2> {
        self.bodies.get(&body).map(|b| b.0)
    }

    fn velocity(&self, body: BodyHandle) -> Option<Vec2> {
        self.bodies.get(&body).map(|b| b.1)
    }

    fn set_position(&mut self, body: BodyHandle, position: Vec2) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.0 = position;
        }
    }

    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.1 = velocity;
        }
    }

    fn stop(&mut self) {
        self.stops += 1;
        self.bodies.clear();
        self.script.clear();
        self.pending.clear();
    }
}

/// Audio engine that refuses to start
#[derive(Debug, Default)]
pub struct BrokenAudio {
    pub calls: u32,
}

impl AudioSink for BrokenAudio {
    fn init(&mut self) -> Result<(), AudioError> {
        Err(AudioError::Unavailable("no device".into()))
    }
    fn resume_on_user_gesture(&mut self) {}
    fn play_spawn_cue(&mut self, _kind: Kind) {
        self.calls += 1;
    }
    fn play_transform_cue(&mut self, _from: Kind, _to: Kind) {
        self.calls += 1;
    }
    fn start_dominant_ambience(&mut self, _kind: Kind) {}
    fn stop_ambience(&mut self) {}
    fn set_muted(&mut self, _muted: bool) {}
    fn is_muted(&self) -> bool {
        true
    }
}

/// 500 x 500 arena once the 50 unit margin is taken off
pub const VIEWPORT: Vec2 = Vec2::new(600.0, 600.0);

pub type TestArena = Arena<ScriptedPhysics, CueLog>;

/// Scripted arena plus a counter of game-over signals
pub fn scripted_arena(seed: u64) -> (TestArena, Rc<Cell<u32>>) {
    let fired = Rc::new(Cell::new(0));
    let hook = fired.clone();
    let arena = Arena::start(
        Tuning::default(),
        VIEWPORT,
        ScriptedPhysics::new(),
        CueLog::new(),
        seed,
        move |_| hook.set(hook.get() + 1),
    )
    .expect("arena starts");
    (arena, fired)
}

/// Handles of every particle currently of `kind`, in spawn order
pub fn handles_of<P: PhysicsEngine, A: AudioSink>(arena: &Arena<P, A>, kind: Kind) -> Vec<BodyHandle> {
    arena
        .particles()
        .iter()
        .filter(|p| p.kind == kind)
        .map(|p| p.id)
        .collect()
}

/// `attacker` against each of `targets`, in order
pub fn fan(attacker: BodyHandle, targets: &[BodyHandle]) -> Vec<CollisionPair> {
    targets
        .iter()
        .map(|&t| CollisionPair::new(attacker, t))
        .collect()
}

/// Script one batch, tick once, and check the count invariant
pub fn run_batch(arena: &mut TestArena, batch: Vec<CollisionPair>) -> rps_arena::sim::TickReport {
    arena.physics_mut().script(batch);
    let report = arena.tick(rps_arena::consts::SIM_DT);
    assert_counts_hold(arena);
    report
}

pub fn assert_counts_hold<P: PhysicsEngine, A: AudioSink>(arena: &Arena<P, A>) {
    let counts = arena.scoreboard();
    assert_eq!(counts.total(), arena.tuning().population, "counts drifted: {counts:?}");
    for kind in Kind::ALL {
        assert_eq!(counts.get(kind) as usize, handles_of(arena, kind).len(), "{kind} count");
    }
}
