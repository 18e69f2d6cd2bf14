//! Arena controller
//!
//! One `Arena` is one match. It owns the body registry, counts and latches,
//! and drives the injected physics and audio collaborators. Nothing here is
//! global; starting a new match means building a new arena (or `restart`).

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::corrective::SpeedBoost;
use super::dominance::DominanceTracker;
use super::kind::Kind;
use super::spawn::{SpawnCue, plan_spawns, spawn_cues};
use super::state::{ArenaBounds, BodyRegistry, Counts, MatchState, Particle, Wall};
use crate::Rect;
use crate::audio::AudioSink;
use crate::error::ArenaError;
use crate::physics::{BodyHandle, PhysicsEngine};
use crate::tuning::Tuning;

/// Called once with the winning kind
pub type GameOverHook = Box<dyn FnMut(Kind)>;

/// Read-only view of a particle for renderers
#[derive(Debug, Clone, Serialize)]
pub struct ParticleView {
    pub id: BodyHandle,
    pub kind: Kind,
    pub position: Vec2,
    pub spawned_at: f32,
}

/// Read-only view of a wall for renderers
#[derive(Debug, Clone, Serialize)]
pub struct WallView {
    pub id: BodyHandle,
    pub rect: Rect,
    pub impact: f32,
}

/// Everything a renderer or HUD needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct ArenaSnapshot {
    pub elapsed: f32,
    pub state: MatchState,
    pub paused: bool,
    pub winner: Option<Kind>,
    pub counts: Counts,
    pub bounds: ArenaBounds,
    pub particles: Vec<ParticleView>,
    pub walls: Vec<WallView>,
}

pub struct Arena<P: PhysicsEngine, A: AudioSink> {
    pub(super) tuning: Tuning,
    pub(super) viewport: Vec2,
    pub(super) bounds: ArenaBounds,
    pub(super) physics: P,
    pub(super) audio: A,
    pub(super) rng: Pcg32,
    pub(super) registry: BodyRegistry,
    pub(super) counts: Counts,
    pub(super) state: MatchState,
    pub(super) dominance: DominanceTracker,
    pub(super) boost: SpeedBoost,
    pub(super) spawn_cues: VecDeque<SpawnCue>,
    /// Match time in seconds (does not advance while paused)
    pub(super) elapsed: f32,
    pub(super) time_ticks: u64,
    pub(super) paused: bool,
    /// False once stopped; a stopped arena ignores ticks
    pub(super) active: bool,
    pub(super) winner: Option<Kind>,
    pub(super) on_game_over: Option<GameOverHook>,
}

impl<P: PhysicsEngine, A: AudioSink> Arena<P, A> {
    /// Validate the setup, bring up collaborators and spawn the population.
    ///
    /// Configuration problems and a failing physics engine abort; a failing
    /// audio engine only mutes the match.
    pub fn start(
        tuning: Tuning,
        viewport: Vec2,
        physics: P,
        audio: A,
        seed: u64,
        on_game_over: impl FnMut(Kind) + 'static,
    ) -> Result<Self, ArenaError> {
        tuning.validate()?;
        let bounds = ArenaBounds::from_viewport(viewport, tuning.viewport_margin)?;

        // Spawn and containment insets must leave room inside the square
        let needed = tuning.spawn_padding.max(tuning.containment_inset) * 2.0;
        if bounds.size <= needed {
            return Err(ArenaError::DegenerateArena {
                width: viewport.x,
                height: viewport.y,
                size: bounds.size,
            });
        }

        let mut arena = Self {
            dominance: DominanceTracker::new(tuning.dominance_threshold),
            tuning,
            viewport,
            bounds,
            physics,
            audio,
            rng: Pcg32::seed_from_u64(seed),
            registry: BodyRegistry::new(),
            counts: Counts::default(),
            state: MatchState::Running,
            boost: SpeedBoost::default(),
            spawn_cues: VecDeque::new(),
            elapsed: 0.0,
            time_ticks: 0,
            paused: false,
            active: false,
            winner: None,
            on_game_over: Some(Box::new(on_game_over)),
        };
        arena.setup()?;
        log::info!("Match started with seed {}", seed);
        Ok(arena)
    }

    /// Fresh match state on top of the current tuning, bounds and collaborators
    fn setup(&mut self) -> Result<(), ArenaError> {
        self.physics.init()?;
        if let Err(e) = self.audio.init() {
            log::warn!("{e} - continuing without sound");
        }

        self.registry.clear();
        self.state = MatchState::Running;
        self.dominance.reset();
        self.boost = SpeedBoost::default();
        self.elapsed = 0.0;
        self.time_ticks = 0;
        self.paused = false;
        self.winner = None;

        for (id, rect) in self
            .physics
            .create_static_boundary(self.bounds.rect(), self.tuning.wall_thickness)
        {
            self.registry.add_wall(Wall {
                id,
                rect,
                impact: 0.0,
            });
        }

        let plans = plan_spawns(&self.tuning, &self.bounds, &mut self.rng);
        for plan in &plans {
            let id = self
                .physics
                .add_particle(plan.position, plan.velocity, self.tuning.particle_radius);
            self.registry.add_particle(Particle {
                id,
                kind: plan.kind,
                spawned_at: self.elapsed,
            });
        }
        self.counts = Counts::even(self.tuning.per_kind());
        self.spawn_cues = spawn_cues(&self.tuning, &plans, self.elapsed);
        self.active = true;

        log::info!(
            "Spawned {} particles in a {:.0}x{:.0} arena at ({:.0}, {:.0})",
            plans.len(),
            self.bounds.size,
            self.bounds.size,
            self.bounds.origin.x,
            self.bounds.origin.y
        );
        Ok(())
    }

    /// Halt physics and silence ambience. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.physics.stop();
        self.audio.stop_ambience();
        self.dominance.reset();
        self.spawn_cues.clear();
        log::info!("Match stopped after {:.1}s", self.elapsed);
    }

    /// Stop and start again with the same tuning, viewport and collaborators
    pub fn restart(&mut self, seed: u64) -> Result<(), ArenaError> {
        self.stop();
        self.rng = Pcg32::seed_from_u64(seed);
        self.setup()?;
        log::info!("Match restarted with seed {}", seed);
        Ok(())
    }

    /// Toggle pause; returns the new paused state
    pub fn toggle_pause(&mut self) -> bool {
        if self.active {
            self.paused = !self.paused;
            log::info!("{}", if self.paused { "Paused" } else { "Resumed" });
        }
        self.paused
    }

    /// Toggle audio mute; returns the new muted state
    pub fn toggle_mute(&mut self) -> bool {
        let muted = !self.audio.is_muted();
        self.audio.set_muted(muted);
        muted
    }

    /// Forward a user gesture to the audio collaborator
    pub fn resume_audio(&mut self) {
        self.audio.resume_on_user_gesture();
    }

    /// Current per-kind scoreboard
    pub fn scoreboard(&self) -> Counts {
        self.counts
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    pub fn winner(&self) -> Option<Kind> {
        self.winner
    }

    /// Ambience currently requested (last dominant kind)
    pub fn dominant(&self) -> Option<Kind> {
        self.dominance.current()
    }

    pub fn bounds(&self) -> &ArenaBounds {
        &self.bounds
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// False once `stop` has run
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn boosted(&self) -> bool {
        self.boost.fired()
    }

    pub fn particles(&self) -> &[Particle] {
        self.registry.particles()
    }

    pub fn walls(&self) -> &[Wall] {
        self.registry.walls()
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut P {
        &mut self.physics
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    /// Positions come from the physics collaborator at call time
    pub fn snapshot(&self) -> ArenaSnapshot {
        let particles = self
            .registry
            .particles()
            .iter()
            .filter_map(|p| {
                Some(ParticleView {
                    id: p.id,
                    kind: p.kind,
                    position: self.physics.position(p.id)?,
                    spawned_at: p.spawned_at,
                })
            })
            .collect();

        let walls = self
            .registry
            .walls()
            .iter()
            .map(|w| WallView {
                id: w.id,
                rect: w.rect,
                impact: w.impact,
            })
            .collect();

        ArenaSnapshot {
            elapsed: self.elapsed,
            state: self.state,
            paused: self.paused,
            winner: self.winner,
            counts: self.counts,
            bounds: self.bounds,
            particles,
            walls,
        }
    }
}
