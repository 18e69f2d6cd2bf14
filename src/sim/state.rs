//! Match state and core simulation types
//!
//! Positions and velocities belong to the physics collaborator; everything
//! here is the bookkeeping the arena owns on top of it.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::kind::Kind;
use crate::Rect;
use crate::error::ArenaError;
use crate::physics::BodyHandle;

/// Whether conversions still happen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchState {
    Running,
    /// One kind left; resolver and dominance detector are inert
    Over,
}

/// A typed, non-static body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub id: BodyHandle,
    pub kind: Kind,
    /// Match time (seconds) the particle was created
    pub spawned_at: f32,
}

/// A static boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    pub id: BodyHandle,
    pub rect: Rect,
    /// Feedback only, 0-1, decays every tick
    pub impact: f32,
}

impl Wall {
    /// Linear decay toward zero
    pub fn decay(&mut self, rate: f32) {
        if self.impact > 0.0 {
            self.impact = (self.impact - rate).max(0.0);
        }
    }
}

/// Live particle count per kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub rock: u32,
    pub paper: u32,
    pub scissors: u32,
}

impl Counts {
    /// Even split of `per_kind` each
    pub fn even(per_kind: u32) -> Self {
        Self {
            rock: per_kind,
            paper: per_kind,
            scissors: per_kind,
        }
    }

    pub fn get(&self, kind: Kind) -> u32 {
        match kind {
            Kind::Rock => self.rock,
            Kind::Paper => self.paper,
            Kind::Scissors => self.scissors,
        }
    }

    fn get_mut(&mut self, kind: Kind) -> &mut u32 {
        match kind {
            Kind::Rock => &mut self.rock,
            Kind::Paper => &mut self.paper,
            Kind::Scissors => &mut self.scissors,
        }
    }

    pub fn total(&self) -> u32 {
        self.rock + self.paper + self.scissors
    }

    /// Move one individual from `from` to `to`; the total never changes
    pub fn transfer(&mut self, from: Kind, to: Kind) {
        if from == to {
            return;
        }
        let source = self.get_mut(from);
        debug_assert!(*source > 0, "transfer from empty {from:?}");
        *source = source.saturating_sub(1);
        *self.get_mut(to) += 1;
    }

    /// Kinds with at least one member, in fixed order
    pub fn survivors(&self) -> impl Iterator<Item = Kind> + '_ {
        Kind::ALL.into_iter().filter(|k| self.get(*k) > 0)
    }

    /// The only kind left, if exactly one remains
    pub fn sole_survivor(&self) -> Option<Kind> {
        let mut survivors = self.survivors();
        match (survivors.next(), survivors.next()) {
            (Some(kind), None) => Some(kind),
            _ => None,
        }
    }

    /// Share of the total held by `kind` (0 when empty)
    pub fn share(&self, kind: Kind) -> f32 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.get(kind) as f32 / total as f32
        }
    }
}

/// Immutable playing square, fixed at match start
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaBounds {
    pub origin: Vec2,
    pub size: f32,
}

impl ArenaBounds {
    pub fn new(origin: Vec2, size: f32) -> Self {
        Self { origin, size }
    }

    /// Largest square centered in `viewport` leaving `margin` on the short side
    pub fn from_viewport(viewport: Vec2, margin: f32) -> Result<Self, ArenaError> {
        let size = viewport.x.min(viewport.y) - margin * 2.0;
        if !size.is_finite() || size <= 0.0 {
            return Err(ArenaError::DegenerateArena {
                width: viewport.x,
                height: viewport.y,
                size,
            });
        }
        let origin = (viewport - Vec2::splat(size)) / 2.0;
        Ok(Self { origin, size })
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.origin.x, self.origin.y, self.size, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.origin + Vec2::splat(self.size / 2.0)
    }
}

/// Particles and walls of one match, indexed by physics handle
#[derive(Debug, Clone, Default)]
pub struct BodyRegistry {
    particles: Vec<Particle>,
    walls: Vec<Wall>,
    index: HashMap<BodyHandle, usize>,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_particle(&mut self, particle: Particle) {
        self.index.insert(particle.id, self.particles.len());
        self.particles.push(particle);
    }

    pub fn add_wall(&mut self, wall: Wall) {
        self.walls.push(wall);
    }

    /// Look up a particle; walls and unknown handles yield `None`
    pub fn particle(&self, id: BodyHandle) -> Option<&Particle> {
        self.index.get(&id).map(|&i| &self.particles[i])
    }

    pub fn particle_mut(&mut self, id: BodyHandle) -> Option<&mut Particle> {
        self.index.get(&id).map(|&i| &mut self.particles[i])
    }

    /// Particles in spawn order
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn walls_mut(&mut self) -> &mut [Wall] {
        &mut self.walls
    }

    /// Recount kinds from scratch (used to verify the running tally)
    pub fn tally(&self) -> Counts {
        let mut counts = Counts::default();
        for p in &self.particles {
            *counts.get_mut(p.kind) += 1;
        }
        counts
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.walls.clear();
        self.index.clear();
    }
}
