//! Physics collaborator seam
//!
//! The arena never integrates motion itself. It talks to a [`PhysicsEngine`]
//! that steps bodies under zero gravity with elastic contacts and queues the
//! pairs that started touching. [`World`] is a small reference engine so
//! the crate runs without an external one.

pub mod collision;
pub mod world;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Rect;

pub use collision::{CollisionResult, circle_circle_collision, circle_rect_collision, reflect_velocity};
pub use world::World;

/// Stable identity of a body inside the physics engine
pub type BodyHandle = u32;

/// Two bodies that started touching this step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollisionPair {
    pub a: BodyHandle,
    pub b: BodyHandle,
}

impl CollisionPair {
    pub fn new(a: BodyHandle, b: BodyHandle) -> Self {
        Self { a, b }
    }
}

#[derive(Debug, Error)]
pub enum PhysicsError {
    /// Engine could not be created or is missing
    #[error("physics engine unavailable: {0}")]
    Unavailable(String),
}

/// What the arena needs from a rigid-body engine.
///
/// Velocities are in units per step. Collision-start events are queued by
/// `step` and handed over in emission order by `drain_collision_starts`.
pub trait PhysicsEngine {
    /// Bring the engine up; failure aborts match setup
    fn init(&mut self) -> Result<(), PhysicsError>;

    /// Four static walls of `thickness` hugging `rect` from outside
    fn create_static_boundary(&mut self, rect: Rect, thickness: f32) -> Vec<(BodyHandle, Rect)>;

    /// Non-rotating, frictionless, perfectly elastic circle
    fn add_particle(&mut self, position: Vec2, velocity: Vec2, radius: f32) -> BodyHandle;

    /// Advance one step
    fn step(&mut self);

    /// Take the queued collision-start pairs, oldest first
    fn drain_collision_starts(&mut self) -> Vec<CollisionPair>;

    fn position(&self, body: BodyHandle) -> Option<Vec2>;

    fn velocity(&self, body: BodyHandle) -> Option<Vec2>;

    fn speed(&self, body: BodyHandle) -> Option<f32> {
        self.velocity(body).map(|v| v.length())
    }

    fn set_position(&mut self, body: BodyHandle, position: Vec2);

    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2);

    /// Halt stepping and clear the world; safe to call repeatedly
    fn stop(&mut self);
}
