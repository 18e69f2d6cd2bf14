//! Per-tick repair of physically degenerate states
//!
//! The physics collaborator's walls are the primary containment; this pass is
//! the safety net for stalled bodies and bodies that tunnel out.

use glam::Vec2;
use rand::Rng;

use super::state::{ArenaBounds, BodyRegistry};
use crate::physics::PhysicsEngine;
use crate::random_direction;
use crate::tuning::Tuning;

/// What the pass changed this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    pub stalled: u32,
    pub escaped: u32,
}

/// Velocity a too-slow body should have, or `None` if it is fast enough.
///
/// Direction is kept when there is one; a body at (near) rest gets a random
/// heading. The result always has length exactly `min_speed`.
pub fn enforce_min_speed<R: Rng>(
    velocity: Vec2,
    min_speed: f32,
    stall_epsilon: f32,
    rng: &mut R,
) -> Option<Vec2> {
    let speed = velocity.length();
    if speed >= min_speed {
        return None;
    }
    if speed < stall_epsilon {
        Some(random_direction(rng, min_speed))
    } else {
        Some(velocity / speed * min_speed)
    }
}

/// New (position, velocity) for a body outside the tolerance rectangle.
///
/// Each offending axis is pulled `inset` inside the arena edge it crossed;
/// the body then heads for the arena center at `recovery_speed`.
pub fn contain(
    position: Vec2,
    bounds: &ArenaBounds,
    buffer: f32,
    inset: f32,
    recovery_speed: f32,
) -> Option<(Vec2, Vec2)> {
    let outer = bounds.rect().expand(buffer);
    let (min, max) = (outer.min(), outer.max());
    let (lo, hi) = (bounds.origin, bounds.origin + Vec2::splat(bounds.size));

    let mut target = position;
    let mut escaped = false;

    if position.x < min.x {
        target.x = lo.x + inset;
        escaped = true;
    }
    if position.x > max.x {
        target.x = hi.x - inset;
        escaped = true;
    }
    if position.y < min.y {
        target.y = lo.y + inset;
        escaped = true;
    }
    if position.y > max.y {
        target.y = hi.y - inset;
        escaped = true;
    }

    if !escaped {
        return None;
    }

    let heading = (bounds.center() - target).normalize_or_zero();
    Some((target, heading * recovery_speed))
}

/// Latch for the one-shot speed boost
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpeedBoost {
    fired: bool,
}

impl SpeedBoost {
    /// True exactly once: the first call where `elapsed` exceeds `after`
    pub fn poll(&mut self, elapsed: f32, after: f32) -> bool {
        if self.fired || elapsed <= after {
            return false;
        }
        self.fired = true;
        true
    }

    pub fn fired(&self) -> bool {
        self.fired
    }
}

/// Multiply every particle's velocity and flash the walls
pub fn apply_boost<P: PhysicsEngine + ?Sized>(
    physics: &mut P,
    registry: &mut BodyRegistry,
    tuning: &Tuning,
) {
    for particle in registry.particles() {
        if let Some(v) = physics.velocity(particle.id) {
            physics.set_velocity(particle.id, v * tuning.boost_factor);
        }
    }
    for wall in registry.walls_mut() {
        wall.impact = tuning.boost_wall_impact;
    }
}

/// Anti-stall then containment over every particle, then wall decay
pub fn corrective_pass<P: PhysicsEngine + ?Sized, R: Rng>(
    physics: &mut P,
    registry: &mut BodyRegistry,
    bounds: &ArenaBounds,
    tuning: &Tuning,
    rng: &mut R,
) -> PassReport {
    let mut report = PassReport::default();

    for particle in registry.particles() {
        let id = particle.id;

        if let Some(v) = physics.velocity(id) {
            if let Some(fixed) = enforce_min_speed(v, tuning.min_speed, tuning.stall_epsilon, rng) {
                physics.set_velocity(id, fixed);
                report.stalled += 1;
            }
        }

        if let Some(p) = physics.position(id) {
            if let Some((pos, vel)) = contain(
                p,
                bounds,
                tuning.containment_buffer,
                tuning.containment_inset,
                tuning.recovery_speed,
            ) {
                log::debug!("Body {} escaped at ({:.1}, {:.1}), pulled back", id, p.x, p.y);
                physics.set_position(id, pos);
                physics.set_velocity(id, vel);
                report.escaped += 1;
            }
        }
    }

    for wall in registry.walls_mut() {
        wall.decay(tuning.wall_impact_decay);
    }

    report
}
