//! Contact tests for circles against circles and axis-aligned walls

use glam::Vec2;

use crate::Rect;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Contact point (if hit)
    pub point: Vec2,
    /// Surface normal at contact, pointing toward the first body
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Overlap between circle `a` and circle `b`.
///
/// The normal points from `b` toward `a`. Coincident centers fall back to +x.
pub fn circle_circle_collision(pos_a: Vec2, radius_a: f32, pos_b: Vec2, radius_b: f32) -> CollisionResult {
    let delta = pos_a - pos_b;
    let dist = delta.length();
    let reach = radius_a + radius_b;

    if dist >= reach {
        return CollisionResult::miss();
    }

    let normal = if dist > f32::EPSILON { delta / dist } else { Vec2::X };
    CollisionResult {
        hit: true,
        point: pos_b + normal * radius_b,
        normal,
        penetration: reach - dist,
    }
}

/// Overlap between a circle and a solid rectangle.
///
/// The normal points out of the rectangle toward the circle center.
pub fn circle_rect_collision(pos: Vec2, radius: f32, rect: &Rect) -> CollisionResult {
    let closest = rect.clamp_point(pos);
    let delta = pos - closest;
    let dist = delta.length();

    if dist > f32::EPSILON {
        if dist >= radius {
            return CollisionResult::miss();
        }
        return CollisionResult {
            hit: true,
            point: closest,
            normal: delta / dist,
            penetration: radius - dist,
        };
    }

    // Center inside the rectangle: leave through the nearest face
    let (min, max) = (rect.min(), rect.max());
    let faces = [
        (pos.x - min.x, Vec2::NEG_X, Vec2::new(min.x, pos.y)),
        (max.x - pos.x, Vec2::X, Vec2::new(max.x, pos.y)),
        (pos.y - min.y, Vec2::NEG_Y, Vec2::new(pos.x, min.y)),
        (max.y - pos.y, Vec2::Y, Vec2::new(pos.x, max.y)),
    ];
    let (depth, normal, point) = faces
        .into_iter()
        .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
        .unwrap_or((0.0, Vec2::Y, pos));

    CollisionResult {
        hit: true,
        point,
        normal,
        penetration: depth + radius,
    }
}

/// Reflect velocity off a surface with given normal
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}
