//! Reference rigid-body world
//!
//! Circles and static rectangles only: zero gravity, no friction, no spin,
//! perfectly elastic equal-mass contacts. Pairs are tested in handle order so
//! the collision-start queue is deterministic.

use std::collections::HashSet;

use glam::Vec2;

use super::collision::{circle_circle_collision, circle_rect_collision, reflect_velocity};
use super::{BodyHandle, CollisionPair, PhysicsEngine, PhysicsError};
use crate::Rect;

#[derive(Debug, Clone, Copy)]
enum Shape {
    Circle { radius: f32 },
    Wall { rect: Rect },
}

#[derive(Debug, Clone)]
struct Body {
    handle: BodyHandle,
    pos: Vec2,
    vel: Vec2,
    shape: Shape,
}

#[derive(Debug, Default)]
pub struct World {
    /// Sorted by handle (handles only ever increase)
    bodies: Vec<Body>,
    next_handle: BodyHandle,
    /// Pairs touching after the last step
    contacts: HashSet<(BodyHandle, BodyHandle)>,
    pending: Vec<CollisionPair>,
    running: bool,
}

impl World {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            ..Default::default()
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies
            .binary_search_by_key(&handle, |b| b.handle)
            .ok()
            .map(|i| &self.bodies[i])
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies
            .binary_search_by_key(&handle, |b| b.handle)
            .ok()
            .map(|i| &mut self.bodies[i])
    }

    fn insert(&mut self, pos: Vec2, vel: Vec2, shape: Shape) -> BodyHandle {
        let handle = self.next_handle.max(1);
        self.next_handle = handle + 1;
        self.bodies.push(Body {
            handle,
            pos,
            vel,
            shape,
        });
        handle
    }
}

/// Exchange normal velocity components of two equal-mass circles
fn resolve_circles(a: &mut Body, radius_a: f32, b: &mut Body, radius_b: f32) -> bool {
    let hit = circle_circle_collision(a.pos, radius_a, b.pos, radius_b);
    if !hit.hit {
        return false;
    }

    let n = hit.normal;
    let closing = (a.vel - b.vel).dot(n);
    if closing < 0.0 {
        let impulse = n * closing;
        a.vel -= impulse;
        b.vel += impulse;
    }

    let push = n * (hit.penetration / 2.0);
    a.pos += push;
    b.pos -= push;
    true
}

/// Bounce a circle off a static rectangle
fn resolve_wall(body: &mut Body, radius: f32, rect: &Rect) -> bool {
    let hit = circle_rect_collision(body.pos, radius, rect);
    if !hit.hit {
        return false;
    }

    if body.vel.dot(hit.normal) < 0.0 {
        body.vel = reflect_velocity(body.vel, hit.normal);
    }
    body.pos += hit.normal * hit.penetration;
    true
}

impl PhysicsEngine for World {
    fn init(&mut self) -> Result<(), PhysicsError> {
        if self.running {
            log::debug!("Physics world already running");
        }
        self.running = true;
        Ok(())
    }

    fn create_static_boundary(&mut self, rect: Rect, thickness: f32) -> Vec<(BodyHandle, Rect)> {
        let t = thickness;
        let walls = [
            // Top
            Rect::new(rect.x - t, rect.y - t, rect.w + t * 2.0, t),
            // Bottom
            Rect::new(rect.x - t, rect.y + rect.h, rect.w + t * 2.0, t),
            // Left
            Rect::new(rect.x - t, rect.y - t, t, rect.h + t * 2.0),
            // Right
            Rect::new(rect.x + rect.w, rect.y - t, t, rect.h + t * 2.0),
        ];

        walls
            .into_iter()
            .map(|wall| {
                let handle = self.insert(wall.center(), Vec2::ZERO, Shape::Wall { rect: wall });
                (handle, wall)
            })
            .collect()
    }

    fn add_particle(&mut self, position: Vec2, velocity: Vec2, radius: f32) -> BodyHandle {
        self.insert(position, velocity, Shape::Circle { radius })
    }

    fn step(&mut self) {
        if !self.running {
            return;
        }

        for body in &mut self.bodies {
            if matches!(body.shape, Shape::Circle { .. }) {
                body.pos += body.vel;
            }
        }

        let mut touching = HashSet::with_capacity(self.contacts.len());
        let n = self.bodies.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (left, right) = self.bodies.split_at_mut(j);
                let a = &mut left[i];
                let b = &mut right[0];

                let hit = match (a.shape, b.shape) {
                    (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
                        resolve_circles(a, ra, b, rb)
                    }
                    (Shape::Circle { radius }, Shape::Wall { rect }) => resolve_wall(a, radius, &rect),
                    (Shape::Wall { rect }, Shape::Circle { radius }) => resolve_wall(b, radius, &rect),
                    (Shape::Wall { .. }, Shape::Wall { .. }) => false,
                };

                if hit {
                    let key = (a.handle, b.handle);
                    if !self.contacts.contains(&key) {
                        self.pending.push(CollisionPair::new(a.handle, b.handle));
                    }
                    touching.insert(key);
                }
            }
        }
        self.contacts = touching;
    }

    fn drain_collision_starts(&mut self) -> Vec<CollisionPair> {
        std::mem::take(&mut self.pending)
    }

    fn position(&self, body: BodyHandle) -> Option<Vec2> {
        self.body(body).map(|b| b.pos)
    }

    fn velocity(&self, body: BodyHandle) -> Option<Vec2> {
        self.body(body).map(|b| b.vel)
    }

    fn set_position(&mut self, body: BodyHandle, position: Vec2) {
        if let Some(b) = self.body_mut(body) {
            b.pos = position;
        }
    }

    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        if let Some(b) = self.body_mut(body) {
            if matches!(b.shape, Shape::Circle { .. }) {
                b.vel = velocity;
            }
        }
    }

    fn stop(&mut self) {
        self.running = false;
        self.bodies.clear();
        self.contacts.clear();
        self.pending.clear();
    }
}
