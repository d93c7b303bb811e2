//! Obstacle debris
//!
//! Cosmetic pieces flung forward when the player smashes an obstacle. They
//! bounce off segments but nothing collides with them, and they live in world
//! space: the scrolling terrain slides underneath.

use glam::Vec2;
use rand::Rng;

use super::collision::{Aabb, Ray};
use super::entity::{Arena, ColliderTag, Debris, EntityId, EntityKind};
use crate::sample_range;
use crate::screen::ScreenBounds;
use crate::tuning::DebrisTuning;

/// Spawn `tuning.pieces` fragments at `origin`, each thrown up and forward at a
/// random angle with `speed`.
pub fn spawn_burst<R: Rng + ?Sized>(
    arena: &mut Arena,
    rng: &mut R,
    tuning: &DebrisTuning,
    origin: Vec2,
    speed: f32,
) -> Vec<EntityId> {
    (0..tuning.pieces)
        .map(|_| {
            let (deg, _) = sample_range(rng, tuning.min_angle_deg, tuning.max_angle_deg);
            let angle = deg.to_radians();
            let vel = Vec2::new(angle.cos(), angle.sin()) * speed;
            arena.spawn(
                Aabb::new(origin, Vec2::splat(tuning.half_size)),
                EntityKind::Debris(Debris {
                    vel,
                    age: 0.0,
                    rotation: 0.0,
                }),
            )
        })
        .collect()
}

/// Advance every piece one tick. Returns the IDs that expired.
pub fn step(
    arena: &mut Arena,
    tuning: &DebrisTuning,
    screen: &ScreenBounds,
    dt: f32,
) -> Vec<EntityId> {
    let pieces: Vec<(EntityId, Aabb, Debris)> = arena
        .iter()
        .filter_map(|e| match e.kind {
            EntityKind::Debris(d) => Some((e.id, e.aabb, d)),
            _ => None,
        })
        .collect();

    let mut expired = Vec::new();
    for (id, mut aabb, mut d) in pieces {
        d.age += dt;
        d.vel.x *= tuning.horizontal_damping;
        d.vel.y -= tuning.gravity * dt;

        let half = aabb.half_extents;
        if let Some(ray) = Ray::signed(aabb.center, Vec2::Y, d.vel.y * dt)
            && ray.dir.y < 0.0
            && let Some((seg, _, _)) = arena.raycast(&ray, |t| t == ColliderTag::Segment)
            && let Some(top) = arena.get(seg).map(|e| e.aabb.top())
        {
            aabb.center.y = top + half.y;
            d.vel.y = -d.vel.y * tuning.bounce_damping;
        }

        if let Some(ray) = Ray::signed(aabb.center, Vec2::X, d.vel.x * dt)
            && ray.dir.x > 0.0
            && let Some((seg, _, _)) = arena.raycast(&ray, |t| t == ColliderTag::Segment)
            && let Some(left) = arena.get(seg).map(|e| e.aabb.left())
        {
            aabb.center.x = left - half.x;
            d.vel.x = -d.vel.x * tuning.bounce_damping;
        }

        aabb.center += d.vel * dt;
        d.rotation += tuning.spin_deg.to_radians();

        if aabb.center.y <= screen.bottom - half.y || d.age >= tuning.lifetime {
            expired.push(id);
            continue;
        }
        if let Some(e) = arena.get_mut(id) {
            e.aabb = aabb;
            e.kind = EntityKind::Debris(d);
        }
    }

    for id in &expired {
        arena.remove(*id);
    }
    expired
}
