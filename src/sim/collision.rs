//! Collision detection for axis-aligned boxes
//!
//! Every collider in the runner is an axis-aligned box, and every query the
//! player makes is a short axis-aligned ray. The slab test below handles both
//! exactly, including rays that start inside a box (reported at distance 0).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box (centre + half extents)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.center.x - self.half_extents.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.center.x + self.half_extents.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y + self.half_extents.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.center.y - self.half_extents.y
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        let d = (p - self.center).abs();
        d.x <= self.half_extents.x && d.y <= self.half_extents.y
    }
}

/// A finite ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec2,
    /// Unit direction
    pub dir: Vec2,
    pub length: f32,
}

impl Ray {
    pub fn new(origin: Vec2, dir: Vec2, length: f32) -> Self {
        Self {
            origin,
            dir: dir.normalize_or_zero(),
            length,
        }
    }

    /// Ray along `axis` with a signed length; a negative length flips the
    /// direction. Returns `None` for a zero-length ray.
    pub fn signed(origin: Vec2, axis: Vec2, signed_length: f32) -> Option<Self> {
        if signed_length == 0.0 || !signed_length.is_finite() {
            return None;
        }
        let dir = if signed_length > 0.0 { axis } else { -axis };
        Some(Self::new(origin, dir, signed_length.abs()))
    }
}

/// Result of a ray hitting a box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin (0 if the origin is inside)
    pub distance: f32,
    pub point: Vec2,
    /// Surface normal at the hit, pointing back toward the ray
    pub normal: Vec2,
}

/// Slab test between a ray and a box
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<RayHit> {
    if aabb.contains_point(ray.origin) {
        return Some(RayHit {
            distance: 0.0,
            point: ray.origin,
            normal: -ray.dir,
        });
    }

    let min = aabb.min();
    let max = aabb.max();
    let mut t_enter = 0.0_f32;
    let mut t_exit = ray.length;
    let mut normal = Vec2::ZERO;

    for axis in 0..2 {
        let o = ray.origin[axis];
        let d = ray.dir[axis];
        if d.abs() < f32::EPSILON {
            // Parallel to this slab: must already be inside it
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let mut t0 = (min[axis] - o) * inv;
        let mut t1 = (max[axis] - o) * inv;
        let mut n = Vec2::ZERO;
        n[axis] = -d.signum();
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }

        if t0 > t_enter {
            t_enter = t0;
            normal = n;
        }
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return None;
        }
    }

    Some(RayHit {
        distance: t_enter,
        point: ray.origin + ray.dir * t_enter,
        normal,
    })
}
