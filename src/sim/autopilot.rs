//! Demo-mode autopilot
//!
//! Looks a short distance ahead of the player and decides which buttons to
//! press this tick. Stateless and deterministic: the same session always
//! produces the same input.

use glam::Vec2;

use super::collision::Ray;
use super::entity::{Arena, ColliderTag, EntityKind};
use super::player::{Player, PlayerState};
use super::tick::TickInput;
use crate::tuning::PlayerTuning;

/// Seconds of travel to probe for missing ground
const EDGE_LOOKAHEAD: f32 = 0.04;
/// Seconds of travel within which an obstacle or wall triggers a jump
const BLOCKER_LOOKAHEAD: f32 = 0.25;
/// Seconds of travel within which a light gate triggers a colour switch
const GATE_LOOKAHEAD: f32 = 0.5;

/// Inputs the autopilot would press this tick
pub fn plan(arena: &Arena, player: &Player, tuning: &PlayerTuning) -> TickInput {
    let mut input = TickInput::default();
    if !player.started || !player.is_alive() {
        return input;
    }

    if gate_mismatch_ahead(arena, player) && player.can_change_colour() {
        input.colour_pressed = true;
    }

    let can_jump = player.grounded && player.state == PlayerState::Running;
    if can_jump && (edge_ahead(arena, player, tuning) || blocker_ahead(arena, player)) {
        input.jump_pressed = true;
    }

    // Hold through the rise, let go once falling
    if player.holding_jump && player.vel.y < 0.0 {
        input.jump_released = true;
    }

    input
}

/// No ground under the leading foot a moment from now
fn edge_ahead(arena: &Arena, player: &Player, tuning: &PlayerTuning) -> bool {
    let x = player.pos.x + tuning.ground_ray_offset + player.vel.x * EDGE_LOOKAHEAD;
    let ray = Ray::new(Vec2::new(x, player.pos.y), Vec2::NEG_Y, player.half_height() + 0.5);
    arena
        .raycast(&ray, |t| t == ColliderTag::Segment)
        .is_none()
}

/// An obstacle, or a wall taller than the player's feet, coming up
fn blocker_ahead(arena: &Arena, player: &Player) -> bool {
    let near = player.pos.x;
    let far = near + player.half_width() + player.vel.x * BLOCKER_LOOKAHEAD + 1.0;
    arena.iter().any(|e| {
        let left = e.aabb.left();
        if left < near || left > far {
            return false;
        }
        match &e.kind {
            EntityKind::Obstacle(_) => true,
            EntityKind::Segment(_) => e.aabb.top() > player.feet() + 0.1,
            _ => false,
        }
    })
}

/// The next light gate ahead is the other colour
fn gate_mismatch_ahead(arena: &Arena, player: &Player) -> bool {
    let far = player.pos.x + player.half_width() + player.vel.x * GATE_LOOKAHEAD + 2.0;
    arena
        .iter()
        .filter_map(|e| match e.kind {
            EntityKind::LightGate(g) if e.aabb.right() >= player.pos.x && e.aabb.left() <= far => {
                Some((e.aabb.left(), g.phase))
            }
            _ => None,
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .is_some_and(|(_, phase)| phase != player.colour)
}
