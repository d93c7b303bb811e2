//! Fixed timestep simulation tick
//!
//! Advances a session deterministically. The order inside a tick is fixed:
//! input, terrain scroll and generation, player physics, items and debris,
//! difficulty, game-over detection.

use std::f32::consts::TAU;

use super::autopilot;
use super::debris;
use super::entity::EntityKind;
use super::state::{GameEvent, GameSession, SessionPhase};
use crate::results::ResultSummary;

/// Input edge events for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub jump_pressed: bool,
    pub jump_released: bool,
    pub colour_pressed: bool,
    /// Demo mode: the autopilot decides what to press
    pub autopilot: bool,
}

/// Advance the session by one fixed timestep
pub fn tick(session: &mut GameSession, input: &TickInput, dt: f32) {
    session.events.clear();
    session.time_ticks += 1;
    session.phase_timer += dt;

    match session.phase {
        SessionPhase::Ready => {
            if session.phase_timer >= session.tuning.session.ready_time {
                session.player.start();
                session.phase = SessionPhase::Running;
                session.phase_timer = 0.0;
                session.go_timer = Some(0.0);
                session.events.push(GameEvent::Go);
                log::debug!("go at tick {}", session.time_ticks);
            }
        }
        SessionPhase::Running => {}
        SessionPhase::GameOver => return,
    }

    if let Some(t) = session.go_timer.as_mut() {
        *t += dt;
        if *t >= session.tuning.session.go_time {
            session.go_timer = None;
        }
    }

    let input = if input.autopilot {
        autopilot::plan(&session.arena, &session.player, &session.tuning.player)
    } else {
        input.clone()
    };
    apply_input(session, &input);

    // Terrain sees the player as of the start of the tick
    let view = session.player_view();
    let dx = session.player.vel.x * dt;
    let generated = session.terrain.advance(
        &mut session.rng,
        &mut session.arena,
        dx,
        &session.screen,
        &view,
        session.tier,
        &mut session.events,
    );
    if let Err(e) = generated {
        log::error!("terrain generation failed: {e}");
    }

    session.player.step(
        &mut session.arena,
        &session.tuning,
        &session.screen,
        &mut session.rng,
        dt,
        &mut session.events,
    );

    animate_health_items(session, dt);
    for id in debris::step(&mut session.arena, &session.tuning.debris, &session.screen, dt) {
        session.events.push(GameEvent::Despawned { id });
    }

    let tier = session.tuning.difficulty.tier_for(session.player.distance);
    if tier != session.tier {
        log::info!(
            "difficulty {} at {:.0} m",
            tier.as_str(),
            session.player.distance
        );
        session.tier = tier;
        session.events.push(GameEvent::TierChanged(tier));
    }

    if session.player.is_dead() {
        let summary = ResultSummary::from_player(&session.player, &session.tuning.difficulty);
        log::info!(
            "game over: {} m ({:?} / {:?})",
            summary.distance,
            summary.last_action,
            summary.last_collision
        );
        session.events.push(GameEvent::GameOver {
            distance: summary.distance,
        });
        session.summary = Some(summary);
        session.phase = SessionPhase::GameOver;
        session.phase_timer = 0.0;
        session.go_timer = None;
    }
}

fn apply_input(session: &mut GameSession, input: &TickInput) {
    let player = &mut session.player;
    if input.jump_pressed && player.press_jump(&session.tuning.player) {
        session.events.push(GameEvent::Jumped);
    }
    if input.jump_released {
        player.release_jump();
    }
    if input.colour_pressed
        && let Some(colour) = player.press_colour()
    {
        session.events.push(GameEvent::ColourChanged(colour));
    }
}

/// Health items float up and down around their rest height
fn animate_health_items(session: &mut GameSession, dt: f32) {
    let bob = &session.tuning.health_item;
    for entity in session.arena.iter_mut() {
        if let EntityKind::HealthItem(item) = &mut entity.kind {
            item.bob_time += dt;
            let phase = item.bob_time * bob.bob_speed * TAU;
            entity.aabb.center.y = item.rest_y + phase.sin() * bob.bob_height;
        }
    }
}
