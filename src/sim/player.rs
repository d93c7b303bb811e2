//! Player physics and state machine
//!
//! The player never moves horizontally on screen: its horizontal velocity is
//! what scrolls the world. Vertical motion, collisions and health are resolved
//! here once per fixed tick with short axis-aligned ray casts.
//!
//! ```text
//! Idle --land--> Running --jump--> InAir --land--> Running
//!   any alive state --fall / health < 1--> Dying --timer--> Dead
//! ```

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Ray;
use super::debris;
use super::entity::{Arena, ColliderTag, ColourPhase, EntityId, EntityKind};
use super::state::GameEvent;
use crate::consts::{CRASH_RAY_PADDING, GROUND_SKIN};
use crate::screen::ScreenBounds;
use crate::tuning::{PlayerTuning, Tuning};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerState {
    /// Spawned, waiting to touch ground
    #[default]
    Idle,
    Running,
    InAir,
    Dying,
    /// Terminal
    Dead,
}

impl PlayerState {
    pub fn is_alive(&self) -> bool {
        !matches!(self, PlayerState::Dying | PlayerState::Dead)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LastAction {
    #[default]
    Run,
    Jump,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LastCollision {
    #[default]
    Pit,
    Ground,
    Obstacle,
    LightGate,
}

/// Why the player started dying
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Dropped below the bottom of the screen
    Fell,
    /// Health reached zero
    HealthDepleted,
}

impl DeathCause {
    /// Higher wins when several causes apply on the same tick
    pub fn priority(&self) -> u8 {
        match self {
            DeathCause::Fell => 2,
            DeathCause::HealthDepleted => 1,
        }
    }
}

/// The runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub half_extents: Vec2,
    pub health: u8,
    pub max_health: u8,
    pub colour: ColourPhase,
    pub state: PlayerState,
    pub last_action: LastAction,
    pub last_collision: LastCollision,
    /// Metres travelled
    pub distance: f32,

    pub invincible: bool,
    pub invincibility_timer: f32,
    flash_timer: f32,
    visible: bool,

    pub holding_jump: bool,
    pub hold_jump_timer: f32,
    /// Gravity suspension currently available; grows with speed
    pub hold_jump_time: f32,

    pub grounded: bool,
    /// Set after a face-plant; landing is disabled from then on
    pub has_hit_ground: bool,
    /// Top surface of the last segment landed on
    pub ground_height: f32,

    colour_locked: bool,
    colour_timer: f32,

    pub death_cause: Option<DeathCause>,
    pub death_time: f32,
    pub death_timer: f32,
    fading: bool,

    pub started: bool,
    /// Highest point the camera should keep on screen
    pub above_head: f32,
}

impl Player {
    /// Spawn at the anchor column, standing on `ground_height`
    pub fn spawn(
        tuning: &PlayerTuning,
        screen: &ScreenBounds,
        ground_height: f32,
        colour: ColourPhase,
    ) -> Self {
        let half_extents = Vec2::new(tuning.half_width, tuning.half_height);
        let pos = Vec2::new(screen.player_anchor_x(), ground_height + half_extents.y);
        Self {
            pos,
            vel: Vec2::ZERO,
            half_extents,
            health: tuning.max_health,
            max_health: tuning.max_health,
            colour,
            state: PlayerState::Idle,
            last_action: LastAction::Run,
            last_collision: LastCollision::Pit,
            distance: 0.0,
            invincible: false,
            invincibility_timer: 0.0,
            flash_timer: 0.0,
            visible: true,
            holding_jump: false,
            hold_jump_timer: 0.0,
            hold_jump_time: 0.0,
            grounded: false,
            has_hit_ground: false,
            ground_height,
            colour_locked: false,
            colour_timer: 0.0,
            death_cause: None,
            death_time: 0.0,
            death_timer: 0.0,
            fading: false,
            started: false,
            above_head: pos.y + half_extents.y + tuning.head_space,
        }
    }

    /// Begin simulating (the "Go!" moment)
    pub fn start(&mut self) {
        self.started = true;
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        self.half_extents.x
    }

    #[inline]
    pub fn half_height(&self) -> f32 {
        self.half_extents.y
    }

    /// Bottom of the player's collider
    #[inline]
    pub fn feet(&self) -> f32 {
        self.pos.y - self.half_extents.y
    }

    pub fn is_alive(&self) -> bool {
        self.state.is_alive()
    }

    pub fn is_dead(&self) -> bool {
        self.state == PlayerState::Dead
    }

    /// Flash state for invincibility and dying effects
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// In the final fade of an obstacle or light-gate death
    pub fn is_fading(&self) -> bool {
        self.fading
    }

    /// Current horizontal speed as a fraction of the maximum
    pub fn speed_ratio(&self, tuning: &PlayerTuning) -> f32 {
        (self.vel.x / tuning.max_run_velocity).clamp(0.0, 1.0)
    }

    pub fn can_change_colour(&self) -> bool {
        self.started && !self.colour_locked && self.is_alive()
    }

    /// +1 health, capped at the maximum
    pub fn add_health(&mut self) {
        if self.health < self.max_health {
            self.health += 1;
        }
    }

    /// Jump button pressed. Returns whether a jump happened.
    pub fn press_jump(&mut self, tuning: &PlayerTuning) -> bool {
        if !self.started || !matches!(self.state, PlayerState::Running | PlayerState::InAir) {
            return false;
        }
        let ground_distance = (self.feet() - self.ground_height).abs();
        if !self.grounded && ground_distance > tuning.jump_ground_threshold {
            return false;
        }
        self.grounded = false;
        self.vel.y = tuning.max_jump_velocity;
        self.holding_jump = true;
        self.hold_jump_timer = 0.0;
        self.state = PlayerState::InAir;
        self.last_action = LastAction::Jump;
        true
    }

    /// Jump button released: gravity resumes immediately
    pub fn release_jump(&mut self) {
        self.holding_jump = false;
    }

    /// Colour button pressed. Returns the new colour if it changed.
    pub fn press_colour(&mut self) -> Option<ColourPhase> {
        if !self.can_change_colour() {
            return None;
        }
        self.colour = self.colour.toggled();
        self.colour_locked = true;
        self.colour_timer = 0.0;
        Some(self.colour)
    }

    /// Advance one fixed tick
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        arena: &mut Arena,
        tuning: &Tuning,
        screen: &ScreenBounds,
        rng: &mut R,
        dt: f32,
        events: &mut Vec<GameEvent>,
    ) {
        if !self.started {
            return;
        }
        match self.state {
            PlayerState::Dead => return,
            PlayerState::Dying => {
                self.step_dying(&tuning.player, dt, events);
                return;
            }
            _ => {}
        }

        let pt = &tuning.player;
        if self.check_death(pt, screen, events) {
            return;
        }

        if self.colour_locked {
            self.colour_timer += dt;
            if self.colour_timer >= pt.colour_cooldown {
                self.colour_locked = false;
            }
        }

        if self.invincible {
            self.step_invincibility(pt, dt);
        }

        self.forward_collisions(arena, tuning, rng, events);
        self.downward_collisions(arena, tuning, rng, dt, events);

        if !self.grounded {
            self.step_airborne(arena, pt, dt, events);
        }

        self.distance += self.vel.x * dt / pt.distance_unit;

        if self.grounded {
            self.step_grounded(arena, pt, dt);
        }

        self.above_head = self.pos.y + self.half_extents.y + pt.head_space;
    }

    /// Resolve every applicable death cause by priority. Returns true when the
    /// player has started dying.
    fn check_death(
        &mut self,
        pt: &PlayerTuning,
        screen: &ScreenBounds,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        let fell = self.pos.y <= screen.bottom - self.half_extents.y;
        let depleted = self.health < 1;
        let cause = [
            fell.then_some(DeathCause::Fell),
            depleted.then_some(DeathCause::HealthDepleted),
        ]
        .into_iter()
        .flatten()
        .max_by_key(DeathCause::priority);

        let Some(cause) = cause else {
            return false;
        };

        self.death_time = match cause {
            DeathCause::Fell => {
                if self.last_collision != LastCollision::Ground {
                    self.last_collision = LastCollision::Pit;
                }
                pt.fall_death_time
            }
            DeathCause::HealthDepleted => match self.last_collision {
                LastCollision::Obstacle => pt.obstacle_death_time,
                LastCollision::LightGate => pt.light_gate_death_time,
                LastCollision::Pit | LastCollision::Ground => pt.fall_death_time,
            },
        };
        self.death_cause = Some(cause);
        self.death_timer = 0.0;
        self.vel = Vec2::ZERO;
        self.holding_jump = false;
        self.colour_locked = true;
        self.state = PlayerState::Dying;
        log::info!(
            "player dying: {:?} (last collision {:?}, distance {:.1})",
            cause,
            self.last_collision,
            self.distance
        );
        events.push(GameEvent::Died(cause));
        true
    }

    fn step_invincibility(&mut self, pt: &PlayerTuning, dt: f32) {
        self.flash_timer += dt;
        if self.flash_timer < pt.invincibility_flash_time {
            self.visible = false;
        } else if self.flash_timer >= 2.0 * pt.invincibility_flash_time {
            self.flash_timer = 0.0;
        } else {
            self.visible = true;
        }

        self.invincibility_timer += dt;
        if self.invincibility_timer >= pt.invincibility_time {
            self.invincible = false;
            self.invincibility_timer = 0.0;
            self.flash_timer = 0.0;
            self.visible = true;
        }
    }

    /// Short ray straight ahead: obstacles, light gates, walls and pickups
    fn forward_collisions<R: Rng + ?Sized>(
        &mut self,
        arena: &mut Arena,
        tuning: &Tuning,
        rng: &mut R,
        events: &mut Vec<GameEvent>,
    ) {
        let reach = 0.5 * self.half_extents.x + CRASH_RAY_PADDING;
        let ray = Ray::new(self.pos, Vec2::X, reach);
        // Nearest hit only: a gate of the player's colour shadows whatever is
        // directly behind it until the player is through
        let hit = arena.raycast(&ray, |tag| tag != ColliderTag::Debris);
        let Some((id, tag, _)) = hit else {
            return;
        };

        match tag {
            ColliderTag::Obstacle => self.hit_obstacle(arena, id, tuning, rng, events),
            ColliderTag::LightGate => {
                let gate = arena.get(id).and_then(|e| match e.kind {
                    EntityKind::LightGate(g) => Some(g),
                    _ => None,
                });
                if let Some(gate) = gate
                    && gate.phase != self.colour
                    && !self.invincible
                {
                    self.health = 0;
                    self.last_collision = LastCollision::LightGate;
                    events.push(GameEvent::LightGateHit { id });
                }
            }
            ColliderTag::Segment => {
                if !self.has_hit_ground {
                    self.vel = Vec2::ZERO;
                    self.grounded = false;
                    self.holding_jump = false;
                    events.push(GameEvent::FacePlant { id });
                }
                self.has_hit_ground = true;
                self.last_collision = LastCollision::Ground;
            }
            ColliderTag::HealthItem => self.collect_health(arena, id, events),
            ColliderTag::Debris => {}
        }
    }

    /// Ray along the vertical velocity: landing on obstacles or pickups
    fn downward_collisions<R: Rng + ?Sized>(
        &mut self,
        arena: &mut Arena,
        tuning: &Tuning,
        rng: &mut R,
        dt: f32,
        events: &mut Vec<GameEvent>,
    ) {
        let Some(ray) = Ray::signed(self.pos, Vec2::Y, self.vel.y * dt) else {
            return;
        };
        let hit = arena.raycast(&ray, |tag| {
            matches!(tag, ColliderTag::Obstacle | ColliderTag::HealthItem)
        });
        match hit {
            Some((id, ColliderTag::Obstacle, _)) => {
                self.hit_obstacle(arena, id, tuning, rng, events)
            }
            Some((id, ColliderTag::HealthItem, _)) => self.collect_health(arena, id, events),
            _ => {}
        }
    }

    fn hit_obstacle<R: Rng + ?Sized>(
        &mut self,
        arena: &mut Arena,
        id: EntityId,
        tuning: &Tuning,
        rng: &mut R,
        events: &mut Vec<GameEvent>,
    ) {
        let Some(obstacle) = arena.remove(id) else {
            return;
        };
        debris::spawn_burst(arena, rng, &tuning.debris, obstacle.aabb.center, self.vel.x);
        events.push(GameEvent::ObstacleSmashed { id });

        if self.invincible {
            return;
        }
        let pt = &tuning.player;
        self.health = self.health.saturating_sub(1);
        self.vel.x *= 1.0 - pt.obstacle_speed_loss;
        self.last_collision = LastCollision::Obstacle;
        if self.health > 0 {
            self.invincible = true;
            self.invincibility_timer = 0.0;
            self.flash_timer = 0.0;
        }
        events.push(GameEvent::ObstacleHit {
            id,
            health: self.health,
        });
    }

    fn collect_health(&mut self, arena: &mut Arena, id: EntityId, events: &mut Vec<GameEvent>) {
        if arena.remove(id).is_some() {
            self.add_health();
            events.push(GameEvent::HealthCollected {
                id,
                health: self.health,
            });
        }
    }

    /// Vertical integration and landing
    fn step_airborne(
        &mut self,
        arena: &Arena,
        pt: &PlayerTuning,
        dt: f32,
        events: &mut Vec<GameEvent>,
    ) {
        if self.holding_jump {
            self.hold_jump_timer += dt;
            if self.hold_jump_timer >= self.hold_jump_time {
                self.holding_jump = false;
            }
        }

        self.pos.y += self.vel.y * dt;
        if !self.holding_jump {
            self.vel.y -= pt.gravity * dt;
        }

        if self.has_hit_ground {
            return;
        }
        // Ray from the leading foot, reaching below the feet by this tick's fall
        let signed = self.vel.y * dt - self.half_extents.y - GROUND_SKIN;
        if signed >= 0.0 {
            return;
        }
        let origin = Vec2::new(self.pos.x + pt.ground_ray_offset, self.pos.y);
        let Some(ray) = Ray::signed(origin, Vec2::Y, signed) else {
            return;
        };
        let Some((id, _, _)) = arena.raycast(&ray, |tag| tag == ColliderTag::Segment) else {
            return;
        };
        let Some(top) = arena.get(id).map(|e| e.aabb.top()) else {
            return;
        };

        self.ground_height = top;
        self.pos.y = top + self.half_extents.y;
        self.vel.y = 0.0;
        self.holding_jump = false;
        self.grounded = true;
        self.state = PlayerState::Running;
        self.last_action = LastAction::Run;
        events.push(GameEvent::Landed { segment: id });
    }

    /// Horizontal acceleration and the walk-off-edge check
    fn step_grounded(&mut self, arena: &Arena, pt: &PlayerTuning, dt: f32) {
        let ratio = self.vel.x / pt.max_run_velocity;
        let acceleration = pt.max_acceleration * (1.0 - ratio);
        self.hold_jump_time = pt.max_hold_jump_time * ratio;
        self.vel.x = (self.vel.x + acceleration * dt).min(pt.max_run_velocity);

        // Trailing foot: once it is over empty space the player falls
        let origin = Vec2::new(self.pos.x - pt.ground_ray_offset, self.pos.y);
        let ray = Ray::new(origin, Vec2::NEG_Y, self.half_extents.y + GROUND_SKIN);
        if arena
            .raycast(&ray, |tag| tag == ColliderTag::Segment)
            .is_none()
        {
            self.grounded = false;
        }
    }

    fn step_dying(&mut self, pt: &PlayerTuning, dt: f32, events: &mut Vec<GameEvent>) {
        self.death_timer += dt;
        let fades = matches!(
            self.last_collision,
            LastCollision::Obstacle | LastCollision::LightGate
        );
        if fades && self.death_timer >= self.death_time - pt.fade_time {
            self.fading = true;
            self.flash_timer += dt;
            if self.flash_timer < pt.dying_flash_time {
                self.visible = false;
            } else if self.flash_timer >= 2.0 * pt.dying_flash_time {
                self.flash_timer = 0.0;
            } else {
                self.visible = true;
            }
        }

        if self.death_timer >= self.death_time {
            if fades {
                self.visible = false;
            }
            self.vel.x = 0.0;
            self.health = 0;
            self.state = PlayerState::Dead;
            log::debug!("player dead after {:.2}s", self.death_timer);
            events.push(GameEvent::Dead);
        }
    }
}
