//! Game session and core simulation types
//!
//! Everything a run needs is owned here and passed down explicitly: tuning,
//! the terrain generator and its catalogue, the entity arena and the player.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::catalogue::PrefabCatalogue;
use super::difficulty::DifficultyTier;
use super::entity::{Arena, ColourPhase, EntityId, SegmentKind};
use super::kinematics::JumpKinematics;
use super::player::{DeathCause, LastAction, LastCollision, Player, PlayerState};
use super::terrain::{PlayerView, TerrainGenerator};
use crate::best_score::BestDistanceStore;
use crate::error::{PersistenceError, SessionError};
use crate::results::ResultSummary;
use crate::screen::{ScreenBounds, camera_offset};
use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// "Ready?" countdown, player not yet started
    Ready,
    /// Player is alive (or dying)
    Running,
    /// Player is dead; results are available
    GameOver,
}

/// Things that happened during a tick, for audio / UI / effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Countdown finished and the player started
    Go,
    Jumped,
    Landed { segment: EntityId },
    ColourChanged(ColourPhase),
    /// Player took damage from an obstacle
    ObstacleHit { id: EntityId, health: u8 },
    /// Obstacle destroyed (with or without damage)
    ObstacleSmashed { id: EntityId },
    LightGateHit { id: EntityId },
    HealthCollected { id: EntityId, health: u8 },
    FacePlant { id: EntityId },
    Died(DeathCause),
    Dead,
    SegmentSpawned { id: EntityId, kind: SegmentKind },
    Despawned { id: EntityId },
    TierChanged(DifficultyTier),
    GameOver { distance: u32 },
    NewBest { distance: u32 },
}

/// One run of the game
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub screen: ScreenBounds,
    pub terrain: TerrainGenerator,
    pub arena: Arena,
    pub player: Player,
    pub tier: DifficultyTier,
    pub phase: SessionPhase,
    /// Seconds spent in the current phase
    pub phase_timer: f32,
    /// Seconds the "Go!" banner has been up, `None` once it is gone
    pub go_timer: Option<f32>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events raised by the last tick
    pub events: Vec<GameEvent>,
    pub summary: Option<ResultSummary>,
}

impl GameSession {
    /// Build a session; tuning and catalogue are validated first
    pub fn new(
        seed: u64,
        tuning: Tuning,
        catalogue: PrefabCatalogue,
        screen: ScreenBounds,
    ) -> Result<Self, SessionError> {
        tuning.validate()?;
        let terrain = TerrainGenerator::new(tuning.terrain.clone(), catalogue)?;
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut arena = Arena::new();
        let player = Self::build_world(&mut rng, &mut arena, &terrain, &tuning, &screen);

        log::info!("session started (seed {seed})");
        Ok(Self {
            seed,
            rng,
            tuning,
            screen,
            terrain,
            arena,
            player,
            tier: DifficultyTier::VeryEasy,
            phase: SessionPhase::Ready,
            phase_timer: 0.0,
            go_timer: None,
            time_ticks: 0,
            events: Vec::new(),
            summary: None,
        })
    }

    /// Default tuning and catalogue
    pub fn with_defaults(seed: u64) -> Result<Self, SessionError> {
        Self::new(
            seed,
            Tuning::default(),
            PrefabCatalogue::default(),
            ScreenBounds::default(),
        )
    }

    fn build_world(
        rng: &mut Pcg32,
        arena: &mut Arena,
        terrain: &TerrainGenerator,
        tuning: &Tuning,
        screen: &ScreenBounds,
    ) -> Player {
        let start = terrain.spawn_start(arena, screen);
        let ground = arena
            .get(start)
            .and_then(|e| e.as_segment())
            .map_or(tuning.terrain.start_height, |s| s.ground_height);
        let colour = ColourPhase::from_coin(rng.random_bool(0.5));
        Player::spawn(&tuning.player, screen, ground, colour)
    }

    /// Throw away the run and start over, with the same seed or a new one
    pub fn reset(&mut self, seed: Option<u64>) {
        if let Some(seed) = seed {
            self.seed = seed;
        }
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.arena.clear();
        self.terrain.reset();
        self.player = Self::build_world(
            &mut self.rng,
            &mut self.arena,
            &self.terrain,
            &self.tuning,
            &self.screen,
        );
        self.tier = DifficultyTier::VeryEasy;
        self.phase = SessionPhase::Ready;
        self.phase_timer = 0.0;
        self.go_timer = None;
        self.time_ticks = 0;
        self.events.clear();
        self.summary = None;
        log::info!("session reset (seed {})", self.seed);
    }

    /// Update the visible region (viewport resize)
    pub fn set_screen(&mut self, screen: ScreenBounds) {
        self.screen = screen;
    }

    /// What the terrain generator needs to know about the player right now
    pub fn player_view(&self) -> PlayerView {
        let pt = &self.tuning.player;
        PlayerView {
            half_height: self.player.half_height(),
            health: self.player.health,
            max_health: self.player.max_health,
            kinematics: JumpKinematics::new(
                pt.gravity,
                pt.max_jump_velocity,
                self.player.hold_jump_time,
                self.player.vel.x,
            ),
        }
    }

    pub fn distance(&self) -> f32 {
        self.player.distance
    }

    /// Distance in whole metres, as displayed
    pub fn distance_m(&self) -> u32 {
        self.player.distance.max(0.0).floor() as u32
    }

    pub fn health(&self) -> u8 {
        self.player.health
    }

    pub fn player_state(&self) -> PlayerState {
        self.player.state
    }

    pub fn last_action(&self) -> LastAction {
        self.player.last_action
    }

    pub fn last_collision(&self) -> LastCollision {
        self.player.last_collision
    }

    pub fn speed_ratio(&self) -> f32 {
        self.player.speed_ratio(&self.tuning.player)
    }

    pub fn camera_offset(&self) -> f32 {
        camera_offset(self.player.above_head, &self.screen)
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }

    /// Results are up and the restart button may be shown
    pub fn can_restart(&self) -> bool {
        self.is_game_over() && self.phase_timer >= self.tuning.session.result_button_delay
    }

    /// Submit the finished run to a best-score store.
    ///
    /// Does nothing before game over. Returns whether the run is a new best.
    pub fn submit_best(
        &mut self,
        store: &mut dyn BestDistanceStore,
    ) -> Result<bool, PersistenceError> {
        let Some(summary) = self.summary.as_mut() else {
            return Ok(false);
        };
        let new_best = store.submit(summary.distance)?;
        summary.new_best = new_best;
        summary.best_distance = Some(store.load()?);
        if new_best {
            self.events.push(GameEvent::NewBest {
                distance: summary.distance,
            });
        }
        Ok(new_best)
    }
}
