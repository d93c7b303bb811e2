//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod catalogue;
pub mod collision;
pub mod debris;
pub mod difficulty;
pub mod entity;
pub mod kinematics;
pub mod player;
pub mod state;
pub mod terrain;
pub mod tick;

pub use catalogue::{FeatureProfile, ItemTemplate, PrefabCatalogue, SegmentTemplate, TierBucket};
pub use collision::{Aabb, Ray, RayHit, ray_aabb};
pub use difficulty::{DifficultyThresholds, DifficultyTier};
pub use entity::{
    Arena, ColliderTag, ColourPhase, Entity, EntityId, EntityKind, Segment, SegmentKind,
};
pub use kinematics::JumpKinematics;
pub use player::{DeathCause, LastAction, LastCollision, Player, PlayerState};
pub use state::{GameEvent, GameSession, SessionPhase};
pub use terrain::{GenerationReport, PlayerView, TerrainGenerator};
pub use tick::{TickInput, tick};
