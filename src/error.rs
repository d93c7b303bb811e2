//! Error types
//!
//! Configuration and catalogue problems are caught when a session is built.
//! Nothing inside the fixed-step tick returns an error.

use thiserror::Error;

use crate::sim::difficulty::DifficultyTier;
use crate::sim::entity::SegmentKind;

/// Invalid tuning values
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be positive (got {value})")]
    NotPositive { name: &'static str, value: f32 },
    #[error("{name} must be within [0, 1] (got {value})")]
    OutOfUnitRange { name: &'static str, value: f32 },
    #[error("difficulty thresholds must be strictly increasing: {0:?}")]
    ThresholdsNotIncreasing([f32; 4]),
    #[error("obstacle count range is inverted: min {min} > max {max}")]
    ObstacleRangeInverted { min: u32, max: u32 },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Problems producing a terrain segment
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no {kind:?} templates for difficulty {tier:?}")]
    EmptyBucket {
        tier: DifficultyTier,
        kind: SegmentKind,
    },
    #[error("entity {0} is not a live segment")]
    MissingPredecessor(u32),
    #[error("catalogue has no obstacle templates")]
    NoObstacles,
    #[error("template `{id}` has a non-positive extent ({half_width} x {half_height})")]
    ZeroExtent {
        id: String,
        half_width: f32,
        half_height: f32,
    },
    #[error("template `{id}`: {source}")]
    Template {
        id: String,
        #[source]
        source: ConfigError,
    },
}

/// Best-score storage failures
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("best score I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("best score file is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Session construction failures
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
}
