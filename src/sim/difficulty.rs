//! Distance-driven difficulty tiers

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Difficulty tier, ordered from easiest to hardest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum DifficultyTier {
    #[default]
    VeryEasy,
    Easy,
    Medium,
    Hard,
    Insane,
}

impl DifficultyTier {
    pub const ALL: [DifficultyTier; 5] = [
        DifficultyTier::VeryEasy,
        DifficultyTier::Easy,
        DifficultyTier::Medium,
        DifficultyTier::Hard,
        DifficultyTier::Insane,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyTier::VeryEasy => "Very Easy",
            DifficultyTier::Easy => "Easy",
            DifficultyTier::Medium => "Medium",
            DifficultyTier::Hard => "Hard",
            DifficultyTier::Insane => "Insane",
        }
    }
}

/// Distances (in metres) at which each tier begins
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyThresholds {
    pub easy: f32,
    pub medium: f32,
    pub hard: f32,
    pub insane: f32,
}

impl Default for DifficultyThresholds {
    fn default() -> Self {
        Self {
            easy: 100.0,
            medium: 300.0,
            hard: 600.0,
            insane: 1000.0,
        }
    }
}

impl DifficultyThresholds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = [self.easy, self.medium, self.hard, self.insane];
        let increasing = t[0] >= 0.0 && t.windows(2).all(|w| w[0] < w[1]);
        if increasing {
            Ok(())
        } else {
            Err(ConfigError::ThresholdsNotIncreasing(t))
        }
    }

    /// Tier whose distance range contains `distance`.
    ///
    /// Distance is floored to whole metres first, as shown on the HUD.
    pub fn tier_for(&self, distance: f32) -> DifficultyTier {
        let d = distance.max(0.0).floor();
        if d >= self.insane {
            DifficultyTier::Insane
        } else if d >= self.hard {
            DifficultyTier::Hard
        } else if d >= self.medium {
            DifficultyTier::Medium
        } else if d >= self.easy {
            DifficultyTier::Easy
        } else {
            DifficultyTier::VeryEasy
        }
    }
}
