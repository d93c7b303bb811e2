//! Prefab catalogue
//!
//! The simulation only needs collider extents, a stable identifier and the
//! feature profile of each terrain piece; sprites are the renderer's problem.
//! Terrain templates are bucketed by difficulty tier and segment kind.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::difficulty::DifficultyTier;
use super::entity::SegmentKind;
use crate::error::{ConfigError, GenerationError};
use crate::tuning::unit;

/// What a segment template is allowed to carry, and how likely each is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureProfile {
    pub can_obstacles: bool,
    pub can_health: bool,
    pub can_light_gate: bool,
    /// Obstacle count is drawn from `min_obstacles..max_obstacles`
    pub min_obstacles: u32,
    pub max_obstacles: u32,
    /// Fraction of the half-width kept clear at the left edge
    pub safe_area_left: f32,
    /// Fraction of the half-width kept clear at the right edge
    pub safe_area_right: f32,
    pub obstacle_chance: f32,
    pub light_gate_chance: f32,
    pub health_chance: f32,
    /// Chance the *next* segment is a platform
    pub platform_chance: f32,
}

impl Default for FeatureProfile {
    fn default() -> Self {
        Self {
            can_obstacles: false,
            can_health: false,
            can_light_gate: false,
            min_obstacles: 0,
            max_obstacles: 0,
            safe_area_left: 0.5,
            safe_area_right: 0.5,
            obstacle_chance: 0.5,
            light_gate_chance: 0.5,
            health_chance: 0.5,
            platform_chance: 0.5,
        }
    }
}

impl FeatureProfile {
    pub fn validate(&self) -> Result<(), ConfigError> {
        unit("safe_area_left", self.safe_area_left)?;
        unit("safe_area_right", self.safe_area_right)?;
        unit("obstacle_chance", self.obstacle_chance)?;
        unit("light_gate_chance", self.light_gate_chance)?;
        unit("health_chance", self.health_chance)?;
        unit("platform_chance", self.platform_chance)?;
        if self.min_obstacles > self.max_obstacles {
            return Err(ConfigError::ObstacleRangeInverted {
                min: self.min_obstacles,
                max: self.max_obstacles,
            });
        }
        Ok(())
    }
}

/// A ground or platform prefab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentTemplate {
    pub id: String,
    pub kind: SegmentKind,
    pub half_width: f32,
    pub half_height: f32,
    #[serde(default)]
    pub features: FeatureProfile,
}

/// An obstacle, health item or light gate prefab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemTemplate {
    pub id: String,
    pub half_width: f32,
    pub half_height: f32,
}

/// Terrain templates for one difficulty tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierBucket {
    pub tier: DifficultyTier,
    pub grounds: Vec<SegmentTemplate>,
    pub platforms: Vec<SegmentTemplate>,
}

/// Every prefab the generator can place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefabCatalogue {
    /// Segment the run starts on
    pub start: SegmentTemplate,
    pub tiers: Vec<TierBucket>,
    pub obstacles: Vec<ItemTemplate>,
    pub health_item: ItemTemplate,
    pub light_gate: ItemTemplate,
}

fn check_extent(id: &str, half_width: f32, half_height: f32) -> Result<(), GenerationError> {
    if half_width > 0.0 && half_height > 0.0 {
        Ok(())
    } else {
        Err(GenerationError::ZeroExtent {
            id: id.to_string(),
            half_width,
            half_height,
        })
    }
}

impl PrefabCatalogue {
    pub fn from_json(json: &str) -> Result<Self, GenerationError> {
        let catalogue: PrefabCatalogue =
            serde_json::from_str(json).map_err(|e| GenerationError::Template {
                id: "<catalogue>".to_string(),
                source: ConfigError::Parse(e),
            })?;
        catalogue.validate()?;
        Ok(catalogue)
    }

    /// Templates for a tier and kind (may be empty)
    pub fn bucket(&self, tier: DifficultyTier, kind: SegmentKind) -> &[SegmentTemplate] {
        self.tiers
            .iter()
            .find(|b| b.tier == tier)
            .map(|b| match kind {
                SegmentKind::Ground => b.grounds.as_slice(),
                SegmentKind::Platform => b.platforms.as_slice(),
            })
            .unwrap_or(&[])
    }

    /// Uniformly pick a template from a bucket
    pub fn pick_segment<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        tier: DifficultyTier,
        kind: SegmentKind,
    ) -> Result<&SegmentTemplate, GenerationError> {
        let bucket = self.bucket(tier, kind);
        if bucket.is_empty() {
            return Err(GenerationError::EmptyBucket { tier, kind });
        }
        Ok(&bucket[rng.random_range(0..bucket.len())])
    }

    pub fn pick_obstacle<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<&ItemTemplate, GenerationError> {
        if self.obstacles.is_empty() {
            return Err(GenerationError::NoObstacles);
        }
        Ok(&self.obstacles[rng.random_range(0..self.obstacles.len())])
    }

    /// Every bucket must be populated and every template must have a real size
    pub fn validate(&self) -> Result<(), GenerationError> {
        let segment = |t: &SegmentTemplate| -> Result<(), GenerationError> {
            check_extent(&t.id, t.half_width, t.half_height)?;
            t.features
                .validate()
                .map_err(|source| GenerationError::Template {
                    id: t.id.clone(),
                    source,
                })
        };

        segment(&self.start)?;
        for tier in DifficultyTier::ALL {
            for kind in [SegmentKind::Ground, SegmentKind::Platform] {
                let bucket = self.bucket(tier, kind);
                if bucket.is_empty() {
                    return Err(GenerationError::EmptyBucket { tier, kind });
                }
                for t in bucket {
                    segment(t)?;
                }
            }
        }

        if self.obstacles.is_empty() {
            return Err(GenerationError::NoObstacles);
        }
        for o in &self.obstacles {
            check_extent(&o.id, o.half_width, o.half_height)?;
        }
        check_extent(
            &self.health_item.id,
            self.health_item.half_width,
            self.health_item.half_height,
        )?;
        check_extent(
            &self.light_gate.id,
            self.light_gate.half_width,
            self.light_gate.half_height,
        )?;
        Ok(())
    }
}

/// Per-tier knobs for the built-in catalogue
struct TierStyle {
    ground_widths: &'static [f32],
    platform_widths: &'static [f32],
    obstacle_chance: f32,
    obstacles: (u32, u32),
    light_gate_chance: f32,
    health_chance: f32,
    platform_chance: f32,
}

const GROUND_HALF_HEIGHT: f32 = 25.0;
const PLATFORM_HALF_HEIGHT: f32 = 1.0;

fn tier_style(tier: DifficultyTier) -> TierStyle {
    match tier {
        DifficultyTier::VeryEasy => TierStyle {
            ground_widths: &[10.0, 14.0, 18.0],
            platform_widths: &[8.0, 10.0],
            obstacle_chance: 0.3,
            obstacles: (1, 2),
            light_gate_chance: 0.0,
            health_chance: 0.5,
            platform_chance: 0.2,
        },
        DifficultyTier::Easy => TierStyle {
            ground_widths: &[9.0, 12.0, 15.0],
            platform_widths: &[7.0, 9.0],
            obstacle_chance: 0.45,
            obstacles: (1, 3),
            light_gate_chance: 0.25,
            health_chance: 0.4,
            platform_chance: 0.25,
        },
        DifficultyTier::Medium => TierStyle {
            ground_widths: &[8.0, 11.0, 14.0],
            platform_widths: &[6.0, 8.0],
            obstacle_chance: 0.55,
            obstacles: (1, 3),
            light_gate_chance: 0.35,
            health_chance: 0.3,
            platform_chance: 0.3,
        },
        DifficultyTier::Hard => TierStyle {
            ground_widths: &[7.0, 10.0, 12.0],
            platform_widths: &[5.0, 7.0],
            obstacle_chance: 0.65,
            obstacles: (1, 4),
            light_gate_chance: 0.45,
            health_chance: 0.25,
            platform_chance: 0.35,
        },
        DifficultyTier::Insane => TierStyle {
            ground_widths: &[6.0, 8.0, 10.0],
            platform_widths: &[4.0, 6.0],
            obstacle_chance: 0.75,
            obstacles: (2, 4),
            light_gate_chance: 0.55,
            health_chance: 0.2,
            platform_chance: 0.4,
        },
    }
}

fn tier_bucket(tier: DifficultyTier) -> TierBucket {
    let style = tier_style(tier);
    let slug = format!("{tier:?}").to_lowercase();

    let ground_profile = FeatureProfile {
        can_obstacles: true,
        can_health: true,
        can_light_gate: style.light_gate_chance > 0.0,
        min_obstacles: style.obstacles.0,
        max_obstacles: style.obstacles.1,
        safe_area_left: 0.3,
        safe_area_right: 0.3,
        obstacle_chance: style.obstacle_chance,
        light_gate_chance: style.light_gate_chance,
        health_chance: style.health_chance,
        platform_chance: style.platform_chance,
    };
    // Platforms are narrow: fewer obstacles, wider safe margins
    let platform_profile = FeatureProfile {
        min_obstacles: 1,
        max_obstacles: 2,
        safe_area_left: 0.4,
        safe_area_right: 0.4,
        obstacle_chance: style.obstacle_chance * 0.5,
        ..ground_profile.clone()
    };

    let grounds = style
        .ground_widths
        .iter()
        .enumerate()
        .map(|(i, &w)| SegmentTemplate {
            id: format!("{slug}_ground_{i}"),
            kind: SegmentKind::Ground,
            half_width: w,
            half_height: GROUND_HALF_HEIGHT,
            features: ground_profile.clone(),
        })
        .collect();
    let platforms = style
        .platform_widths
        .iter()
        .enumerate()
        .map(|(i, &w)| SegmentTemplate {
            id: format!("{slug}_platform_{i}"),
            kind: SegmentKind::Platform,
            half_width: w,
            half_height: PLATFORM_HALF_HEIGHT,
            features: platform_profile.clone(),
        })
        .collect();

    TierBucket {
        tier,
        grounds,
        platforms,
    }
}

impl Default for PrefabCatalogue {
    fn default() -> Self {
        Self {
            start: SegmentTemplate {
                id: "start".to_string(),
                kind: SegmentKind::Ground,
                half_width: 40.0,
                half_height: GROUND_HALF_HEIGHT,
                features: FeatureProfile {
                    platform_chance: 0.0,
                    ..FeatureProfile::default()
                },
            },
            tiers: DifficultyTier::ALL.into_iter().map(tier_bucket).collect(),
            obstacles: vec![
                ItemTemplate {
                    id: "stalagmite_small".to_string(),
                    half_width: 0.6,
                    half_height: 0.8,
                },
                ItemTemplate {
                    id: "stalagmite".to_string(),
                    half_width: 0.8,
                    half_height: 1.2,
                },
                ItemTemplate {
                    id: "stalagmite_tall".to_string(),
                    half_width: 0.7,
                    half_height: 1.6,
                },
            ],
            health_item: ItemTemplate {
                id: "heart".to_string(),
                half_width: 0.6,
                half_height: 0.6,
            },
            // Beam reaches far above the screen so it cannot be jumped
            light_gate: ItemTemplate {
                id: "light_gate".to_string(),
                half_width: 0.5,
                half_height: 30.0,
            },
        }
    }
}
