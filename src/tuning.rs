//! Data-driven game balance
//!
//! All numbers that shape a run live here so they can be swapped from a JSON
//! file without touching the simulation. Defaults reproduce the shipped game.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::difficulty::DifficultyThresholds;

/// Player movement, health and timer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub half_width: f32,
    pub half_height: f32,
    pub max_health: u8,
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Vertical velocity applied on jump
    pub max_jump_velocity: f32,
    pub max_run_velocity: f32,
    pub max_acceleration: f32,
    /// Longest gravity suspension a held jump can get (at full speed)
    pub max_hold_jump_time: f32,
    /// Jump is still accepted this far above the ground
    pub jump_ground_threshold: f32,
    /// Horizontal offset of the landing / edge rays from the player centre
    pub ground_ray_offset: f32,
    /// Fraction of horizontal speed lost when hitting an obstacle
    pub obstacle_speed_loss: f32,
    pub invincibility_time: f32,
    pub invincibility_flash_time: f32,
    pub colour_cooldown: f32,
    /// Space kept above the player's head for camera follow
    pub head_space: f32,
    pub obstacle_death_time: f32,
    pub light_gate_death_time: f32,
    pub fall_death_time: f32,
    /// Final portion of the death timer during which the sprite fades out
    pub fade_time: f32,
    pub dying_flash_time: f32,
    /// World units per metre of distance
    pub distance_unit: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            half_width: 1.0,
            half_height: 1.0,
            max_health: 3,
            gravity: 100.0,
            max_jump_velocity: 20.0,
            max_run_velocity: 50.0,
            max_acceleration: 10.0,
            max_hold_jump_time: 0.25,
            jump_ground_threshold: 2.0,
            ground_ray_offset: 0.7,
            obstacle_speed_loss: 0.3,
            invincibility_time: 0.5,
            invincibility_flash_time: 0.1,
            colour_cooldown: 0.5,
            head_space: 3.0,
            obstacle_death_time: 2.0,
            light_gate_death_time: 2.0,
            fall_death_time: 2.0,
            fade_time: 1.0,
            dying_flash_time: 0.025,
            distance_unit: 2.0,
        }
    }
}

/// Terrain height and gap sampling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainTuning {
    /// Lowest ground top, measured up from the screen bottom
    pub min_height_from_bottom: f32,
    /// Highest ground top, measured down from the screen top
    pub max_height_from_top: f32,
    /// Fraction of the max jump height a new segment may rise by
    pub jump_height_buffer: f32,
    /// Fraction of the sampled gap actually used
    pub jump_distance_buffer: f32,
    pub min_gap: f32,
    /// Ground top of the starting segment
    pub start_height: f32,
}

impl Default for TerrainTuning {
    fn default() -> Self {
        Self {
            min_height_from_bottom: 1.0,
            max_height_from_top: 5.0,
            jump_height_buffer: 0.7,
            jump_distance_buffer: 0.7,
            min_gap: 10.0,
            start_height: 0.0,
        }
    }
}

/// Ready / go countdown and results screen timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionTuning {
    pub ready_time: f32,
    pub go_time: f32,
    pub result_button_delay: f32,
}

impl Default for SessionTuning {
    fn default() -> Self {
        Self {
            ready_time: 1.5,
            go_time: 1.0,
            result_button_delay: 2.0,
        }
    }
}

/// Obstacle debris
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebrisTuning {
    pub pieces: u32,
    pub min_angle_deg: f32,
    pub max_angle_deg: f32,
    pub lifetime: f32,
    pub gravity: f32,
    /// Per-tick horizontal velocity multiplier
    pub horizontal_damping: f32,
    /// Velocity kept after a bounce
    pub bounce_damping: f32,
    pub half_size: f32,
    /// Rotation applied each tick (degrees)
    pub spin_deg: f32,
}

impl Default for DebrisTuning {
    fn default() -> Self {
        Self {
            pieces: 3,
            min_angle_deg: 15.0,
            max_angle_deg: 70.0,
            lifetime: 1.25,
            gravity: 200.0,
            horizontal_damping: 0.95,
            bounce_damping: 0.7,
            half_size: 0.3,
            spin_deg: -10.0,
        }
    }
}

/// Health item float animation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthItemTuning {
    /// Bob cycles per second
    pub bob_speed: f32,
    pub bob_height: f32,
}

impl Default for HealthItemTuning {
    fn default() -> Self {
        Self {
            bob_speed: 1.0,
            bob_height: 0.25,
        }
    }
}

/// Complete tuning set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub terrain: TerrainTuning,
    pub difficulty: DifficultyThresholds,
    pub session: SessionTuning,
    pub debris: DebrisTuning,
    pub health_item: HealthItemTuning,
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

pub(crate) fn unit(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitRange { name, value })
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document (missing fields use defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.player;
        positive("player.half_width", p.half_width)?;
        positive("player.half_height", p.half_height)?;
        positive("player.max_health", p.max_health as f32)?;
        positive("player.gravity", p.gravity)?;
        positive("player.max_jump_velocity", p.max_jump_velocity)?;
        positive("player.max_run_velocity", p.max_run_velocity)?;
        non_negative("player.max_acceleration", p.max_acceleration)?;
        non_negative("player.max_hold_jump_time", p.max_hold_jump_time)?;
        non_negative("player.jump_ground_threshold", p.jump_ground_threshold)?;
        unit("player.obstacle_speed_loss", p.obstacle_speed_loss)?;
        positive("player.invincibility_flash_time", p.invincibility_flash_time)?;
        positive("player.dying_flash_time", p.dying_flash_time)?;
        non_negative("player.obstacle_death_time", p.obstacle_death_time)?;
        non_negative("player.light_gate_death_time", p.light_gate_death_time)?;
        non_negative("player.fall_death_time", p.fall_death_time)?;
        positive("player.distance_unit", p.distance_unit)?;

        let t = &self.terrain;
        non_negative("terrain.min_height_from_bottom", t.min_height_from_bottom)?;
        non_negative("terrain.max_height_from_top", t.max_height_from_top)?;
        unit("terrain.jump_height_buffer", t.jump_height_buffer)?;
        unit("terrain.jump_distance_buffer", t.jump_distance_buffer)?;
        non_negative("terrain.min_gap", t.min_gap)?;

        self.difficulty.validate()?;

        let d = &self.debris;
        positive("debris.half_size", d.half_size)?;
        unit("debris.horizontal_damping", d.horizontal_damping)?;
        unit("debris.bounce_damping", d.bounce_damping)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "player": { "gravity": 80.0 } }"#).unwrap();
        assert_eq!(tuning.player.gravity, 80.0);
        assert_eq!(tuning.player.max_health, 3);
        assert_eq!(tuning.terrain.min_gap, 10.0);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Tuning::from_json(r#"{ "player": { "gravity": 0.0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NotPositive {
                name: "player.gravity",
                ..
            }
        ));

        let err = Tuning::from_json(r#"{ "terrain": { "jump_height_buffer": 1.5 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfUnitRange { .. }));

        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_json_roundtrip_keeps_values() {
        let mut tuning = Tuning::default();
        tuning.player.max_run_velocity = 42.0;
        let json = tuning.to_json().unwrap();
        let back = Tuning::from_json(&json).unwrap();
        assert_eq!(back.player.max_run_velocity, 42.0);
    }
}
