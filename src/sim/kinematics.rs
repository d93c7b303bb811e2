//! Jump kinematics
//!
//! Closed-form jump envelope used by the terrain generator to keep every gap
//! and height change within reach of the player.

use serde::{Deserialize, Serialize};

/// Movement constants that bound what a single jump can do
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpKinematics {
    pub gravity: f32,
    pub jump_velocity: f32,
    /// Gravity suspension available to a held jump
    pub hold_jump_time: f32,
    /// Horizontal speed carried through the jump
    pub run_velocity: f32,
}

impl JumpKinematics {
    pub fn new(gravity: f32, jump_velocity: f32, hold_jump_time: f32, run_velocity: f32) -> Self {
        Self {
            gravity,
            jump_velocity,
            hold_jump_time,
            run_velocity,
        }
    }

    /// Height gained while gravity is suspended by holding jump
    #[inline]
    pub fn max_hold_jump_height(&self) -> f32 {
        self.jump_velocity * self.hold_jump_time
    }

    #[inline]
    pub fn time_to_apex(&self) -> f32 {
        self.jump_velocity / self.gravity
    }

    /// Height of the un-held part of the jump.
    ///
    /// Deliberately generous (`v t + ½ g t²`): the extra over the ballistic apex
    /// is absorbed by the height buffer.
    pub fn natural_jump_height(&self) -> f32 {
        let t = self.time_to_apex();
        self.jump_velocity * t + 0.5 * self.gravity * t * t
    }

    pub fn max_jump_height(&self) -> f32 {
        self.max_hold_jump_height() + self.natural_jump_height()
    }

    pub fn time_to_reach_max_jump(&self) -> f32 {
        self.time_to_apex() + self.hold_jump_time
    }

    /// Time to drop `height_delta` from rest. Negative deltas clamp to zero.
    pub fn time_to_fall(&self, height_delta: f32) -> f32 {
        if height_delta <= 0.0 {
            return 0.0;
        }
        (2.0 * height_delta / self.gravity).sqrt()
    }

    /// Horizontal distance covered in `total_time`
    #[inline]
    pub fn max_gap(&self, total_time: f32) -> f32 {
        total_time * self.run_velocity
    }
}
