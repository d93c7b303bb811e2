//! Screen bounds in world space
//!
//! Everything that scrolls uses these edges to decide when to spawn the next
//! segment and when to recycle off-screen entities.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::SCREEN_SEGMENTS;

/// Visible region edges in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenBounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Default for ScreenBounds {
    fn default() -> Self {
        // 16:9 orthographic view, half-height 22.5
        Self::from_camera(Vec2::ZERO, Vec2::new(40.0, 22.5))
    }
}

impl ScreenBounds {
    pub fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Build bounds from a camera centre and half-extents of the viewport
    pub fn from_camera(center: Vec2, half_size: Vec2) -> Self {
        Self {
            left: center.x - half_size.x,
            right: center.x + half_size.x,
            top: center.y + half_size.y,
            bottom: center.y - half_size.y,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    /// Width of one screen slice
    pub fn segment_width(&self) -> f32 {
        self.width() / SCREEN_SEGMENTS as f32
    }

    /// Where the player stands: one slice in from the left edge
    pub fn player_anchor_x(&self) -> f32 {
        self.left + self.segment_width()
    }
}

/// Vertical camera offset that keeps the space above the player's head visible.
///
/// Zero while the head room fits under the top edge, otherwise the overshoot.
pub fn camera_offset(above_head: f32, screen: &ScreenBounds) -> f32 {
    if above_head > screen.top {
        above_head - screen.top
    } else {
        0.0
    }
}
