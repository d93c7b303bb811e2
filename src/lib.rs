//! Cave Runner - An endless side-scrolling runner simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain generation, player physics, collisions, session)
//! - `screen`: World-space screen edges and camera follow
//! - `tuning`: Data-driven game balance
//! - `results`: End-of-run summary
//! - `best_score`: Best distance persistence

pub mod best_score;
pub mod error;
pub mod results;
pub mod screen;
pub mod sim;
pub mod tuning;

pub use best_score::{BestDistanceStore, JsonFileStore, MemoryStore};
pub use error::{ConfigError, GenerationError, PersistenceError, SessionError};
pub use results::ResultSummary;
pub use screen::ScreenBounds;
pub use tuning::Tuning;

use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (50 Hz)
    pub const SIM_DT: f32 = 1.0 / 50.0;

    /// Number of horizontal slices the screen is divided into (player sits one slice in)
    pub const SCREEN_SEGMENTS: u32 = 8;

    /// Extra reach on downward ground rays so a player resting exactly on a
    /// surface still registers it
    pub const GROUND_SKIN: f32 = 1.0e-3;

    /// Forward crash ray extra reach beyond half the player's half-width
    pub const CRASH_RAY_PADDING: f32 = 0.1;

    /// Health item rest height above the ground, in item half-heights
    pub const HEALTH_REST_FACTOR: f32 = 1.5;
}

/// Sample uniformly from `[lo, hi]`, collapsing to `lo` when the range is
/// empty or inverted.
///
/// Returns the sample and whether the range had to be collapsed.
#[inline]
pub fn sample_range<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> (f32, bool) {
    if !(hi > lo) {
        return (lo, hi < lo || hi.is_nan());
    }
    (rng.random_range(lo..=hi), false)
}
