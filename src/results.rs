//! End-of-run summary
//!
//! Built once when the session reaches game over. The presentation layer shows
//! the distance, a sentence describing how the run ended and an encouragement
//! line that depends on how deep the player got.

use serde::{Deserialize, Serialize};

use crate::sim::difficulty::{DifficultyThresholds, DifficultyTier};
use crate::sim::player::{LastAction, LastCollision, Player};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    /// Whole metres travelled
    pub distance: u32,
    pub last_action: LastAction,
    pub last_collision: LastCollision,
    pub tier_reached: DifficultyTier,
    pub cause: String,
    pub encouragement: String,
    /// Filled in once the distance has been submitted to a best-score store
    pub best_distance: Option<u32>,
    pub new_best: bool,
}

impl ResultSummary {
    pub fn from_player(player: &Player, thresholds: &DifficultyThresholds) -> Self {
        let distance = player.distance.max(0.0).floor() as u32;
        let tier_reached = thresholds.tier_for(player.distance);
        Self {
            distance,
            last_action: player.last_action,
            last_collision: player.last_collision,
            tier_reached,
            cause: cause_message(player.last_action, player.last_collision).to_string(),
            encouragement: encouragement(tier_reached).to_string(),
            best_distance: None,
            new_best: false,
        }
    }

    /// Full results text
    pub fn message(&self) -> String {
        let mut text = format!("{}\nYou made it {} m.", self.cause, self.distance);
        if self.new_best {
            text.push_str("\nNew best distance!");
        } else if let Some(best) = self.best_distance {
            text.push_str(&format!("\nBest: {best} m."));
        }
        text.push('\n');
        text.push_str(&self.encouragement);
        text
    }
}

/// How the run ended, from what the player was doing and what they hit last
pub fn cause_message(action: LastAction, collision: LastCollision) -> &'static str {
    match (action, collision) {
        (LastAction::Run, LastCollision::Pit) => "You ran straight off the edge into a pit.",
        (LastAction::Jump, LastCollision::Pit) => {
            "Your jump came up short and you fell into a pit."
        }
        (LastAction::Run, LastCollision::Ground) => "You ran face first into a rock wall.",
        (LastAction::Jump, LastCollision::Ground) => "You jumped into the side of a ledge.",
        (LastAction::Run, LastCollision::Obstacle) => "You ran into one stalagmite too many.",
        (LastAction::Jump, LastCollision::Obstacle) => "You came down on a stalagmite.",
        (LastAction::Run, LastCollision::LightGate) => {
            "You ran through a light gate of the wrong colour."
        }
        (LastAction::Jump, LastCollision::LightGate) => {
            "You leapt into a light gate of the wrong colour."
        }
    }
}

pub fn encouragement(tier: DifficultyTier) -> &'static str {
    match tier {
        DifficultyTier::VeryEasy => "The cave has only just begun. Try again!",
        DifficultyTier::Easy => "Not bad! You're finding your feet.",
        DifficultyTier::Medium => "Good run! You're getting the hang of it.",
        DifficultyTier::Hard => "Great run! Few make it this deep.",
        DifficultyTier::Insane => "Incredible! You reached the depths of the cave.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::ScreenBounds;
    use crate::sim::entity::ColourPhase;
    use crate::tuning::PlayerTuning;

    fn player_at(distance: f32) -> Player {
        let mut p = Player::spawn(
            &PlayerTuning::default(),
            &ScreenBounds::default(),
            0.0,
            ColourPhase::One,
        );
        p.distance = distance;
        p
    }

    #[test]
    fn test_distance_is_floored() {
        let s = ResultSummary::from_player(&player_at(149.9), &DifficultyThresholds::default());
        assert_eq!(s.distance, 149);
        assert_eq!(s.tier_reached, DifficultyTier::Easy);
    }

    #[test]
    fn test_cause_follows_action_and_collision() {
        let mut p = player_at(10.0);
        p.last_action = LastAction::Jump;
        p.last_collision = LastCollision::LightGate;
        let s = ResultSummary::from_player(&p, &DifficultyThresholds::default());
        assert!(s.cause.contains("light gate"));
        assert_eq!(s.encouragement, encouragement(DifficultyTier::VeryEasy));
    }

    #[test]
    fn test_every_cause_is_distinct() {
        let mut seen = std::collections::HashSet::new();
        for a in [LastAction::Run, LastAction::Jump] {
            for c in [
                LastCollision::Pit,
                LastCollision::Ground,
                LastCollision::Obstacle,
                LastCollision::LightGate,
            ] {
                assert!(seen.insert(cause_message(a, c)));
            }
        }
    }

    #[test]
    fn test_message_mentions_best() {
        let thresholds = DifficultyThresholds::default();
        let mut s = ResultSummary::from_player(&player_at(1200.0), &thresholds);
        s.best_distance = Some(1500);
        let text = s.message();
        assert!(text.contains("1200 m"));
        assert!(text.contains("Best: 1500 m"));

        s.new_best = true;
        assert!(s.message().contains("New best"));
    }
}
