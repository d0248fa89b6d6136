//! Player and the running statistics that drive rotation fairness.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in matches, benches and pair history).
pub type PlayerId = Uuid;

/// Longest accepted player name, in characters.
pub const MAX_NAME_LEN: usize = 30;

/// A player on the session roster.
///
/// Invariant: `games_played == wins + losses`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    /// Sum of (points for - points against) over every scored match.
    pub point_differential: i64,
    /// Lifetime count of rounds spent on the bench.
    pub rounds_sat_out: u32,
    /// Rounds benched in a row; reset to 0 the round the player plays.
    pub consecutive_rounds_sat_out: u32,
    /// Operator request to bench this player next round. Cleared once honored.
    pub force_sit_out: bool,
}

impl Player {
    /// Create a new player with the given name. Counters start at zero.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            games_played: 0,
            wins: 0,
            losses: 0,
            point_differential: 0,
            rounds_sat_out: 0,
            consecutive_rounds_sat_out: 0,
            force_sit_out: false,
        }
    }

    /// Record a finished match from this player's side.
    pub fn record_result(&mut self, points_for: u32, points_against: u32) {
        self.games_played += 1;
        if points_for > points_against {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
        self.point_differential += i64::from(points_for) - i64::from(points_against);
    }

    /// Undo a result previously applied with [`Player::record_result`].
    pub fn revert_result(&mut self, points_for: u32, points_against: u32) {
        self.games_played = self.games_played.saturating_sub(1);
        if points_for > points_against {
            self.wins = self.wins.saturating_sub(1);
        } else {
            self.losses = self.losses.saturating_sub(1);
        }
        self.point_differential -= i64::from(points_for) - i64::from(points_against);
    }

    /// Record that this player sat out one round.
    pub fn record_sat_out(&mut self) {
        self.rounds_sat_out += 1;
        self.consecutive_rounds_sat_out += 1;
    }

    /// Record that this player was put on a court this round.
    pub fn record_on_court(&mut self) {
        self.consecutive_rounds_sat_out = 0;
    }

    /// Win ratio in `0.0..=1.0`; `0.0` before the first game.
    pub fn win_percentage(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.games_played)
        }
    }
}

/// Normalize and validate a proposed player name: trimmed, 1..=30 characters.
pub fn normalize_name(name: &str) -> Result<String, crate::models::SessionError> {
    use crate::models::SessionError;
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(SessionError::EmptyName);
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(SessionError::NameTooLong { max: MAX_NAME_LEN });
    }
    Ok(trimmed.to_string())
}

/// Case-insensitive name comparison used for roster uniqueness.
pub fn names_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
