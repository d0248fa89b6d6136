//! Match, Team, and Round for doubles play on numbered courts.

use crate::models::player::PlayerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Two distinct players. Order matters for display only.
pub type Team = [PlayerId; 2];

/// One court's pairing for a round.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    /// 1-based, dense within a round.
    pub court_number: u32,
    pub team_1: Team,
    pub team_2: Team,
    pub team_1_score: Option<u32>,
    pub team_2_score: Option<u32>,
    /// True iff both scores are present.
    pub completed: bool,
}

impl Match {
    pub fn new(court_number: u32, team_1: Team, team_2: Team) -> Self {
        Self {
            id: Uuid::new_v4(),
            court_number,
            team_1,
            team_2,
            team_1_score: None,
            team_2_score: None,
            completed: false,
        }
    }

    /// Both scores, once the match has been completed.
    pub fn scores(&self) -> Option<(u32, u32)> {
        match (self.team_1_score, self.team_2_score) {
            (Some(a), Some(b)) => Some((a, b)),
            _ => None,
        }
    }

    pub fn set_scores(&mut self, team_1_score: u32, team_2_score: u32) {
        self.team_1_score = Some(team_1_score);
        self.team_2_score = Some(team_2_score);
        self.completed = true;
    }

    pub fn clear_scores(&mut self) {
        self.team_1_score = None;
        self.team_2_score = None;
        self.completed = false;
    }

    /// All four players on court.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.team_1.iter().chain(self.team_2.iter()).copied()
    }

    pub fn involves(&self, player_id: PlayerId) -> bool {
        self.player_ids().any(|id| id == player_id)
    }
}

/// One generation of court/team/bench assignments.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub round_number: u32,
    /// One per court, ordered by `court_number`.
    pub matches: Vec<Match>,
    pub benched: Vec<PlayerId>,
    /// True iff every match is completed.
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Round {
    pub fn new(round_number: u32, matches: Vec<Match>, benched: Vec<PlayerId>) -> Self {
        Self {
            round_number,
            matches,
            benched,
            completed: false,
            created_at: Utc::now(),
        }
    }

    /// Recompute `completed` from the matches.
    pub fn refresh_completed(&mut self) {
        self.completed = !self.matches.is_empty() && self.matches.iter().all(|m| m.completed);
    }

    pub fn get_match(&self, id: MatchId) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn get_match_mut(&mut self, id: MatchId) -> Option<&mut Match> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    pub fn involves(&self, player_id: PlayerId) -> bool {
        self.benched.contains(&player_id) || self.matches.iter().any(|m| m.involves(player_id))
    }
}
