//! Pair counters (partners / opponents) and the append-only game log.

use crate::models::game::Match;
use crate::models::player::{Player, PlayerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unordered pair of players; the smaller id is always first.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct PairKey(PlayerId, PlayerId);

impl PairKey {
    pub fn new(a: PlayerId, b: PlayerId) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.0 == id || self.1 == id
    }
}

/// Serialized form of one [`PairHistory`] entry (JSON maps need string keys).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PairCount {
    pub players: [PlayerId; 2],
    pub count: u32,
}

/// How many earlier rounds each pair spent together (as partners or as opponents).
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<PairCount>", into = "Vec<PairCount>")]
pub struct PairHistory {
    counts: HashMap<PairKey, u32>,
}

impl PairHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, a: PlayerId, b: PlayerId) -> u32 {
        self.counts.get(&PairKey::new(a, b)).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, a: PlayerId, b: PlayerId) {
        *self.counts.entry(PairKey::new(a, b)).or_insert(0) += 1;
    }

    /// Drop every pair involving a player who left the roster.
    pub fn forget_player(&mut self, id: PlayerId) {
        self.counts.retain(|k, _| !k.contains(id));
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl From<Vec<PairCount>> for PairHistory {
    fn from(entries: Vec<PairCount>) -> Self {
        let counts = entries
            .into_iter()
            .map(|e| (PairKey::new(e.players[0], e.players[1]), e.count))
            .collect();
        Self { counts }
    }
}

impl From<PairHistory> for Vec<PairCount> {
    fn from(history: PairHistory) -> Self {
        let mut entries: Vec<PairCount> = history
            .counts
            .into_iter()
            .map(|(k, count)| PairCount {
                players: [k.0, k.1],
                count,
            })
            .collect();
        entries.sort_by_key(|e| e.players);
        entries
    }
}

/// Player as recorded in the game log (name captured when the round was folded).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerRef {
    pub id: PlayerId,
    pub name: String,
}

/// Immutable record of one completed match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub round_number: u32,
    pub court_number: u32,
    pub team_1: Vec<PlayerRef>,
    pub team_2: Vec<PlayerRef>,
    pub team_1_score: u32,
    pub team_2_score: u32,
    pub recorded_at: DateTime<Utc>,
}

impl GameRecord {
    /// Build a record from a completed match; `None` if it has no scores.
    pub fn from_match(round_number: u32, m: &Match, roster: &[Player]) -> Option<Self> {
        let (team_1_score, team_2_score) = m.scores()?;
        let lookup = |id: &PlayerId| PlayerRef {
            id: *id,
            name: roster
                .iter()
                .find(|p| p.id == *id)
                .map(|p| p.name.clone())
                .unwrap_or_default(),
        };
        Some(Self {
            round_number,
            court_number: m.court_number,
            team_1: m.team_1.iter().map(lookup).collect(),
            team_2: m.team_2.iter().map(lookup).collect(),
            team_1_score,
            team_2_score,
            recorded_at: Utc::now(),
        })
    }
}
