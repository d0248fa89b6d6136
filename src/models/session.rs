//! Session aggregate: roster, courts, current round, histories.

use crate::models::error::SessionError;
use crate::models::game::Round;
use crate::models::history::{GameRecord, PairHistory};
use crate::models::player::{names_match, normalize_name, Player, PlayerId};
use crate::models::state::{Operation, SessionState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a session.
pub type SessionId = Uuid;

/// Rotation counters of one player, as they were before a round was generated.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerRotation {
    pub id: PlayerId,
    pub rounds_sat_out: u32,
    pub consecutive_rounds_sat_out: u32,
    pub force_sit_out: bool,
}

/// Everything round generation changes, captured so a cancelled round leaves no trace.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RotationCheckpoint {
    pub players: Vec<PlayerRotation>,
    pub partnerships: PairHistory,
    pub opponents: PairHistory,
    pub last_round_number: u32,
}

/// Full session state: roster, courts, round, and histories.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    /// Roster in insertion order.
    pub players: Vec<Player>,
    pub num_courts: u32,
    pub current_round: Option<Round>,
    /// Append-only log of completed matches.
    pub game_history: Vec<GameRecord>,
    pub partnerships: PairHistory,
    pub opponents: PairHistory,
    /// Number of the most recently generated round (0 before the first).
    pub last_round_number: u32,
    pub ended: bool,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
    /// Bumped by the store on every committed change.
    pub version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_checkpoint: Option<RotationCheckpoint>,
}

impl Session {
    /// Create a session in Setup with the given player names and court count.
    pub fn new<S: AsRef<str>>(player_names: &[S], num_courts: u32) -> Result<Self, SessionError> {
        if num_courts == 0 {
            return Err(SessionError::InvalidCourtCount);
        }
        if player_names.is_empty() {
            return Err(SessionError::EmptyRoster);
        }
        let now = Utc::now();
        let mut session = Self {
            id: Uuid::new_v4(),
            players: Vec::with_capacity(player_names.len()),
            num_courts,
            current_round: None,
            game_history: Vec::new(),
            partnerships: PairHistory::new(),
            opponents: PairHistory::new(),
            last_round_number: 0,
            ended: false,
            created_at: now,
            started_at: None,
            ended_at: None,
            updated_at: now,
            version: 0,
            round_checkpoint: None,
        };
        for name in player_names {
            session.push_player(name.as_ref())?;
        }
        Ok(session)
    }

    /// Current phase, derived from `ended`, `started_at` and the current round.
    pub fn state(&self) -> SessionState {
        if self.ended {
            SessionState::Ended
        } else if self.current_round.as_ref().is_some_and(|r| !r.completed) {
            SessionState::RoundInProgress
        } else if self.started_at.is_none() {
            SessionState::Setup
        } else {
            SessionState::BetweenRounds
        }
    }

    /// Fail with `StateConflict` unless `op` is legal right now.
    pub fn ensure_allowed(&self, op: Operation) -> Result<(), SessionError> {
        let state = self.state();
        if state.allows(op) {
            Ok(())
        } else {
            Err(SessionError::StateConflict {
                operation: op,
                state,
            })
        }
    }

    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn get_player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    fn check_name_free(&self, name: &str, except: Option<PlayerId>) -> Result<(), SessionError> {
        let taken = self
            .players
            .iter()
            .any(|p| Some(p.id) != except && names_match(&p.name, name));
        if taken {
            return Err(SessionError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    fn push_player(&mut self, name: &str) -> Result<PlayerId, SessionError> {
        let name = normalize_name(name)?;
        self.check_name_free(&name, None)?;
        let player = Player::new(name);
        let id = player.id;
        self.players.push(player);
        Ok(id)
    }

    /// Add a player (Setup or between rounds). Names are unique case-insensitively.
    pub fn add_player(&mut self, name: &str) -> Result<PlayerId, SessionError> {
        self.ensure_allowed(Operation::AddPlayer)?;
        self.push_player(name)
    }

    /// Remove a player and their pair history (Setup or between rounds).
    pub fn remove_player(&mut self, player_id: PlayerId) -> Result<(), SessionError> {
        self.ensure_allowed(Operation::RemovePlayer)?;
        let idx = self
            .players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or(SessionError::PlayerNotFound(player_id))?;
        self.players.remove(idx);
        self.partnerships.forget_player(player_id);
        self.opponents.forget_player(player_id);
        // The finished round is already in the game log; stop showing ids that no longer resolve.
        if self
            .current_round
            .as_ref()
            .is_some_and(|r| r.involves(player_id))
        {
            self.current_round = None;
        }
        Ok(())
    }

    /// Rename a player. Changing only the case of one's own name is allowed.
    pub fn rename_player(&mut self, player_id: PlayerId, name: &str) -> Result<(), SessionError> {
        self.ensure_allowed(Operation::RenamePlayer)?;
        let name = normalize_name(name)?;
        self.check_name_free(&name, Some(player_id))?;
        let p = self
            .get_player_mut(player_id)
            .ok_or(SessionError::PlayerNotFound(player_id))?;
        p.name = name;
        Ok(())
    }

    /// Flip a player's forced sit-out flag; returns the new value.
    pub fn toggle_sit_out(&mut self, player_id: PlayerId) -> Result<bool, SessionError> {
        self.ensure_allowed(Operation::ToggleSitOut)?;
        let p = self
            .get_player_mut(player_id)
            .ok_or(SessionError::PlayerNotFound(player_id))?;
        p.force_sit_out = !p.force_sit_out;
        Ok(p.force_sit_out)
    }

    /// Change the court count (Setup or between rounds). Player count is checked at round start.
    pub fn set_num_courts(&mut self, num_courts: u32) -> Result<(), SessionError> {
        self.ensure_allowed(Operation::SetCourts)?;
        if num_courts == 0 {
            return Err(SessionError::InvalidCourtCount);
        }
        self.num_courts = num_courts;
        Ok(())
    }

    /// Snapshot rotation counters and pair histories before generating a round.
    pub fn checkpoint(&self) -> RotationCheckpoint {
        RotationCheckpoint {
            players: self
                .players
                .iter()
                .map(|p| PlayerRotation {
                    id: p.id,
                    rounds_sat_out: p.rounds_sat_out,
                    consecutive_rounds_sat_out: p.consecutive_rounds_sat_out,
                    force_sit_out: p.force_sit_out,
                })
                .collect(),
            partnerships: self.partnerships.clone(),
            opponents: self.opponents.clone(),
            last_round_number: self.last_round_number,
        }
    }

    /// Put back what [`Session::checkpoint`] captured.
    pub fn restore_checkpoint(&mut self, checkpoint: RotationCheckpoint) {
        for saved in checkpoint.players {
            if let Some(p) = self.get_player_mut(saved.id) {
                p.rounds_sat_out = saved.rounds_sat_out;
                p.consecutive_rounds_sat_out = saved.consecutive_rounds_sat_out;
                p.force_sit_out = saved.force_sit_out;
            }
        }
        self.partnerships = checkpoint.partnerships;
        self.opponents = checkpoint.opponents;
        self.last_round_number = checkpoint.last_round_number;
    }
}
