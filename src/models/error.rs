//! Errors returned by session operations.

use crate::models::game::MatchId;
use crate::models::player::PlayerId;
use crate::models::session::SessionId;
use crate::models::state::{Operation, SessionState};
use serde::Serialize;
use thiserror::Error;

/// Broad category of a [`SessionError`], used by callers to pick a response.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    InsufficientPlayers,
    ScoreValidation,
    StateConflict,
    NotFound,
}

/// Why a score submission was rejected.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ScoreError {
    #[error("no scores provided")]
    NoScores,
    #[error("missing score for match {match_id}")]
    MissingScore { match_id: MatchId },
    #[error("tie not allowed for match {match_id}")]
    Tie { match_id: MatchId },
}

/// Errors that can occur during session operations. A rejected operation never
/// leaves a partial change behind.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum SessionError {
    #[error("Player name must not be empty")]
    EmptyName,
    #[error("Player name must be at most {max} characters")]
    NameTooLong { max: usize },
    /// Names are unique case-insensitively.
    #[error("A player named \"{0}\" already exists")]
    DuplicateName(String),
    #[error("Number of courts must be at least 1")]
    InvalidCourtCount,
    #[error("A session needs at least one player")]
    EmptyRoster,
    #[error("Need at least {required} available players, have {available}")]
    InsufficientPlayers { required: usize, available: usize },
    #[error("Invalid scores: {0}")]
    Score(#[from] ScoreError),
    #[error("Cannot {operation} while session is {state}")]
    StateConflict {
        operation: Operation,
        state: SessionState,
    },
    #[error("Session {0} not found")]
    SessionNotFound(SessionId),
    #[error("Player {0} not found")]
    PlayerNotFound(PlayerId),
    #[error("Match {0} not found in the current round")]
    MatchNotFound(MatchId),
}

impl SessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::EmptyName
            | SessionError::NameTooLong { .. }
            | SessionError::DuplicateName(_)
            | SessionError::InvalidCourtCount
            | SessionError::EmptyRoster => ErrorKind::Validation,
            SessionError::InsufficientPlayers { .. } => ErrorKind::InsufficientPlayers,
            SessionError::Score(_) => ErrorKind::ScoreValidation,
            SessionError::StateConflict { .. } => ErrorKind::StateConflict,
            SessionError::SessionNotFound(_)
            | SessionError::PlayerNotFound(_)
            | SessionError::MatchNotFound(_) => ErrorKind::NotFound,
        }
    }
}
