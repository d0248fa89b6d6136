//! Court rotation kiosk: library with models, rotation logic, and the session store.

pub mod config;
pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    cancel_round, end_session, generate_round, history_csv, rankings, start_round, submit_scores,
    ScoreOutcome, ScoreSubmission, Standing,
};
pub use models::{
    ErrorKind, GameRecord, Match, MatchId, Operation, PairHistory, Player, PlayerId, Round,
    ScoreError, Session, SessionError, SessionId, SessionState, Team,
};
pub use store::{SessionStore, StoreError};
