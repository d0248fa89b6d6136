//! Session states and the table of operations legal in each.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Observable phase of a session, derived from its round and `ended` flag.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No round has been started yet.
    Setup,
    /// The current round has at least one match without a score.
    RoundInProgress,
    /// Play has started and no round is waiting for scores.
    BetweenRounds,
    /// Terminal. Read-only until deleted.
    Ended,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Setup => "in setup",
            SessionState::RoundInProgress => "mid-round",
            SessionState::BetweenRounds => "between rounds",
            SessionState::Ended => "ended",
        };
        f.write_str(s)
    }
}

/// A mutating verb, checked against [`SessionState`] before it runs.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    AddPlayer,
    RemovePlayer,
    RenamePlayer,
    ToggleSitOut,
    SetCourts,
    StartRound,
    CancelRound,
    SubmitScores,
    EndSession,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operation::AddPlayer => "add a player",
            Operation::RemovePlayer => "remove a player",
            Operation::RenamePlayer => "rename a player",
            Operation::ToggleSitOut => "toggle sit-out",
            Operation::SetCourts => "change the number of courts",
            Operation::StartRound => "start a round",
            Operation::CancelRound => "cancel the round",
            Operation::SubmitScores => "submit scores",
            Operation::EndSession => "end the session",
        };
        f.write_str(s)
    }
}

impl SessionState {
    pub fn allows(self, op: Operation) -> bool {
        use Operation::*;
        match self {
            SessionState::Setup | SessionState::BetweenRounds => matches!(
                op,
                AddPlayer | RemovePlayer | RenamePlayer | ToggleSitOut | SetCourts | StartRound
                    | EndSession
            ),
            SessionState::RoundInProgress => matches!(op, SubmitScores | CancelRound | EndSession),
            SessionState::Ended => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ended_rejects_everything() {
        for op in [
            Operation::AddPlayer,
            Operation::StartRound,
            Operation::SubmitScores,
            Operation::EndSession,
        ] {
            assert!(!SessionState::Ended.allows(op));
        }
    }

    #[test]
    fn roster_is_frozen_mid_round() {
        let s = SessionState::RoundInProgress;
        assert!(!s.allows(Operation::AddPlayer));
        assert!(!s.allows(Operation::RemovePlayer));
        assert!(!s.allows(Operation::SetCourts));
        assert!(!s.allows(Operation::StartRound));
        assert!(s.allows(Operation::SubmitScores));
        assert!(s.allows(Operation::CancelRound));
    }

    #[test]
    fn scores_need_a_round_in_progress() {
        assert!(!SessionState::Setup.allows(Operation::SubmitScores));
        assert!(!SessionState::BetweenRounds.allows(Operation::SubmitScores));
        assert!(!SessionState::BetweenRounds.allows(Operation::CancelRound));
    }
}
