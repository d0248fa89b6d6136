//! Score submission: validate a batch, apply it to matches and player stats.

use crate::logic::lifecycle::fold_round;
use crate::models::{Match, MatchId, Operation, Player, ScoreError, Session, SessionError};

/// One match's submitted scores. Either may be missing as submitted; both are required.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScoreSubmission {
    pub match_id: MatchId,
    pub team_1_score: Option<u32>,
    pub team_2_score: Option<u32>,
}

impl ScoreSubmission {
    pub fn new(match_id: MatchId, team_1_score: u32, team_2_score: u32) -> Self {
        Self {
            match_id,
            team_1_score: Some(team_1_score),
            team_2_score: Some(team_2_score),
        }
    }
}

/// Result of a successful submission.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScoreOutcome {
    pub applied: usize,
    /// True once every match in the round has a score.
    pub round_completed: bool,
}

/// Check every submission against the current round without touching anything.
fn validate(
    session: &Session,
    scores: &[ScoreSubmission],
) -> Result<Vec<(MatchId, u32, u32)>, SessionError> {
    if scores.is_empty() {
        return Err(ScoreError::NoScores.into());
    }
    let round = session
        .current_round
        .as_ref()
        .ok_or(SessionError::StateConflict {
            operation: Operation::SubmitScores,
            state: session.state(),
        })?;
    scores
        .iter()
        .map(|s| {
            if round.get_match(s.match_id).is_none() {
                return Err(SessionError::MatchNotFound(s.match_id));
            }
            let (a, b) = match (s.team_1_score, s.team_2_score) {
                (Some(a), Some(b)) => (a, b),
                _ => return Err(ScoreError::MissingScore { match_id: s.match_id }.into()),
            };
            if a == b {
                return Err(ScoreError::Tie { match_id: s.match_id }.into());
            }
            Ok((s.match_id, a, b))
        })
        .collect()
}

/// Call `f(player, points_for, points_against)` for each of the four players on court.
fn for_each_side(
    players: &mut [Player],
    m: &Match,
    team_1_score: u32,
    team_2_score: u32,
    f: fn(&mut Player, u32, u32),
) {
    for p in players.iter_mut() {
        if m.team_1.contains(&p.id) {
            f(p, team_1_score, team_2_score);
        } else if m.team_2.contains(&p.id) {
            f(p, team_2_score, team_1_score);
        }
    }
}

/// Apply a batch of scores to the current round, all or nothing.
///
/// The batch may cover only some matches. Re-scoring a match replaces its earlier
/// result in the stats instead of counting it twice. When the last match is scored
/// the round is folded into the game log.
pub fn submit_scores(
    session: &mut Session,
    scores: &[ScoreSubmission],
) -> Result<ScoreOutcome, SessionError> {
    session.ensure_allowed(Operation::SubmitScores)?;
    let validated = validate(session, scores)?;

    let no_round = SessionError::StateConflict {
        operation: Operation::SubmitScores,
        state: session.state(),
    };
    let players = &mut session.players;
    let round = session.current_round.as_mut().ok_or(no_round)?;

    for (match_id, team_1_score, team_2_score) in &validated {
        let m = round
            .get_match_mut(*match_id)
            .ok_or(SessionError::MatchNotFound(*match_id))?;
        if let Some((old_1, old_2)) = m.scores() {
            for_each_side(players, m, old_1, old_2, Player::revert_result);
        }
        m.set_scores(*team_1_score, *team_2_score);
        for_each_side(players, m, *team_1_score, *team_2_score, Player::record_result);
    }
    round.refresh_completed();
    let round_completed = round.completed;

    log::info!(
        "session {}: scored {} match(es), round complete: {}",
        session.id,
        validated.len(),
        round_completed
    );

    if round_completed {
        fold_round(session);
    }

    Ok(ScoreOutcome {
        applied: validated.len(),
        round_completed,
    })
}

/// Take back the stats of every scored match in the current round (used when cancelling it).
pub(crate) fn revert_round_scores(session: &mut Session) {
    let players = &mut session.players;
    if let Some(round) = session.current_round.as_mut() {
        for m in round.matches.iter_mut() {
            if let Some((a, b)) = m.scores() {
                for_each_side(players, m, a, b, Player::revert_result);
                m.clear_scores();
            }
        }
        round.refresh_completed();
    }
}
