//! Round lifecycle: start or advance, cancel, fold into the game log, end the session.

use crate::logic::rotation::generate_round;
use crate::logic::scoring::revert_round_scores;
use crate::models::{GameRecord, Operation, Session, SessionError, SessionState};
use chrono::Utc;

/// Start the first round or advance to the next one.
///
/// Legal in Setup and between rounds only, so a round still waiting for scores
/// can never be replaced. Fails with `InsufficientPlayers` (and changes nothing)
/// when fewer than `num_courts * 4` players are available.
pub fn start_round(session: &mut Session) -> Result<(), SessionError> {
    session.ensure_allowed(Operation::StartRound)?;
    let checkpoint = session.checkpoint();
    let round = generate_round(session)?;
    log::info!(
        "session {}: round {} started on {} court(s)",
        session.id,
        round.round_number,
        round.matches.len()
    );
    session.current_round = Some(round);
    session.round_checkpoint = Some(checkpoint);
    session.started_at.get_or_insert_with(Utc::now);
    Ok(())
}

/// Throw away the round in progress as if it had never been generated.
///
/// Scores already entered for it are taken back out of the stats, and sit-out
/// counters, forced sit-outs and pair histories return to their pre-round values.
/// The round number is reused by the next round.
pub fn cancel_round(session: &mut Session) -> Result<(), SessionError> {
    session.ensure_allowed(Operation::CancelRound)?;
    revert_round_scores(session);
    if let Some(checkpoint) = session.round_checkpoint.take() {
        session.restore_checkpoint(checkpoint);
    }
    if let Some(round) = session.current_round.take() {
        log::info!("session {}: round {} cancelled", session.id, round.round_number);
    }
    Ok(())
}

/// Append every completed match of the current round to the game log.
pub(crate) fn fold_round(session: &mut Session) {
    let Some(round) = session.current_round.as_ref() else {
        return;
    };
    let records: Vec<GameRecord> = round
        .matches
        .iter()
        .filter_map(|m| GameRecord::from_match(round.round_number, m, &session.players))
        .collect();
    session.game_history.extend(records);
    session.round_checkpoint = None;
}

/// End the session. Completed matches of an unfinished round still go to the game log.
pub fn end_session(session: &mut Session) -> Result<(), SessionError> {
    session.ensure_allowed(Operation::EndSession)?;
    if session.state() == SessionState::RoundInProgress {
        fold_round(session);
    }
    session.ended = true;
    session.ended_at = Some(Utc::now());
    session.round_checkpoint = None;
    log::info!(
        "session {} ended after {} game(s)",
        session.id,
        session.game_history.len()
    );
    Ok(())
}
