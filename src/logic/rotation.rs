//! Round generation: bench selection, then court and team assignment.

use crate::logic::bench::select_bench;
use crate::logic::pairing::{AutoSearch, CourtSearch, RepeatAvoidance};
use crate::models::{Match, Round, Session, SessionError};
use rand::Rng;

/// Generate the next round for `session` and record its effects on rotation counters
/// and pair histories. On error nothing is changed.
///
/// 1. Bench flagged players (clearing the flag) and as many more as the courts require.
/// 2. Split the rest into courts and teams, minimizing repeated partners, then repeated opponents.
/// 3. Sitters get `rounds_sat_out += 1`; everyone on court resets `consecutive_rounds_sat_out`.
pub fn generate_round(session: &mut Session) -> Result<Round, SessionError> {
    generate_round_with(session, &AutoSearch::default(), &mut rand::thread_rng())
}

/// [`generate_round`] with an explicit search strategy and random source.
pub fn generate_round_with<S: CourtSearch, R: Rng + ?Sized>(
    session: &mut Session,
    search: &S,
    rng: &mut R,
) -> Result<Round, SessionError> {
    let selection = select_bench(&session.players, session.num_courts, rng)?;

    let matchups = {
        let objective = RepeatAvoidance {
            partnerships: &session.partnerships,
            opponents: &session.opponents,
        };
        search.assign(&selection.playing, &objective, rng)
    };

    let matches: Vec<Match> = matchups
        .iter()
        .zip(1u32..)
        .map(|(m, court)| Match::new(court, m.team_1, m.team_2))
        .collect();

    for m in &matches {
        session.partnerships.increment(m.team_1[0], m.team_1[1]);
        session.partnerships.increment(m.team_2[0], m.team_2[1]);
        for a in m.team_1 {
            for b in m.team_2 {
                session.opponents.increment(a, b);
            }
        }
    }

    let benched = selection.benched();
    for p in session.players.iter_mut() {
        if benched.contains(&p.id) {
            p.record_sat_out();
            p.force_sit_out = false;
        } else {
            p.record_on_court();
        }
    }

    session.last_round_number += 1;
    log::debug!(
        "round {}: {} courts, {} benched",
        session.last_round_number,
        matches.len(),
        benched.len()
    );
    Ok(Round::new(session.last_round_number, matches, benched))
}
