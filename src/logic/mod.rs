//! Session business logic: bench selection, pairing, rounds, scores, rankings.

mod bench;
mod lifecycle;
mod pairing;
mod rotation;
mod scoring;
mod standings;

pub use bench::{select_bench, BenchSelection};
pub use lifecycle::{cancel_round, end_session, start_round};
pub use pairing::{
    covers_exactly, AutoSearch, CourtSearch, ExhaustiveSearch, Matchup, PairingCost,
    PairingObjective, RepeatAvoidance, RestartSearch, DEFAULT_RESTARTS, EXHAUSTIVE_MAX_PLAYERS,
};
pub use rotation::{generate_round, generate_round_with};
pub use scoring::{submit_scores, ScoreOutcome, ScoreSubmission};
pub use standings::{history_csv, rankings, Standing};
