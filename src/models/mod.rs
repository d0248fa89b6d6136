//! Data structures for a rotation session: players, matches, rounds, session state.

mod error;
mod game;
mod history;
mod player;
mod session;
mod state;

pub use error::{ErrorKind, ScoreError, SessionError};
pub use game::{Match, MatchId, Round, Team};
pub use history::{GameRecord, PairCount, PairHistory, PairKey, PlayerRef};
pub use player::{names_match, normalize_name, Player, PlayerId, MAX_NAME_LEN};
pub use session::{PlayerRotation, RotationCheckpoint, Session, SessionId};
pub use state::{Operation, SessionState};
