//! Bench selection: who sits out the next round.

use crate::models::{Player, PlayerId, SessionError};
use rand::Rng;

/// Outcome of bench selection: disjoint, together covering the whole roster.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BenchSelection {
    /// Players flagged with `force_sit_out`.
    pub forced: Vec<PlayerId>,
    /// Players benched by rotation to fit the courts.
    pub rotated: Vec<PlayerId>,
    /// Exactly `num_courts * 4` players, in roster order.
    pub playing: Vec<PlayerId>,
}

impl BenchSelection {
    /// Forced first, then rotation, as shown on the bench.
    pub fn benched(&self) -> Vec<PlayerId> {
        self.forced.iter().chain(self.rotated.iter()).copied().collect()
    }
}

/// Pick the bench for the next round.
///
/// Flagged players always sit. Of the rest, `available - num_courts * 4` more sit,
/// most eligible first:
/// 1. did not sit last round (a repeat only happens when there is no one else),
/// 2. most games played,
/// 3. fewest rounds sat out so far,
/// 4. random.
pub fn select_bench<R: Rng + ?Sized>(
    players: &[Player],
    num_courts: u32,
    rng: &mut R,
) -> Result<BenchSelection, SessionError> {
    let required = num_courts as usize * 4;
    let (forced, available): (Vec<&Player>, Vec<&Player>) =
        players.iter().partition(|p| p.force_sit_out);

    if available.len() < required {
        return Err(SessionError::InsufficientPlayers {
            required,
            available: available.len(),
        });
    }

    let extra = available.len() - required;
    let mut ranked: Vec<(&Player, u32)> = available.iter().map(|p| (*p, rng.gen())).collect();
    ranked.sort_by_key(|(p, tiebreak)| {
        (
            p.consecutive_rounds_sat_out > 0,
            std::cmp::Reverse(p.games_played),
            p.rounds_sat_out,
            *tiebreak,
        )
    });

    let rotated: Vec<PlayerId> = ranked.iter().take(extra).map(|(p, _)| p.id).collect();
    let playing = available
        .iter()
        .map(|p| p.id)
        .filter(|id| !rotated.contains(id))
        .collect();

    log::debug!(
        "bench: {} forced, {} by rotation, {} on court",
        forced.len(),
        rotated.len(),
        required
    );

    Ok(BenchSelection {
        forced: forced.iter().map(|p| p.id).collect(),
        rotated,
        playing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(n: usize) -> Vec<Player> {
        (0..n).map(|i| Player::new(format!("P{i}"))).collect()
    }

    #[test]
    fn repeat_sitter_is_last_choice() {
        let mut players = roster(6);
        players[0].consecutive_rounds_sat_out = 1;
        players[0].rounds_sat_out = 1;
        players[1].games_played = 3;
        players[1].wins = 3;
        let sel = select_bench(&players, 1, &mut rand::thread_rng()).unwrap();
        assert_eq!(sel.rotated.len(), 2);
        assert!(sel.rotated.contains(&players[1].id));
        assert!(!sel.rotated.contains(&players[0].id));
    }

    #[test]
    fn fewer_sit_outs_sit_first_among_equals() {
        let mut players = roster(5);
        for p in players.iter_mut().skip(1) {
            p.rounds_sat_out = 2;
        }
        let sel = select_bench(&players, 1, &mut rand::thread_rng()).unwrap();
        assert_eq!(sel.rotated, vec![players[0].id]);
    }

    #[test]
    fn forced_do_not_count_toward_courts() {
        let mut players = roster(5);
        players[4].force_sit_out = true;
        let sel = select_bench(&players, 1, &mut rand::thread_rng()).unwrap();
        assert_eq!(sel.forced, vec![players[4].id]);
        assert!(sel.rotated.is_empty());
        assert_eq!(sel.playing.len(), 4);

        players[3].force_sit_out = true;
        assert_eq!(
            select_bench(&players, 1, &mut rand::thread_rng()),
            Err(SessionError::InsufficientPlayers {
                required: 4,
                available: 3
            })
        );
    }
}
