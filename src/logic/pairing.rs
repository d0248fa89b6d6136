//! Team and court assignment: an objective over candidate matchups and the searches that minimize it.
//!
//! The objective only scores; searches only propose. Either side can be swapped without touching the other.

use crate::models::{PairHistory, PlayerId, Team};
use rand::seq::SliceRandom;
use rand::Rng;
use std::ops::Add;

/// Searches up to this many players exhaustively (3 courts).
pub const EXHAUSTIVE_MAX_PLAYERS: usize = 12;

/// Random restarts for [`RestartSearch`] when not configured otherwise.
pub const DEFAULT_RESTARTS: usize = 24;

/// Two teams facing each other on one court.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Matchup {
    pub team_1: Team,
    pub team_2: Team,
}

impl Matchup {
    fn players(&self) -> [PlayerId; 4] {
        [self.team_1[0], self.team_1[1], self.team_2[0], self.team_2[1]]
    }
}

/// Lower is better. Compared partners first, then opponents.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd)]
pub struct PairingCost {
    pub repeat_partners: u32,
    pub repeat_opponents: u32,
}

impl PairingCost {
    pub const ZERO: PairingCost = PairingCost {
        repeat_partners: 0,
        repeat_opponents: 0,
    };
}

impl Add for PairingCost {
    type Output = PairingCost;

    fn add(self, rhs: PairingCost) -> PairingCost {
        PairingCost {
            repeat_partners: self.repeat_partners + rhs.repeat_partners,
            repeat_opponents: self.repeat_opponents + rhs.repeat_opponents,
        }
    }
}

/// Scores a proposed matchup.
pub trait PairingObjective {
    fn matchup_cost(&self, matchup: &Matchup) -> PairingCost;

    fn total_cost(&self, matchups: &[Matchup]) -> PairingCost {
        matchups
            .iter()
            .fold(PairingCost::ZERO, |acc, m| acc + self.matchup_cost(m))
    }
}

/// Penalizes every earlier round a realized pair already shared, as partners or as opponents.
pub struct RepeatAvoidance<'a> {
    pub partnerships: &'a PairHistory,
    pub opponents: &'a PairHistory,
}

impl PairingObjective for RepeatAvoidance<'_> {
    fn matchup_cost(&self, m: &Matchup) -> PairingCost {
        let repeat_partners = self.partnerships.count(m.team_1[0], m.team_1[1])
            + self.partnerships.count(m.team_2[0], m.team_2[1]);
        let repeat_opponents = m
            .team_1
            .iter()
            .flat_map(|a| m.team_2.iter().map(move |b| (*a, *b)))
            .map(|(a, b)| self.opponents.count(a, b))
            .sum();
        PairingCost {
            repeat_partners,
            repeat_opponents,
        }
    }
}

/// Splits `players` (a multiple of four) into matchups, one per court.
pub trait CourtSearch {
    fn assign<O: PairingObjective, R: Rng + ?Sized>(
        &self,
        players: &[PlayerId],
        objective: &O,
        rng: &mut R,
    ) -> Vec<Matchup>;
}

/// Best of the three ways to split four players into two teams.
fn best_split<O: PairingObjective>(group: [PlayerId; 4], objective: &O) -> (Matchup, PairingCost) {
    let [a, b, c, d] = group;
    [
        Matchup { team_1: [a, b], team_2: [c, d] },
        Matchup { team_1: [a, c], team_2: [b, d] },
        Matchup { team_1: [a, d], team_2: [b, c] },
    ]
    .into_iter()
    .map(|m| (m, objective.matchup_cost(&m)))
    .min_by_key(|(_, cost)| *cost)
    .unwrap_or((Matchup { team_1: [a, b], team_2: [c, d] }, PairingCost::ZERO))
}

/// Tries every matchup set. Only practical up to [`EXHAUSTIVE_MAX_PLAYERS`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ExhaustiveSearch;

impl ExhaustiveSearch {
    fn search<O: PairingObjective>(
        remaining: &[PlayerId],
        chosen: &mut Vec<Matchup>,
        cost: PairingCost,
        objective: &O,
        best: &mut Option<(Vec<Matchup>, PairingCost)>,
    ) {
        if best.as_ref().is_some_and(|(_, b)| cost >= *b) {
            return;
        }
        let Some((&first, rest)) = remaining.split_first() else {
            *best = Some((chosen.clone(), cost));
            return;
        };
        for i in 0..rest.len() {
            for j in 0..rest.len() {
                for k in (j + 1)..rest.len() {
                    if j == i || k == i {
                        continue;
                    }
                    let m = Matchup {
                        team_1: [first, rest[i]],
                        team_2: [rest[j], rest[k]],
                    };
                    let left: Vec<PlayerId> = rest
                        .iter()
                        .enumerate()
                        .filter(|(idx, _)| *idx != i && *idx != j && *idx != k)
                        .map(|(_, id)| *id)
                        .collect();
                    chosen.push(m);
                    Self::search(&left, chosen, cost + objective.matchup_cost(&m), objective, best);
                    chosen.pop();
                }
            }
        }
    }
}

impl CourtSearch for ExhaustiveSearch {
    fn assign<O: PairingObjective, R: Rng + ?Sized>(
        &self,
        players: &[PlayerId],
        objective: &O,
        _rng: &mut R,
    ) -> Vec<Matchup> {
        let mut best = None;
        Self::search(players, &mut Vec::new(), PairingCost::ZERO, objective, &mut best);
        best.map(|(m, _)| m).unwrap_or_default()
    }
}

/// Random restarts of shuffle + best split per court, each polished by swapping
/// players between courts while that lowers the cost.
#[derive(Clone, Copy, Debug)]
pub struct RestartSearch {
    pub restarts: usize,
}

impl Default for RestartSearch {
    fn default() -> Self {
        Self {
            restarts: DEFAULT_RESTARTS,
        }
    }
}

impl RestartSearch {
    fn polish<O: PairingObjective>(groups: &mut [[PlayerId; 4]], objective: &O) -> Vec<(Matchup, PairingCost)> {
        let mut scored: Vec<(Matchup, PairingCost)> =
            groups.iter().map(|g| best_split(*g, objective)).collect();
        loop {
            let mut improved = false;
            for g1 in 0..groups.len() {
                for g2 in (g1 + 1)..groups.len() {
                    for i in 0..4 {
                        for j in 0..4 {
                            let mut a = groups[g1];
                            let mut b = groups[g2];
                            std::mem::swap(&mut a[i], &mut b[j]);
                            let sa = best_split(a, objective);
                            let sb = best_split(b, objective);
                            if sa.1 + sb.1 < scored[g1].1 + scored[g2].1 {
                                groups[g1] = a;
                                groups[g2] = b;
                                scored[g1] = sa;
                                scored[g2] = sb;
                                improved = true;
                            }
                        }
                    }
                }
            }
            if !improved {
                return scored;
            }
        }
    }
}

impl CourtSearch for RestartSearch {
    fn assign<O: PairingObjective, R: Rng + ?Sized>(
        &self,
        players: &[PlayerId],
        objective: &O,
        rng: &mut R,
    ) -> Vec<Matchup> {
        let mut pool = players.to_vec();
        let mut best: Option<(Vec<Matchup>, PairingCost)> = None;
        for _ in 0..self.restarts.max(1) {
            pool.shuffle(rng);
            let mut groups: Vec<[PlayerId; 4]> = pool
                .chunks_exact(4)
                .map(|c| [c[0], c[1], c[2], c[3]])
                .collect();
            let scored = Self::polish(&mut groups, objective);
            let cost = scored.iter().fold(PairingCost::ZERO, |acc, (_, c)| acc + *c);
            if best.as_ref().map_or(true, |(_, b)| cost < *b) {
                best = Some((scored.into_iter().map(|(m, _)| m).collect(), cost));
            }
            if cost == PairingCost::ZERO {
                break;
            }
        }
        best.map(|(m, _)| m).unwrap_or_default()
    }
}

/// Exhaustive for small pools, restarts above that.
#[derive(Clone, Copy, Debug, Default)]
pub struct AutoSearch {
    pub restart: RestartSearch,
}

impl CourtSearch for AutoSearch {
    fn assign<O: PairingObjective, R: Rng + ?Sized>(
        &self,
        players: &[PlayerId],
        objective: &O,
        rng: &mut R,
    ) -> Vec<Matchup> {
        let mut matchups = if players.len() <= EXHAUSTIVE_MAX_PLAYERS {
            ExhaustiveSearch.assign(players, objective, rng)
        } else {
            self.restart.assign(players, objective, rng)
        };
        // Exhaustive search is deterministic in roster order; vary court placement.
        matchups.shuffle(rng);
        matchups
    }
}

/// Every player placed exactly once across the matchups.
pub fn covers_exactly(matchups: &[Matchup], players: &[PlayerId]) -> bool {
    let mut placed: Vec<PlayerId> = matchups.iter().flat_map(|m| m.players()).collect();
    let mut expected = players.to_vec();
    placed.sort();
    expected.sort();
    placed == expected
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn ids(n: usize) -> Vec<PlayerId> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn cost_ranks_partners_above_opponents() {
        let worse_partners = PairingCost {
            repeat_partners: 1,
            repeat_opponents: 0,
        };
        let worse_opponents = PairingCost {
            repeat_partners: 0,
            repeat_opponents: 4,
        };
        assert!(worse_opponents < worse_partners);
    }

    #[test]
    fn objective_counts_history() {
        let p = ids(4);
        let mut partnerships = PairHistory::new();
        let mut opponents = PairHistory::new();
        partnerships.increment(p[0], p[1]);
        opponents.increment(p[0], p[2]);
        opponents.increment(p[1], p[3]);
        let objective = RepeatAvoidance {
            partnerships: &partnerships,
            opponents: &opponents,
        };
        let m = Matchup {
            team_1: [p[0], p[1]],
            team_2: [p[2], p[3]],
        };
        assert_eq!(
            objective.matchup_cost(&m),
            PairingCost {
                repeat_partners: 1,
                repeat_opponents: 2
            }
        );
    }

    #[test]
    fn exhaustive_avoids_known_partners() {
        let p = ids(4);
        let mut partnerships = PairHistory::new();
        partnerships.increment(p[0], p[1]);
        partnerships.increment(p[2], p[3]);
        partnerships.increment(p[0], p[2]);
        partnerships.increment(p[1], p[3]);
        let opponents = PairHistory::new();
        let objective = RepeatAvoidance {
            partnerships: &partnerships,
            opponents: &opponents,
        };
        let result = ExhaustiveSearch.assign(&p, &objective, &mut rand::thread_rng());
        assert_eq!(result.len(), 1);
        assert_eq!(objective.total_cost(&result), PairingCost::ZERO);
    }

    #[test]
    fn restart_search_places_everyone_once() {
        let p = ids(20);
        let empty = PairHistory::new();
        let objective = RepeatAvoidance {
            partnerships: &empty,
            opponents: &empty,
        };
        let result = RestartSearch::default().assign(&p, &objective, &mut rand::thread_rng());
        assert_eq!(result.len(), 5);
        assert!(covers_exactly(&result, &p));
        assert_eq!(objective.total_cost(&result), PairingCost::ZERO);
    }

    #[test]
    fn restart_search_finds_clean_regrouping() {
        // Two courts that just played each other; a zero-cost regroup exists.
        let p = ids(8);
        let mut partnerships = PairHistory::new();
        let mut opponents = PairHistory::new();
        for court in p.chunks(4) {
            partnerships.increment(court[0], court[1]);
            partnerships.increment(court[2], court[3]);
            for a in &court[..2] {
                for b in &court[2..] {
                    opponents.increment(*a, *b);
                }
            }
        }
        let objective = RepeatAvoidance {
            partnerships: &partnerships,
            opponents: &opponents,
        };
        let result = RestartSearch::default().assign(&p, &objective, &mut rand::thread_rng());
        assert!(covers_exactly(&result, &p));
        assert_eq!(objective.total_cost(&result).repeat_partners, 0);
    }
}
