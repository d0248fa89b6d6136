//! Rankings and game-log export.

use crate::models::{GameRecord, PlayerId, PlayerRef, Session};
use serde::Serialize;
use std::cmp::Reverse;

/// One row of the rankings table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Standing {
    /// 1-based; players tied on wins, differential and losses share a rank.
    pub rank: usize,
    pub player_id: PlayerId,
    pub name: String,
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub point_differential: i64,
    pub win_percentage: f64,
}

/// Roster ordered by wins, then point differential, then fewest losses, then name.
pub fn rankings(session: &Session) -> Vec<Standing> {
    let mut players: Vec<_> = session.players.iter().collect();
    players.sort_by_key(|p| {
        (
            Reverse(p.wins),
            Reverse(p.point_differential),
            p.losses,
            p.name.to_lowercase(),
        )
    });

    let mut standings: Vec<Standing> = Vec::with_capacity(players.len());
    for (i, p) in players.iter().enumerate() {
        let rank = match standings.last() {
            Some(prev)
                if prev.wins == p.wins
                    && prev.point_differential == p.point_differential
                    && prev.losses == p.losses =>
            {
                prev.rank
            }
            _ => i + 1,
        };
        standings.push(Standing {
            rank,
            player_id: p.id,
            name: p.name.clone(),
            games_played: p.games_played,
            wins: p.wins,
            losses: p.losses,
            point_differential: p.point_differential,
            win_percentage: p.win_percentage(),
        });
    }
    standings
}

#[derive(Serialize)]
struct HistoryRow<'a> {
    round: u32,
    court: u32,
    team_1: String,
    team_2: String,
    team_1_score: u32,
    team_2_score: u32,
    recorded_at: &'a str,
}

fn team_names(team: &[PlayerRef]) -> String {
    team.iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(" & ")
}

/// The game log as CSV, one row per completed match, with a header row.
pub fn history_csv(records: &[GameRecord]) -> Result<Vec<u8>, csv::Error> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    for r in records {
        let recorded_at = r.recorded_at.to_rfc3339();
        wtr.serialize(HistoryRow {
            round: r.round_number,
            court: r.court_number,
            team_1: team_names(&r.team_1),
            team_2: team_names(&r.team_2),
            team_1_score: r.team_1_score,
            team_2_score: r.team_2_score,
            recorded_at: &recorded_at,
        })?;
    }
    wtr.into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}
