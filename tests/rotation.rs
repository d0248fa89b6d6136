//! Integration tests for round generation: bench sizes, fairness, pair history.

use court_rotation_web::{
    start_round, submit_scores, PlayerId, ScoreSubmission, Session, SessionError,
};
use std::collections::HashSet;

fn session_with_players(n: usize, courts: u32) -> Session {
    let names: Vec<String> = (0..n).map(|i| format!("P{i}")).collect();
    Session::new(&names, courts).unwrap()
}

/// Score every match of the current round as a team 1 win.
fn score_round(s: &mut Session) {
    let scores: Vec<ScoreSubmission> = s
        .current_round
        .as_ref()
        .unwrap()
        .matches
        .iter()
        .map(|m| ScoreSubmission::new(m.id, 11, 7))
        .collect();
    submit_scores(s, &scores).unwrap();
}

fn assert_round_is_a_partition(s: &Session) {
    let round = s.current_round.as_ref().unwrap();
    let mut seen: HashSet<PlayerId> = HashSet::new();
    for m in &round.matches {
        let on_court: HashSet<PlayerId> = m.player_ids().collect();
        assert_eq!(on_court.len(), 4, "duplicate player within a match");
        for id in on_court {
            assert!(seen.insert(id), "player placed twice");
        }
    }
    for id in &round.benched {
        assert!(seen.insert(*id), "benched player also on court");
    }
    assert_eq!(round.benched.len() + 4 * s.num_courts as usize, s.players.len());
    assert_eq!(seen.len(), s.players.len());
}

#[test]
fn courts_are_numbered_densely() {
    let mut s = session_with_players(13, 3);
    start_round(&mut s).unwrap();
    let round = s.current_round.as_ref().unwrap();
    let courts: Vec<u32> = round.matches.iter().map(|m| m.court_number).collect();
    assert_eq!(courts, vec![1, 2, 3]);
    assert_eq!(round.round_number, 1);
    assert_eq!(round.benched.len(), 1);
}

#[test]
fn every_round_partitions_the_roster() {
    for (n, courts) in [(4, 1), (5, 1), (7, 1), (9, 2), (14, 3), (21, 4), (26, 5)] {
        let mut s = session_with_players(n, courts);
        for _ in 0..6 {
            start_round(&mut s).unwrap();
            assert_round_is_a_partition(&s);
            score_round(&mut s);
        }
    }
}

#[test]
fn round_numbers_increase_by_one() {
    let mut s = session_with_players(6, 1);
    for expected in 1..=4 {
        start_round(&mut s).unwrap();
        assert_eq!(s.current_round.as_ref().unwrap().round_number, expected);
        score_round(&mut s);
    }
}

#[test]
fn insufficient_players_changes_nothing() {
    let mut s = session_with_players(7, 2);
    let before = serde_json::to_value(&s).unwrap();
    assert_eq!(
        start_round(&mut s),
        Err(SessionError::InsufficientPlayers {
            required: 8,
            available: 7
        })
    );
    assert_eq!(serde_json::to_value(&s).unwrap(), before);
}

#[test]
fn five_players_one_court_everyone_plays_four_of_five() {
    let mut s = session_with_players(5, 1);
    for _ in 0..5 {
        start_round(&mut s).unwrap();
        score_round(&mut s);
    }
    for p in &s.players {
        assert_eq!(p.games_played, 4, "{} played {}", p.name, p.games_played);
        assert_eq!(p.rounds_sat_out, 1);
    }
}

#[test]
fn games_stay_balanced_when_rounds_divide_evenly() {
    // 6 players, 1 court, 3 rounds: 12 slots over 6 players.
    let mut s = session_with_players(6, 1);
    for _ in 0..3 {
        start_round(&mut s).unwrap();
        score_round(&mut s);
    }
    assert!(s.players.iter().all(|p| p.games_played == 2));

    // 10 players, 2 courts, 5 rounds: 40 slots over 10 players.
    let mut s = session_with_players(10, 2);
    for _ in 0..5 {
        start_round(&mut s).unwrap();
        score_round(&mut s);
    }
    let max = s.players.iter().map(|p| p.games_played).max().unwrap();
    let min = s.players.iter().map(|p| p.games_played).min().unwrap();
    assert!(max - min <= 1);
}

#[test]
fn nobody_sits_twice_in_a_row_with_enough_slack() {
    let mut s = session_with_players(10, 2);
    let mut last_bench: HashSet<PlayerId> = HashSet::new();
    for _ in 0..12 {
        start_round(&mut s).unwrap();
        let bench: HashSet<PlayerId> = s.current_round.as_ref().unwrap().benched.iter().copied().collect();
        assert!(bench.is_disjoint(&last_bench));
        for p in &s.players {
            assert!(p.consecutive_rounds_sat_out <= 1);
        }
        last_bench = bench;
        score_round(&mut s);
    }
}

#[test]
fn forced_sit_out_is_benched_once_then_cleared() {
    let mut s = session_with_players(5, 1);
    let id = s.players[2].id;
    assert!(s.toggle_sit_out(id).unwrap());
    start_round(&mut s).unwrap();
    let round = s.current_round.as_ref().unwrap();
    assert_eq!(round.benched, vec![id]);
    let p = s.get_player(id).unwrap();
    assert!(!p.force_sit_out);
    assert_eq!(p.rounds_sat_out, 1);
    assert_eq!(p.consecutive_rounds_sat_out, 1);
}

#[test]
fn forced_sit_out_can_leave_too_few_players() {
    let mut s = session_with_players(4, 1);
    let id = s.players[0].id;
    s.toggle_sit_out(id).unwrap();
    assert!(matches!(
        start_round(&mut s),
        Err(SessionError::InsufficientPlayers { required: 4, available: 3 })
    ));
    assert!(s.get_player(id).unwrap().force_sit_out);
    assert!(s.current_round.is_none());
}

#[test]
fn four_players_rotate_through_every_partner() {
    let mut s = session_with_players(4, 1);
    let mut partner_pairs: HashSet<(PlayerId, PlayerId)> = HashSet::new();
    for _ in 0..3 {
        start_round(&mut s).unwrap();
        let m = &s.current_round.as_ref().unwrap().matches[0];
        for team in [m.team_1, m.team_2] {
            let pair = if team[0] < team[1] { (team[0], team[1]) } else { (team[1], team[0]) };
            assert!(partner_pairs.insert(pair), "partnered twice within three rounds");
        }
        score_round(&mut s);
    }
    assert_eq!(partner_pairs.len(), 6);
    for a in &s.players {
        for b in &s.players {
            if a.id != b.id {
                assert_eq!(s.partnerships.count(a.id, b.id), 1);
            }
        }
    }
}

#[test]
fn histories_count_realized_pairs() {
    let mut s = session_with_players(8, 2);
    start_round(&mut s).unwrap();
    let round = s.current_round.clone().unwrap();
    for m in &round.matches {
        assert_eq!(s.partnerships.count(m.team_1[0], m.team_1[1]), 1);
        assert_eq!(s.partnerships.count(m.team_2[0], m.team_2[1]), 1);
        for a in m.team_1 {
            for b in m.team_2 {
                assert_eq!(s.opponents.count(a, b), 1);
            }
        }
    }
    // 2 partner pairs and 4 opponent pairs per court
    assert_eq!(s.partnerships.len(), 4);
    assert_eq!(s.opponents.len(), 8);
}
