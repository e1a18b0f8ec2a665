//! Integration tests for standings: scoring, tiebreaks, ordering.

use championship_engine::{
    compute_standings, ByeHandling, Match, MatchResult, Participant, ParticipantId,
};
use chrono::{Duration, TimeZone, Utc};

fn roster(ratings: &[i32]) -> Vec<Participant> {
    let base = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
    ratings
        .iter()
        .enumerate()
        .map(|(i, &r)| Participant::registered(format!("P{i}"), r, base + Duration::seconds(i as i64)))
        .collect()
}

fn played(round: u32, white: &Participant, black: &Participant, result: MatchResult) -> Match {
    let mut m = Match::game(round, white.id, black.id);
    m.result = result;
    m
}

fn order(standings: &[championship_engine::StandingsEntry]) -> Vec<ParticipantId> {
    standings.iter().map(|e| e.participant_id).collect()
}

#[test]
fn scores_wins_draws_and_byes() {
    let p = roster(&[1500, 1500, 1500]);
    let matches = vec![
        played(1, &p[0], &p[1], MatchResult::Player1Win),
        Match::bye(1, p[2].id, ByeHandling::Automatic),
        played(2, &p[0], &p[2], MatchResult::Draw),
    ];

    let standings = compute_standings(&p, &matches, 1.0);

    assert_eq!(order(&standings), vec![p[0].id, p[2].id, p[1].id]);
    assert_eq!(standings[0].score, 1.5);
    assert_eq!(standings[0].games_played, 2);
    assert_eq!(standings[0].wins, 1);
    assert_eq!(standings[1].score, 1.5);
    assert_eq!(standings[1].byes, 1);
    assert_eq!(standings[1].games_played, 1);
    assert_eq!(standings[2].score, 0.0);
    assert_eq!(standings[2].losses, 1);
    assert_eq!(standings.iter().map(|e| e.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[test]
fn equal_scores_are_split_by_buchholz_and_stay_stable() {
    // b is rated higher, so only the tiebreak can put a first.
    let p = roster(&[1500, 1800, 1500, 1500]);
    let (a, b, c, d) = (&p[0], &p[1], &p[2], &p[3]);
    let matches = vec![
        played(1, a, c, MatchResult::Player1Win),
        played(1, b, d, MatchResult::Player1Win),
        played(2, a, b, MatchResult::Draw),
        played(2, c, d, MatchResult::Player1Win),
    ];

    let first = compute_standings(&p, &matches, 1.0);
    assert_eq!(first[0].participant_id, a.id);
    assert_eq!(first[1].participant_id, b.id);
    assert_eq!(first[0].score, 1.5);
    assert_eq!(first[1].score, 1.5);
    // Buchholz: a faced c (1) and b (1.5); b faced d (0) and a (1.5).
    assert_eq!(first[0].tiebreaks[0], 2.5);
    assert_eq!(first[1].tiebreaks[0], 1.5);

    for _ in 0..5 {
        let again = compute_standings(&p, &matches, 1.0);
        assert_eq!(order(&again), order(&first));
    }
}

#[test]
fn sonneborn_berger_counts_defeated_and_half_drawn_opponents() {
    let p = roster(&[1500, 1500, 1500]);
    let matches = vec![
        played(1, &p[0], &p[1], MatchResult::Player1Win),
        played(2, &p[1], &p[2], MatchResult::Player1Win),
        played(3, &p[0], &p[2], MatchResult::Draw),
    ];

    let standings = compute_standings(&p, &matches, 1.0);
    let p0 = standings.iter().find(|e| e.participant_id == p[0].id).unwrap();
    // p1 scored 1, p2 scored 0.5: 1 * 1 + 0.5 * 0.5
    assert_eq!(p0.tiebreaks[1], 1.25);
}

#[test]
fn untouched_field_orders_by_rating_then_registration() {
    let p = roster(&[1500, 1700, 1500]);
    let standings = compute_standings(&p, &[], 1.0);
    assert_eq!(order(&standings), vec![p[1].id, p[0].id, p[2].id]);
    assert!(standings.iter().all(|e| e.score == 0.0 && e.games_played == 0));
}

#[test]
fn pending_placeholder_and_forfeited_matches_do_not_score() {
    let p = roster(&[1600, 1500]);
    let mut forfeit = Match::game(1, p[0].id, p[1].id);
    forfeit.result = MatchResult::DoubleForfeit;
    let matches = vec![
        Match::game(2, p[0].id, p[1].id),
        forfeit,
        Match::placeholder(3, (1, Some(2)), 2, 2, championship_engine::SlotSource::Standings),
        Match::bye(4, p[1].id, ByeHandling::Manual),
    ];

    let standings = compute_standings(&p, &matches, 1.0);
    for entry in &standings {
        assert_eq!(entry.score, 0.0);
        assert_eq!(entry.games_played, 0);
        assert!(entry.opponents.is_empty());
    }
}

#[test]
fn colors_and_opponents_are_tracked() {
    let p = roster(&[1500, 1500]);
    let matches = vec![played(1, &p[0], &p[1], MatchResult::Draw)];
    let standings = compute_standings(&p, &matches, 1.0);
    let white = standings.iter().find(|e| e.participant_id == p[0].id).unwrap();
    let black = standings.iter().find(|e| e.participant_id == p[1].id).unwrap();
    assert_eq!(white.color_balance, 1);
    assert_eq!(black.color_balance, -1);
    assert!(white.opponents.contains(&p[1].id));
    assert_eq!(white.draws, 1);
}

#[test]
fn custom_bye_points_are_applied() {
    let p = roster(&[1500, 1400]);
    let matches = vec![Match::bye(1, p[1].id, ByeHandling::Automatic)];
    let standings = compute_standings(&p, &matches, 0.5);
    assert_eq!(standings[0].participant_id, p[1].id);
    assert_eq!(standings[0].score, 0.5);
}
