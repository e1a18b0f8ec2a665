//! Integration tests for the pairing strategies and the multi-pass round driver.

use championship_engine::logic::pair_key;
use championship_engine::{
    pair, pair_round, ChampionshipError, PairingContext, PairingMethod, ParticipantId,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Ids in the given order, rated as given, repeat avoidance on.
fn field(ratings: &[i32]) -> (Vec<ParticipantId>, PairingContext) {
    let ids: Vec<ParticipantId> = ratings.iter().map(|_| Uuid::new_v4()).collect();
    let ctx = PairingContext {
        avoid_repeat_matches: true,
        ratings: ids.iter().copied().zip(ratings.iter().copied()).collect(),
        ..PairingContext::default()
    };
    (ids, ctx)
}

fn rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(7)
}

fn keys(games: &[(ParticipantId, ParticipantId)]) -> HashSet<(ParticipantId, ParticipantId)> {
    games.iter().map(|&(a, b)| pair_key(a, b)).collect()
}

fn appearances(games: &[(ParticipantId, ParticipantId)]) -> HashMap<ParticipantId, usize> {
    let mut counts = HashMap::new();
    for &(a, b) in games {
        *counts.entry(a).or_insert(0) += 1;
        *counts.entry(b).or_insert(0) += 1;
    }
    counts
}

#[test]
fn rating_based_odd_field_gives_lowest_rated_the_bye() {
    let (ids, mut ctx) = field(&[1500, 1900, 1700, 1300, 1600]);
    let round = pair_round(PairingMethod::RatingBased, &ids, &mut ctx, 1, &mut rng()).unwrap();

    assert_eq!(round.games.len(), 2);
    assert_eq!(round.byes, vec![ids[3]]);
    assert_eq!(
        keys(&round.games),
        HashSet::from([pair_key(ids[1], ids[2]), pair_key(ids[4], ids[0])])
    );
    assert!(round.warnings.is_empty());
}

#[test]
fn direct_pairs_exactly_two() {
    let (ids, mut ctx) = field(&[1800, 1700]);
    let round = pair_round(PairingMethod::Direct, &ids, &mut ctx, 1, &mut rng()).unwrap();
    assert_eq!(round.games.len(), 1);
    assert!(round.byes.is_empty());

    let (three, mut ctx) = field(&[1800, 1700, 1600]);
    let err = pair_round(PairingMethod::Direct, &three, &mut ctx, 1, &mut rng()).unwrap_err();
    assert!(matches!(err, ChampionshipError::InvalidPairingInput(_)));

    let err = pair(PairingMethod::Direct, &three[..1], &ctx, &mut rng()).unwrap_err();
    assert!(matches!(err, ChampionshipError::InvalidPairingInput(_)));
}

#[test]
fn single_random_pass_leaves_one_out_of_an_odd_field() {
    let (ids, ctx) = field(&[1500; 5]);
    let pass = pair(PairingMethod::Random, &ids, &ctx, &mut rng()).unwrap();
    assert_eq!(pass.pairs.len(), 2);
    assert_eq!(pass.unpaired.len(), 1);
}

#[test]
fn every_participant_meets_matches_per_player_distinct_opponents() {
    let (ids, mut ctx) = field(&[1500, 1600, 1700, 1800, 1900, 2000]);
    let round = pair_round(PairingMethod::Random, &ids, &mut ctx, 3, &mut rng()).unwrap();

    assert_eq!(round.games.len(), 9);
    assert_eq!(keys(&round.games).len(), 9);
    assert!(round.byes.is_empty());
    assert!(appearances(&round.games).values().all(|&n| n == 3));
}

#[test]
fn three_participants_cannot_fill_three_matches_each() {
    let (ids, mut ctx) = field(&[1500, 1600, 1700]);
    let round = pair_round(PairingMethod::Random, &ids, &mut ctx, 3, &mut rng()).unwrap();

    assert_eq!(round.games.len(), 3);
    assert_eq!(keys(&round.games).len(), 3);
    assert_eq!(round.byes.len(), 3);
    assert!(!round.warnings.is_empty());
}

fn play_three_rounds(method: PairingMethod) -> Vec<(ParticipantId, ParticipantId)> {
    let (ids, mut ctx) = field(&[2000, 1900, 1800, 1700]);
    let mut all = Vec::new();
    for _ in 0..3 {
        let round = pair_round(method, &ids, &mut ctx, 1, &mut rng()).unwrap();
        assert!(round.warnings.is_empty(), "{:?}", round.warnings);
        assert!(round.byes.is_empty());
        all.extend(round.games);
    }
    all
}

#[test]
fn standings_based_plays_a_full_round_robin_without_repeats() {
    let games = play_three_rounds(PairingMethod::StandingsBased);
    assert_eq!(games.len(), 6);
    assert_eq!(keys(&games).len(), 6);
}

#[test]
fn swiss_plays_a_full_round_robin_without_repeats() {
    let games = play_three_rounds(PairingMethod::Swiss);
    assert_eq!(games.len(), 6);
    assert_eq!(keys(&games).len(), 6);
}

#[test]
fn rematch_is_allowed_only_when_nothing_else_is_left() {
    let (ids, mut ctx) = field(&[1800, 1700]);
    let first = pair_round(PairingMethod::StandingsBased, &ids, &mut ctx, 1, &mut rng()).unwrap();
    assert!(first.warnings.is_empty());

    let second = pair_round(PairingMethod::StandingsBased, &ids, &mut ctx, 1, &mut rng()).unwrap();
    assert_eq!(second.games.len(), 1);
    assert!(second.warnings.iter().any(|w| w.contains("repeat")));
}

#[test]
fn swiss_floats_down_when_the_score_group_is_exhausted() {
    let (ids, mut ctx) = field(&[2000, 1900, 1800, 1700]);
    let (a, b, c, d) = (ids[0], ids[1], ids[2], ids[3]);
    ctx.scores = HashMap::from([(a, 2.0), (b, 2.0), (c, 1.0), (d, 1.0)]);
    ctx.record_game(a, b);

    let pass = pair(PairingMethod::Swiss, &ids, &ctx, &mut rng()).unwrap();
    assert!(pass.warnings.is_empty());
    assert_eq!(
        pass.pairs.iter().map(|&(x, y)| pair_key(x, y)).collect::<HashSet<_>>(),
        HashSet::from([pair_key(a, c), pair_key(b, d)])
    );
}

#[test]
fn random_seeded_keeps_even_pools_apart() {
    let (ids, mut ctx) = field(&[2000, 1900, 1800, 1700, 1600, 1500, 1400, 1300]);
    let top: HashSet<ParticipantId> = ids[..4].iter().copied().collect();
    let round = pair_round(PairingMethod::RandomSeeded, &ids, &mut ctx, 1, &mut rng()).unwrap();

    assert_eq!(round.games.len(), 4);
    for (a, b) in round.games {
        assert_eq!(top.contains(&a), top.contains(&b));
    }
}

#[test]
fn random_seeded_carries_an_odd_pool_leftover_into_the_next_pool() {
    let (ids, mut ctx) = field(&[2000, 1900, 1800, 1700, 1600, 1500]);
    let top: HashSet<ParticipantId> = ids[..3].iter().copied().collect();
    let round = pair_round(PairingMethod::RandomSeeded, &ids, &mut ctx, 1, &mut rng()).unwrap();

    assert_eq!(round.games.len(), 3);
    assert!(round.byes.is_empty());
    let crossing = round
        .games
        .iter()
        .filter(|(a, b)| top.contains(a) != top.contains(b))
        .count();
    assert_eq!(crossing, 1);
}

#[test]
fn white_goes_to_the_participant_with_more_blacks() {
    let (ids, mut ctx) = field(&[1900, 1500]);
    ctx.color_balance = HashMap::from([(ids[0], 1), (ids[1], -1)]);
    let round = pair_round(PairingMethod::RatingBased, &ids, &mut ctx, 1, &mut rng()).unwrap();
    assert_eq!(round.games, vec![(ids[1], ids[0])]);
}

#[test]
fn strict_colors_avoid_pairing_two_participants_due_the_same_color() {
    let (ids, mut ctx) = field(&[2000, 1900, 1800, 1700]);
    ctx.color_balance_strict = true;
    ctx.color_balance = HashMap::from([(ids[0], 2), (ids[1], 2), (ids[2], -2), (ids[3], -2)]);

    let pass = pair(PairingMethod::RatingBased, &ids, &ctx, &mut rng()).unwrap();
    assert!(pass.warnings.is_empty());
    for (a, b) in pass.pairs {
        assert!(!ctx.color_conflict(a, b));
    }
}
