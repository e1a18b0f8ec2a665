//! Pairing strategies and the multi-pass round driver.
//!
//! Every strategy turns an ordered participant list plus a [`PairingContext`] into
//! pairs and leftovers. Strategies only decide the preference order; the shared
//! matcher enforces constraints and relaxes them in a fixed order.

mod matching;
mod swiss;

use crate::models::{
    ChampionshipError, PairingMethod, Participant, ParticipantId, StandingsEntry,
    TournamentConfig,
};
use matching::Preferences;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{HashMap, HashSet};

/// Participants per rating pool in `random_seeded`.
pub const SEED_POOL_SIZE: usize = 4;

/// Positions searched ahead for a non-repeat opponent in `standings_based`.
pub const STANDINGS_SWAP_WINDOW: usize = 4;

/// Color balance from which two participants count as wanting the same color.
const STRONG_COLOR_PREFERENCE: i32 = 2;

/// Everything a strategy may look at besides the participant list.
#[derive(Clone, Debug, Default)]
pub struct PairingContext {
    pub avoid_repeat_matches: bool,
    pub color_balance_strict: bool,
    pub ratings: HashMap<ParticipantId, i32>,
    pub scores: HashMap<ParticipantId, f64>,
    /// Opponents from every scheduled game so far, played or not.
    pub prior_opponents: HashMap<ParticipantId, HashSet<ParticipantId>>,
    /// White minus black over every scheduled game so far.
    pub color_balance: HashMap<ParticipantId, i32>,
    pub byes_taken: HashMap<ParticipantId, u32>,
    /// Pairs already made in the round being paired; never repeated.
    pub round_pairs: HashSet<(ParticipantId, ParticipantId)>,
    /// Opponents still owed per participant in the round being paired.
    pub deficits: HashMap<ParticipantId, usize>,
}

/// Order-independent key for a pair.
pub fn pair_key(a: ParticipantId, b: ParticipantId) -> (ParticipantId, ParticipantId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl PairingContext {
    /// Context for a championship: flags from the config, ratings from the roster,
    /// scores from `standings`.
    pub fn new(
        config: &TournamentConfig,
        participants: &[Participant],
        standings: &[StandingsEntry],
    ) -> Self {
        let mut ctx = Self {
            avoid_repeat_matches: config.avoid_repeat_matches,
            color_balance_strict: config.color_balance_strict,
            ratings: participants.iter().map(|p| (p.id, p.rating)).collect(),
            ..Self::default()
        };
        ctx.set_scores(standings);
        ctx
    }

    pub fn set_scores(&mut self, standings: &[StandingsEntry]) {
        self.scores = standings.iter().map(|e| (e.participant_id, e.score)).collect();
    }

    pub fn record_game(&mut self, white: ParticipantId, black: ParticipantId) {
        self.prior_opponents.entry(white).or_default().insert(black);
        self.prior_opponents.entry(black).or_default().insert(white);
        *self.color_balance.entry(white).or_insert(0) += 1;
        *self.color_balance.entry(black).or_insert(0) -= 1;
    }

    pub fn score(&self, id: ParticipantId) -> f64 {
        self.scores.get(&id).copied().unwrap_or(0.0)
    }

    pub fn rating(&self, id: ParticipantId) -> i32 {
        self.ratings.get(&id).copied().unwrap_or(0)
    }

    pub fn balance(&self, id: ParticipantId) -> i32 {
        self.color_balance.get(&id).copied().unwrap_or(0)
    }

    pub fn has_met(&self, a: ParticipantId, b: ParticipantId) -> bool {
        self.prior_opponents.get(&a).is_some_and(|o| o.contains(&b))
    }

    /// Both strongly due the same color.
    pub fn color_conflict(&self, a: ParticipantId, b: ParticipantId) -> bool {
        let (x, y) = (self.balance(a), self.balance(b));
        (x >= STRONG_COLOR_PREFERENCE && y >= STRONG_COLOR_PREFERENCE)
            || (x <= -STRONG_COLOR_PREFERENCE && y <= -STRONG_COLOR_PREFERENCE)
    }

    /// `(white, black)`: the participant with fewer whites so far gets white.
    pub fn orient(&self, a: ParticipantId, b: ParticipantId) -> (ParticipantId, ParticipantId) {
        if self.balance(a) > self.balance(b) {
            (b, a)
        } else {
            (a, b)
        }
    }
}

/// Result of one pairing pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PassPairing {
    /// Pairs in strategy order (not yet color-oriented).
    pub pairs: Vec<(ParticipantId, ParticipantId)>,
    pub unpaired: Vec<ParticipantId>,
    pub warnings: Vec<String>,
}

/// Result of pairing a whole round.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoundPairing {
    /// `(white, black)` games.
    pub games: Vec<(ParticipantId, ParticipantId)>,
    /// One entry per bye slot; a participant may appear more than once.
    pub byes: Vec<ParticipantId>,
    pub warnings: Vec<String>,
}

/// Pair `participants` once with the given method.
pub fn pair<R: Rng + ?Sized>(
    method: PairingMethod,
    participants: &[ParticipantId],
    ctx: &PairingContext,
    rng: &mut R,
) -> Result<PassPairing, ChampionshipError> {
    let mut primary = match method {
        PairingMethod::Direct => return pair_direct(participants),
        PairingMethod::Random => {
            let mut order = participants.to_vec();
            order.shuffle(rng);
            Preferences::sequential(order)
        }
        PairingMethod::RandomSeeded => Preferences::sequential(seeded_pool_order(participants, ctx, rng)),
        PairingMethod::RatingBased => Preferences::sequential(by_rating(participants, ctx)),
        PairingMethod::StandingsBased => Preferences::windowed(participants.to_vec(), STANDINGS_SWAP_WINDOW),
        PairingMethod::Swiss => swiss::preferences(participants, ctx),
    };
    let mut relaxed = match method {
        PairingMethod::StandingsBased => Preferences::sequential(primary.order.clone()),
        _ => primary.clone(),
    };

    for prefs in [&mut primary, &mut relaxed] {
        prefs.prefer_byes_by(|id| {
            (
                ctx.deficits.get(&id).copied().unwrap_or(0),
                ctx.byes_taken.get(&id).copied().unwrap_or(0),
            )
        });
    }

    Ok(match_with_relaxation(method, &primary, &relaxed, ctx))
}

/// Try the constraint levels in order and fall back to a greedy pass.
///
/// Levels: no repeats and color feasibility, then repeats allowed, then colors
/// relaxed. Pairs from the current round are never allowed.
fn match_with_relaxation(
    method: PairingMethod,
    primary: &Preferences,
    relaxed: &Preferences,
    ctx: &PairingContext,
) -> PassPairing {
    let fresh = |a: ParticipantId, b: ParticipantId| !ctx.round_pairs.contains(&pair_key(a, b));
    let no_repeat = |a: ParticipantId, b: ParticipantId| !ctx.avoid_repeat_matches || !ctx.has_met(a, b);
    let colors_ok = |a: ParticipantId, b: ParticipantId| !ctx.color_balance_strict || !ctx.color_conflict(a, b);

    let strict = |a: ParticipantId, b: ParticipantId| fresh(a, b) && no_repeat(a, b) && colors_ok(a, b);
    if let Some(pairs) = primary.solve(&strict) {
        return collect(primary, pairs, Vec::new());
    }

    let mut warnings = Vec::new();
    let repeats_allowed = |a: ParticipantId, b: ParticipantId| fresh(a, b) && colors_ok(a, b);
    if ctx.avoid_repeat_matches {
        if let Some(pairs) = relaxed.solve(&repeats_allowed) {
            warnings.push(format!("{}: repeat pairing allowed, no fresh opponents left", method));
            log::warn!("{}: relaxed repeat avoidance", method);
            return collect(relaxed, pairs, warnings);
        }
    }

    if ctx.color_balance_strict {
        if let Some(pairs) = relaxed.solve(&fresh) {
            if ctx.avoid_repeat_matches {
                warnings.push(format!("{}: repeat pairing allowed, no fresh opponents left", method));
            }
            warnings.push(format!("{}: color balance relaxed", method));
            log::warn!("{}: relaxed color balance", method);
            return collect(relaxed, pairs, warnings);
        }
    }

    let (pairs, leftovers) = relaxed.greedy(&fresh);
    warnings.push(format!(
        "{}: no complete pairing exists, {} participant(s) left without opponent",
        method,
        leftovers.len()
    ));
    log::warn!("{}: partial pairing, {} unpaired", method, leftovers.len());
    let order = &relaxed.order;
    PassPairing {
        pairs: pairs.into_iter().map(|(a, b)| (order[a], order[b])).collect(),
        unpaired: leftovers.into_iter().map(|i| order[i]).collect(),
        warnings,
    }
}

fn collect(prefs: &Preferences, pairs: Vec<(usize, usize)>, warnings: Vec<String>) -> PassPairing {
    let mut used = vec![false; prefs.order.len()];
    for &(a, b) in &pairs {
        used[a] = true;
        used[b] = true;
    }
    PassPairing {
        pairs: pairs.iter().map(|&(a, b)| (prefs.order[a], prefs.order[b])).collect(),
        unpaired: (0..prefs.order.len()).filter(|&i| !used[i]).map(|i| prefs.order[i]).collect(),
        warnings,
    }
}

fn pair_direct(participants: &[ParticipantId]) -> Result<PassPairing, ChampionshipError> {
    match participants {
        [a, b] => Ok(PassPairing {
            pairs: vec![(*a, *b)],
            ..PassPairing::default()
        }),
        _ => Err(ChampionshipError::InvalidPairingInput(format!(
            "direct pairing needs exactly 2 participants, got {}",
            participants.len()
        ))),
    }
}

/// Rating descending; the incoming order breaks ties.
fn by_rating(participants: &[ParticipantId], ctx: &PairingContext) -> Vec<ParticipantId> {
    let mut order = participants.to_vec();
    order.sort_by_key(|id| std::cmp::Reverse(ctx.rating(*id)));
    order
}

/// Split the rating order into near-equal pools of about [`SEED_POOL_SIZE`] and
/// shuffle inside each pool. Sequential pairing over the result carries an odd
/// pool's leftover into the next pool.
fn seeded_pool_order<R: Rng + ?Sized>(
    participants: &[ParticipantId],
    ctx: &PairingContext,
    rng: &mut R,
) -> Vec<ParticipantId> {
    let sorted = by_rating(participants, ctx);
    let n = sorted.len();
    let pools = n.div_ceil(SEED_POOL_SIZE).max(1);
    let mut order = Vec::with_capacity(n);
    let mut start = 0;
    for pool in 0..pools {
        let size = n / pools + usize::from(pool < n % pools);
        let mut chunk = sorted[start..start + size].to_vec();
        chunk.shuffle(rng);
        order.extend(chunk);
        start += size;
    }
    order
}

/// Pair a round so every participant gets `matches_per_player` distinct opponents.
///
/// Passes repeat over the participants still owed opponents until everybody is
/// served or a pass finds no pair. Each game is color-oriented and recorded in
/// `ctx`. What is still owed afterwards becomes bye slots; more byes than an odd
/// count forces is reported as a warning.
pub fn pair_round<R: Rng + ?Sized>(
    method: PairingMethod,
    participants: &[ParticipantId],
    ctx: &mut PairingContext,
    matches_per_player: usize,
    rng: &mut R,
) -> Result<RoundPairing, ChampionshipError> {
    if method == PairingMethod::Direct {
        pair_direct(participants)?;
    }
    ctx.round_pairs.clear();
    let mut counts: HashMap<ParticipantId, usize> = participants.iter().map(|id| (*id, 0)).collect();
    let mut round = RoundPairing::default();

    loop {
        let eligible: Vec<ParticipantId> = participants
            .iter()
            .copied()
            .filter(|id| counts[id] < matches_per_player)
            .collect();
        if eligible.len() < 2 {
            break;
        }
        ctx.deficits = eligible
            .iter()
            .map(|id| (*id, matches_per_player - counts[id]))
            .collect();

        let pass = pair(method, &eligible, ctx, rng)?;
        round.warnings.extend(pass.warnings);
        if pass.pairs.is_empty() {
            break;
        }
        for (a, b) in pass.pairs {
            let (white, black) = ctx.orient(a, b);
            ctx.record_game(white, black);
            ctx.round_pairs.insert(pair_key(a, b));
            *counts.entry(a).or_insert(0) += 1;
            *counts.entry(b).or_insert(0) += 1;
            round.games.push((white, black));
        }
        if method == PairingMethod::Direct {
            break;
        }
    }
    ctx.deficits.clear();

    for id in participants {
        for _ in counts[id]..matches_per_player {
            round.byes.push(*id);
            *ctx.byes_taken.entry(*id).or_insert(0) += 1;
        }
    }
    let forced = (participants.len() * matches_per_player) % 2;
    if round.byes.len() > forced {
        let msg = format!(
            "{}: {} bye slot(s) assigned, not enough distinct opponents for {} match(es) per player",
            method,
            round.byes.len(),
            matches_per_player
        );
        log::warn!("{}", msg);
        round.warnings.push(msg);
    }
    Ok(round)
}
