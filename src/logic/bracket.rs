//! Elimination brackets: placeholder creation and resolution.

use crate::models::{
    initial_bye_result, ByeHandling, ChampionshipError, Match, PairingMethod, ParticipantId,
    ParticipantSelection, RoundSpec, SlotSource, StandingsEntry,
};

/// Participants in a full semifinal round (two games).
const SEMIFINAL_SEATS: usize = 4;

/// Seed slots for a bracket of `size`, one list per pass.
///
/// Pass 0 is the standard fold (1v8, 2v7, 3v6, 4v5). Further passes rotate every
/// seed but the first (circle method), so no two slots repeat. Odd sizes get a
/// bye slot per pass, written as `(seed, None)`. Passes stop once every seed has
/// met every other one.
pub fn seed_slots(size: usize, passes: usize) -> Vec<Vec<(usize, Option<usize>)>> {
    let mut seats: Vec<Option<usize>> = (1..=size).map(Some).collect();
    if size % 2 == 1 {
        seats.push(None);
    }
    let m = seats.len();
    if m < 2 {
        return Vec::new();
    }

    let mut slots = Vec::new();
    for pass in 0..passes.min(m - 1) {
        let rest = &seats[1..];
        let mut arranged = vec![seats[0]];
        arranged.extend((0..m - 1).map(|j| rest[(j + (m - 1) - pass % (m - 1)) % (m - 1)]));

        let pass_slots = (0..m / 2)
            .filter_map(|i| match (arranged[i], arranged[m - 1 - i]) {
                (Some(a), Some(b)) => Some((a.min(b), Some(a.max(b)))),
                (Some(a), None) | (None, Some(a)) => Some((a, None)),
                (None, None) => None,
            })
            .collect();
        slots.push(pass_slots);
    }
    slots
}

/// Placeholder matches for a round whose participants depend on earlier results,
/// plus any warnings about slots that were left out.
///
/// The bracket size comes from the selection rule applied to the roster size. A
/// final with `third_place` also gets a slot for the two semifinal losers, but only
/// when the semifinal seats four; a smaller field has a single semifinal game.
pub fn placeholder_round(
    spec: &RoundSpec,
    roster_size: usize,
) -> Result<(Vec<Match>, Vec<String>), ChampionshipError> {
    let size = spec.participant_selection.selection_size(roster_size);
    let dependency = spec.round.saturating_sub(1);

    if spec.pairing_method == PairingMethod::Direct && size != 2 {
        return Err(ChampionshipError::InvalidPairingInput(format!(
            "round {}: direct pairing needs exactly 2 participants, bracket has {}",
            spec.round, size
        )));
    }

    let mut matches: Vec<Match> = seed_slots(size, spec.matches_per_player)
        .into_iter()
        .flatten()
        .map(|positions| Match::placeholder(spec.round, positions, size, dependency, SlotSource::Standings))
        .collect();

    let mut warnings = Vec::new();
    if spec.third_place {
        let semifinal_size = ParticipantSelection::TopK(SEMIFINAL_SEATS).selection_size(roster_size);
        if semifinal_size < SEMIFINAL_SEATS {
            let msg = format!(
                "round {}: third-place match skipped, semifinal seats only {} participant(s)",
                spec.round, semifinal_size
            );
            log::warn!("{}", msg);
            warnings.push(msg);
        } else {
            matches.push(Match::placeholder(
                spec.round,
                (1, Some(2)),
                2,
                dependency,
                SlotSource::SemifinalLosers,
            ));
        }
    }
    Ok((matches, warnings))
}

/// What a placeholder needs once its dependency round is final.
#[derive(Clone, Debug)]
pub struct ResolutionContext {
    /// Standings over every result up to and including the dependency round.
    pub standings: Vec<StandingsEntry>,
    /// Matches of the dependency round.
    pub dependency_matches: Vec<Match>,
    pub bye_handling: ByeHandling,
}

/// Fill a placeholder with participants.
///
/// Position `i` is the `i`-th entry of the standings window (the first
/// `requires_top_k` entries). Third-place slots read the semifinal losers instead.
/// A match that is not a placeholder is returned unchanged.
pub fn resolve_placeholder(m: &Match, ctx: &ResolutionContext) -> Result<Match, ChampionshipError> {
    if !m.is_placeholder {
        return Ok(m.clone());
    }
    let unresolvable = |reason: String| ChampionshipError::UnresolvableRound { round: m.round, reason };

    let seats: Vec<ParticipantId> = match m.slot_source {
        SlotSource::Standings => {
            let window = m.requires_top_k.unwrap_or(ctx.standings.len()).min(ctx.standings.len());
            ctx.standings[..window].iter().map(|e| e.participant_id).collect()
        }
        SlotSource::SemifinalLosers => semifinal_losers(m.round, ctx)?,
    };
    let seat = |pos: usize| {
        pos.checked_sub(1)
            .and_then(|i| seats.get(i).copied())
            .ok_or_else(|| unresolvable(format!("no participant at bracket position {}", pos)))
    };

    let first = m
        .player1_bracket_position
        .ok_or_else(|| unresolvable("placeholder has no bracket position".into()))?;
    let mut resolved = m.clone();
    resolved.is_placeholder = false;
    resolved.player1_id = Some(seat(first)?);
    match m.player2_bracket_position {
        Some(second) => resolved.player2_id = Some(seat(second)?),
        None => {
            resolved.is_bye = true;
            resolved.result = initial_bye_result(ctx.bye_handling);
        }
    }
    Ok(resolved)
}

/// Losers of the two semifinal games, better standings rank first.
///
/// A drawn or double-forfeited semifinal sends its lower-ranked participant to
/// the third-place match.
fn semifinal_losers(round: u32, ctx: &ResolutionContext) -> Result<Vec<ParticipantId>, ChampionshipError> {
    let rank = |id: ParticipantId| {
        ctx.standings
            .iter()
            .find(|e| e.participant_id == id)
            .map_or(usize::MAX, |e| e.rank)
    };
    let games: Vec<&Match> = ctx
        .dependency_matches
        .iter()
        .filter(|m| m.players().is_some())
        .collect();
    if games.len() != 2 {
        return Err(ChampionshipError::UnresolvableRound {
            round,
            reason: format!("third place needs 2 semifinal games, found {}", games.len()),
        });
    }

    let mut losers: Vec<ParticipantId> = games
        .iter()
        .filter_map(|g| {
            g.loser().or_else(|| {
                let (a, b) = g.players()?;
                Some(if rank(a) > rank(b) { a } else { b })
            })
        })
        .collect();
    losers.sort_by_key(|id| rank(*id));
    Ok(losers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eight_seeds_fold() {
        let slots = seed_slots(8, 1);
        assert_eq!(slots[0], vec![(1, Some(8)), (2, Some(7)), (3, Some(6)), (4, Some(5))]);
    }

    #[test]
    fn later_passes_meet_new_seeds() {
        let slots = seed_slots(4, 3);
        assert_eq!(slots[0], vec![(1, Some(4)), (2, Some(3))]);
        assert_eq!(slots[1], vec![(1, Some(3)), (2, Some(4))]);
        assert_eq!(slots[2], vec![(1, Some(2)), (3, Some(4))]);
    }

    #[test]
    fn odd_bracket_gives_top_seed_a_bye() {
        let slots = seed_slots(3, 1);
        assert_eq!(slots[0], vec![(1, None), (2, Some(3))]);
    }
}
