//! Result ingestion: recording outcomes and resolving the rounds they unlock.

use crate::logic::bracket::{resolve_placeholder, ResolutionContext};
use crate::logic::standings::standings_after_round;
use crate::models::{ByeHandling, Championship, ChampionshipError, Match, MatchId, MatchResult};
use std::collections::BTreeSet;

/// Record the outcome of one match.
///
/// Byes only take `bye` (or back to `pending` under manual bye handling), games
/// never take `bye`, and placeholders take nothing until resolved. Once a later
/// round has been resolved from this round, its results are frozen.
pub fn record_match_result(
    championship: &mut Championship,
    match_id: MatchId,
    result: MatchResult,
) -> Result<(), ChampionshipError> {
    if !championship.is_generated() {
        return Err(ChampionshipError::NotGenerated);
    }
    let m = championship
        .match_by_id(match_id)
        .ok_or(ChampionshipError::MatchNotFound(match_id))?;

    if m.is_placeholder {
        return Err(ChampionshipError::InvalidResult(
            "placeholder has no participants yet".into(),
        ));
    }
    let manual_byes = championship.config.bye_handling == ByeHandling::Manual;
    let bye_allowed = match result {
        MatchResult::Bye => true,
        MatchResult::Pending => manual_byes,
        _ => false,
    };
    if m.is_bye && !bye_allowed {
        return Err(ChampionshipError::InvalidResult(format!(
            "a bye can only be recorded as bye, got {:?}",
            result
        )));
    }
    if !m.is_bye && result == MatchResult::Bye {
        return Err(ChampionshipError::InvalidResult(
            "a game between two participants cannot be a bye".into(),
        ));
    }
    let round = m.round;
    let frozen = championship
        .matches
        .iter()
        .any(|d| d.determined_by_round == Some(round) && !d.is_placeholder);
    if frozen {
        return Err(ChampionshipError::InvalidResult(format!(
            "round {} results already seeded a later round",
            round
        )));
    }

    if let Some(m) = championship.matches.iter_mut().find(|m| m.id == match_id) {
        m.result = result;
    }
    Ok(())
}

/// Matches of `round` that still block it from being final.
pub fn pending_in_round(championship: &Championship, round: u32) -> usize {
    championship
        .round_matches(round)
        .filter(|m| m.is_placeholder || !m.result.is_terminal())
        .count()
}

/// A round is final once it has matches and none of them is pending or a placeholder.
pub fn is_round_complete(championship: &Championship, round: u32) -> bool {
    championship.round_matches(round).next().is_some() && pending_in_round(championship, round) == 0
}

/// Resolve every placeholder of `round` from the standings after its dependency round.
///
/// All placeholders are resolved before any is written, so a failure leaves the
/// round untouched. A round without placeholders is returned as is.
pub fn resolve_round(championship: &mut Championship, round: u32) -> Result<Vec<Match>, ChampionshipError> {
    if !championship.is_generated() {
        return Err(ChampionshipError::NotGenerated);
    }
    let placeholders: Vec<Match> = championship
        .round_matches(round)
        .filter(|m| m.is_placeholder)
        .cloned()
        .collect();
    let Some(dependency) = placeholders.iter().find_map(|m| m.determined_by_round) else {
        return Ok(championship.round_matches(round).cloned().collect());
    };

    if !is_round_complete(championship, dependency) {
        return Err(ChampionshipError::DependencyIncomplete {
            round,
            dependency,
            pending: pending_in_round(championship, dependency),
        });
    }

    let ctx = ResolutionContext {
        standings: standings_after_round(
            &championship.participants,
            &championship.matches,
            dependency,
            championship.config.bye_points,
        ),
        dependency_matches: championship.round_matches(dependency).cloned().collect(),
        bye_handling: championship.config.bye_handling,
    };
    let resolved = placeholders
        .iter()
        .map(|m| resolve_placeholder(m, &ctx))
        .collect::<Result<Vec<Match>, ChampionshipError>>()?;

    for r in resolved {
        if let Some(slot) = championship.matches.iter_mut().find(|m| m.id == r.id) {
            *slot = r;
        }
    }
    log::info!(
        "Championship {}: resolved {} placeholder(s) of round {} from round {}",
        championship.id,
        placeholders.len(),
        round,
        dependency
    );
    Ok(championship.round_matches(round).cloned().collect())
}

/// Entry point for "round `round` is final": resolves every round waiting on it.
///
/// Returns the rounds that were resolved. Calling it again is a no-op.
pub fn on_round_complete(championship: &mut Championship, round: u32) -> Result<Vec<u32>, ChampionshipError> {
    let dependents: BTreeSet<u32> = championship
        .matches
        .iter()
        .filter(|m| m.is_placeholder && m.determined_by_round == Some(round))
        .map(|m| m.round)
        .collect();
    for &dependent in &dependents {
        resolve_round(championship, dependent)?;
    }
    Ok(dependents.into_iter().collect())
}

/// Surface placeholders whose dependency round can never complete: no dependency
/// recorded, a dependency that is not an earlier round, or one without matches.
pub fn check_resolvable(championship: &Championship) -> Result<(), ChampionshipError> {
    for m in championship.matches.iter().filter(|m| m.is_placeholder) {
        let Some(dependency) = m.determined_by_round else {
            return Err(ChampionshipError::UnresolvableRound {
                round: m.round,
                reason: "placeholder has no dependency round".into(),
            });
        };
        if dependency >= m.round {
            return Err(ChampionshipError::UnresolvableRound {
                round: m.round,
                reason: format!("depends on round {}, which is not earlier", dependency),
            });
        }
        if championship.round_matches(dependency).next().is_none() {
            return Err(ChampionshipError::UnresolvableRound {
                round: m.round,
                reason: format!("dependency round {} has no matches", dependency),
            });
        }
    }
    Ok(())
}
