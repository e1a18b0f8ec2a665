//! Championship generation: every round's matches in one pass.

use crate::logic::bracket::placeholder_round;
use crate::logic::pairing::{pair_round, PairingContext};
use crate::logic::selection::select_participants;
use crate::logic::standings::compute_standings;
use crate::models::{
    Championship, ChampionshipError, GenerationStatus, Match, PairingMethod, Participant,
    RoundSpec, RoundType, TournamentConfig,
};
use chrono::Utc;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// How `generate_championship` treats an existing schedule.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Replace an existing schedule instead of failing with `AlreadyGenerated`.
    #[serde(default)]
    pub force_regenerate: bool,
    /// Also allow replacing a schedule that already has reported results.
    #[serde(default)]
    pub discard_results: bool,
    /// Fixed seed for reproducible random pairings.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Per-round projection of a generated schedule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round: u32,
    pub round_type: RoundType,
    pub pairing_method: PairingMethod,
    /// Participants paired now, or the bracket size of a placeholder round.
    pub participant_count: usize,
    /// Games, placeholders included, byes excluded.
    pub match_count: usize,
    pub bye_count: usize,
    pub placeholder_count: usize,
    pub warnings: Vec<String>,
}

/// What a generation produced (or would produce, in preview).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub seed: u64,
    pub total_rounds: usize,
    pub total_matches: usize,
    pub total_byes: usize,
    pub total_placeholders: usize,
    pub rounds: Vec<RoundSummary>,
}

impl GenerationSummary {
    /// All warnings, round by round.
    pub fn warnings(&self) -> impl Iterator<Item = &String> {
        self.rounds.iter().flat_map(|r| r.warnings.iter())
    }

    pub fn round(&self, round: u32) -> Option<&RoundSummary> {
        self.rounds.iter().find(|r| r.round == round)
    }
}

fn summarize(spec: &RoundSpec, participant_count: usize, matches: &[Match], warnings: Vec<String>) -> RoundSummary {
    let bye_count = matches.iter().filter(|m| m.is_bye_slot()).count();
    RoundSummary {
        round: spec.round,
        round_type: spec.round_type,
        pairing_method: spec.pairing_method,
        participant_count,
        match_count: matches.len() - bye_count,
        bye_count,
        placeholder_count: matches.iter().filter(|m| m.is_placeholder).count(),
        warnings,
    }
}

/// Build the full schedule for `participants` without touching any championship.
///
/// 1. Validate the config; require at least 2 participants.
/// 2. Virtual standings: every earlier round counts as unplayed, so the rating
///    snapshot orders the field.
/// 3. Rounds selecting `all`, and round 1 whatever its rule, are paired now; the
///    pairing context keeps opponents and colors of every earlier generated round.
/// 4. Later rounds selecting by standings become placeholders.
pub fn build_schedule(
    config: &TournamentConfig,
    participants: &[Participant],
    seed: u64,
) -> Result<(Vec<Match>, GenerationSummary), ChampionshipError> {
    config.validate()?;
    if participants.len() < 2 {
        return Err(ChampionshipError::InsufficientParticipants {
            found: participants.len(),
        });
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let virtual_standings = compute_standings(participants, &[], config.bye_points);
    let mut ctx = PairingContext::new(config, participants, &virtual_standings);

    let mut schedule: Vec<Match> = Vec::new();
    let mut rounds = Vec::with_capacity(config.rounds.len());
    for spec in &config.rounds {
        let (round_matches, participant_count, warnings) =
            if spec.round > 1 && spec.participant_selection.depends_on_results() {
                let (placeholders, warnings) = placeholder_round(spec, participants.len())?;
                let size = spec.participant_selection.selection_size(participants.len());
                log::debug!("Round {}: {} placeholder slot(s) for top {}", spec.round, placeholders.len(), size);
                (placeholders, size, warnings)
            } else {
                let selected = select_participants(spec.participant_selection, &virtual_standings);
                let pairing = pair_round(
                    spec.pairing_method,
                    &selected,
                    &mut ctx,
                    spec.matches_per_player,
                    &mut rng,
                )?;
                let mut matches: Vec<Match> = pairing
                    .games
                    .iter()
                    .map(|&(white, black)| Match::game(spec.round, white, black))
                    .collect();
                matches.extend(
                    pairing
                        .byes
                        .iter()
                        .map(|&id| Match::bye(spec.round, id, config.bye_handling)),
                );
                log::debug!(
                    "Round {}: {} game(s), {} bye(s) via {}",
                    spec.round,
                    pairing.games.len(),
                    pairing.byes.len(),
                    spec.pairing_method
                );
                (matches, selected.len(), pairing.warnings)
            };
        rounds.push(summarize(spec, participant_count, &round_matches, warnings));
        schedule.extend(round_matches);
    }

    let summary = GenerationSummary {
        seed,
        total_rounds: rounds.len(),
        total_matches: rounds.iter().map(|r| r.match_count).sum(),
        total_byes: rounds.iter().map(|r| r.bye_count).sum(),
        total_placeholders: rounds.iter().map(|r| r.placeholder_count).sum(),
        rounds,
    };
    Ok((schedule, summary))
}

/// Side-effect-free generation: same counts a real generation with `seed` produces.
pub fn preview_championship(
    championship: &Championship,
    seed: Option<u64>,
) -> Result<GenerationSummary, ChampionshipError> {
    let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
    let (_, summary) = build_schedule(&championship.config, &championship.participants, seed)?;
    Ok(summary)
}

/// Generate (or regenerate) every round's matches.
///
/// Fails with `AlreadyGenerated` unless `force_regenerate` is set, and with
/// `CannotRegenerateInProgress` when results were reported and `discard_results`
/// is not set. The schedule is built completely before anything is replaced.
pub fn generate_championship(
    championship: &mut Championship,
    options: GenerateOptions,
) -> Result<GenerationSummary, ChampionshipError> {
    if championship.is_generated() {
        if !options.force_regenerate {
            return Err(ChampionshipError::AlreadyGenerated);
        }
        let reported = championship.reported_results();
        if reported > 0 && !options.discard_results {
            return Err(ChampionshipError::CannotRegenerateInProgress { reported });
        }
    }

    let seed = options.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let (matches, summary) = build_schedule(&championship.config, &championship.participants, seed)?;

    let regenerating = championship.is_generated();
    championship.matches = matches;
    championship.seed = Some(seed);
    championship.generated_at = Some(Utc::now());
    championship.status = if regenerating {
        GenerationStatus::Regenerated
    } else {
        GenerationStatus::Generated
    };

    log::info!(
        "{} championship {}: {} round(s), {} match(es), {} bye(s), {} placeholder(s), seed {}",
        if regenerating { "Regenerated" } else { "Generated" },
        championship.id,
        summary.total_rounds,
        summary.total_matches,
        summary.total_byes,
        summary.total_placeholders,
        seed
    );
    for warning in summary.warnings() {
        log::warn!("Championship {}: {}", championship.id, warning);
    }
    Ok(summary)
}
