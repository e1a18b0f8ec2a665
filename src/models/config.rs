//! Championship configuration: round structure, pairing methods, presets, validation.

use crate::models::tournament::ChampionshipError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How rounds progress. Only progressive championships exist today.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentMode {
    #[default]
    Progressive,
}

/// Character of a round.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundType {
    /// Several games per participant.
    Dense,
    Normal,
    /// Only a top slice of the standings plays.
    Selective,
    Final,
}

/// Which participants play a round.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantSelection {
    All,
    TopK(usize),
    TopPercent(u32),
}

impl ParticipantSelection {
    /// Number of participants this rule selects from a field of `count`.
    pub fn selection_size(self, count: usize) -> usize {
        match self {
            ParticipantSelection::All => count,
            ParticipantSelection::TopK(k) => k.min(count),
            ParticipantSelection::TopPercent(p) => {
                let wanted = (count * p as usize).div_ceil(100).max(2);
                wanted.min(count)
            }
        }
    }

    /// Whether the selected set depends on game results rather than the roster.
    pub fn depends_on_results(self) -> bool {
        !matches!(self, ParticipantSelection::All)
    }
}

/// Pairing algorithm used for a round.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingMethod {
    Random,
    RandomSeeded,
    RatingBased,
    StandingsBased,
    Direct,
    Swiss,
}

impl fmt::Display for PairingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PairingMethod::Random => "random",
            PairingMethod::RandomSeeded => "random_seeded",
            PairingMethod::RatingBased => "rating_based",
            PairingMethod::StandingsBased => "standings_based",
            PairingMethod::Direct => "direct",
            PairingMethod::Swiss => "swiss",
        };
        f.write_str(name)
    }
}

/// What happens to the participant left without an opponent.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByeHandling {
    /// Bye is scored as soon as it is created.
    #[default]
    Automatic,
    /// Bye stays pending until an organizer records it.
    Manual,
}

/// One round of the championship.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundSpec {
    pub round: u32,
    #[serde(rename = "type")]
    pub round_type: RoundType,
    pub participant_selection: ParticipantSelection,
    pub matches_per_player: usize,
    pub pairing_method: PairingMethod,
    /// Adds a match between the two semifinal losers to the final round.
    #[serde(default)]
    pub third_place: bool,
}

impl RoundSpec {
    pub fn new(
        round: u32,
        round_type: RoundType,
        participant_selection: ParticipantSelection,
        matches_per_player: usize,
        pairing_method: PairingMethod,
    ) -> Self {
        Self {
            round,
            round_type,
            participant_selection,
            matches_per_player,
            pairing_method,
            third_place: false,
        }
    }

    /// Builder-style switch for the third-place match.
    pub fn with_third_place(mut self) -> Self {
        self.third_place = true;
        self
    }
}

fn default_true() -> bool {
    true
}

fn default_bye_points() -> f64 {
    1.0
}

/// Full round structure and pairing rules of a championship.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TournamentConfig {
    #[serde(default)]
    pub mode: TournamentMode,
    pub rounds: Vec<RoundSpec>,
    #[serde(default = "default_true")]
    pub avoid_repeat_matches: bool,
    #[serde(default)]
    pub color_balance_strict: bool,
    #[serde(default)]
    pub bye_handling: ByeHandling,
    #[serde(default = "default_bye_points")]
    pub bye_points: f64,
}

/// Named round structures.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentPreset {
    SmallTournament,
    MediumTournament,
    LargeTournament,
}

impl FromStr for TournamentPreset {
    type Err = ChampionshipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "small_tournament" => Ok(TournamentPreset::SmallTournament),
            "medium_tournament" => Ok(TournamentPreset::MediumTournament),
            "large_tournament" => Ok(TournamentPreset::LargeTournament),
            other => Err(ChampionshipError::InvalidConfiguration(format!(
                "unknown preset '{}'",
                other
            ))),
        }
    }
}

/// Configuration as accepted from outside: a preset name or a custom structure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigInput {
    Preset(TournamentPreset),
    Custom(TournamentConfig),
}

impl ConfigInput {
    /// Expand and validate.
    pub fn into_config(self) -> Result<TournamentConfig, ChampionshipError> {
        let config = match self {
            ConfigInput::Preset(preset) => TournamentConfig::preset(preset),
            ConfigInput::Custom(config) => config,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self::preset(TournamentPreset::SmallTournament)
    }
}

impl TournamentConfig {
    /// Config with default flags around the given rounds.
    pub fn with_rounds(rounds: Vec<RoundSpec>) -> Self {
        Self {
            mode: TournamentMode::Progressive,
            rounds,
            avoid_repeat_matches: true,
            color_balance_strict: false,
            bye_handling: ByeHandling::Automatic,
            bye_points: default_bye_points(),
        }
    }

    /// Canonical round sequence for a preset.
    pub fn preset(preset: TournamentPreset) -> Self {
        use PairingMethod::*;
        use ParticipantSelection::*;
        use RoundType::*;

        let (opening, swiss_rounds, brackets): (PairingMethod, u32, &[usize]) = match preset {
            TournamentPreset::SmallTournament => (Random, 2, &[4]),
            TournamentPreset::MediumTournament => (RandomSeeded, 3, &[4]),
            TournamentPreset::LargeTournament => (RandomSeeded, 4, &[8, 4]),
        };

        let mut rounds = vec![RoundSpec::new(1, Dense, All, 2, opening)];
        for _ in 0..swiss_rounds {
            let round = rounds.len() as u32 + 1;
            rounds.push(RoundSpec::new(round, Normal, All, 1, Swiss));
        }
        for &k in brackets {
            let round = rounds.len() as u32 + 1;
            rounds.push(RoundSpec::new(round, Selective, TopK(k), 1, StandingsBased));
        }
        let mut last = RoundSpec::new(rounds.len() as u32 + 1, Final, TopK(2), 1, Direct);
        if preset != TournamentPreset::SmallTournament {
            last = last.with_third_place();
        }
        rounds.push(last);

        Self::with_rounds(rounds)
    }

    /// Parse a custom configuration from JSON and validate it.
    pub fn from_json(raw: &str) -> Result<Self, ChampionshipError> {
        let input: ConfigInput = serde_json::from_str(raw)
            .map_err(|e| ChampionshipError::InvalidConfiguration(e.to_string()))?;
        input.into_config()
    }

    /// Round spec by number.
    pub fn round(&self, round: u32) -> Option<&RoundSpec> {
        self.rounds.iter().find(|r| r.round == round)
    }

    /// Check the structural invariants. Nothing is mutated on failure.
    pub fn validate(&self) -> Result<(), ChampionshipError> {
        let invalid = |msg: String| Err(ChampionshipError::InvalidConfiguration(msg));

        if self.rounds.is_empty() {
            return invalid("at least one round is required".into());
        }
        if !self.bye_points.is_finite() || self.bye_points < 0.0 {
            return invalid(format!("bye_points must be a non-negative number, got {}", self.bye_points));
        }

        let finals = self.rounds.iter().filter(|r| r.round_type == RoundType::Final).count();
        if finals > 1 {
            return invalid(format!("only one final round is allowed, found {}", finals));
        }

        for (idx, spec) in self.rounds.iter().enumerate() {
            let expected = idx as u32 + 1;
            if spec.round != expected {
                return invalid(format!("round numbers must be contiguous from 1: expected {}, found {}", expected, spec.round));
            }
            if spec.matches_per_player == 0 {
                return invalid(format!("round {}: matches_per_player must be at least 1", spec.round));
            }
            match spec.participant_selection {
                ParticipantSelection::TopK(0) => {
                    return invalid(format!("round {}: top_k must be at least 1", spec.round));
                }
                ParticipantSelection::TopPercent(p) if p == 0 || p > 100 => {
                    return invalid(format!("round {}: top_percent must be within 1..=100, got {}", spec.round, p));
                }
                _ => {}
            }
            if spec.round_type == RoundType::Final && idx + 1 != self.rounds.len() {
                return invalid(format!("round {}: the final must be the last round", spec.round));
            }
            if spec.pairing_method == PairingMethod::Direct {
                if spec.matches_per_player != 1 {
                    return invalid(format!("round {}: direct pairing allows exactly one match per player", spec.round));
                }
                if let ParticipantSelection::TopK(k) = spec.participant_selection {
                    if k != 2 {
                        return invalid(format!("round {}: direct pairing needs exactly 2 participants, top_k is {}", spec.round, k));
                    }
                }
            }
            if spec.third_place {
                self.validate_third_place(idx)?;
            }
        }
        Ok(())
    }

    fn validate_third_place(&self, idx: usize) -> Result<(), ChampionshipError> {
        let spec = &self.rounds[idx];
        let semifinal = idx.checked_sub(1).map(|i| &self.rounds[i]);
        let ok = spec.round_type == RoundType::Final
            && spec.pairing_method == PairingMethod::Direct
            && semifinal.is_some_and(|s| {
                s.participant_selection == ParticipantSelection::TopK(4) && s.matches_per_player == 1
            });
        if ok {
            Ok(())
        } else {
            Err(ChampionshipError::InvalidConfiguration(format!(
                "round {}: a third-place match needs a direct final right after a top_k 4 semifinal",
                spec.round
            )))
        }
    }
}
