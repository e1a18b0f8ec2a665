//! Championship aggregate, generation status, and errors.

use crate::models::config::TournamentConfig;
use crate::models::game::{Match, MatchId, MatchResult};
use crate::models::participant::{Participant, ParticipantId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during championship operations.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ChampionshipError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Need at least 2 participants, found {found}")]
    InsufficientParticipants { found: usize },
    #[error("Championship has already been generated")]
    AlreadyGenerated,
    #[error("Cannot regenerate: {reported} match result(s) already reported")]
    CannotRegenerateInProgress { reported: usize },
    #[error("Invalid pairing input: {0}")]
    InvalidPairingInput(String),
    #[error("Round {round} cannot be resolved: {reason}")]
    UnresolvableRound { round: u32, reason: String },
    #[error("Championship is being modified concurrently")]
    ConcurrentModification,
    #[error("Round {round} waits on round {dependency}: {pending} match(es) still pending")]
    DependencyIncomplete { round: u32, dependency: u32, pending: usize },
    #[error("Championship has not been generated yet")]
    NotGenerated,
    #[error("Roster is locked once matches are generated")]
    RosterLocked,
    #[error("A participant with this name already exists")]
    DuplicateParticipant,
    #[error("Participant not found")]
    ParticipantNotFound(ParticipantId),
    #[error("Match not found")]
    MatchNotFound(MatchId),
    #[error("Invalid result: {0}")]
    InvalidResult(String),
    #[error("Championship not found")]
    ChampionshipNotFound(ChampionshipId),
    #[error("Invalid roster: {0}")]
    InvalidRoster(String),
}

/// Unique identifier for a championship.
pub type ChampionshipId = Uuid;

/// Generation state. `NotGenerated -> Generated -> Regenerated`, nothing else.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    #[default]
    NotGenerated,
    Generated,
    Regenerated,
}

/// Full championship state: roster, configuration, and the match schedule.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Championship {
    pub id: ChampionshipId,
    pub name: String,
    pub config: TournamentConfig,
    pub participants: Vec<Participant>,
    /// Every round's matches, concrete and placeholder, in round order.
    pub matches: Vec<Match>,
    pub status: GenerationStatus,
    /// Seed of the last generation, so it can be replayed.
    pub seed: Option<u64>,
    pub generated_at: Option<DateTime<Utc>>,
}

impl Championship {
    /// Create a championship with no participants and nothing generated.
    pub fn new(name: impl Into<String>, config: TournamentConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            config,
            participants: Vec::new(),
            matches: Vec::new(),
            status: GenerationStatus::NotGenerated,
            seed: None,
            generated_at: None,
        }
    }

    /// Create a championship with an initial roster.
    pub fn with_participants(
        name: impl Into<String>,
        config: TournamentConfig,
        participants: Vec<Participant>,
    ) -> Self {
        Self {
            participants,
            ..Self::new(name, config)
        }
    }

    pub fn is_generated(&self) -> bool {
        self.status != GenerationStatus::NotGenerated
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn match_by_id(&self, id: MatchId) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    /// Matches of one round, in creation order.
    pub fn round_matches(&self, round: u32) -> impl Iterator<Item = &Match> {
        self.matches.iter().filter(move |m| m.round == round)
    }

    /// Number of games (byes excluded) that already carry a result.
    pub fn reported_results(&self) -> usize {
        self.matches
            .iter()
            .filter(|m| !m.is_bye && m.result != MatchResult::Pending)
            .count()
    }

    /// Register a participant (only before generation). Names are unique, case-insensitive.
    pub fn add_participant(&mut self, participant: Participant) -> Result<(), ChampionshipError> {
        if self.is_generated() {
            return Err(ChampionshipError::RosterLocked);
        }
        let name = participant.name.trim();
        if name.is_empty() {
            return Err(ChampionshipError::InvalidRoster("empty name".into()));
        }
        let is_duplicate = self
            .participants
            .iter()
            .any(|p| p.name.trim().eq_ignore_ascii_case(name));
        if is_duplicate {
            return Err(ChampionshipError::DuplicateParticipant);
        }
        self.participants.push(participant);
        Ok(())
    }

    /// Remove a participant by id (only before generation).
    pub fn remove_participant(&mut self, id: ParticipantId) -> Result<(), ChampionshipError> {
        if self.is_generated() {
            return Err(ChampionshipError::RosterLocked);
        }
        let idx = self
            .participants
            .iter()
            .position(|p| p.id == id)
            .ok_or(ChampionshipError::ParticipantNotFound(id))?;
        self.participants.remove(idx);
        Ok(())
    }

    /// Replace the configuration (only before generation, like the roster).
    pub fn set_config(&mut self, config: TournamentConfig) -> Result<(), ChampionshipError> {
        if self.is_generated() {
            return Err(ChampionshipError::AlreadyGenerated);
        }
        config.validate()?;
        self.config = config;
        Ok(())
    }
}
