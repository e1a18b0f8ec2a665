//! Match records: concrete games, byes, and bracket placeholders.

use crate::models::config::ByeHandling;
use crate::models::participant::ParticipantId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Outcome of a match. Player 1 has the white pieces.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchResult {
    #[default]
    Pending,
    Player1Win,
    Player2Win,
    Draw,
    Bye,
    /// Neither side showed up; nobody scores and no game is counted.
    DoubleForfeit,
}

impl MatchResult {
    /// Anything other than `Pending`.
    pub fn is_terminal(self) -> bool {
        self != MatchResult::Pending
    }
}

/// Where a placeholder's bracket positions are read from at resolution time.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotSource {
    /// Positions index the standings window after the dependency round.
    #[default]
    Standings,
    /// Positions index the two losers of the dependency round (third-place match).
    SemifinalLosers,
}

/// A single match of a championship round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub round: u32,
    /// White. `None` together with `player2_id` while the match is a placeholder.
    pub player1_id: Option<ParticipantId>,
    /// Black. `None` on byes.
    pub player2_id: Option<ParticipantId>,
    pub is_placeholder: bool,
    pub is_bye: bool,
    pub player1_bracket_position: Option<usize>,
    /// `None` on a placeholder bye slot.
    pub player2_bracket_position: Option<usize>,
    pub requires_top_k: Option<usize>,
    pub determined_by_round: Option<u32>,
    #[serde(default)]
    pub slot_source: SlotSource,
    pub result: MatchResult,
}

impl Match {
    /// A concrete game between two participants.
    pub fn game(round: u32, white: ParticipantId, black: ParticipantId) -> Self {
        Self {
            id: Uuid::new_v4(),
            round,
            player1_id: Some(white),
            player2_id: Some(black),
            is_placeholder: false,
            is_bye: false,
            player1_bracket_position: None,
            player2_bracket_position: None,
            requires_top_k: None,
            determined_by_round: None,
            slot_source: SlotSource::Standings,
            result: MatchResult::Pending,
        }
    }

    /// A bye for one participant. Automatic byes are scored immediately.
    pub fn bye(round: u32, participant: ParticipantId, handling: ByeHandling) -> Self {
        Self {
            player2_id: None,
            is_bye: true,
            result: initial_bye_result(handling),
            ..Self::game(round, participant, participant)
        }
    }

    /// A bracket slot whose participants are filled in once `determined_by_round` is final.
    pub fn placeholder(
        round: u32,
        positions: (usize, Option<usize>),
        requires_top_k: usize,
        determined_by_round: u32,
        slot_source: SlotSource,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            round,
            player1_id: None,
            player2_id: None,
            is_placeholder: true,
            is_bye: false,
            player1_bracket_position: Some(positions.0),
            player2_bracket_position: positions.1,
            requires_top_k: Some(requires_top_k),
            determined_by_round: Some(determined_by_round),
            slot_source,
            result: MatchResult::Pending,
        }
    }

    /// Placeholder slot that resolves to a bye (odd bracket size).
    pub fn is_bye_slot(&self) -> bool {
        self.is_bye || (self.is_placeholder && self.player2_bracket_position.is_none())
    }

    /// True if `id` plays in this match.
    pub fn involves(&self, id: ParticipantId) -> bool {
        self.player1_id == Some(id) || self.player2_id == Some(id)
    }

    /// Both participants of a concrete game.
    pub fn players(&self) -> Option<(ParticipantId, ParticipantId)> {
        match (self.player1_id, self.player2_id) {
            (Some(a), Some(b)) if !self.is_bye => Some((a, b)),
            _ => None,
        }
    }

    /// The losing side of a decided game.
    pub fn loser(&self) -> Option<ParticipantId> {
        match self.result {
            MatchResult::Player1Win => self.player2_id,
            MatchResult::Player2Win => self.player1_id,
            _ => None,
        }
    }
}

pub(crate) fn initial_bye_result(handling: ByeHandling) -> MatchResult {
    match handling {
        ByeHandling::Automatic => MatchResult::Bye,
        ByeHandling::Manual => MatchResult::Pending,
    }
}
