//! Standings row.

use crate::models::participant::ParticipantId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Index of each value in [`StandingsEntry::tiebreaks`].
pub const TIEBREAK_BUCHHOLZ: usize = 0;
pub const TIEBREAK_SONNEBORN_BERGER: usize = 1;
pub const TIEBREAK_WINS: usize = 2;

/// One participant's line in the standings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StandingsEntry {
    pub participant_id: ParticipantId,
    /// 1-based position after sorting.
    pub rank: usize,
    pub score: f64,
    /// `[buchholz, sonneborn_berger, wins]`, higher is better, compared in order.
    pub tiebreaks: Vec<f64>,
    pub games_played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub byes: u32,
    /// Games with white minus games with black.
    pub color_balance: i32,
    pub opponents: BTreeSet<ParticipantId>,
}

impl StandingsEntry {
    pub fn new(participant_id: ParticipantId) -> Self {
        Self {
            participant_id,
            tiebreaks: vec![0.0; 3],
            ..Self::default()
        }
    }
}
