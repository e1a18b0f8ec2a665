//! Participant selection for a round.

use crate::models::{ParticipantId, ParticipantSelection, StandingsEntry};

/// Resolve the participants of a round, in standings order.
///
/// `top_k` larger than the field returns everybody; `top_percent` rounds up and
/// never selects fewer than 2.
pub fn select_participants(
    rule: ParticipantSelection,
    standings: &[StandingsEntry],
) -> Vec<ParticipantId> {
    let count = rule.selection_size(standings.len());
    if count < standings.len() {
        log::debug!("Selecting top {} of {} participants", count, standings.len());
    }
    standings
        .iter()
        .take(count)
        .map(|e| e.participant_id)
        .collect()
}
