//! Standings: scores, tiebreaks, and opponent/color history from completed matches.

use crate::models::{
    Match, MatchResult, Participant, ParticipantId, StandingsEntry, TIEBREAK_BUCHHOLZ,
    TIEBREAK_SONNEBORN_BERGER, TIEBREAK_WINS,
};
use std::cmp::Ordering;
use std::collections::HashMap;

pub const WIN_POINTS: f64 = 1.0;
pub const DRAW_POINTS: f64 = 0.5;

/// Compute ranked standings from the terminal results in `matches`.
///
/// 1. Score every terminal match: win 1, draw 0.5, loss 0, bye `bye_points`;
///    double forfeits score nothing and are not counted as games.
/// 2. Tiebreaks from final scores: Buchholz (sum of opponents' scores, once per game),
///    Sonneborn-Berger (defeated opponents' scores plus half of drawn opponents'), wins.
/// 3. Sort by score, then tiebreaks, then rating (desc), registration time (asc), id (asc).
///
/// Pending matches and placeholders are ignored. Participants with no games get a
/// zero entry. Matches naming unknown participants are skipped.
pub fn compute_standings(
    participants: &[Participant],
    matches: &[Match],
    bye_points: f64,
) -> Vec<StandingsEntry> {
    let mut entries: HashMap<ParticipantId, StandingsEntry> = participants
        .iter()
        .map(|p| (p.id, StandingsEntry::new(p.id)))
        .collect();

    let scored: Vec<&Match> = matches
        .iter()
        .filter(|m| !m.is_placeholder && m.result.is_terminal())
        .collect();

    for m in &scored {
        if m.is_bye {
            if m.result == MatchResult::Bye {
                if let Some(entry) = m.player1_id.and_then(|id| entries.get_mut(&id)) {
                    entry.score += bye_points;
                    entry.byes += 1;
                }
            }
            continue;
        }
        let Some((white, black)) = m.players() else { continue };
        if !entries.contains_key(&white) || !entries.contains_key(&black) {
            continue;
        }
        let (white_points, black_points) = match m.result {
            MatchResult::Player1Win => (WIN_POINTS, 0.0),
            MatchResult::Player2Win => (0.0, WIN_POINTS),
            MatchResult::Draw => (DRAW_POINTS, DRAW_POINTS),
            _ => continue,
        };
        apply_game(&mut entries, white, black, white_points, 1);
        apply_game(&mut entries, black, white, black_points, -1);
    }

    let scores: HashMap<ParticipantId, f64> = entries.iter().map(|(id, e)| (*id, e.score)).collect();
    for m in &scored {
        let Some((white, black)) = m.players() else { continue };
        let (Some(&white_score), Some(&black_score)) = (scores.get(&white), scores.get(&black)) else {
            continue;
        };
        let (white_factor, black_factor) = match m.result {
            MatchResult::Player1Win => (1.0, 0.0),
            MatchResult::Player2Win => (0.0, 1.0),
            MatchResult::Draw => (0.5, 0.5),
            _ => continue,
        };
        if let Some(e) = entries.get_mut(&white) {
            e.tiebreaks[TIEBREAK_BUCHHOLZ] += black_score;
            e.tiebreaks[TIEBREAK_SONNEBORN_BERGER] += white_factor * black_score;
        }
        if let Some(e) = entries.get_mut(&black) {
            e.tiebreaks[TIEBREAK_BUCHHOLZ] += white_score;
            e.tiebreaks[TIEBREAK_SONNEBORN_BERGER] += black_factor * white_score;
        }
    }

    let roster: HashMap<ParticipantId, &Participant> = participants.iter().map(|p| (p.id, p)).collect();
    let mut standings: Vec<StandingsEntry> = entries
        .into_values()
        .map(|mut e| {
            e.tiebreaks[TIEBREAK_WINS] = e.wins as f64;
            e
        })
        .collect();
    standings.sort_by(|a, b| compare_entries(a, b, &roster));
    for (idx, entry) in standings.iter_mut().enumerate() {
        entry.rank = idx + 1;
    }
    standings
}

fn apply_game(
    entries: &mut HashMap<ParticipantId, StandingsEntry>,
    id: ParticipantId,
    opponent: ParticipantId,
    points: f64,
    color: i32,
) {
    if let Some(e) = entries.get_mut(&id) {
        e.score += points;
        e.games_played += 1;
        e.color_balance += color;
        e.opponents.insert(opponent);
        if points == WIN_POINTS {
            e.wins += 1;
        } else if points == DRAW_POINTS {
            e.draws += 1;
        } else {
            e.losses += 1;
        }
    }
}

fn compare_entries(
    a: &StandingsEntry,
    b: &StandingsEntry,
    roster: &HashMap<ParticipantId, &Participant>,
) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| {
            b.tiebreaks
                .iter()
                .zip(&a.tiebreaks)
                .map(|(x, y)| x.total_cmp(y))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| match (roster.get(&a.participant_id), roster.get(&b.participant_id)) {
            (Some(pa), Some(pb)) => pb
                .rating
                .cmp(&pa.rating)
                .then_with(|| pa.registered_at.cmp(&pb.registered_at)),
            _ => Ordering::Equal,
        })
        .then_with(|| a.participant_id.cmp(&b.participant_id))
}

/// Standings restricted to results of rounds up to and including `round`.
pub fn standings_after_round(
    participants: &[Participant],
    matches: &[Match],
    round: u32,
    bye_points: f64,
) -> Vec<StandingsEntry> {
    let played: Vec<Match> = matches.iter().filter(|m| m.round <= round).cloned().collect();
    compute_standings(participants, &played, bye_points)
}
