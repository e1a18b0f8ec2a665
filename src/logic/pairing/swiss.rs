//! Swiss pairing order: score groups, top half against bottom half, floats down.

use crate::logic::pairing::matching::Preferences;
use crate::logic::pairing::PairingContext;
use crate::models::ParticipantId;

/// Build Swiss preferences for `participants` (given in standings order).
///
/// 1. Sort by score (desc), then rating (desc); standings order breaks the rest.
/// 2. Split into groups of equal score.
/// 3. Inside a group of size `L`, position `i` of the top half prefers position
///    `i + L/2`, then the rest of the bottom half, then the remaining top half.
/// 4. Every lower group follows in order, so an unpairable participant floats down.
pub(crate) fn preferences(participants: &[ParticipantId], ctx: &PairingContext) -> Preferences {
    let mut order: Vec<ParticipantId> = participants.to_vec();
    order.sort_by(|a, b| {
        ctx.score(*b)
            .total_cmp(&ctx.score(*a))
            .then_with(|| ctx.rating(*b).cmp(&ctx.rating(*a)))
    });

    let n = order.len();
    let groups = score_groups(&order, ctx);
    let mut candidates = vec![Vec::new(); n];
    for &(start, end) in &groups {
        let half = (end - start) / 2;
        for i in start..end {
            let pos = i - start;
            let list = &mut candidates[i];
            if pos < half {
                let target = i + half;
                list.extend(target..end);
                list.extend((start + half..target).rev());
                list.extend(i + 1..start + half);
            } else {
                list.extend(i + 1..end);
            }
            list.extend(end..n);
        }
    }

    Preferences {
        bye_order: (0..n).rev().collect(),
        order,
        candidates,
    }
}

/// `[start, end)` ranges of equal score in an already sorted order.
fn score_groups(order: &[ParticipantId], ctx: &PairingContext) -> Vec<(usize, usize)> {
    let mut groups = Vec::new();
    let mut start = 0;
    for i in 1..=order.len() {
        if i == order.len() || ctx.score(order[i]) != ctx.score(order[start]) {
            groups.push((start, i));
            start = i;
        }
    }
    groups
}
