//! Bounded backtracking matcher shared by the pairing strategies.
//!
//! A strategy supplies an order of participants and, for every position, the
//! positions it prefers as opponents. The matcher always extends the lowest
//! unpaired position first, so earlier entries get their preferred opponents.

use crate::models::ParticipantId;

/// Search nodes explored before a level is given up.
const SEARCH_BUDGET: usize = 50_000;

/// Preference table over an ordered participant list.
#[derive(Clone, Debug)]
pub(crate) struct Preferences {
    pub order: Vec<ParticipantId>,
    /// Candidate positions per position, most preferred first.
    pub candidates: Vec<Vec<usize>>,
    /// Positions that may sit out on odd counts, most preferred first.
    pub bye_order: Vec<usize>,
}

impl Preferences {
    /// Every later position, nearest first. Bye goes to the last position.
    pub fn sequential(order: Vec<ParticipantId>) -> Self {
        let n = order.len();
        let candidates = (0..n).map(|i| (i + 1..n).collect()).collect();
        Self {
            order,
            candidates,
            bye_order: (0..n).rev().collect(),
        }
    }

    /// Later positions within `window` steps only.
    pub fn windowed(order: Vec<ParticipantId>, window: usize) -> Self {
        let n = order.len();
        let candidates = (0..n)
            .map(|i| (i + 1..n.min(i + 1 + window)).collect())
            .collect();
        Self {
            order,
            candidates,
            bye_order: (0..n).rev().collect(),
        }
    }

    /// Reorder bye candidates by `key`, keeping the current order among equal keys.
    pub fn prefer_byes_by<K: Ord>(&mut self, key: impl Fn(ParticipantId) -> K) {
        let order = &self.order;
        self.bye_order.sort_by_key(|&pos| key(order[pos]));
    }

    /// Find a complete pairing (one bye on odd counts) where every pair passes `ok`.
    pub fn solve(&self, ok: &dyn Fn(ParticipantId, ParticipantId) -> bool) -> Option<Vec<(usize, usize)>> {
        let n = self.order.len();
        let mut used = vec![false; n];
        let mut pairs = Vec::with_capacity(n / 2);
        let mut budget = SEARCH_BUDGET;

        if n % 2 == 0 {
            return self.extend(&mut used, &mut pairs, ok, &mut budget).then_some(pairs);
        }
        for &bye in &self.bye_order {
            used[bye] = true;
            if self.extend(&mut used, &mut pairs, ok, &mut budget) {
                return Some(pairs);
            }
            used[bye] = false;
            if budget == 0 {
                break;
            }
        }
        None
    }

    fn extend(
        &self,
        used: &mut [bool],
        pairs: &mut Vec<(usize, usize)>,
        ok: &dyn Fn(ParticipantId, ParticipantId) -> bool,
        budget: &mut usize,
    ) -> bool {
        let Some(first) = used.iter().position(|u| !u) else {
            return true;
        };
        if *budget == 0 {
            return false;
        }
        *budget -= 1;

        used[first] = true;
        for &c in &self.candidates[first] {
            if used[c] || !ok(self.order[first], self.order[c]) {
                continue;
            }
            used[c] = true;
            pairs.push((first, c));
            if self.extend(used, pairs, ok, budget) {
                return true;
            }
            pairs.pop();
            used[c] = false;
        }
        used[first] = false;
        false
    }

    /// Pair whoever can be paired, first come first served. Returns pairs and leftovers.
    pub fn greedy(
        &self,
        ok: &dyn Fn(ParticipantId, ParticipantId) -> bool,
    ) -> (Vec<(usize, usize)>, Vec<usize>) {
        let n = self.order.len();
        let mut used = vec![false; n];
        let mut pairs = Vec::new();
        for i in 0..n {
            if used[i] {
                continue;
            }
            let partner = (0..n)
                .filter(|&c| c != i && !used[c])
                .find(|&c| ok(self.order[i], self.order[c]));
            if let Some(c) = partner {
                used[i] = true;
                used[c] = true;
                pairs.push((i, c));
            }
        }
        let leftovers = (0..n).filter(|&i| !used[i]).collect();
        (pairs, leftovers)
    }
}
