//! Global cap on the number of selected characters.

use rd_core::Interval;

use crate::set::{IntervalSet, MergeSimulation};

/// Result of checking a candidate interval against the budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetCheck {
    /// How the candidate would merge into its set.
    pub simulation: MergeSimulation,
    /// Selected characters across all surfaces if the candidate were committed.
    pub total_if_committed: usize,
    /// Whether committing would go over the cap.
    pub would_exceed: bool,
}

/// Tracks the maximum number of characters that may be selected at once.
///
/// The ledger holds no selection state itself. Callers pass the current
/// total (summed over every surface of the node) and the set the candidate
/// would land in, so the same check serves commits and previews.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionBudgetLedger {
    max: usize,
}

impl Default for SelectionBudgetLedger {
    fn default() -> Self {
        Self { max: 100 }
    }
}

impl SelectionBudgetLedger {
    /// Create a ledger with the given cap.
    pub fn new(max: usize) -> Self {
        Self { max }
    }

    /// The cap.
    pub fn max(&self) -> usize {
        self.max
    }

    /// Change the cap. Existing selections are not trimmed.
    pub fn set_max(&mut self, max: usize) {
        self.max = max;
    }

    /// Characters still available given `total` already selected.
    pub fn remaining(&self, total: usize) -> usize {
        self.max.saturating_sub(total)
    }

    /// Simulate committing `candidate` into `set`. Never mutates.
    pub fn check(&self, total: usize, set: &IntervalSet, candidate: Interval) -> BudgetCheck {
        let simulation = set.simulate_merge(candidate);
        let total_if_committed = total + simulation.delta();
        BudgetCheck {
            simulation,
            total_if_committed,
            would_exceed: total_if_committed > self.max,
        }
    }

    /// Shorten `candidate` from `anchor` until it fits the budget.
    ///
    /// `anchor` must be one of the candidate's endpoints; the other endpoint
    /// is pulled towards it. Returns `None` when not even the anchor
    /// character fits.
    pub fn clamp_to_budget(
        &self,
        total: usize,
        set: &IntervalSet,
        anchor: usize,
        candidate: Interval,
    ) -> Option<Interval> {
        let from_start = anchor <= candidate.start;
        let span = |extra: usize| {
            if from_start {
                Interval::new(candidate.start, candidate.start + extra)
            } else {
                Interval::new(candidate.end - extra, candidate.end)
            }
        };
        let fits = |extra: usize| !self.check(total, set, span(extra)).would_exceed;

        if !fits(0) {
            return None;
        }
        // Largest extension that still fits; the delta only grows with length.
        let (mut lo, mut hi) = (0, candidate.len() - 1);
        while lo < hi {
            let mid = lo + (hi - lo).div_ceil(2);
            if fits(mid) {
                lo = mid;
            } else {
                hi = mid - 1;
            }
        }
        Some(span(lo))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn check_counts_only_new_characters() {
        let mut set = IntervalSet::new();
        set.add(0, 9, true);
        let ledger = SelectionBudgetLedger::new(15);

        let check = ledger.check(10, &set, Interval::new(5, 14));
        assert_eq!(check.simulation.merged, Interval::new(0, 14));
        assert_eq!(check.total_if_committed, 15);
        assert!(!check.would_exceed);

        let check = ledger.check(10, &set, Interval::new(5, 15));
        assert!(check.would_exceed);
    }

    #[test]
    fn remaining_saturates() {
        let ledger = SelectionBudgetLedger::new(5);
        assert_eq!(ledger.remaining(3), 2);
        assert_eq!(ledger.remaining(9), 0);
    }

    #[test]
    fn clamp_forward_drag() {
        let set = IntervalSet::new();
        let ledger = SelectionBudgetLedger::new(4);
        let clamped = ledger.clamp_to_budget(0, &set, 10, Interval::new(10, 30));
        assert_eq!(clamped, Some(Interval::new(10, 13)));
    }

    #[test]
    fn clamp_backward_drag_keeps_anchor() {
        let set = IntervalSet::new();
        let ledger = SelectionBudgetLedger::new(3);
        let clamped = ledger.clamp_to_budget(0, &set, 30, Interval::new(10, 30));
        assert_eq!(clamped, Some(Interval::new(28, 30)));
    }

    #[test]
    fn clamp_counts_absorbed_intervals() {
        let mut set = IntervalSet::new();
        set.add(12, 13, true);
        let ledger = SelectionBudgetLedger::new(5);
        // 2 already used, the existing [12,13] is swallowed for free
        let clamped = ledger.clamp_to_budget(2, &set, 10, Interval::new(10, 30));
        assert_eq!(clamped, Some(Interval::new(10, 14)));
    }

    #[test]
    fn clamp_drops_when_full() {
        let set = IntervalSet::new();
        let ledger = SelectionBudgetLedger::new(3);
        assert_eq!(ledger.clamp_to_budget(3, &set, 0, Interval::new(0, 5)), None);
    }

    proptest! {
        #[test]
        fn accepted_commits_never_exceed_cap(
            max in 0usize..40,
            adds in prop::collection::vec((0usize..60, 0usize..60), 0..30)
        ) {
            let ledger = SelectionBudgetLedger::new(max);
            let mut set = IntervalSet::new();
            for (a, b) in adds {
                let before = set.clone();
                let check = ledger.check(set.total_length(), &set, Interval::new(a, b));
                if check.would_exceed {
                    prop_assert_eq!(&set, &before);
                } else {
                    set.add(a, b, true);
                    prop_assert_eq!(set.total_length(), check.total_if_committed);
                }
                prop_assert!(set.total_length() <= max);
            }
        }

        #[test]
        fn clamped_preview_always_fits(
            max in 1usize..30,
            anchor in 0usize..50,
            other in 0usize..50,
        ) {
            let ledger = SelectionBudgetLedger::new(max);
            let set = IntervalSet::new();
            let candidate = Interval::new(anchor, other);
            if let Some(iv) = ledger.clamp_to_budget(0, &set, anchor, candidate) {
                prop_assert!(iv.contains(anchor));
                prop_assert!(candidate.contains_interval(&iv));
                prop_assert!(!ledger.check(0, &set, iv).would_exceed);
            }
        }
    }
}
