//! Disjoint, non-adjacent interval sets.

use rd_core::Interval;

/// The effect committing an interval would have on a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeSimulation {
    /// The interval that would be stored after merging.
    pub merged: Interval,
    /// Characters already in the set that the merge swallows.
    pub absorbed: usize,
}

impl MergeSimulation {
    /// Net characters the commit would add.
    pub fn delta(&self) -> usize {
        self.merged.len() - self.absorbed
    }
}

/// Committed selections for one text surface, plus an optional pending drag.
///
/// Committed intervals are kept sorted and in maximal normal form: no two of
/// them overlap or sit next to each other. The pending interval is separate
/// and never merged in until it is committed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntervalSet {
    intervals: Vec<Interval>,
    pending: Option<Interval>,
}

impl IntervalSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed intervals, sorted by start.
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Number of committed intervals.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Whether nothing is committed.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Sum of committed interval lengths.
    pub fn total_length(&self) -> usize {
        self.intervals.iter().map(Interval::len).sum()
    }

    /// Whether a committed interval contains `index`.
    pub fn contains(&self, index: usize) -> bool {
        let pos = self.intervals.partition_point(|iv| iv.end < index);
        self.intervals.get(pos).is_some_and(|iv| iv.contains(index))
    }

    /// The committed interval containing `index`, if any.
    pub fn interval_at(&self, index: usize) -> Option<Interval> {
        let pos = self.intervals.partition_point(|iv| iv.end < index);
        self.intervals.get(pos).copied().filter(|iv| iv.contains(index))
    }

    /// What adding `candidate` would store and how much it would swallow.
    pub fn simulate_merge(&self, candidate: Interval) -> MergeSimulation {
        let mut merged = candidate;
        let mut absorbed = 0;
        for iv in self.intervals.iter().filter(|iv| iv.touches(&candidate)) {
            merged = merged.merge(iv);
            absorbed += iv.len();
        }
        MergeSimulation { merged, absorbed }
    }

    /// Add `start..=end` and return the interval that ends up stored.
    ///
    /// With `auto_merge`, every overlapping or adjacent interval is folded in.
    /// Without it the interval is stored as given when it is free-standing;
    /// an interval that touches existing ones is merged regardless, since the
    /// set never holds overlapping or adjacent members.
    pub fn add(&mut self, start: usize, end: usize, auto_merge: bool) -> Interval {
        let candidate = Interval::new(start, end);
        if !auto_merge && !self.intervals.iter().any(|iv| iv.touches(&candidate)) {
            self.insert_sorted(candidate);
            return candidate;
        }

        let MergeSimulation { merged, .. } = self.simulate_merge(candidate);
        self.intervals.retain(|iv| !iv.touches(&candidate));
        self.insert_sorted(merged);
        merged
    }

    fn insert_sorted(&mut self, interval: Interval) {
        let pos = self.intervals.partition_point(|iv| iv.start < interval.start);
        self.intervals.insert(pos, interval);
    }

    /// Deselect a single character, splitting its interval if needed.
    ///
    /// Returns `true` if the index was selected.
    pub fn remove(&mut self, index: usize) -> bool {
        let pos = self.intervals.partition_point(|iv| iv.end < index);
        match self.intervals.get(pos) {
            Some(iv) if iv.contains(index) => {
                let pieces = iv.remove_index(index);
                self.intervals.splice(pos..=pos, pieces);
                true
            }
            _ => false,
        }
    }

    /// Deselect every character in `start..=end`.
    ///
    /// Returns the number of characters removed.
    pub fn remove_range(&mut self, start: usize, end: usize) -> usize {
        let cut = Interval::new(start, end);
        let before = self.total_length();
        self.intervals = self
            .intervals
            .iter()
            .flat_map(|iv| iv.subtract(&cut))
            .collect();
        before - self.total_length()
    }

    /// Drop every committed interval and the pending one.
    pub fn clear(&mut self) {
        self.intervals.clear();
        self.pending = None;
    }

    /// The drag-in-progress interval.
    pub fn pending(&self) -> Option<Interval> {
        self.pending
    }

    /// Replace the drag-in-progress interval.
    pub fn set_pending(&mut self, pending: Option<Interval>) {
        self.pending = pending;
    }

    /// Remove and return the drag-in-progress interval.
    pub fn take_pending(&mut self) -> Option<Interval> {
        self.pending.take()
    }

    /// Selected characters of `text`, in order.
    ///
    /// Intervals reaching past the end of `text` contribute what exists.
    pub fn selected_text(&self, text: &str) -> String {
        text.chars()
            .enumerate()
            .filter(|(i, _)| self.contains(*i))
            .map(|(_, c)| c)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn set_of(pairs: &[(usize, usize)]) -> IntervalSet {
        let mut set = IntervalSet::new();
        for &(s, e) in pairs {
            set.add(s, e, true);
        }
        set
    }

    fn is_normal(set: &IntervalSet) -> bool {
        set.intervals()
            .windows(2)
            .all(|w| w[0].end.saturating_add(1) < w[1].start)
    }

    #[test]
    fn adjacent_adds_merge() {
        let set = set_of(&[(2, 5), (6, 9)]);
        assert_eq!(set.intervals(), &[Interval::new(2, 9)]);
    }

    #[test]
    fn add_bridges_several_intervals() {
        let mut set = set_of(&[(0, 1), (4, 5), (8, 9), (20, 22)]);
        let merged = set.add(2, 7, true);
        assert_eq!(merged, Interval::new(0, 9));
        assert_eq!(set.intervals(), &[Interval::new(0, 9), Interval::new(20, 22)]);
        assert_eq!(set.total_length(), 13);
    }

    #[test]
    fn add_normalises_reversed_input() {
        let mut set = IntervalSet::new();
        assert_eq!(set.add(7, 3, true), Interval::new(3, 7));
    }

    #[test]
    fn add_without_merge_keeps_free_standing_interval() {
        let mut set = set_of(&[(0, 2)]);
        assert_eq!(set.add(5, 6, false), Interval::new(5, 6));
        assert_eq!(set.len(), 2);
        // touching input is still folded in
        assert_eq!(set.add(3, 4, false), Interval::new(0, 6));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn remove_splits_interior() {
        let mut set = set_of(&[(10, 20)]);
        assert!(set.remove(15));
        assert_eq!(
            set.intervals(),
            &[Interval::new(10, 14), Interval::new(16, 20)]
        );
    }

    #[test]
    fn remove_boundaries_and_point() {
        let mut set = set_of(&[(10, 20), (30, 30)]);
        assert!(set.remove(10));
        assert!(set.remove(20));
        assert!(set.remove(30));
        assert!(!set.remove(25));
        assert_eq!(set.intervals(), &[Interval::new(11, 19)]);
    }

    #[test]
    fn remove_range_trims_and_drops() {
        let mut set = set_of(&[(0, 4), (6, 8), (10, 14)]);
        let removed = set.remove_range(3, 11);
        assert_eq!(removed, 2 + 3 + 2);
        assert_eq!(set.intervals(), &[Interval::new(0, 2), Interval::new(12, 14)]);
    }

    #[test]
    fn contains_and_interval_at() {
        let set = set_of(&[(2, 4), (8, 8)]);
        assert!(set.contains(3));
        assert!(!set.contains(5));
        assert_eq!(set.interval_at(8), Some(Interval::point(8)));
        assert_eq!(set.interval_at(9), None);
    }

    #[test]
    fn simulate_counts_absorbed_characters() {
        let set = set_of(&[(0, 3), (10, 12)]);
        let sim = set.simulate_merge(Interval::new(4, 9));
        assert_eq!(sim.merged, Interval::new(0, 12));
        assert_eq!(sim.absorbed, 7);
        assert_eq!(sim.delta(), 6);
    }

    #[test]
    fn pending_is_not_committed() {
        let mut set = set_of(&[(0, 1)]);
        set.set_pending(Some(Interval::new(5, 9)));
        assert_eq!(set.total_length(), 2);
        assert!(!set.contains(6));
        assert_eq!(set.take_pending(), Some(Interval::new(5, 9)));
        assert_eq!(set.pending(), None);
    }

    #[test]
    fn selected_text_in_order() {
        let set = set_of(&[(4, 8), (0, 2)]);
        assert_eq!(set.selected_text("the mayor lied"), "thmayo");
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(usize, usize),
        Remove(usize),
        RemoveRange(usize, usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..60, 0usize..60).prop_map(|(a, b)| Op::Add(a, b)),
            (0usize..60).prop_map(Op::Remove),
            (0usize..60, 0usize..60).prop_map(|(a, b)| Op::RemoveRange(a, b)),
        ]
    }

    proptest! {
        #[test]
        fn stays_in_normal_form(ops in prop::collection::vec(op(), 0..40)) {
            let mut set = IntervalSet::new();
            for op in ops {
                match op {
                    Op::Add(a, b) => { set.add(a, b, true); }
                    Op::Remove(i) => { set.remove(i); }
                    Op::RemoveRange(a, b) => { set.remove_range(a, b); }
                }
                prop_assert!(is_normal(&set), "not normal: {:?}", set.intervals());
            }
        }

        #[test]
        fn insertion_order_does_not_matter(
            pairs in prop::collection::vec((0usize..50, 0usize..50), 0..12)
        ) {
            let forward = set_of(&pairs);
            let mut reversed_pairs = pairs.clone();
            reversed_pairs.reverse();
            let backward = set_of(&reversed_pairs);
            prop_assert_eq!(forward.intervals(), backward.intervals());
        }

        #[test]
        fn membership_matches_point_union(
            pairs in prop::collection::vec((0usize..40, 0usize..40), 0..10)
        ) {
            let set = set_of(&pairs);
            for i in 0..45 {
                let expected = pairs.iter().any(|&(a, b)| Interval::new(a, b).contains(i));
                prop_assert_eq!(set.contains(i), expected);
            }
        }
    }
}
