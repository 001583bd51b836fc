//! Deciding whether keywords are hidden by the current selection.

use std::collections::BTreeMap;

use rd_core::{Keyword, KeywordId};

use crate::set::IntervalSet;

/// Coverage of every keyword in a content block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageReport {
    covered: BTreeMap<KeywordId, bool>,
}

impl CoverageReport {
    /// Coverage of `keyword`, or `None` if the block does not define it.
    pub fn get(&self, keyword: &KeywordId) -> Option<bool> {
        self.covered.get(keyword).copied()
    }

    /// Ids of covered keywords, sorted.
    pub fn covered(&self) -> impl Iterator<Item = &KeywordId> {
        self.covered.iter().filter(|(_, c)| **c).map(|(id, _)| id)
    }

    /// Every keyword with its coverage, sorted by id.
    pub fn iter(&self) -> impl Iterator<Item = (&KeywordId, bool)> {
        self.covered.iter().map(|(id, c)| (id, *c))
    }

    /// Number of keywords in the report.
    pub fn len(&self) -> usize {
        self.covered.len()
    }

    /// Whether the report has no keywords.
    pub fn is_empty(&self) -> bool {
        self.covered.is_empty()
    }
}

/// Answers keyword coverage questions against one surface's interval set.
///
/// Only committed intervals count; a pending drag covers nothing.
#[derive(Debug, Clone, Copy)]
pub struct KeywordCoverageEvaluator<'a> {
    set: &'a IntervalSet,
}

impl<'a> KeywordCoverageEvaluator<'a> {
    /// Evaluate against `set`.
    pub fn new(set: &'a IntervalSet) -> Self {
        Self { set }
    }

    /// Whether every character of `keyword` is selected.
    ///
    /// A single containing interval answers immediately; otherwise each index
    /// is checked against the union. Empty keywords are never covered.
    pub fn is_covered(&self, keyword: &Keyword) -> bool {
        if keyword.is_empty() {
            return false;
        }
        let last = keyword.end - 1;
        let intervals = self.set.intervals();
        if intervals
            .iter()
            .any(|iv| iv.start <= keyword.start && iv.end >= last)
        {
            return true;
        }
        keyword
            .indices()
            .all(|i| intervals.iter().any(|iv| iv.contains(i)))
    }

    /// Coverage of every keyword, from one pass over the intervals.
    ///
    /// The bitmap never reaches past the last selected character, so a
    /// keyword ending beyond it is uncovered. Duplicate ids keep the first
    /// definition.
    pub fn evaluate_all(&self, keywords: &[Keyword]) -> CoverageReport {
        let selected_extent = self
            .set
            .intervals()
            .last()
            .map_or(0, |iv| iv.end.saturating_add(1));
        let extent = keywords
            .iter()
            .map(|k| k.end)
            .max()
            .unwrap_or(0)
            .min(selected_extent);
        let mut mask = vec![false; extent];
        for iv in self.set.intervals() {
            if iv.start >= extent {
                break;
            }
            let end = iv.end.min(extent - 1);
            mask[iv.start..=end].fill(true);
        }

        let mut report = CoverageReport::default();
        for keyword in keywords {
            let covered = !keyword.is_empty()
                && keyword.end <= extent
                && mask[keyword.indices()].iter().all(|&m| m);
            report.covered.entry(keyword.id.clone()).or_insert(covered);
        }
        report
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

    #[test]
    fn covered_by_single_interval() {
        let set = set_of(&[(0, 10)]);
        let eval = KeywordCoverageEvaluator::new(&set);
        assert!(eval.is_covered(&Keyword::new("k", 2, 6)));
        assert!(eval.is_covered(&Keyword::new("k", 0, 11)));
        assert!(!eval.is_covered(&Keyword::new("k", 5, 12)));
    }

    #[test]
    fn touching_additions_cover_as_one_interval() {
        // touching spans merge even without auto-merge, so the index-by-index
        // fallback is unreachable while the set stays in normal form
        let mut set = IntervalSet::new();
        set.add(0, 2, false);
        set.add(3, 5, false);
        assert_eq!(set.len(), 1);
        let eval = KeywordCoverageEvaluator::new(&set);
        assert!(eval.is_covered(&Keyword::new("k", 1, 5)));
    }

    #[test]
    fn one_character_gap_is_not_covered() {
        let set = set_of(&[(0, 2), (4, 8)]);
        let eval = KeywordCoverageEvaluator::new(&set);
        assert!(!eval.is_covered(&Keyword::new("k", 0, 6)));
        assert!(eval.is_covered(&Keyword::new("k", 4, 9)));
    }

    #[test]
    fn empty_keyword_never_covered() {
        let set = set_of(&[(0, 20)]);
        let eval = KeywordCoverageEvaluator::new(&set);
        assert!(!eval.is_covered(&Keyword::new("k", 3, 3)));
        assert!(!eval.is_covered(&Keyword::new("k", 5, 2)));
    }

    #[test]
    fn pending_interval_covers_nothing() {
        let mut set = IntervalSet::new();
        set.set_pending(Some(rd_core::Interval::new(0, 9)));
        let eval = KeywordCoverageEvaluator::new(&set);
        assert!(!eval.is_covered(&Keyword::new("k", 0, 4)));
    }

    #[test]
    fn report_answers_each_keyword() {
        let set = set_of(&[(0, 3), (10, 12)]);
        let keywords = vec![
            Keyword::new("mayor", 0, 4),
            Keyword::new("bribe", 8, 12),
            Keyword::new("blank", 6, 6),
        ];
        let report = KeywordCoverageEvaluator::new(&set).evaluate_all(&keywords);
        assert_eq!(report.get(&"mayor".into()), Some(true));
        assert_eq!(report.get(&"bribe".into()), Some(false));
        assert_eq!(report.get(&"blank".into()), Some(false));
        assert_eq!(report.get(&"ghost".into()), None);
        assert_eq!(report.covered().collect::<Vec<_>>(), vec![&KeywordId::from("mayor")]);
    }

    #[test]
    fn keyword_past_the_selection_is_uncovered() {
        let set = set_of(&[(0, 9)]);
        let keywords = vec![
            Keyword::new("typo", 3, usize::MAX),
            Keyword::new("far", 1_000_000_000, 10_000_000_000),
            Keyword::new("ok", 0, 4),
        ];
        let eval = KeywordCoverageEvaluator::new(&set);
        let report = eval.evaluate_all(&keywords);
        assert_eq!(report.get(&"typo".into()), Some(false));
        assert_eq!(report.get(&"far".into()), Some(false));
        assert_eq!(report.get(&"ok".into()), Some(true));
        assert!(!eval.is_covered(&keywords[0]));
    }

    #[test]
    fn report_without_selection_is_all_uncovered() {
        let set = IntervalSet::new();
        let keywords = vec![Keyword::new("huge", 0, usize::MAX)];
        let report = KeywordCoverageEvaluator::new(&set).evaluate_all(&keywords);
        assert_eq!(report.get(&"huge".into()), Some(false));
    }

    proptest! {
        #[test]
        fn batch_agrees_with_single(
            pairs in prop::collection::vec((0usize..40, 0usize..40), 0..8),
            spans in prop::collection::vec((0usize..45, 0usize..45), 1..10),
        ) {
            let set = set_of(&pairs);
            let eval = KeywordCoverageEvaluator::new(&set);
            let keywords: Vec<_> = spans
                .iter()
                .enumerate()
                .map(|(i, &(s, e))| Keyword::new(format!("k{i}"), s, e))
                .collect();
            let report = eval.evaluate_all(&keywords);
            for keyword in &keywords {
                prop_assert_eq!(report.get(&keyword.id), Some(eval.is_covered(keyword)));
            }
        }

        #[test]
        fn covered_iff_every_index_selected(
            pairs in prop::collection::vec((0usize..30, 0usize..30), 0..6),
            start in 0usize..32,
            len in 1usize..8,
        ) {
            let set = set_of(&pairs);
            let keyword = Keyword::new("k", start, start + len);
            let expected = (start..start + len).all(|i| set.contains(i));
            prop_assert_eq!(KeywordCoverageEvaluator::new(&set).is_covered(&keyword), expected);
        }
    }
}
