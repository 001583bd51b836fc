use std::fmt;

use serde::{Deserialize, Serialize};

/// A closed span of character indices, `start..=end`.
///
/// Constructors normalise the endpoints so `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Interval {
    /// First selected index.
    pub start: usize,
    /// Last selected index (inclusive).
    pub end: usize,
}

impl Interval {
    /// Create an interval, swapping the endpoints if they arrive reversed.
    pub fn new(start: usize, end: usize) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// A single-character interval.
    pub fn point(index: usize) -> Self {
        Self {
            start: index,
            end: index,
        }
    }

    /// Number of characters covered.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Closed intervals are never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether `index` lies inside the interval.
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index <= self.end
    }

    /// Whether `other` lies entirely inside this interval.
    pub fn contains_interval(&self, other: &Interval) -> bool {
        self.start <= other.start && self.end >= other.end
    }

    /// Whether the two intervals share at least one index.
    pub fn overlaps(&self, other: &Interval) -> bool {
        !(self.end < other.start || self.start > other.end)
    }

    /// Whether the two intervals sit directly next to each other without overlapping.
    pub fn is_adjacent(&self, other: &Interval) -> bool {
        self.end.checked_add(1) == Some(other.start) || other.end.checked_add(1) == Some(self.start)
    }

    /// Whether a union of the two intervals would be a single interval.
    pub fn touches(&self, other: &Interval) -> bool {
        self.overlaps(other) || self.is_adjacent(other)
    }

    /// Smallest interval spanning both.
    pub fn merge(&self, other: &Interval) -> Interval {
        Interval {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Remove one index, yielding zero, one, or two remaining pieces.
    ///
    /// An index outside the interval returns the interval unchanged.
    pub fn remove_index(&self, index: usize) -> Vec<Interval> {
        if !self.contains(index) {
            return vec![*self];
        }
        if self.start == self.end {
            return Vec::new();
        }
        if index == self.start {
            vec![Interval::new(self.start + 1, self.end)]
        } else if index == self.end {
            vec![Interval::new(self.start, self.end - 1)]
        } else {
            vec![
                Interval::new(self.start, index - 1),
                Interval::new(index + 1, self.end),
            ]
        }
    }

    /// Remove every index of `cut`, keeping the parts on either side.
    pub fn subtract(&self, cut: &Interval) -> Vec<Interval> {
        if !self.overlaps(cut) {
            return vec![*self];
        }
        let mut pieces = Vec::with_capacity(2);
        if cut.start > self.start {
            pieces.push(Interval::new(self.start, cut.start - 1));
        }
        if cut.end < self.end {
            pieces.push(Interval::new(cut.end + 1, self.end));
        }
        pieces
    }

    /// Clamp both endpoints into `0..len`. Returns `None` for an empty text.
    pub fn clamped(&self, len: usize) -> Option<Interval> {
        let last = len.checked_sub(1)?;
        Some(Interval::new(self.start.min(last), self.end.min(last)))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_normalises_reversed_endpoints() {
        let iv = Interval::new(9, 3);
        assert_eq!(iv, Interval { start: 3, end: 9 });
        assert_eq!(iv.len(), 7);
    }

    #[test]
    fn adjacency_and_overlap() {
        let a = Interval::new(0, 4);
        assert!(a.is_adjacent(&Interval::new(5, 8)));
        assert!(!a.overlaps(&Interval::new(5, 8)));
        assert!(a.overlaps(&Interval::new(4, 8)));
        assert!(!a.touches(&Interval::new(6, 8)));
    }

    #[test]
    fn remove_index_cases() {
        let iv = Interval::new(2, 6);
        assert_eq!(
            iv.remove_index(4),
            vec![Interval::new(2, 3), Interval::new(5, 6)]
        );
        assert_eq!(iv.remove_index(2), vec![Interval::new(3, 6)]);
        assert_eq!(iv.remove_index(6), vec![Interval::new(2, 5)]);
        assert_eq!(iv.remove_index(9), vec![iv]);
        assert!(Interval::point(3).remove_index(3).is_empty());
    }

    #[test]
    fn subtract_trims_both_sides() {
        let iv = Interval::new(0, 10);
        assert_eq!(
            iv.subtract(&Interval::new(3, 5)),
            vec![Interval::new(0, 2), Interval::new(6, 10)]
        );
        assert_eq!(iv.subtract(&Interval::new(0, 20)), Vec::<Interval>::new());
        assert_eq!(iv.subtract(&Interval::new(8, 20)), vec![Interval::new(0, 7)]);
    }

    #[test]
    fn clamp_to_text_length() {
        assert_eq!(
            Interval::new(3, 40).clamped(10),
            Some(Interval::new(3, 9))
        );
        assert_eq!(Interval::new(0, 4).clamped(0), None);
    }
}
