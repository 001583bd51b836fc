//! Per-surface selection state for the current node.

use std::collections::BTreeMap;

use rd_core::{Interval, TextSurfaceId};
use tracing::{debug, warn};

use crate::ledger::SelectionBudgetLedger;
use crate::set::IntervalSet;

/// Result of a commit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitOutcome {
    /// Whether the selection was stored.
    pub accepted: bool,
    /// The interval stored after merging, when accepted.
    pub merged: Option<Interval>,
    /// Selected characters across every surface after the attempt.
    pub total_used: usize,
    /// Characters still available.
    pub remaining: usize,
}

/// Result of a preview. Nothing is mutated except a drag's pending interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewOutcome {
    /// The interval that was checked, after index clamping. `None` when the
    /// surface is unknown or empty, or when a drag could not fit even one
    /// character.
    pub interval: Option<Interval>,
    /// Whether the interval as requested would go over the budget.
    pub would_exceed: bool,
    /// Selected characters if `interval` were committed.
    pub total_if_committed: usize,
}

#[derive(Debug, Clone)]
struct Surface {
    len: usize,
    set: IntervalSet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Drag {
    surface: TextSurfaceId,
    anchor: usize,
}

/// Selection state of every surface on screen, under one shared budget.
#[derive(Debug, Clone, Default)]
pub struct SelectionBook {
    surfaces: BTreeMap<TextSurfaceId, Surface>,
    ledger: SelectionBudgetLedger,
    drag: Option<Drag>,
}

impl SelectionBook {
    /// Create a book with the given budget and no surfaces.
    pub fn new(budget: usize) -> Self {
        Self {
            ledger: SelectionBudgetLedger::new(budget),
            ..Self::default()
        }
    }

    /// Make `surface` selectable with `len` characters, discarding any state it had.
    pub fn register_surface(&mut self, surface: TextSurfaceId, len: usize) {
        debug!(%surface, len, "surface registered");
        self.surfaces.insert(
            surface,
            Surface {
                len,
                set: IntervalSet::new(),
            },
        );
    }

    /// Forget every surface and any drag.
    pub fn unregister_all(&mut self) {
        self.surfaces.clear();
        self.drag = None;
    }

    /// Registered surfaces in id order.
    pub fn surfaces(&self) -> impl Iterator<Item = &TextSurfaceId> {
        self.surfaces.keys()
    }

    /// Character count of a registered surface.
    pub fn surface_len(&self, surface: &TextSurfaceId) -> Option<usize> {
        self.surfaces.get(surface).map(|s| s.len)
    }

    /// The interval set of a registered surface.
    pub fn set(&self, surface: &TextSurfaceId) -> Option<&IntervalSet> {
        self.surfaces.get(surface).map(|s| &s.set)
    }

    /// Committed intervals of a surface; empty if it is not registered.
    pub fn intervals(&self, surface: &TextSurfaceId) -> &[Interval] {
        self.set(surface).map(IntervalSet::intervals).unwrap_or(&[])
    }

    /// Pending drag interval of a surface.
    pub fn pending(&self, surface: &TextSurfaceId) -> Option<Interval> {
        self.set(surface).and_then(IntervalSet::pending)
    }

    /// The budget ledger.
    pub fn ledger(&self) -> &SelectionBudgetLedger {
        &self.ledger
    }

    /// Change the budget cap.
    pub fn set_budget(&mut self, max: usize) {
        self.ledger.set_max(max);
    }

    /// Committed characters across every surface.
    pub fn total_used(&self) -> usize {
        self.surfaces.values().map(|s| s.set.total_length()).sum()
    }

    /// Characters still available.
    pub fn remaining(&self) -> usize {
        self.ledger.remaining(self.total_used())
    }

    fn clamp(&self, surface: &TextSurfaceId, start: usize, end: usize) -> Option<Interval> {
        let len = self.surface_len(surface)?;
        Interval::new(start, end).clamped(len)
    }

    fn clamp_index(&self, surface: &TextSurfaceId, index: usize) -> Option<usize> {
        self.clamp(surface, index, index).map(|iv| iv.start)
    }

    fn rejected(&self) -> CommitOutcome {
        let total_used = self.total_used();
        CommitOutcome {
            accepted: false,
            merged: None,
            total_used,
            remaining: self.ledger.remaining(total_used),
        }
    }

    /// Select `start..=end` on `surface` if the budget allows.
    ///
    /// Indices are clamped to the surface. Unknown or empty surfaces and
    /// over-budget selections are rejected without changing anything.
    pub fn commit(&mut self, surface: &TextSurfaceId, start: usize, end: usize) -> CommitOutcome {
        let Some(candidate) = self.clamp(surface, start, end) else {
            warn!(%surface, start, end, "commit on unknown or empty surface rejected");
            return self.rejected();
        };
        let total = self.total_used();
        let Some(entry) = self.surfaces.get_mut(surface) else {
            return self.rejected();
        };

        let check = self.ledger.check(total, &entry.set, candidate);
        if check.would_exceed {
            debug!(
                %surface,
                %candidate,
                total_if_committed = check.total_if_committed,
                max = self.ledger.max(),
                "selection over budget"
            );
            return self.rejected();
        }

        let merged = entry.set.add(candidate.start, candidate.end, true);
        debug!(%surface, %candidate, %merged, total = check.total_if_committed, "selection committed");
        CommitOutcome {
            accepted: true,
            merged: Some(merged),
            total_used: check.total_if_committed,
            remaining: self.ledger.remaining(check.total_if_committed),
        }
    }

    /// Check `start..=end` against the budget without committing it.
    pub fn preview(&self, surface: &TextSurfaceId, start: usize, end: usize) -> PreviewOutcome {
        let total = self.total_used();
        match (self.clamp(surface, start, end), self.set(surface)) {
            (Some(candidate), Some(set)) => {
                let check = self.ledger.check(total, set, candidate);
                PreviewOutcome {
                    interval: Some(candidate),
                    would_exceed: check.would_exceed,
                    total_if_committed: check.total_if_committed,
                }
            }
            _ => PreviewOutcome {
                interval: None,
                would_exceed: false,
                total_if_committed: total,
            },
        }
    }

    /// Deselect one character. Returns the surface's intervals afterwards.
    pub fn erase_at(&mut self, surface: &TextSurfaceId, index: usize) -> Vec<Interval> {
        if let Some(entry) = self.surfaces.get_mut(surface) {
            if entry.set.remove(index) {
                debug!(%surface, index, "character deselected");
            }
        }
        self.intervals(surface).to_vec()
    }

    /// Deselect `start..=end`. Returns the number of characters removed.
    pub fn erase_range(&mut self, surface: &TextSurfaceId, start: usize, end: usize) -> usize {
        let removed = self
            .surfaces
            .get_mut(surface)
            .map_or(0, |entry| entry.set.remove_range(start, end));
        if removed > 0 {
            debug!(%surface, start, end, removed, "range deselected");
        }
        removed
    }

    /// Clear every committed and pending selection. Surfaces stay registered.
    pub fn clear_all(&mut self) {
        for entry in self.surfaces.values_mut() {
            entry.set.clear();
        }
        self.drag = None;
        debug!("all selections cleared");
    }

    /// The surface a drag is in progress on.
    pub fn dragging(&self) -> Option<&TextSurfaceId> {
        self.drag.as_ref().map(|d| &d.surface)
    }

    /// The clamped index the drag in progress started at.
    pub fn drag_anchor(&self) -> Option<usize> {
        self.drag.as_ref().map(|d| d.anchor)
    }

    /// Start a drag at `index`. Any drag in progress is abandoned.
    pub fn begin_drag(&mut self, surface: &TextSurfaceId, index: usize) -> Option<PreviewOutcome> {
        self.cancel_drag();
        let Some(anchor) = self.clamp_index(surface, index) else {
            warn!(%surface, index, "drag on unknown or empty surface ignored");
            return None;
        };
        self.drag = Some(Drag {
            surface: surface.clone(),
            anchor,
        });
        self.drag_to(anchor)
    }

    /// Move the free end of the drag to `index` and recompute the pending interval.
    ///
    /// An over-budget drag is shortened from its anchor; if nothing fits the
    /// pending interval is dropped.
    pub fn drag_to(&mut self, index: usize) -> Option<PreviewOutcome> {
        let Drag { surface, anchor } = self.drag.clone()?;
        let preview = self.preview(&surface, anchor, index);
        let candidate = preview.interval?;
        let total = self.total_used();
        let entry = self.surfaces.get_mut(&surface)?;

        let pending = if preview.would_exceed {
            self.ledger.clamp_to_budget(total, &entry.set, anchor, candidate)
        } else {
            Some(candidate)
        };
        entry.set.set_pending(pending);

        let total_if_committed = match pending {
            Some(iv) => self.ledger.check(total, &entry.set, iv).total_if_committed,
            None => total,
        };
        Some(PreviewOutcome {
            interval: pending,
            would_exceed: preview.would_exceed,
            total_if_committed,
        })
    }

    /// Finish the drag and commit its pending interval.
    ///
    /// Returns `None` when no drag was in progress.
    pub fn end_drag(&mut self) -> Option<CommitOutcome> {
        let Drag { surface, .. } = self.drag.take()?;
        let pending = self
            .surfaces
            .get_mut(&surface)
            .and_then(|entry| entry.set.take_pending());
        Some(match pending {
            Some(iv) => self.commit(&surface, iv.start, iv.end),
            None => self.rejected(),
        })
    }

    /// Abandon the drag. Returns the surface it was on.
    pub fn cancel_drag(&mut self) -> Option<TextSurfaceId> {
        let Drag { surface, .. } = self.drag.take()?;
        if let Some(entry) = self.surfaces.get_mut(&surface) {
            entry.set.set_pending(None);
        }
        Some(surface)
    }

    /// Selected characters of `text` on `surface`.
    pub fn selected_text(&self, surface: &TextSurfaceId, text: &str) -> String {
        self.set(surface)
            .map(|set| set.selected_text(text))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> TextSurfaceId {
        TextSurfaceId::default()
    }

    fn book(budget: usize, len: usize) -> SelectionBook {
        let mut book = SelectionBook::new(budget);
        book.register_surface(body(), len);
        book
    }

    #[test]
    fn commit_within_budget() {
        let mut book = book(10, 50);
        let outcome = book.commit(&body(), 0, 3);
        assert!(outcome.accepted);
        assert_eq!(outcome.merged, Some(Interval::new(0, 3)));
        assert_eq!(outcome.total_used, 4);
        assert_eq!(outcome.remaining, 6);
    }

    #[test]
    fn over_budget_commit_changes_nothing() {
        let mut book = book(5, 50);
        book.commit(&body(), 0, 2);
        let outcome = book.commit(&body(), 10, 12);
        assert!(!outcome.accepted);
        assert_eq!(outcome.merged, None);
        assert_eq!(outcome.total_used, 3);
        assert_eq!(book.intervals(&body()), &[Interval::new(0, 2)]);
    }

    #[test]
    fn merge_into_existing_is_cheap() {
        let mut book = book(6, 50);
        book.commit(&body(), 0, 4);
        // only index 5 is new
        assert!(book.commit(&body(), 2, 5).accepted);
        assert_eq!(book.total_used(), 6);
    }

    #[test]
    fn budget_is_shared_between_surfaces() {
        let mut book = book(5, 50);
        book.register_surface("caption".into(), 20);
        assert!(book.commit(&body(), 0, 2).accepted);
        assert!(!book.commit(&"caption".into(), 0, 2).accepted);
        assert!(book.commit(&"caption".into(), 0, 1).accepted);
        assert_eq!(book.remaining(), 0);
    }

    #[test]
    fn indices_clamp_to_surface() {
        let mut book = book(100, 10);
        let outcome = book.commit(&body(), 7, 40);
        assert_eq!(outcome.merged, Some(Interval::new(7, 9)));
    }

    #[test]
    fn unknown_and_empty_surfaces_rejected() {
        let mut book = book(100, 10);
        book.register_surface("blank".into(), 0);
        assert!(!book.commit(&"nowhere".into(), 0, 1).accepted);
        assert!(!book.commit(&"blank".into(), 0, 1).accepted);
        assert_eq!(book.preview(&"nowhere".into(), 0, 1).interval, None);
    }

    #[test]
    fn preview_does_not_mutate() {
        let book = book(3, 10);
        let preview = book.preview(&body(), 0, 5);
        assert!(preview.would_exceed);
        assert_eq!(preview.total_if_committed, 6);
        assert_eq!(book.total_used(), 0);
    }

    #[test]
    fn erase_at_and_range() {
        let mut book = book(100, 50);
        book.commit(&body(), 0, 9);
        let after = book.erase_at(&body(), 5);
        assert_eq!(after, vec![Interval::new(0, 4), Interval::new(6, 9)]);
        assert_eq!(book.erase_range(&body(), 0, 7), 7);
        assert_eq!(book.intervals(&body()), &[Interval::new(8, 9)]);
    }

    #[test]
    fn drag_commits_pending_on_release() {
        let mut book = book(100, 50);
        book.begin_drag(&body(), 10);
        let preview = book.drag_to(4).unwrap();
        assert_eq!(preview.interval, Some(Interval::new(4, 10)));
        assert_eq!(book.pending(&body()), Some(Interval::new(4, 10)));
        assert_eq!(book.total_used(), 0);

        let outcome = book.end_drag().unwrap();
        assert!(outcome.accepted);
        assert_eq!(book.intervals(&body()), &[Interval::new(4, 10)]);
        assert_eq!(book.pending(&body()), None);
        assert!(book.end_drag().is_none());
    }

    #[test]
    fn over_budget_drag_is_shortened() {
        let mut book = book(3, 50);
        book.begin_drag(&body(), 20);
        let preview = book.drag_to(30).unwrap();
        assert!(preview.would_exceed);
        assert_eq!(preview.interval, Some(Interval::new(20, 22)));
        assert_eq!(preview.total_if_committed, 3);
    }

    #[test]
    fn drag_with_no_room_drops_pending() {
        let mut book = book(2, 50);
        book.commit(&body(), 0, 1);
        let preview = book.begin_drag(&body(), 20).unwrap();
        assert_eq!(preview.interval, None);
        assert_eq!(book.pending(&body()), None);
        assert_eq!(book.drag_anchor(), Some(20));
        let outcome = book.end_drag().unwrap();
        assert!(!outcome.accepted);
    }

    #[test]
    fn cancel_drag_clears_pending() {
        let mut book = book(100, 50);
        book.begin_drag(&body(), 1);
        book.drag_to(5);
        assert_eq!(book.cancel_drag(), Some(body()));
        assert_eq!(book.pending(&body()), None);
        assert!(book.dragging().is_none());
    }

    #[test]
    fn clear_all_keeps_registration() {
        let mut book = book(100, 50);
        book.commit(&body(), 0, 3);
        book.clear_all();
        assert_eq!(book.total_used(), 0);
        assert_eq!(book.surface_len(&body()), Some(50));
    }

    #[test]
    fn selected_text_for_surface() {
        let mut book = book(100, 14);
        book.commit(&body(), 4, 8);
        assert_eq!(book.selected_text(&body(), "the mayor lied"), "mayor");
        assert_eq!(book.selected_text(&"other".into(), "abc"), "");
    }
}
