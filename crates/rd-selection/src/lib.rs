//! Redaction selection state.
//!
//! Players black out characters by selecting spans of text. This crate keeps
//! those spans in normalised interval sets, caps how much may be selected,
//! and decides which keywords the selection hides.

/// Per-surface selection state under a shared budget.
pub mod book;
/// Keyword coverage evaluation.
pub mod coverage;
/// The selection budget.
pub mod ledger;
/// Normalised interval sets.
pub mod set;

pub use book::{CommitOutcome, PreviewOutcome, SelectionBook};
pub use coverage::{CoverageReport, KeywordCoverageEvaluator};
pub use ledger::{BudgetCheck, SelectionBudgetLedger};
pub use set::{IntervalSet, MergeSimulation};
