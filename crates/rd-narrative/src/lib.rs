//! Narrative state for Redact.
//!
//! A [`NarrativeSession`] walks a [`rd_core::Graph`]: it keeps the player's
//! selections on the current node, turns keyword coverage into variable
//! changes and scores, and decides where to go next.

/// Session configuration.
pub mod config;
/// Error types used throughout the crate.
pub mod error;
/// The session event log.
pub mod event;
/// Change-rule and result-rule evaluation.
pub mod rules;
/// The traversal state machine.
pub mod session;
/// Timed-challenge countdowns.
pub mod timer;
/// The variable store.
pub mod variables;

pub use config::SessionConfig;
pub use error::{SessionError, SessionResult};
pub use event::{EventLog, SessionEvent, SessionEventKind};
pub use rules::{ChangeLogEntry, RuleEngine, ScoreBoard, ScoreReport, SubmitReport};
pub use session::{AdvanceOutcome, NarrativeSession};
pub use timer::{DeadlineTimer, TimerState};
pub use variables::{VariableChange, VariableStore, VariableSubscriber};
