//! Core types for Redact: the authored data a redaction session runs on.
//!
//! This crate defines identifiers, closed character intervals, keyword spans,
//! rules, node kinds, and the node graph. It carries no session state; a
//! [`Graph`] is loaded once and read for the lifetime of a session.

/// Collaborator traits for the presentation layer.
pub mod collab;
/// Variable comparisons used by branch conditions.
pub mod condition;
/// Error types used throughout the crate.
pub mod error;
/// The node graph and its validation.
pub mod graph;
/// Identifier newtypes.
pub mod id;
/// Closed character intervals.
pub mod interval;
/// Authored keyword spans.
pub mod keyword;
/// Node kinds and content blocks.
pub mod node;
/// Change rules and result rules.
pub mod rule;

pub use collab::{PointerResolver, ScreenPos, SelectionObserver};
pub use condition::{Comparison, VariableCondition};
pub use error::{CoreError, CoreResult};
pub use graph::{Graph, GraphIssue};
pub use id::{KeywordId, NodeId, TextSurfaceId, VariableId};
pub use interval::Interval;
pub use keyword::Keyword;
pub use node::{Branch, ContentBlock, Node, NodeKind, NodeKindTag};
pub use rule::{ChangeRule, KeywordCondition, Modification, Operation, ResultRule};
