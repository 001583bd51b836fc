use rd_core::{Interval, NodeId, NodeKindTag, TextSurfaceId, VariableId};

/// What kind of session event occurred.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEventKind {
    // Traversal
    /// The session entered a node.
    NodeEntered {
        /// The entered node.
        node: NodeId,
        /// Its kind.
        kind: NodeKindTag,
    },
    /// A transition could not be taken; the session stayed put.
    TraversalFailed {
        /// Node the session is still on.
        node: NodeId,
        /// Why the transition failed.
        reason: String,
    },
    /// A timed challenge was resolved.
    ChallengeResolved {
        /// The challenge node.
        node: NodeId,
        /// Whether it was won.
        success: bool,
        /// `true` when resolved by the deadline rather than a report.
        timed_out: bool,
    },
    /// The session returned to its start node.
    SessionReset,

    // Selection
    /// A selection was committed.
    SelectionCommitted {
        /// Surface selected on.
        surface: TextSurfaceId,
        /// Interval stored after merging.
        merged: Interval,
    },
    /// A selection was refused.
    SelectionRejected {
        /// Surface selected on.
        surface: TextSurfaceId,
        /// Requested start.
        start: usize,
        /// Requested end.
        end: usize,
    },
    /// Characters were deselected.
    SelectionErased {
        /// Surface erased on.
        surface: TextSurfaceId,
        /// Number of characters removed.
        removed: usize,
    },
    /// Every selection was cleared by the player.
    SelectionsCleared,

    // Rules
    /// A change rule fired.
    ChangeRuleFired {
        /// Owning node.
        node: NodeId,
        /// Index within the node's change rules.
        rule: usize,
    },
    /// A variable changed value.
    VariableChanged {
        /// The variable.
        variable: VariableId,
        /// Value before.
        old: f64,
        /// Value after.
        new: f64,
    },
    /// A result rule fired and changed the score.
    ScoreChanged {
        /// Owning node.
        node: NodeId,
        /// Name of the rule that fired.
        rule: String,
    },
}

impl SessionEventKind {
    /// Check whether a given node is involved in this event.
    pub fn involves(&self, id: NodeId) -> bool {
        match self {
            Self::NodeEntered { node, .. }
            | Self::TraversalFailed { node, .. }
            | Self::ChallengeResolved { node, .. }
            | Self::ChangeRuleFired { node, .. }
            | Self::ScoreChanged { node, .. } => *node == id,
            _ => false,
        }
    }
}

/// A record of something that happened during a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionEvent {
    /// Position in the session, counting from 0.
    pub seq: u64,
    /// What happened.
    pub kind: SessionEventKind,
    /// A human-readable description of the event.
    pub description: String,
}

impl SessionEvent {
    /// Create a new event.
    pub fn new(seq: u64, kind: SessionEventKind, description: impl Into<String>) -> Self {
        Self {
            seq,
            kind,
            description: description.into(),
        }
    }
}

/// Accumulates events during a session.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<SessionEvent>,
    max_events: usize,
    next_seq: u64,
}

impl EventLog {
    /// Create a new event log with the given maximum capacity (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
            next_seq: 0,
        }
    }

    /// Record an event, dropping the oldest events if the log exceeds its capacity.
    pub fn record(&mut self, kind: SessionEventKind, description: impl Into<String>) {
        let event = SessionEvent::new(self.next_seq, kind, description);
        self.next_seq += 1;
        self.events.push(event);
        if self.max_events > 0 && self.events.len() > self.max_events {
            let drain_count = self.events.len() - self.max_events;
            self.events.drain(..drain_count);
        }
    }

    /// Return a slice of all retained events.
    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    /// Return all events involving the given node.
    pub fn events_for_node(&self, id: NodeId) -> Vec<&SessionEvent> {
        self.events.iter().filter(|e| e.kind.involves(id)).collect()
    }

    /// The most recent event.
    pub fn last(&self) -> Option<&SessionEvent> {
        self.events.last()
    }

    /// Return the number of retained events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Return `true` if no events are retained.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
