use rd_core::{CoreError, NodeId};

/// Alias for `Result<T, SessionError>`.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors raised while traversing a graph. The session never moves on error.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A transition points at a node the graph does not contain.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// The node has no target to follow.
    #[error("node {0} has no transition to follow")]
    MissingTransition(NodeId),

    /// No branch matched and the node has no default.
    #[error("no branch of node {0} matched and it has no default")]
    NoBranchMatched(NodeId),

    /// The timed challenge is still counting down.
    #[error("node {0} is a timed challenge that has not been resolved")]
    ChallengePending(NodeId),

    /// A challenge outcome was reported on another kind of node.
    #[error("node {0} is not a timed challenge")]
    NotAChallenge(NodeId),

    /// A branch was chosen on another kind of node.
    #[error("node {0} is not a branch node")]
    NotABranch(NodeId),

    /// An operation named a node other than the current one.
    #[error("node {requested} is not the current node ({current})")]
    NotCurrentNode {
        /// The node named by the caller.
        requested: NodeId,
        /// The node the session is on.
        current: NodeId,
    },

    /// The graph itself is unusable.
    #[error(transparent)]
    Core(#[from] CoreError),
}
