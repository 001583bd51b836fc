use crate::id::NodeId;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when building or querying a graph.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Two nodes share the same id.
    #[error("duplicate node id: {0}")]
    DuplicateNode(NodeId),

    /// The graph's start node does not exist.
    #[error("start node {0} is not part of the graph")]
    MissingStart(NodeId),

    /// Authored data could not be parsed.
    #[error("invalid graph document: {0}")]
    Parse(#[from] serde_json::Error),
}
