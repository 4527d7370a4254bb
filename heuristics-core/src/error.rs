//! Error types for heuristic operations.

use thiserror::Error;

/// Result type for heuristic operations.
pub type HeuristicsResult<T> = Result<T, HeuristicsError>;

/// Errors that can occur in heuristic operations.
#[derive(Debug, Error)]
pub enum HeuristicsError {
    /// Node not found in the tree.
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// A detach or reattach step could not complete.
    #[error("Node detached: {0}")]
    Detached(String),

    /// Tree document serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The completion collaborator failed to answer.
    #[error("Completion failed: {0}")]
    Completion(String),

    /// Configuration value out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
