//! Error types for a3s-agent-state

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while copying, saving, or loading agent state
#[derive(Debug, Error)]
pub enum StateError {
    /// Filesystem failure while reading or writing a state document
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A resolved behavior tree node has no `node` payload child
    #[error("Behavior tree '{tree}' is missing its 'node' payload")]
    MissingPayload { tree: String },

    /// Runtime state copied between tasks of different definitions
    #[error("Cannot copy task state from '{expected}' into a task of '{actual}'")]
    TaskMismatch { expected: String, actual: String },

    /// Tree registry failure
    #[error("Registry error: {0}")]
    Registry(String),

    /// Member codec failure for a reflected agent type
    #[error("Failed to process members of '{type_name}': {reason}")]
    Members { type_name: String, reason: String },

    /// No state document was found
    #[error("State not found: {0}")]
    NotFound(String),

    /// Malformed document contents
    #[error("Document error: {0}")]
    Document(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Operation is not supported
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

impl StateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for agent state operations
pub type Result<T> = std::result::Result<T, StateError>;
