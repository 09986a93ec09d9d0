//! Error types for the model crate.

use thiserror::Error;

/// Result type alias for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur while editing a graph or handling project files.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Edge not found: {0}")]
    EdgeNotFound(String),

    #[error("Self-loop rejected on node: {0}")]
    SelfLoop(String),

    #[error("Edge already exists: {from} -> {to}")]
    DuplicateEdge { from: String, to: String },

    #[error("Unknown resource kind: {0}")]
    UnknownKind(String),

    #[error("Unsupported project schema version {found} (supported up to {supported})")]
    UnsupportedSchemaVersion { found: u32, supported: u32 },

    #[error("Invalid project file: {0}")]
    InvalidProject(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
