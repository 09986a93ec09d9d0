//! Error types for canvas_policy.

use thiserror::Error;

/// Result type alias for policy operations.
pub type PolicyResult<T> = Result<T, PolicyError>;

/// Errors outside of validation itself. Findings are diagnostics.
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
