//! Error types for the plugin catalogue.

use canvas_model::ResourceKind;
use thiserror::Error;

/// Result type alias for plugin registry operations.
pub type PluginResult<T> = Result<T, PluginError>;

/// Errors raised while assembling or querying the registry.
///
/// These are start-up configuration errors. Problems with a graph are
/// reported as diagnostics, never through this type.
#[derive(Error, Debug)]
pub enum PluginError {
    #[error("Plugin registered twice for kind: {0}")]
    DuplicatePlugin(ResourceKind),

    #[error("No plugin registered for kind: {0}")]
    PluginNotFound(String),
}
