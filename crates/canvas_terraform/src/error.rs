//! Error types for Terraform generation.

use thiserror::Error;

/// Result type alias for Terraform operations.
pub type TerraformResult<T> = Result<T, TerraformError>;

/// Generation itself never fails; these cover configuration and disk I/O.
#[derive(Error, Debug)]
pub enum TerraformError {
    #[error("Invalid generator configuration: {0}")]
    InvalidConfig(String),

    #[error("Refusing to write {0}: not a plain file name")]
    InvalidFileName(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
