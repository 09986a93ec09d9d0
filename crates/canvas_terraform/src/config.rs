//! Generator configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{TerraformError, TerraformResult};

/// Settings for the provider and variable files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Default for `var.project_id`.
    pub project_id: String,
    /// Default for `var.region`.
    pub region: String,
    /// `required_version` constraint.
    pub terraform_version: String,
    /// Version constraint of the google provider.
    pub provider_version: String,
    /// Prefix every file with a generated-file comment.
    pub emit_header: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            project_id: "my-gcp-project".to_string(),
            region: "us-central1".to_string(),
            terraform_version: ">= 1.0".to_string(),
            provider_version: "~> 6.0".to_string(),
            emit_header: true,
        }
    }
}

impl GeneratorConfig {
    /// Load from a YAML file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> TerraformResult<Self> {
        debug!("Loading generator config from {:?}", path);
        let content = fs::read_to_string(path)?;
        let config: GeneratorConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = project_id.into();
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_versions(
        mut self,
        terraform_version: impl Into<String>,
        provider_version: impl Into<String>,
    ) -> Self {
        self.terraform_version = terraform_version.into();
        self.provider_version = provider_version.into();
        self
    }

    pub fn with_header(mut self, emit_header: bool) -> Self {
        self.emit_header = emit_header;
        self
    }

    /// Reject blank values that would render an unusable provider block.
    pub fn validate(&self) -> TerraformResult<()> {
        let fields = [
            ("project_id", &self.project_id),
            ("region", &self.region),
            ("terraform_version", &self.terraform_version),
            ("provider_version", &self.provider_version),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(TerraformError::InvalidConfig(format!("{} must not be empty", name)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("canvas.yaml");
        fs::write(&path, "project_id: acme-prod\nemit_header: false\n").unwrap();

        let config = GeneratorConfig::from_file(&path).unwrap();
        assert_eq!(config.project_id, "acme-prod");
        assert_eq!(config.region, "us-central1");
        assert!(!config.emit_header);
    }

    #[test]
    fn test_blank_value_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("canvas.yaml");
        fs::write(&path, "region: \"\"\n").unwrap();

        let err = GeneratorConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, TerraformError::InvalidConfig(_)));
    }

    #[test]
    fn test_builders() {
        let config = GeneratorConfig::default()
            .with_project("demo")
            .with_region("europe-west1")
            .with_versions(">= 1.5", "~> 5.0");
        assert_eq!(config.project_id, "demo");
        assert_eq!(config.region, "europe-west1");
        assert_eq!(config.provider_version, "~> 5.0");
        assert!(config.validate().is_ok());
    }
}
