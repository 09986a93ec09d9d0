//! Versioned project envelope used by storage and export.
//!
//! The core pipeline only ever sees the unwrapped [`Graph`]; this module
//! exists for the collaborators that persist or exchange projects.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ModelError, ModelResult};
use crate::graph::Graph;

/// Highest envelope version this build reads and the one it writes.
pub const SCHEMA_VERSION: u32 = 1;

/// Project metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "default_terraform_version")]
    pub terraform_version: String,
    #[serde(default = "default_provider_version")]
    pub provider_version: String,
}

fn default_terraform_version() -> String {
    ">= 1.0".to_string()
}

fn default_provider_version() -> String {
    "~> 6.0".to_string()
}

impl ProjectMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            created_at: now,
            updated_at: now,
            terraform_version: default_terraform_version(),
            provider_version: default_provider_version(),
        }
    }
}

/// A saved project: schema version, graph and metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectData {
    pub schema_version: u32,
    pub graph: Graph,
    pub metadata: ProjectMetadata,
}

impl ProjectData {
    pub fn new(name: impl Into<String>, graph: Graph) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            graph,
            metadata: ProjectMetadata::new(name),
        }
    }

    /// Parse an envelope, rejecting versions newer than [`SCHEMA_VERSION`].
    pub fn from_json(content: &str) -> ModelResult<Self> {
        let project: ProjectData = serde_json::from_str(content)?;
        if project.schema_version > SCHEMA_VERSION {
            return Err(ModelError::UnsupportedSchemaVersion {
                found: project.schema_version,
                supported: SCHEMA_VERSION,
            });
        }
        if project.schema_version == 0 {
            return Err(ModelError::InvalidProject(
                "schemaVersion must be at least 1".to_string(),
            ));
        }
        Ok(project)
    }

    pub fn to_json(&self) -> ModelResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> ModelResult<Self> {
        debug!("Loading project from {:?}", path);
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Write the envelope, stamping `updated_at`.
    pub fn save(&mut self, path: &Path) -> ModelResult<()> {
        self.metadata.updated_at = Utc::now();
        fs::write(path, self.to_json()?)?;
        info!("Saved project '{}' to {:?}", self.metadata.name, path);
        Ok(())
    }
}
