//! CLI command definitions.
//!
//! Every command works on a project file: the JSON envelope the editor
//! saves and exports.

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use thiserror::Error;

use canvas_model::ProjectData;

pub mod catalogue;
pub mod generate;
pub mod init;
pub mod validate;

/// CloudCanvas - GCP architecture diagrams to Terraform
#[derive(Parser)]
#[command(name = "canvas")]
#[command(version, about = "CloudCanvas - GCP architecture diagrams to Terraform")]
#[command(long_about = r#"
CloudCanvas compiles a saved architecture diagram (nodes and edges of GCP
resources) into validated, cross-referencing Terraform configuration.

COMMANDS:
  init       → Create an empty project file
  catalogue  → List the supported resource types
  validate   → Run the validation pipeline on a project
  generate   → Generate Terraform files from a project

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Validation failure
  5 - Generation error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a project and print its diagnostics
    Validate(validate::ValidateArgs),

    /// Generate Terraform configuration from a project
    Generate(generate::GenerateArgs),

    /// List the resource catalogue by category
    Catalogue(catalogue::CatalogueArgs),

    /// Create an empty project file
    Init(init::InitArgs),
}

/// Raised when a project has error diagnostics.
#[derive(Error, Debug)]
#[error("Validation failed with {errors} error(s)")]
pub struct ValidationFailed {
    pub errors: usize,
}

pub(crate) fn load_project(path: &Path) -> Result<ProjectData> {
    ProjectData::load(path).with_context(|| format!("Failed to load project {:?}", path))
}
