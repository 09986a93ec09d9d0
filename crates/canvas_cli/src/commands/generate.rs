//! Generate command - Compile a project into Terraform files.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{info, warn};

use canvas_plugins::PluginRegistry;
use canvas_policy::Validator;
use canvas_terraform::{write_files, GeneratorConfig, TerraformGenerator};

use super::{load_project, ValidationFailed};

#[derive(Args)]
pub struct GenerateArgs {
    /// Path to the project file
    #[arg(short, long)]
    project: PathBuf,

    /// Directory to write the files to (prints them when omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Generator config file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// GCP project ID used as the `project_id` default
    #[arg(long, env = "CANVAS_PROJECT_ID")]
    project_id: Option<String>,

    /// Region used as the `region` default
    #[arg(long, env = "CANVAS_REGION")]
    region: Option<String>,

    /// Refuse to generate when the project has validation errors
    #[arg(long)]
    strict: bool,
}

pub fn execute(args: GenerateArgs) -> Result<()> {
    let project = load_project(&args.project)?;
    info!("Generating Terraform for project: {}", project.metadata.name);

    let mut config = match &args.config {
        Some(path) => GeneratorConfig::from_file(path)
            .with_context(|| format!("Failed to load generator config {:?}", path))?,
        None => GeneratorConfig::default().with_versions(
            project.metadata.terraform_version.as_str(),
            project.metadata.provider_version.as_str(),
        ),
    };
    if let Some(project_id) = args.project_id {
        config = config.with_project(project_id);
    }
    if let Some(region) = args.region {
        config = config.with_region(region);
    }
    config.validate().context("Invalid generator settings")?;

    let registry = Arc::new(PluginRegistry::builtin());

    let report = Validator::new(Arc::clone(&registry)).report(&project.graph);
    if report.has_blocking_errors() {
        if args.strict {
            eprint!("{}", report.render());
            return Err(ValidationFailed {
                errors: report.summary.errors,
            }
            .into());
        }
        warn!(
            "Project has {} validation error(s); generating anyway",
            report.summary.errors
        );
    }

    let files = TerraformGenerator::new(registry)
        .with_config(config)
        .generate(&project.graph);

    match args.out {
        Some(dir) => {
            let written = write_files(&dir, &files).context("Failed to write Terraform files")?;
            println!("Generated {} files in {:?}:", written.len(), dir);
            for path in written {
                println!("  {}", path.display());
            }
        }
        None => {
            for file in &files {
                println!("# ==> {} <==", file.filename);
                println!("{}", file.content);
            }
        }
    }

    Ok(())
}
