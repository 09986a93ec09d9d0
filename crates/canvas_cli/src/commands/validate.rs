//! Validate command - Run the validation pipeline on a project.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;

use canvas_policy::Validator;

use super::{load_project, ValidationFailed};

#[derive(Args)]
pub struct ValidateArgs {
    /// Path to the project file
    #[arg(short, long)]
    project: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

pub fn execute(args: ValidateArgs) -> Result<()> {
    let project = load_project(&args.project)?;
    info!("Validating project: {}", project.metadata.name);

    let report = Validator::default().report(&project.graph);

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.render());
    }

    if report.has_blocking_errors() {
        return Err(ValidationFailed {
            errors: report.summary.errors,
        }
        .into());
    }

    Ok(())
}
