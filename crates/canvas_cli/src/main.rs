//! CloudCanvas CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Validation failure
//! - 5: Generation error

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use canvas_model::ModelError;
use canvas_terraform::TerraformError;

mod commands;

use commands::{Cli, Commands, ValidationFailed};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const VALIDATION_FAILURE: u8 = 3;
    pub const IAC_ERROR: u8 = 5;
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "canvas=debug,info"
    } else {
        "canvas=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // Ignore a second initialisation
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    let result = match cli.command {
        Commands::Validate(args) => commands::validate::execute(args),
        Commands::Generate(args) => commands::generate::execute(args),
        Commands::Catalogue(args) => commands::catalogue::execute(args),
        Commands::Init(args) => commands::init::execute(args),
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if cause.is::<ValidationFailed>() {
            return ExitCodes::VALIDATION_FAILURE;
        }
        if cause.is::<TerraformError>() {
            return ExitCodes::IAC_ERROR;
        }
        if cause.is::<ModelError>() {
            return ExitCodes::INVALID_ARGS;
        }
    }

    let msg = e.to_string().to_lowercase();
    if msg.contains("argument") || msg.contains("not found") || msg.contains("already exists") {
        ExitCodes::INVALID_ARGS
    } else {
        ExitCodes::GENERAL_ERROR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_validation_failure_code() {
        let err = anyhow::Error::new(ValidationFailed { errors: 2 });
        assert_eq!(categorize_error(&err), ExitCodes::VALIDATION_FAILURE);
    }

    #[test]
    fn test_codes_follow_wrapped_causes() {
        let err: Result<(), _> = Err(TerraformError::InvalidFileName("../x.tf".into()));
        let err = err.context("Failed to write Terraform files").unwrap_err();
        assert_eq!(categorize_error(&err), ExitCodes::IAC_ERROR);

        let err: Result<(), _> = Err(ModelError::InvalidProject("bad".into()));
        let err = err.context("Failed to load project").unwrap_err();
        assert_eq!(categorize_error(&err), ExitCodes::INVALID_ARGS);
    }

    #[test]
    fn test_unclassified_error_is_general() {
        let err = anyhow::anyhow!("something broke");
        assert_eq!(categorize_error(&err), ExitCodes::GENERAL_ERROR);
    }
}
