//! Init command - Create an empty project file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use canvas_model::{Graph, ProjectData};

#[derive(Args)]
pub struct InitArgs {
    /// Project name
    #[arg(short, long)]
    name: String,

    /// Path of the project file to create
    #[arg(short, long, default_value = "project.json")]
    out: PathBuf,

    /// Overwrite an existing file
    #[arg(short, long)]
    force: bool,
}

pub fn execute(args: InitArgs) -> Result<()> {
    if args.out.exists() && !args.force {
        anyhow::bail!(
            "Project file already exists at {:?}. Use --force to overwrite.",
            args.out
        );
    }

    info!("Creating project '{}' at {:?}", args.name, args.out);

    let mut project = ProjectData::new(&args.name, Graph::new());
    project
        .save(&args.out)
        .with_context(|| format!("Failed to write project file {:?}", args.out))?;

    println!("Created project '{}' at {}", args.name, args.out.display());
    println!();
    println!("Next steps:");
    println!("  canvas validate --project {}", args.out.display());
    println!("  canvas generate --project {} --out terraform", args.out.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_init_writes_empty_project() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("demo.json");

        execute(InitArgs {
            name: "demo".to_string(),
            out: out.clone(),
            force: false,
        })
        .unwrap();

        let project = ProjectData::load(&out).unwrap();
        assert_eq!(project.metadata.name, "demo");
        assert!(project.graph.is_empty());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("demo.json");
        std::fs::write(&out, "{}").unwrap();

        let args = InitArgs {
            name: "demo".to_string(),
            out,
            force: false,
        };
        assert!(execute(args).is_err());
    }
}
