//! Catalogue command - List the supported resource types.

use anyhow::Result;
use clap::Args;

use canvas_plugins::PluginRegistry;

#[derive(Args)]
pub struct CatalogueArgs {
    /// Also print each resource's fields
    #[arg(short, long)]
    fields: bool,
}

pub fn execute(args: CatalogueArgs) -> Result<()> {
    let registry = PluginRegistry::builtin();

    for (category, plugins) in registry.list_by_category() {
        println!("{}", category);
        for plugin in plugins {
            println!(
                "  {:<30} {:<16} {}",
                plugin.kind().as_str(),
                plugin.display_name(),
                plugin.description()
            );
            if args.fields {
                for field in &plugin.schema().fields {
                    let marker = if field.required { "*" } else { " " };
                    println!("      {}{:<24} {}", marker, field.key, field.label);
                }
            }
        }
        println!();
    }

    println!("{} resource types", registry.len());
    Ok(())
}
