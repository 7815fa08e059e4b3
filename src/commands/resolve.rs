//! # Resolve Command Implementation
//!
//! Prints the best configuration of the root repository without touching any
//! working tree. With `--all`, every consistent configuration is listed,
//! newest root version first. `--json` switches to machine-readable output.

use anyhow::{anyhow, Result};
use clap::Args;
use serde_json::json;

use treeconf::configuration::{best_configuration, flatten_forest};
use treeconf::forest::ForestResolver;
use treeconf::output::{emoji, render_configuration, OutputConfig};

use super::{git_backend, TargetArgs};

/// Resolve and print the best configuration
#[derive(Args, Debug)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// List every consistent configuration, not only the best one.
    #[arg(long)]
    pub all: bool,

    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// Execute the `resolve` command.
pub fn execute(args: ResolveArgs, output: &OutputConfig) -> Result<()> {
    let settings = args.target.settings();
    let backend = git_backend(&settings)?;
    let root = settings.root_repo.as_str();
    let mut resolver = ForestResolver::new(&backend, settings.requirements_file.as_str());

    if args.all {
        let forest = resolver
            .resolve(root)
            .map_err(|e| anyhow!("Failed to resolve {}: {}", root, e))?;
        let mut configurations = flatten_forest(&forest, root, settings.diamond_policy);
        configurations.reverse();

        if args.json {
            let value = json!({ "root": root, "configurations": configurations });
            println!("{}", serde_json::to_string_pretty(&value)?);
            return Ok(());
        }

        if configurations.is_empty() {
            println!(
                "{} No consistent configuration of {}",
                emoji(output, "⚠️ ", "[WARN]"),
                root
            );
        }
        for configuration in &configurations {
            let version = configuration
                .get(root)
                .map(|release| release.to_string())
                .unwrap_or_default();
            println!("{} {} {}", emoji(output, "📦", "[CONFIG]"), root, version);
            print!("{}", render_configuration(configuration));
        }
        return Ok(());
    }

    let configuration = best_configuration(&mut resolver, &settings)
        .map_err(|e| anyhow!("Failed to resolve {}: {}", root, e))?;

    if args.json {
        let value = json!({ "root": root, "configuration": configuration });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{} Best configuration:", emoji(output, "📦", "[CONFIG]"));
        print!("{}", render_configuration(&configuration));
    }

    Ok(())
}
