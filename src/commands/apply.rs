//! # Apply Command Implementation
//!
//! Resolves the best configuration of the root repository, checks every
//! pinned release out, and commits the result to the base repository.
//!
//! - **Dry Run**: `--dry-run` prints the configuration and the commit message
//!   that would be written, leaving every repository untouched.
//! - **Local Only**: `--no-push` commits without pushing.

use anyhow::{anyhow, Result};
use clap::Args;

use treeconf::apply::{apply, AppliedOutcome};
use treeconf::configuration::best_configuration;
use treeconf::forest::ForestResolver;
use treeconf::output::{emoji, render_configuration, OutputConfig};
use treeconf::settings::ApplyOptions;

use super::{git_backend, TargetArgs};

/// Resolve the best configuration and record it in the base repository
#[derive(Args, Debug)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Show what would be committed without checking anything out.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Commit the new configuration but do not push it.
    #[arg(long)]
    pub no_push: bool,
}

/// Execute the `apply` command.
pub fn execute(args: ApplyArgs, output: &OutputConfig) -> Result<()> {
    let settings = args.target.settings().with_apply_options(ApplyOptions {
        dry_run: args.dry_run,
        push: !args.no_push,
    });
    let backend = git_backend(&settings)?;

    println!(
        "{} Resolving {} in {}",
        emoji(output, "🔍", "[RESOLVE]"),
        settings.root_repo,
        settings.workspace.base_dir().display()
    );

    let mut resolver = ForestResolver::new(&backend, settings.requirements_file.as_str());
    let configuration = best_configuration(&mut resolver, &settings)
        .map_err(|e| anyhow!("Failed to resolve {}: {}", settings.root_repo, e))?;

    println!("{} Best configuration:", emoji(output, "📦", "[CONFIG]"));
    print!("{}", render_configuration(&configuration));

    let outcome = apply(&backend, settings.base_repo(), &configuration, settings.apply)
        .map_err(|e| anyhow!("Failed to apply configuration: {}", e))?;

    match outcome {
        AppliedOutcome::Unchanged => println!(
            "{} {} already records this configuration",
            emoji(output, "✅", "[OK]"),
            settings.base_repo()
        ),
        AppliedOutcome::Committed { pushed, .. } => {
            println!(
                "{} Committed new configuration to {}",
                emoji(output, "✅", "[OK]"),
                settings.base_repo()
            );
            if !pushed {
                println!("{} Push skipped (--no-push)", emoji(output, "ℹ️ ", "[INFO]"));
            }
        }
        AppliedOutcome::DryRun { message } => {
            println!(
                "{} Dry run mode - no changes were made. Would commit:",
                emoji(output, "ℹ️ ", "[INFO]")
            );
            print!("{}", message);
        }
    }

    Ok(())
}
