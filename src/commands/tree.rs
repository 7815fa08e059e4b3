//! # Tree Command Implementation
//!
//! Displays every feasible version of the root repository, newest first, with
//! the child versions each one pins. `--depth` limits how many levels of
//! children are shown.
//!
//! This command is read-only: every checkout it makes is undone.

use anyhow::{anyhow, Result};
use clap::Args;
use ptree::print_tree;

use treeconf::forest::ForestResolver;
use treeconf::output::{emoji, ForestTree, OutputConfig};

use super::{git_backend, TargetArgs};

/// Display the feasible versions of the root repository
#[derive(Args, Debug)]
pub struct TreeArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Maximum depth of children to display.
    ///
    /// If not specified, displays the full tree.
    /// Use 0 to show only the feasible root versions.
    #[arg(long, value_name = "NUM")]
    pub depth: Option<usize>,
}

/// Execute the `tree` command.
pub fn execute(args: TreeArgs, output: &OutputConfig) -> Result<()> {
    let settings = args.target.settings();
    let backend = git_backend(&settings)?;
    let root = settings.root_repo.as_str();

    println!(
        "{} Feasible versions of {}",
        emoji(output, "🌳", "[TREE]"),
        root
    );

    let mut resolver = ForestResolver::new(&backend, settings.requirements_file.as_str());
    let forest = resolver
        .resolve(root)
        .map_err(|e| anyhow!("Failed to resolve {}: {}", root, e))?;

    let tree = ForestTree::from_forest(root, &forest, args.depth.unwrap_or(usize::MAX));
    print_tree(&tree).map_err(|e| anyhow!("Failed to display tree: {}", e))?;

    Ok(())
}
