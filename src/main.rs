//! # treeconf CLI
//!
//! Binary entry point for the `treeconf` command-line tool.
//!
//! Its responsibilities are parsing arguments with `clap`, setting up logging,
//! and dispatching to the subcommand. The resolution logic lives in the
//! library crate; the binary is a thin wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
