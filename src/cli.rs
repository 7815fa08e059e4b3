//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;
use treeconf::output::OutputConfig;

/// treeconf - choose the newest consistent configuration for a repository tree
#[derive(Parser, Debug)]
#[command(name = "treeconf")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve the best configuration, check it out, commit and push it
    Apply(commands::apply::ApplyArgs),

    /// Resolve and print the best configuration without touching anything
    Resolve(commands::resolve::ResolveArgs),

    /// Show every feasible version of the root repository as a tree
    Tree(commands::tree::TreeArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);
        let output = OutputConfig::from_env_and_flag(&self.color);

        match self.command {
            Commands::Apply(args) => commands::apply::execute(args, &output),
            Commands::Resolve(args) => commands::resolve::execute(args, &output),
            Commands::Tree(args) => commands::tree::execute(args, &output),
        }
    }
}

fn init_logging(log_level: &str) {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(log_level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.format_timestamp(None).format_target(false);
    // A logger may already be installed when embedded in tests
    let _ = builder.try_init();
}
