//! # CLI Command Implementations
//!
//! One module per subcommand. Each defines an `Args` struct derived with
//! `clap` and an `execute` function that calls into the `treeconf` library.
//!
//! Every subcommand addresses the same repository tree through
//! [`TargetArgs`]: the directory holding the base repository, the base
//! repository's name, and the root repository to maximise.

pub mod apply;
pub mod resolve;
pub mod tree;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, ValueEnum};

use treeconf::backend::GitBackend;
use treeconf::settings::{DiamondPolicy, Settings, DEFAULT_REQUIREMENTS_FILE};

/// How to treat a repository pinned at two versions within one tree.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiamondArg {
    /// Drop trees that pin a repository twice at different versions
    Reject,
    /// Keep whichever version is reached last
    LastWins,
}

impl From<DiamondArg> for DiamondPolicy {
    fn from(arg: DiamondArg) -> Self {
        match arg {
            DiamondArg::Reject => DiamondPolicy::Reject,
            DiamondArg::LastWins => DiamondPolicy::LastWins,
        }
    }
}

/// The repository tree a command works on.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Directory containing the base repository
    #[arg(value_name = "BASE_PATH")]
    pub base_path: PathBuf,

    /// Name of the base repository, which holds the others as submodules
    #[arg(value_name = "BASE_REPO")]
    pub base_repo: String,

    /// Name of the root repository whose version is maximised
    #[arg(value_name = "ROOT_REPO")]
    pub root_repo: String,

    /// Name of the file listing the children each tag requires
    #[arg(
        long,
        value_name = "NAME",
        default_value = DEFAULT_REQUIREMENTS_FILE,
        env = "TREECONF_CHILDREN_FILE"
    )]
    pub children_file: String,

    /// What to do when a tree pins one repository at two versions
    #[arg(long, value_enum, value_name = "POLICY", default_value_t = DiamondArg::Reject)]
    pub diamonds: DiamondArg,
}

impl TargetArgs {
    /// Build the run settings these arguments describe.
    pub fn settings(&self) -> Settings {
        Settings::new(&self.base_path, &self.base_repo, &self.root_repo)
            .with_requirements_file(&self.children_file)
            .with_diamond_policy(self.diamonds.into())
    }
}

/// A git backend for `settings`, after checking the base repository exists.
pub fn git_backend(settings: &Settings) -> Result<GitBackend> {
    let base_dir = settings.workspace.base_dir();
    if !base_dir.is_dir() {
        bail!("Base repository not found: {}", base_dir.display());
    }
    Ok(GitBackend::new(settings.workspace.clone()))
}
