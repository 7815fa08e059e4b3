//! # Run Settings
//!
//! Everything a resolution run needs to know, built once from the command line
//! (or by an embedding application) and passed by reference to the components
//! that need it.
//!
//! ## Repository layout
//!
//! The base repository is checked out at `<base_path>/<base_repo>`. Every other
//! repository in the tree lives directly inside it, usually as a submodule, at
//! `<base_path>/<base_repo>/<repo>`. The base repository is the one whose
//! commit records the chosen configuration.

use std::path::PathBuf;

/// Default name of the per-tag requirement file.
pub const DEFAULT_REQUIREMENTS_FILE: &str = "children.txt";

/// Where the repositories of one tree live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub base_path: PathBuf,
    pub base_repo: String,
}

impl Workspace {
    pub fn new(base_path: impl Into<PathBuf>, base_repo: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            base_repo: base_repo.into(),
        }
    }

    /// Working-tree directory of the base repository.
    pub fn base_dir(&self) -> PathBuf {
        self.base_path.join(&self.base_repo)
    }

    /// Working-tree directory of `repo`.
    pub fn repo_dir(&self, repo: &str) -> PathBuf {
        if repo == self.base_repo {
            self.base_dir()
        } else {
            self.base_dir().join(repo)
        }
    }
}

/// What to do when one resolved tree reaches a repository at two versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiamondPolicy {
    /// Treat the tree as inconsistent and drop it from selection.
    #[default]
    Reject,
    /// Keep the version seen last (children are visited in name order).
    LastWins,
}

/// Options for [`crate::apply::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Compute the commit message but leave every repository untouched.
    pub dry_run: bool,
    /// Push the base repository after committing.
    pub push: bool,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            push: true,
        }
    }
}

/// Settings of one resolution run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub workspace: Workspace,
    /// Repository whose version is maximised.
    pub root_repo: String,
    /// Name of the requirement file read at every tag.
    pub requirements_file: String,
    pub diamond_policy: DiamondPolicy,
    pub apply: ApplyOptions,
}

impl Settings {
    pub fn new(
        base_path: impl Into<PathBuf>,
        base_repo: impl Into<String>,
        root_repo: impl Into<String>,
    ) -> Self {
        Self {
            workspace: Workspace::new(base_path, base_repo),
            root_repo: root_repo.into(),
            requirements_file: DEFAULT_REQUIREMENTS_FILE.to_string(),
            diamond_policy: DiamondPolicy::default(),
            apply: ApplyOptions::default(),
        }
    }

    pub fn with_requirements_file(mut self, name: impl Into<String>) -> Self {
        self.requirements_file = name.into();
        self
    }

    pub fn with_diamond_policy(mut self, policy: DiamondPolicy) -> Self {
        self.diamond_policy = policy;
        self
    }

    pub fn with_apply_options(mut self, options: ApplyOptions) -> Self {
        self.apply = options;
        self
    }

    pub fn base_repo(&self) -> &str {
        &self.workspace.base_repo
    }
}
