//! Shared test utilities for integration and E2E tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! #[cfg_attr(not(feature = "integration-tests"), ignore)]
//! fn test_example() {
//!     let tree = RepoTree::new();
//!     tree.add_repo("app", &[("1.0.0", None)]);
//!     tree.record_in_base();
//!     // ... test code
//! }
//! ```

use std::path::{Path, PathBuf};
use std::process::Command;

use assert_fs::prelude::*;
use assert_fs::TempDir;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::{git, RepoTree, BASE_REPO};
}

/// Name of the base repository every fixture creates.
pub const BASE_REPO: &str = "base";

/// Run git in `dir`, panicking on failure, and return its trimmed stdout.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git should be installed");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn init_repo(dir: &Path) {
    git(dir, &["init", "--quiet"]);
    git(dir, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    git(dir, &["config", "user.email", "tests@example.com"]);
    git(dir, &["config", "user.name", "Tests"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
}

/// A base repository with nested tagged repositories, laid out on disk the way
/// the CLI expects: `<base_path>/base` and `<base_path>/base/<repo>`.
pub struct RepoTree {
    temp: TempDir,
}

#[allow(dead_code)]
impl RepoTree {
    /// Create an empty base repository with one initial commit.
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let base = temp.child(BASE_REPO);
        base.create_dir_all().unwrap();
        init_repo(base.path());
        base.child("README").write_str("configuration\n").unwrap();
        git(base.path(), &["add", "README"]);
        git(base.path(), &["commit", "--quiet", "-m", "initial"]);
        Self { temp }
    }

    /// Directory holding the base repository.
    pub fn base_path(&self) -> &Path {
        self.temp.path()
    }

    pub fn base_dir(&self) -> PathBuf {
        self.temp.path().join(BASE_REPO)
    }

    pub fn repo_dir(&self, repo: &str) -> PathBuf {
        self.base_dir().join(repo)
    }

    /// Create `repo` with one commit and tag per entry, in order.
    ///
    /// Each entry is a tag and the `children.txt` content at that tag; `None`
    /// leaves the file out. A final untagged commit leaves `main` ahead of
    /// every tag.
    pub fn add_repo(&self, repo: &str, tags: &[(&str, Option<&str>)]) {
        let dir = self.repo_dir(repo);
        std::fs::create_dir_all(&dir).unwrap();
        init_repo(&dir);

        for (tag, children) in tags {
            let children_path = dir.join("children.txt");
            match children {
                Some(content) => std::fs::write(&children_path, content).unwrap(),
                None => {
                    if children_path.exists() {
                        std::fs::remove_file(&children_path).unwrap();
                    }
                }
            }
            std::fs::write(dir.join("VERSION"), tag).unwrap();
            git(&dir, &["add", "--all"]);
            git(&dir, &["commit", "--quiet", "-m", tag]);
            git(&dir, &["tag", tag]);
        }

        std::fs::write(dir.join("VERSION"), "unreleased").unwrap();
        git(&dir, &["add", "--all"]);
        git(&dir, &["commit", "--quiet", "-m", "unreleased"]);
    }

    /// Record every nested repository's current commit in the base repository.
    pub fn record_in_base(&self) {
        let base = self.base_dir();
        git(&base, &["add", "--all"]);
        git(&base, &["commit", "--quiet", "-m", "record repositories"]);
    }

    /// Give the base repository a bare `origin` to push to.
    pub fn add_remote(&self) -> PathBuf {
        let remote = self.temp.path().join("origin.git");
        git(
            self.temp.path(),
            &["init", "--quiet", "--bare", remote.to_str().unwrap()],
        );
        let base = self.base_dir();
        git(&base, &["remote", "add", "origin", remote.to_str().unwrap()]);
        git(&base, &["push", "--quiet", "-u", "origin", "main"]);
        remote
    }

    /// The full message of the base repository's last commit.
    pub fn last_base_commit_message(&self) -> String {
        git(&self.base_dir(), &["log", "-1", "--format=%B"])
    }

    /// The branch or commit `repo` currently has checked out.
    pub fn current_branch(&self, repo: &str) -> String {
        git(&self.repo_dir(repo), &["rev-parse", "--abbrev-ref", "HEAD"])
    }

    /// The tag pointing at `repo`'s checked-out commit, if any.
    pub fn head_tag(&self, repo: &str) -> String {
        git(&self.repo_dir(repo), &["tag", "--points-at", "HEAD"])
    }

    /// An app/lib tree whose best configuration is app 1.1.0 with lib 2.2.0.
    ///
    /// app 2.0.0 needs a lib major that does not exist and is discarded.
    pub fn app_and_lib() -> Self {
        let tree = Self::new();
        tree.add_repo(
            "app",
            &[
                ("1.0.0", Some("lib,1.0.0\n")),
                ("1.1.0", Some("# pinned libraries\nlib,2.1.0\n")),
                ("2.0.0", Some("lib,4.0.0\n")),
            ],
        );
        tree.add_repo(
            "lib",
            &[
                ("1.0.0", None),
                ("1.2.0", None),
                ("2.0.0", None),
                ("v2.2.0", None),
                ("3.0.0", None),
            ],
        );
        tree.record_in_base();
        tree
    }
}
