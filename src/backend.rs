//! # Repository Backends
//!
//! Resolution never touches git directly: it talks to a `RepositoryBackend`,
//! addressing repositories by name. Two implementations ship with the crate:
//!
//! - **`GitBackend`**: maps names to working trees through a [`Workspace`] and
//!   runs the system `git` command in them.
//! - **[`MemoryBackend`](crate::memory::MemoryBackend)**: keeps tags, files and
//!   heads in memory. Used by the tests and benchmarks, and handy for
//!   simulating a tree before touching real repositories.
//!
//! ## Checked-out state
//!
//! Each repository has exactly one checked-out reference at a time, and
//! resolution keeps moving it. `CheckoutGuard` snapshots the reference when it
//! is created and puts it back when it goes out of scope, so a failure halfway
//! through a pass does not leave repositories parked on some old tag.

use log::warn;

use crate::error::Result;
use crate::git;
use crate::settings::Workspace;

/// Version-control operations the resolver and applier need.
pub trait RepositoryBackend: Send + Sync {
    /// All tags of `repo`, unfiltered.
    fn list_tags(&self, repo: &str) -> Result<Vec<String>>;

    /// The reference currently checked out in `repo`, in a form `checkout`
    /// accepts.
    fn current_reference(&self, repo: &str) -> Result<String>;

    /// Switch `repo`'s working state to `reference`.
    fn checkout(&self, repo: &str, reference: &str) -> Result<()>;

    /// Read `path` at the currently checked-out reference.
    fn read_file(&self, repo: &str, path: &str) -> Result<Option<String>>;

    /// Whether `repo` differs from its last commit.
    fn is_dirty(&self, repo: &str) -> Result<bool>;

    fn commit(&self, repo: &str, message: &str) -> Result<()>;

    fn push(&self, repo: &str) -> Result<()>;
}

/// Backend running the system `git` inside the workspace's working trees.
#[derive(Debug, Clone)]
pub struct GitBackend {
    workspace: Workspace,
}

impl GitBackend {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }
}

impl RepositoryBackend for GitBackend {
    fn list_tags(&self, repo: &str) -> Result<Vec<String>> {
        git::list_tags(&self.workspace.repo_dir(repo), repo)
    }

    fn current_reference(&self, repo: &str) -> Result<String> {
        git::current_reference(&self.workspace.repo_dir(repo), repo)
    }

    fn checkout(&self, repo: &str, reference: &str) -> Result<()> {
        git::checkout(&self.workspace.repo_dir(repo), repo, reference)
    }

    fn read_file(&self, repo: &str, path: &str) -> Result<Option<String>> {
        git::read_worktree_file(&self.workspace.repo_dir(repo), path)
    }

    fn is_dirty(&self, repo: &str) -> Result<bool> {
        git::is_dirty(&self.workspace.repo_dir(repo), repo)
    }

    fn commit(&self, repo: &str, message: &str) -> Result<()> {
        git::commit_all(&self.workspace.repo_dir(repo), repo, message)
    }

    fn push(&self, repo: &str) -> Result<()> {
        git::push(&self.workspace.repo_dir(repo), repo)
    }
}

/// Restores a repository's checked-out reference when dropped.
///
/// Call [`CheckoutGuard::restore`] on the success path to surface restore
/// failures; if the guard is dropped without it (early return, `?`), the
/// restore is attempted anyway and a failure is only logged.
pub struct CheckoutGuard<'a> {
    backend: &'a dyn RepositoryBackend,
    repo: String,
    reference: Option<String>,
}

impl<'a> CheckoutGuard<'a> {
    /// Snapshot the current reference of `repo`.
    pub fn acquire(backend: &'a dyn RepositoryBackend, repo: &str) -> Result<Self> {
        let reference = backend.current_reference(repo)?;
        Ok(Self {
            backend,
            repo: repo.to_string(),
            reference: Some(reference),
        })
    }

    /// The reference that will be restored.
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    /// Check out the snapshotted reference again, reporting failure.
    pub fn restore(mut self) -> Result<()> {
        match self.reference.take() {
            Some(reference) => self.backend.checkout(&self.repo, &reference),
            None => Ok(()),
        }
    }
}

impl Drop for CheckoutGuard<'_> {
    fn drop(&mut self) {
        if let Some(reference) = self.reference.take() {
            if let Err(e) = self.backend.checkout(&self.repo, &reference) {
                warn!(
                    "failed to restore {} to {}: {}",
                    self.repo, reference, e
                );
            }
        }
    }
}
