//! # In-Memory Backend
//!
//! `MemoryBackend` models a set of repositories without touching disk. Each
//! repository has named references (branches and tags), each holding a
//! snapshot of files, and one checked-out reference.
//!
//! Commit bookkeeping mimics a base repository with submodules: the backend
//! remembers which reference every repository was at when the last commit
//! happened, and a repository is dirty when any *other* repository has moved
//! since then.
//!
//! ```
//! use treeconf::backend::RepositoryBackend;
//! use treeconf::memory::MemoryBackend;
//!
//! let backend = MemoryBackend::new();
//! backend.add_repo("lib", "main").unwrap();
//! backend.add_tag("lib", "1.0.0", &[("children.txt", "core,2.0.0\n")]).unwrap();
//!
//! backend.checkout("lib", "1.0.0").unwrap();
//! assert_eq!(
//!     backend.read_file("lib", "children.txt").unwrap().as_deref(),
//!     Some("core,2.0.0\n")
//! );
//! ```

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::backend::RepositoryBackend;
use crate::error::{Error, Result};

type Files = BTreeMap<String, String>;

#[derive(Debug, Clone, Default)]
struct MemoryRepo {
    branches: BTreeMap<String, Files>,
    tags: BTreeMap<String, Files>,
    head: String,
}

impl MemoryRepo {
    fn files_at(&self, reference: &str) -> Option<&Files> {
        self.branches
            .get(reference)
            .or_else(|| self.tags.get(reference))
    }
}

/// A commit recorded by [`MemoryBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCommit {
    pub repo: String,
    pub message: String,
}

#[derive(Debug, Default)]
struct State {
    repos: BTreeMap<String, MemoryRepo>,
    committed_heads: BTreeMap<String, String>,
    commits: Vec<RecordedCommit>,
    pushes: Vec<String>,
    checkouts: Vec<(String, String)>,
    tag_listings: Vec<String>,
}

impl State {
    fn repo(&self, name: &str) -> Result<&MemoryRepo> {
        self.repos.get(name).ok_or_else(|| Error::UnknownRepository {
            repo: name.to_string(),
        })
    }

    fn repo_mut(&mut self, name: &str) -> Result<&mut MemoryRepo> {
        self.repos
            .get_mut(name)
            .ok_or_else(|| Error::UnknownRepository {
                repo: name.to_string(),
            })
    }

    fn heads(&self) -> BTreeMap<String, String> {
        self.repos
            .iter()
            .map(|(name, repo)| (name.clone(), repo.head.clone()))
            .collect()
    }
}

/// Repository backend held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        self.state.lock().map_err(|_| Error::LockPoisoned {
            context: "memory backend state".to_string(),
        })
    }

    /// Add a repository checked out on an empty branch.
    ///
    /// The new head counts as committed, so adding repositories never makes
    /// the tree dirty.
    pub fn add_repo(&self, name: &str, branch: &str) -> Result<()> {
        let mut state = self.lock()?;
        let mut repo = MemoryRepo {
            head: branch.to_string(),
            ..MemoryRepo::default()
        };
        repo.branches.insert(branch.to_string(), Files::new());
        state.repos.insert(name.to_string(), repo);
        state
            .committed_heads
            .insert(name.to_string(), branch.to_string());
        Ok(())
    }

    /// Add (or replace) a tag holding `files`.
    pub fn add_tag(&self, repo: &str, tag: &str, files: &[(&str, &str)]) -> Result<()> {
        let mut state = self.lock()?;
        let repo = state.repo_mut(repo)?;
        let files = files
            .iter()
            .map(|(path, content)| (path.to_string(), content.to_string()))
            .collect();
        repo.tags.insert(tag.to_string(), files);
        Ok(())
    }

    /// Write a file on a branch.
    pub fn write_branch_file(&self, repo: &str, branch: &str, path: &str, content: &str) -> Result<()> {
        let mut state = self.lock()?;
        let repo_name = repo;
        let repo = state.repo_mut(repo)?;
        let files = repo
            .branches
            .get_mut(branch)
            .ok_or_else(|| Error::UnknownReference {
                repo: repo_name.to_string(),
                reference: branch.to_string(),
            })?;
        files.insert(path.to_string(), content.to_string());
        Ok(())
    }

    /// Commits recorded so far, oldest first.
    pub fn commits(&self) -> Result<Vec<RecordedCommit>> {
        Ok(self.lock()?.commits.clone())
    }

    /// Repositories pushed so far, oldest first.
    pub fn pushes(&self) -> Result<Vec<String>> {
        Ok(self.lock()?.pushes.clone())
    }

    /// Every successful checkout as `(repo, reference)`, oldest first.
    pub fn checkouts(&self) -> Result<Vec<(String, String)>> {
        Ok(self.lock()?.checkouts.clone())
    }

    /// How many times the tags of `repo` have been listed.
    pub fn tag_listings(&self, repo: &str) -> Result<usize> {
        Ok(self
            .lock()?
            .tag_listings
            .iter()
            .filter(|listed| listed.as_str() == repo)
            .count())
    }
}

impl RepositoryBackend for MemoryBackend {
    fn list_tags(&self, repo: &str) -> Result<Vec<String>> {
        let mut state = self.lock()?;
        let tags = state.repo(repo)?.tags.keys().cloned().collect();
        state.tag_listings.push(repo.to_string());
        Ok(tags)
    }

    fn current_reference(&self, repo: &str) -> Result<String> {
        Ok(self.lock()?.repo(repo)?.head.clone())
    }

    fn checkout(&self, repo: &str, reference: &str) -> Result<()> {
        let mut state = self.lock()?;
        let entry = state.repo_mut(repo)?;
        if entry.files_at(reference).is_none() {
            return Err(Error::UnknownReference {
                repo: repo.to_string(),
                reference: reference.to_string(),
            });
        }
        entry.head = reference.to_string();
        state
            .checkouts
            .push((repo.to_string(), reference.to_string()));
        Ok(())
    }

    fn read_file(&self, repo: &str, path: &str) -> Result<Option<String>> {
        let state = self.lock()?;
        let entry = state.repo(repo)?;
        Ok(entry
            .files_at(&entry.head)
            .and_then(|files| files.get(path))
            .cloned())
    }

    fn is_dirty(&self, repo: &str) -> Result<bool> {
        let state = self.lock()?;
        state.repo(repo)?;
        let heads = state.heads();
        Ok(heads
            .iter()
            .filter(|(name, _)| name.as_str() != repo)
            .any(|(name, head)| state.committed_heads.get(name) != Some(head)))
    }

    fn commit(&self, repo: &str, message: &str) -> Result<()> {
        let mut state = self.lock()?;
        state.repo(repo)?;
        state.committed_heads = state.heads();
        state.commits.push(RecordedCommit {
            repo: repo.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }

    fn push(&self, repo: &str) -> Result<()> {
        let mut state = self.lock()?;
        state.repo(repo)?;
        state.pushes.push(repo.to_string());
        Ok(())
    }
}
