//! # Achievable Forests
//!
//! The forest of a repository maps every tagged version of it whose
//! requirements can all be met to a [`ResolvedNode`]: that version plus, for
//! each required child, the child's own resolved node at the best matching
//! version. A version with any unsatisfiable requirement is simply absent.
//!
//! ## Algorithm
//!
//! `ForestResolver::resolve` walks the requirement graph depth first:
//!
//! 1. Return the memoized forest if the repository was already resolved in
//!    this pass.
//! 2. Fail with `CycleDetected` if the repository is already on the stack.
//! 3. Snapshot the checked-out reference, then for every semver tag, in
//!    ascending order: check it out, read its requirements, resolve each child
//!    and pick the best compatible version from the child's forest. The first
//!    requirement without a match discards the candidate.
//! 4. Restore the snapshotted reference, memoize and return.
//!
//! Child nodes are shared with the child's forest through `Arc`, so a subtree
//! is built once no matter how many parents pin it.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use log::{debug, info};
use semver::Version;

use crate::backend::{CheckoutGuard, RepositoryBackend};
use crate::error::{Error, Result};
use crate::requirements::read_requirements;
use crate::version::{best_match, releases_from_tags, Release};

/// One feasible version of a repository with its resolved requirements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedNode {
    pub release: Release,
    /// Required child repositories, by name, at their chosen versions.
    pub children: BTreeMap<String, Arc<ResolvedNode>>,
}

impl ResolvedNode {
    pub fn leaf(release: Release) -> Self {
        Self {
            release,
            children: BTreeMap::new(),
        }
    }

    pub fn version(&self) -> &Version {
        &self.release.version
    }
}

/// Feasible versions of one repository.
pub type Forest = BTreeMap<Version, Arc<ResolvedNode>>;

/// Counters for one resolution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    /// Repositories whose forest was computed.
    pub repositories: usize,
    /// Tagged versions checked out and examined.
    pub candidates: usize,
    /// Candidates dropped because a requirement could not be met.
    pub discarded: usize,
}

/// Memoizing resolver for one pass over a repository tree.
pub struct ForestResolver<'a> {
    backend: &'a dyn RepositoryBackend,
    requirements_file: String,
    memo: HashMap<String, Arc<Forest>>,
    in_progress: Vec<String>,
    stats: ResolveStats,
}

impl<'a> ForestResolver<'a> {
    pub fn new(backend: &'a dyn RepositoryBackend, requirements_file: impl Into<String>) -> Self {
        Self {
            backend,
            requirements_file: requirements_file.into(),
            memo: HashMap::new(),
            in_progress: Vec::new(),
            stats: ResolveStats::default(),
        }
    }

    pub fn stats(&self) -> ResolveStats {
        self.stats
    }

    /// Whether `repo` has already been resolved in this pass.
    pub fn is_resolved(&self, repo: &str) -> bool {
        self.memo.contains_key(repo)
    }

    /// Compute (or fetch from the memo) the forest of `repo`.
    ///
    /// An empty forest means no version of `repo` is feasible. Errors are
    /// backend failures or a requirement cycle; every repository touched is
    /// back on its original reference either way.
    pub fn resolve(&mut self, repo: &str) -> Result<Arc<Forest>> {
        if let Some(forest) = self.memo.get(repo) {
            return Ok(Arc::clone(forest));
        }

        if let Some(start) = self.in_progress.iter().position(|r| r == repo) {
            let mut cycle = self.in_progress[start..].to_vec();
            cycle.push(repo.to_string());
            return Err(Error::CycleDetected {
                cycle: cycle.join(" -> "),
            });
        }

        self.in_progress.push(repo.to_string());
        let result = self.resolve_uncached(repo);
        self.in_progress.pop();

        let forest = Arc::new(result?);
        info!(
            "resolved {}: {} feasible version(s)",
            repo,
            forest.len()
        );
        self.stats.repositories += 1;
        self.memo.insert(repo.to_string(), Arc::clone(&forest));
        Ok(forest)
    }

    fn resolve_uncached(&mut self, repo: &str) -> Result<Forest> {
        let backend = self.backend;
        let releases = releases_from_tags(&backend.list_tags(repo)?);
        let guard = CheckoutGuard::acquire(backend, repo)?;

        let mut forest = Forest::new();
        'candidates: for (version, release) in releases {
            self.stats.candidates += 1;
            backend.checkout(repo, &release.tag)?;
            let requirements = read_requirements(backend, repo, &self.requirements_file)?;

            let mut children = BTreeMap::new();
            for requirement in requirements {
                let child_forest = self.resolve(&requirement.repo)?;
                let Some(chosen) = best_match(&requirement.minimum, child_forest.keys()) else {
                    debug!(
                        "{} {} discarded: no {} compatible with {}",
                        repo, version, requirement.repo, requirement.minimum
                    );
                    self.stats.discarded += 1;
                    continue 'candidates;
                };
                children.insert(requirement.repo, Arc::clone(&child_forest[chosen]));
            }

            debug!("{} {} feasible", repo, version);
            forest.insert(version, Arc::new(ResolvedNode { release, children }));
        }

        guard.restore()?;
        Ok(forest)
    }
}
