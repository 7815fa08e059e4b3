//! # Configurations
//!
//! A configuration is the flat `repository -> release` view of one resolved
//! tree: the root entry of a forest and everything pinned beneath it.
//!
//! ## Diamonds
//!
//! A tree can reach the same repository along two paths (`app -> left ->
//! common` and `app -> right -> common`), and because each branch is resolved
//! on its own the two paths may pin different versions. What happens then is
//! decided by [`DiamondPolicy`]:
//!
//! - `Reject`: the tree cannot be applied as one configuration. `flatten`
//!   returns `DiamondConflict` and `flatten_forest` leaves the entry out.
//! - `LastWins`: the version reached last, with children visited in name
//!   order, replaces the earlier one.
//!
//! Reaching a repository twice at the same version is not a conflict.

use std::collections::BTreeMap;
use std::fmt;

use log::{info, warn};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::forest::{Forest, ForestResolver, ResolvedNode};
use crate::settings::{DiamondPolicy, Settings};
use crate::version::Release;

/// One repository-to-release assignment, ordered by repository name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Configuration {
    entries: BTreeMap<String, Release>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, repo: &str) -> Option<&Release> {
        self.entries.get(repo)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in repository-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Release)> {
        self.entries.iter().map(|(repo, release)| (repo.as_str(), release))
    }

    /// Pin `repo` to `release`, applying `policy` if it is already pinned
    /// elsewhere.
    fn pin(&mut self, repo: &str, release: &Release, policy: DiamondPolicy) -> Result<()> {
        if let Some(existing) = self.entries.get(repo) {
            if existing.version != release.version && policy == DiamondPolicy::Reject {
                return Err(Error::DiamondConflict {
                    repo: repo.to_string(),
                    first: existing.to_string(),
                    second: release.to_string(),
                });
            }
        }
        self.entries.insert(repo.to_string(), release.clone());
        Ok(())
    }
}

impl FromIterator<(String, Release)> for Configuration {
    fn from_iter<T: IntoIterator<Item = (String, Release)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Configuration {
    /// One `repo,version` line per entry.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (repo, release) in self.iter() {
            writeln!(f, "{},{}", repo, release)?;
        }
        Ok(())
    }
}

/// Flatten the tree under `node`, pinning `repo` to the node's own release.
pub fn flatten(node: &ResolvedNode, repo: &str, policy: DiamondPolicy) -> Result<Configuration> {
    let mut configuration = Configuration::new();
    flatten_into(node, repo, policy, &mut configuration)?;
    Ok(configuration)
}

fn flatten_into(
    node: &ResolvedNode,
    repo: &str,
    policy: DiamondPolicy,
    configuration: &mut Configuration,
) -> Result<()> {
    configuration.pin(repo, &node.release, policy)?;
    for (child_repo, child) in &node.children {
        flatten_into(child, child_repo, policy, configuration)?;
    }
    Ok(())
}

/// Flatten every entry of `repo`'s forest, in ascending version order.
///
/// Under `DiamondPolicy::Reject`, entries with a diamond conflict are left out
/// with a warning rather than failing the whole forest.
pub fn flatten_forest(forest: &Forest, repo: &str, policy: DiamondPolicy) -> Vec<Configuration> {
    forest
        .iter()
        .filter_map(|(version, node)| match flatten(node, repo, policy) {
            Ok(configuration) => Some(configuration),
            Err(e) => {
                warn!("dropping {} {}: {}", repo, version, e);
                None
            }
        })
        .collect()
}

/// Pick the configuration with the greatest version of `root_repo`.
///
/// Any major version may win. Configurations that do not pin `root_repo` are
/// ignored.
pub fn select(configurations: Vec<Configuration>, root_repo: &str) -> Result<Configuration> {
    configurations
        .into_iter()
        .filter_map(|configuration| {
            let version = configuration.get(root_repo)?.version.clone();
            Some((version, configuration))
        })
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, configuration)| configuration)
        .ok_or_else(|| Error::NoSuitableConfiguration {
            repo: root_repo.to_string(),
        })
}

/// Resolve the configured root repository and select its best configuration.
pub fn best_configuration(resolver: &mut ForestResolver<'_>, settings: &Settings) -> Result<Configuration> {
    let root = settings.root_repo.as_str();
    let forest = resolver.resolve(root)?;
    let configurations = flatten_forest(&forest, root, settings.diamond_policy);
    let best = select(configurations, root)?;

    let stats = resolver.stats();
    info!(
        "selected {} {} ({} repositories, {} candidates, {} discarded)",
        root,
        best.get(root).map(|r| r.to_string()).unwrap_or_default(),
        stats.repositories,
        stats.candidates,
        stats.discarded
    );
    Ok(best)
}
