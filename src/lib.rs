//! # treeconf
//!
//! Chooses the newest consistent configuration for a tree of tagged
//! repositories.
//!
//! Every tag of every repository may carry a requirement file (by default
//! `children.txt`) listing the child repositories it needs and the minimum
//! version of each, compatible within the same major line. `treeconf` works
//! out which versions of the root repository can be satisfied all the way
//! down, picks the newest, and records the resulting configuration in a base
//! repository that holds the others as submodules.
//!
//! ## Quick Example
//!
//! ```
//! use treeconf::configuration::best_configuration;
//! use treeconf::forest::ForestResolver;
//! use treeconf::memory::MemoryBackend;
//! use treeconf::settings::Settings;
//!
//! let backend = MemoryBackend::new();
//! for repo in ["base", "app", "lib"] {
//!     backend.add_repo(repo, "main").unwrap();
//! }
//! backend.add_tag("app", "1.0.0", &[("children.txt", "lib,2.1.0\n")]).unwrap();
//! for tag in ["1.9.0", "2.0.0", "2.2.0", "3.0.0"] {
//!     backend.add_tag("lib", tag, &[]).unwrap();
//! }
//!
//! let settings = Settings::new("/srv", "base", "app");
//! let mut resolver = ForestResolver::new(&backend, settings.requirements_file.as_str());
//! let best = best_configuration(&mut resolver, &settings).unwrap();
//!
//! assert_eq!(best.get("lib").unwrap().to_string(), "2.2.0");
//! ```
//!
//! ## Core Concepts
//!
//! - **Versions (`version`)**: tag parsing and the same-major best-match rule.
//! - **Backends (`backend`, `git`, `memory`)**: the version-control operations
//!   resolution needs, addressed by repository name.
//! - **Requirements (`requirements`)**: parsing the per-tag requirement file.
//! - **Forests (`forest`)**: the memoized, depth-first resolver computing every
//!   feasible version of a repository with its resolved subtree.
//! - **Configurations (`configuration`)**: flattening resolved trees and
//!   selecting the one with the newest root.
//! - **Applying (`apply`)**: checking a configuration out and committing it.
//! - **Settings (`settings`)**: the explicit run configuration.

pub mod apply;
pub mod backend;
pub mod configuration;
pub mod error;
pub mod forest;
pub mod git;
pub mod memory;
pub mod output;
pub mod requirements;
pub mod settings;
pub mod version;

#[cfg(test)]
mod version_proptest;
