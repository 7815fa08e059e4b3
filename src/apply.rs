//! # Applying a Configuration
//!
//! Applying checks out every pinned release, then records the result in the
//! base repository: if the base repository's tree changed, it is committed with
//! a message listing the configuration and pushed.
//!
//! ## Partial failure
//!
//! Checkouts are the only step that can be undone. If one fails, every
//! repository already switched is put back on the reference it had before
//! `apply` started, and the checkout error is returned. A failing commit or
//! push is reported as is; by then the working trees already hold the new
//! configuration.

use log::{info, warn};

use crate::backend::RepositoryBackend;
use crate::configuration::Configuration;
use crate::error::Result;
use crate::settings::ApplyOptions;

/// First line of every configuration commit.
pub const COMMIT_HEADER: &str = "autocommit using new configuration";

/// What [`apply`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppliedOutcome {
    /// The base repository already recorded this configuration.
    Unchanged,
    /// A commit was made, and pushed unless pushing was disabled.
    Committed { message: String, pushed: bool },
    /// Nothing was touched; `message` is what would have been committed.
    DryRun { message: String },
}

/// The commit message for `configuration`: a header line, then one
/// `repo,version` line per repository in name order.
pub fn commit_message(configuration: &Configuration) -> String {
    format!("{}\n{}", COMMIT_HEADER, configuration)
}

/// Check out `configuration` and commit it to `base_repo` if anything changed.
pub fn apply(
    backend: &dyn RepositoryBackend,
    base_repo: &str,
    configuration: &Configuration,
    options: ApplyOptions,
) -> Result<AppliedOutcome> {
    let message = commit_message(configuration);

    if options.dry_run {
        for (repo, release) in configuration.iter() {
            info!("would check out {} at {}", repo, release.tag);
        }
        return Ok(AppliedOutcome::DryRun { message });
    }

    checkout_all(backend, configuration)?;

    if !backend.is_dirty(base_repo)? {
        info!("{} already records this configuration", base_repo);
        return Ok(AppliedOutcome::Unchanged);
    }

    info!("committing new configuration in {}", base_repo);
    backend.commit(base_repo, &message)?;

    if options.push {
        backend.push(base_repo)?;
    }

    Ok(AppliedOutcome::Committed {
        message,
        pushed: options.push,
    })
}

/// Check out every release, rolling back the ones already switched if a
/// checkout fails.
fn checkout_all(backend: &dyn RepositoryBackend, configuration: &Configuration) -> Result<()> {
    let mut previous = Vec::with_capacity(configuration.len());
    for (repo, _) in configuration.iter() {
        previous.push((repo, backend.current_reference(repo)?));
    }

    for (index, (repo, release)) in configuration.iter().enumerate() {
        info!("checking out {} in version {}", repo, release);
        if let Err(e) = backend.checkout(repo, &release.tag) {
            for (switched, reference) in &previous[..index] {
                if let Err(restore_err) = backend.checkout(switched, reference) {
                    warn!(
                        "failed to roll back {} to {}: {}",
                        switched, reference, restore_err
                    );
                }
            }
            return Err(e);
        }
    }

    Ok(())
}
