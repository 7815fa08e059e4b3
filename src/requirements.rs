//! Reading the requirement file of a checked-out repository.
//!
//! The file is line oriented. Each non-empty line names a child repository and
//! the minimum version of it this tag needs:
//!
//! ```text
//! # comments and blank lines are ignored
//! libcore,2.1.0
//! protocol, 1.4.0
//! ```
//!
//! The version may carry a `v` prefix, as tags may. A line that does not have
//! exactly two fields, has an empty repository name, or whose version is not a
//! semantic version is skipped with a warning; it never fails the read.

use log::warn;
use semver::Version;

use crate::backend::RepositoryBackend;
use crate::error::Result;

/// "This tag needs at least `minimum` of `repo`, same major line."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub repo: String,
    pub minimum: Version,
}

impl Requirement {
    pub fn new(repo: impl Into<String>, minimum: Version) -> Self {
        Self {
            repo: repo.into(),
            minimum,
        }
    }
}

/// Parse one line; `None` for blank lines, comments and malformed lines.
fn parse_line(line: &str) -> Option<Requirement> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let mut fields = line.split(',');
    let (Some(repo), Some(version), None) = (fields.next(), fields.next(), fields.next()) else {
        warn!("skipping malformed requirement line {:?}", line);
        return None;
    };

    let repo = repo.trim();
    if repo.is_empty() {
        warn!("skipping requirement line without repository: {:?}", line);
        return None;
    }

    let version = version.trim();
    match Version::parse(version.strip_prefix('v').unwrap_or(version)) {
        Ok(minimum) => Some(Requirement::new(repo, minimum)),
        Err(e) => {
            warn!("skipping requirement line {:?}: {}", line, e);
            None
        }
    }
}

/// Parse the content of a requirement file.
pub fn parse_requirements(content: &str) -> Vec<Requirement> {
    content.lines().filter_map(parse_line).collect()
}

/// Read the requirements `repo` declares at its current reference.
///
/// A missing file means no requirements.
pub fn read_requirements(
    backend: &dyn RepositoryBackend,
    repo: &str,
    file_name: &str,
) -> Result<Vec<Requirement>> {
    Ok(backend
        .read_file(repo, file_name)?
        .map(|content| parse_requirements(&content))
        .unwrap_or_default())
}
