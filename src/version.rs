//! # Versions and the Best-Match Rule
//!
//! Tags are the only source of versions: every tag of a repository that parses
//! as a semantic version is a candidate, everything else is ignored.
//!
//! Compatibility is the usual semver "caret" rule restricted to the major
//! line: a candidate `v` satisfies a required minimum `r` when
//! `v.major == r.major && v >= r`. Among satisfying candidates the greatest
//! one wins. Precedence is `semver::Version`'s ordering, so pre-releases sort
//! below their release.

use std::collections::BTreeMap;
use std::fmt;

use log::debug;
use semver::Version;
use serde::Serialize;

/// A version together with the tag it was read from.
///
/// The tag is kept because it is what has to be checked out: `v1.2.0` and
/// `1.2.0` are the same version but different refs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Release {
    pub version: Version,
    pub tag: String,
}

impl Release {
    pub fn new(version: Version, tag: impl Into<String>) -> Self {
        Self {
            version,
            tag: tag.into(),
        }
    }

    /// Parses a tag, returning `None` when it is not a semantic version.
    pub fn from_tag(tag: &str) -> Option<Self> {
        parse_tag(tag).map(|version| Self::new(version, tag))
    }
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.version)
    }
}

/// Parse a git tag into a semantic version
///
/// Accepted forms: `1.2.3`, `v1.2.3`, and either of those behind a
/// `refs/tags/` prefix. Partial versions such as `1.2` are rejected.
pub fn parse_tag(tag: &str) -> Option<Version> {
    let tag = tag.trim();
    let tag = tag.strip_prefix("refs/tags/").unwrap_or(tag);
    let version_str = tag.strip_prefix('v').unwrap_or(tag);

    Version::parse(version_str).ok()
}

/// Filter raw tags down to the releases they describe, keyed by version.
///
/// When several tags name the same version the bare spelling (`1.2.3`) is
/// preferred, then the lexicographically smallest tag, so the result does not
/// depend on the order the backend lists tags in.
pub fn releases_from_tags<S: AsRef<str>>(tags: &[S]) -> BTreeMap<Version, Release> {
    let mut releases: BTreeMap<Version, Release> = BTreeMap::new();

    for tag in tags {
        let tag = tag.as_ref().trim();
        let Some(release) = Release::from_tag(tag) else {
            if !tag.is_empty() {
                debug!("ignoring tag {:?}: not a semantic version", tag);
            }
            continue;
        };

        match releases.get(&release.version) {
            Some(existing) if !prefer_tag(&release.tag, &existing.tag) => {}
            _ => {
                releases.insert(release.version.clone(), release);
            }
        }
    }

    releases
}

fn prefer_tag(candidate: &str, existing: &str) -> bool {
    let bare = |tag: &str| !tag.starts_with('v') && !tag.starts_with("refs/");
    match (bare(candidate), bare(existing)) {
        (true, false) => true,
        (false, true) => false,
        _ => candidate < existing,
    }
}

/// Whether `candidate` satisfies the minimum `required` within its major line.
pub fn is_compatible(required: &Version, candidate: &Version) -> bool {
    candidate.major == required.major && candidate >= required
}

/// Pick the greatest available version compatible with `required`.
///
/// Returns `None` when nothing in `available` shares `required`'s major
/// version at or above it, including when `available` is empty.
pub fn best_match<'a, I>(required: &Version, available: I) -> Option<&'a Version>
where
    I: IntoIterator<Item = &'a Version>,
{
    available
        .into_iter()
        .filter(|candidate| is_compatible(required, candidate))
        .max()
}
