use crate::error::{AutotagError, Result};
use semver::{BuildMetadata, Prerelease, Version};
use std::fmt;

/// How far a commit range moves the version.
///
/// `None` means no conventional-commit marker was found in the range. The
/// derived ordering is what makes worst-wins folding a plain `max`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    #[default]
    None,
    Patch,
    Minor,
    Major,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::None => write!(f, "none"),
            Severity::Patch => write!(f, "patch"),
            Severity::Minor => write!(f, "minor"),
            Severity::Major => write!(f, "major"),
        }
    }
}

/// Advance a version by the given severity.
///
/// Major/minor/patch follow the usual reset semantics and drop any
/// pre-release or build metadata. `Severity::None` returns the previous
/// version unchanged; rejecting an unchanged version is the caller's job.
pub fn bump(previous: &Version, severity: Severity) -> Version {
    let mut next = previous.clone();
    match severity {
        Severity::Major => {
            next.major += 1;
            next.minor = 0;
            next.patch = 0;
        }
        Severity::Minor => {
            next.minor += 1;
            next.patch = 0;
        }
        Severity::Patch => {
            next.patch += 1;
        }
        Severity::None => return next,
    }
    next.pre = Prerelease::EMPTY;
    next.build = BuildMetadata::EMPTY;
    next
}

/// The (major, minor, patch) triple, ignoring any pre-release.
pub fn base_triple(version: &Version) -> (u64, u64, u64) {
    (version.major, version.minor, version.patch)
}

/// Parse a tag name as `prefix` followed by a semantic version.
///
/// Returns `None` when the prefix is missing or the remainder is not valid
/// semver; callers decide whether that is worth a diagnostic.
pub fn parse_tag(prefix: &str, tag_name: &str) -> Option<Version> {
    let rest = tag_name.strip_prefix(prefix)?;
    Version::parse(rest).ok()
}

/// Rebuild a version with the given pre-release string.
pub fn with_prerelease(version: &Version, pre: &str) -> Result<Version> {
    let pre = Prerelease::new(pre)
        .map_err(|e| AutotagError::version(format!("Invalid pre-release '{}': {}", pre, e)))?;
    Ok(Version {
        major: version.major,
        minor: version.minor,
        patch: version.patch,
        pre,
        build: BuildMetadata::EMPTY,
    })
}
