//! Pre-release numbering for dev branches.
//!
//! Two policies are supported. INCREMENTING keeps a flat counter per base
//! version (`1.3.0-dev.4`); SEMANTIC nests a full version inside the
//! pre-release so the dev train carries its own meaning (`1.3.0-dev.0.2.0`).

use crate::domain::version::{base_triple, bump, with_prerelease, Severity};
use crate::error::{AutotagError, Result};
use semver::Version;

/// Numbering policy for dev pre-releases. Fixed per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevVersionStyle {
    Incrementing,
    Semantic,
}

/// Computes the next dev version from the previous dev tag and the freshly
/// bumped base version. Pure: no input is mutated across calls.
#[derive(Debug, Clone)]
pub struct DevVersioner {
    suffix: String,
    style: DevVersionStyle,
}

impl DevVersioner {
    /// Create a versioner for the given suffix and style.
    ///
    /// The suffix must itself be a valid pre-release identifier, since every
    /// produced pre-release starts with it.
    pub fn new(suffix: impl Into<String>, style: DevVersionStyle) -> Result<Self> {
        let suffix = suffix.into();
        if suffix.is_empty() {
            return Err(AutotagError::version("Dev suffix must not be empty"));
        }
        semver::Prerelease::new(&suffix).map_err(|e| {
            AutotagError::version(format!("Invalid dev suffix '{}': {}", suffix, e))
        })?;
        Ok(DevVersioner { suffix, style })
    }

    pub fn style(&self) -> DevVersionStyle {
        self.style
    }

    /// Compute the next dev version.
    ///
    /// `previous_dev` is the latest version tag reachable from the dev head
    /// (pre-release or not). `bumped_base` is the stable base already advanced
    /// by the severity of the commits merged since main. `severity_since_dev`
    /// covers only the commits since the previous dev tag and drives the
    /// nested bump under the SEMANTIC policy.
    pub fn next(
        &self,
        previous_dev: &Version,
        bumped_base: &Version,
        severity_since_dev: Severity,
    ) -> Result<Version> {
        // Identifiers after the suffix on the previous dev tag, e.g.
        // "dev.0.1.2" -> ["0", "1", "2"]. Empty when the previous tag was a
        // plain release.
        let prev_bits: Vec<&str> = if previous_dev.pre.is_empty() {
            Vec::new()
        } else {
            previous_dev.pre.as_str().split('.').skip(1).collect()
        };

        let base_unchanged = base_triple(previous_dev) == base_triple(bumped_base);

        let pre = match self.style {
            DevVersionStyle::Incrementing => {
                let counter = if base_unchanged {
                    parse_counter(&prev_bits)
                } else {
                    // New base: the counter resets, then advances for this tag.
                    0
                };
                format!("{}.{}", self.suffix, counter + 1)
            }
            DevVersionStyle::Semantic => {
                if base_unchanged {
                    let nested = bump(&parse_nested(&prev_bits), severity_since_dev);
                    format!("{}.{}", self.suffix, nested)
                } else {
                    // First dev publication under a new base is 0.0.1, never
                    // 0.0.0: it must be distinguishable from "no changes yet".
                    format!("{}.0.0.1", self.suffix)
                }
            }
        };

        with_prerelease(bumped_base, &pre)
    }
}

/// Flat counter from the identifiers after the suffix. A previous tag that
/// carried no counter, or a non-numeric one, counts as zero.
fn parse_counter(bits: &[&str]) -> u64 {
    bits.first().and_then(|s| s.parse::<u64>().ok()).unwrap_or(0)
}

/// Nested version from the identifiers after the suffix.
///
/// Defensive by contract: a clean three-part version is parsed whole;
/// otherwise the first identifier alone supplies the major and the rest of
/// the structure is derived as `.0.0`; failing that, `0.0.0`.
fn parse_nested(bits: &[&str]) -> Version {
    if let Ok(version) = Version::parse(&bits.join(".")) {
        return version;
    }
    if let Some(first) = bits.first() {
        if let Ok(version) = Version::parse(first) {
            return version;
        }
        if let Ok(major) = first.parse::<u64>() {
            return Version::new(major, 0, 0);
        }
    }
    Version::new(0, 0, 0)
}
