use std::fmt;

/// Non-fatal findings collected while an operation runs.
/// Reported to the caller alongside the outcome instead of being logged
/// through global state.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// Tag exists but cannot be parsed as a prefixed semantic version
    UnparsableTag { tag: String, reason: String },
    /// Fetch from the remote failed; the run continues on local data
    FetchFailed { remote: String, reason: String },
    /// CI output variable requested but no output file is configured
    CiOutputUnavailable { name: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnparsableTag { tag, reason } => {
                write!(f, "Skipping tag '{}': {}", tag, reason)
            }
            Diagnostic::FetchFailed { remote, reason } => {
                write!(
                    f,
                    "Could not fetch from remote '{}' ({}); using local data",
                    remote, reason
                )
            }
            Diagnostic::CiOutputUnavailable { name } => {
                write!(f, "GITHUB_OUTPUT is not set; cannot write output '{}'", name)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unparsable_tag_display() {
        let diag = Diagnostic::UnparsableTag {
            tag: "release-candidate".to_string(),
            reason: "not a version".to_string(),
        };
        assert_eq!(
            diag.to_string(),
            "Skipping tag 'release-candidate': not a version"
        );
    }

    #[test]
    fn test_fetch_failed_display() {
        let diag = Diagnostic::FetchFailed {
            remote: "origin".to_string(),
            reason: "authentication required".to_string(),
        };
        assert!(diag.to_string().contains("origin"));
        assert!(diag.to_string().contains("using local data"));
    }

    #[test]
    fn test_ci_output_display() {
        let diag = Diagnostic::CiOutputUnavailable {
            name: "new-version".to_string(),
        };
        assert!(diag.to_string().contains("new-version"));
    }
}
