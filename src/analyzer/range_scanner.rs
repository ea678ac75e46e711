use crate::changelog::Changelog;
use crate::conventional::classify_commit;
use crate::domain::version::Severity;
use crate::error::Result;
use crate::git::Repository;
use git2::Oid;

/// What one commit range amounts to: the worst severity seen and the
/// changelog entries harvested along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeSummary {
    pub severity: Severity,
    pub changelog: Changelog,
}

/// Scan the commits reachable from `to` but not from `from`.
///
/// The severity is the maximum across all commits, so it does not depend on
/// walk order. Changelog messages keep the backend's newest-to-oldest walk
/// order within each bucket.
pub fn scan_range<R: Repository + ?Sized>(repo: &R, from: Oid, to: Oid) -> Result<RangeSummary> {
    let mut severity = Severity::None;
    let mut changelog = Changelog::new();

    for commit in repo.commits_between(from, to)? {
        let classification = classify_commit(&commit.message);
        severity = severity.max(classification.max_severity);

        if classification.changelog.is_empty() {
            continue;
        }

        let mut messages = classification.changelog;
        if classification.net_severity == Severity::Major {
            for message in &mut messages {
                message.push_str(" (BREAKING CHANGE)");
            }
        }
        changelog.extend(classification.scope, classification.category, messages);
    }

    Ok(RangeSummary {
        severity,
        changelog,
    })
}
