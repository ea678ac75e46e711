use crate::diagnostics::Diagnostic;
use crate::domain::version::parse_tag;
use crate::error::Result;
use crate::git::Repository;
use git2::Oid;
use semver::Version;

/// Find the highest version tag whose commit is a true ancestor of `target`.
///
/// Candidates are every tag named `prefix` + semver, sorted by full semver
/// precedence descending (pre-releases below their release). Each candidate
/// is ancestry-tested in that order and the first hit wins, so the checks
/// must stay sequential. The test is DAG-aware: the candidate commit has to
/// be the single merge-base of itself and the target, which holds across
/// merge commits where a first-parent walk would not.
///
/// Tags that fail to parse are skipped with a diagnostic. Returns `None`
/// when no candidate passes; mapping that to `LatestVersionNotFound` is the
/// caller's decision.
pub fn latest_version<R: Repository + ?Sized>(
    repo: &R,
    prefix: &str,
    target: Oid,
    include_prerelease: bool,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Option<(Version, Oid)>> {
    let mut candidates: Vec<(Version, Oid)> = Vec::new();

    for tag in repo.tags()? {
        let Some(version) = parse_tag(prefix, &tag.name) else {
            diagnostics.push(Diagnostic::UnparsableTag {
                tag: tag.name,
                reason: format!("does not match '{}<semver>'", prefix),
            });
            continue;
        };
        if !include_prerelease && !version.pre.is_empty() {
            continue;
        }
        candidates.push((version, tag.target));
    }

    candidates.sort_by(|a, b| b.0.cmp(&a.0));

    for (version, tag_oid) in candidates {
        let bases = repo.merge_bases(tag_oid, target)?;
        if bases.len() == 1 && bases[0] == tag_oid {
            return Ok(Some((version, tag_oid)));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::mock::{oid, MockRepository};

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_picks_highest_reachable_version() {
        let repo = MockRepository::new();
        repo.add_commit(oid(1), "a", &[]);
        repo.add_commit(oid(2), "b", &[oid(1)]);
        repo.add_commit(oid(3), "c", &[oid(2)]);
        repo.add_tag("v1.0.0", oid(1));
        repo.add_tag("v1.1.0", oid(2));

        let mut diags = Vec::new();
        let found = latest_version(&repo, "v", oid(3), false, &mut diags).unwrap();
        assert_eq!(found, Some((v("1.1.0"), oid(2))));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_tag_on_target_itself_is_found() {
        let repo = MockRepository::new();
        repo.add_commit(oid(1), "a", &[]);
        repo.add_tag("v2.0.0", oid(1));

        let mut diags = Vec::new();
        let found = latest_version(&repo, "v", oid(1), false, &mut diags).unwrap();
        assert_eq!(found, Some((v("2.0.0"), oid(1))));
    }

    #[test]
    fn test_higher_version_off_history_is_ignored() {
        // 1 -- 2 (head, v1.0.0 on 1)
        //  \-- 3 (v9.9.9 on an unmerged branch)
        let repo = MockRepository::new();
        repo.add_commit(oid(1), "root", &[]);
        repo.add_commit(oid(2), "head", &[oid(1)]);
        repo.add_commit(oid(3), "side", &[oid(1)]);
        repo.add_tag("v1.0.0", oid(1));
        repo.add_tag("v9.9.9", oid(3));

        let mut diags = Vec::new();
        let found = latest_version(&repo, "v", oid(2), false, &mut diags).unwrap();
        assert_eq!(found, Some((v("1.0.0"), oid(1))));
    }

    #[test]
    fn test_merge_commit_reaches_both_parents() {
        // 1 -- 2 (v1.1.0) -- 4 (merge)
        //  \-- 3 (v2.0.0) --/
        let repo = MockRepository::new();
        repo.add_commit(oid(1), "root", &[]);
        repo.add_commit(oid(2), "left", &[oid(1)]);
        repo.add_commit(oid(3), "right", &[oid(1)]);
        repo.add_commit(oid(4), "merge", &[oid(2), oid(3)]);
        repo.add_tag("v1.1.0", oid(2));
        repo.add_tag("v2.0.0", oid(3));

        let mut diags = Vec::new();
        let found = latest_version(&repo, "v", oid(4), false, &mut diags).unwrap();
        assert_eq!(found, Some((v("2.0.0"), oid(3))));

        // From the left parent alone, the right-side tag is unreachable.
        let found = latest_version(&repo, "v", oid(2), false, &mut diags).unwrap();
        assert_eq!(found, Some((v("1.1.0"), oid(2))));
    }

    #[test]
    fn test_prerelease_excluded_unless_requested() {
        let repo = MockRepository::new();
        repo.add_commit(oid(1), "a", &[]);
        repo.add_commit(oid(2), "b", &[oid(1)]);
        repo.add_tag("v1.2.0", oid(1));
        repo.add_tag("v1.3.0-dev.1", oid(2));

        let mut diags = Vec::new();
        let stable = latest_version(&repo, "v", oid(2), false, &mut diags).unwrap();
        assert_eq!(stable, Some((v("1.2.0"), oid(1))));

        let any = latest_version(&repo, "v", oid(2), true, &mut diags).unwrap();
        assert_eq!(any, Some((v("1.3.0-dev.1"), oid(2))));
    }

    #[test]
    fn test_release_outranks_its_own_prerelease() {
        let repo = MockRepository::new();
        repo.add_commit(oid(1), "a", &[]);
        repo.add_commit(oid(2), "b", &[oid(1)]);
        repo.add_tag("v1.2.0-dev.5", oid(1));
        repo.add_tag("v1.2.0", oid(2));

        let mut diags = Vec::new();
        let found = latest_version(&repo, "v", oid(2), true, &mut diags).unwrap();
        assert_eq!(found, Some((v("1.2.0"), oid(2))));
    }

    #[test]
    fn test_unparsable_tags_are_skipped_with_diagnostics() {
        let repo = MockRepository::new();
        repo.add_commit(oid(1), "a", &[]);
        repo.add_tag("v1.0.0", oid(1));
        repo.add_tag("deploy-marker", oid(1));
        repo.add_tag("v1.2", oid(1));

        let mut diags = Vec::new();
        let found = latest_version(&repo, "v", oid(1), false, &mut diags).unwrap();
        assert_eq!(found, Some((v("1.0.0"), oid(1))));
        assert_eq!(diags.len(), 2);
    }

    #[test]
    fn test_no_candidates_returns_none() {
        let repo = MockRepository::new();
        repo.add_commit(oid(1), "a", &[]);

        let mut diags = Vec::new();
        let found = latest_version(&repo, "v", oid(1), false, &mut diags).unwrap();
        assert_eq!(found, None);
    }
}
