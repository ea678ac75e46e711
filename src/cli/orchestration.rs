//! Main workflow orchestration logic
//!
//! The operations exposed to the CLI layer: tag the main branch, tag a dev
//! branch, build a changelog. All version computation happens before any tag
//! is touched, so a failure never leaves partial tag state.

use crate::analyzer::{latest_version, scan_range};
use crate::changelog::Changelog;
use crate::config::Config;
use crate::conventional::CommitCategory;
use crate::diagnostics::Diagnostic;
use crate::domain::prerelease::{DevVersionStyle, DevVersioner};
use crate::domain::version::bump;
use crate::error::{AutotagError, Result};
use crate::git::Repository;
use crate::tagger::TagPublisher;
use chrono::Local;
use git2::Oid;
use semver::Version;
use std::fs;
use std::path::Path;

/// Result of a successful tagging run
#[derive(Debug, Clone, PartialEq)]
pub struct TagOutcome {
    /// The version the history was on before this run, with prefix
    pub previous_version: String,

    /// The version this run created, with prefix
    pub new_version: String,

    /// Every tag name applied to the release commit
    pub tags: Vec<String>,

    /// Non-fatal findings collected along the way
    pub diagnostics: Vec<Diagnostic>,
}

/// Ties the version engine to one repository and configuration.
pub struct Workflow<'a, R: Repository + ?Sized> {
    repo: &'a R,
    config: &'a Config,
}

impl<'a, R: Repository + ?Sized> Workflow<'a, R> {
    pub fn new(repo: &'a R, config: &'a Config) -> Self {
        Workflow { repo, config }
    }

    /// Tag the main branch with the next stable version.
    ///
    /// Resolves the latest stable tag reachable from the branch head
    /// (pre-releases excluded), folds the commits since it into a severity,
    /// bumps, optionally writes the changelog, then publishes the tags.
    pub fn tag_main(&self) -> Result<TagOutcome> {
        let mut diagnostics = Vec::new();
        let prefix = &self.config.version_prefix;
        let mut head = self.repo.branch_head(&self.config.main_branch)?;

        let (previous, previous_commit) =
            latest_version(self.repo, prefix, head, false, &mut diagnostics)?.ok_or_else(|| {
                AutotagError::LatestVersionNotFound(self.config.main_branch.clone())
            })?;

        if previous_commit == head {
            return Err(AutotagError::already_tagged(format!(
                "commit {} already carries {}{}",
                head, prefix, previous
            )));
        }

        let summary = scan_range(self.repo, previous_commit, head)?;
        let next = bump(&previous, summary.severity);
        if next == previous {
            return Err(AutotagError::already_tagged(format!(
                "no version-affecting commits since {}{}",
                prefix, previous
            )));
        }

        if let Some(file) = self.config.changelog.file.clone() {
            let log = self.build_changelog(
                previous_commit,
                head,
                self.config.changelog.message.as_deref(),
            )?;
            head = self.write_changelog(&self.config.main_branch, &file, &next, &log)?;
        }

        let tags = self.publish(head, &next)?;

        Ok(TagOutcome {
            previous_version: format!("{}{}", prefix, previous),
            new_version: format!("{}{}", prefix, next),
            tags,
            diagnostics,
        })
    }

    /// Tag a dev branch with the next pre-release version.
    ///
    /// The base version is the latest stable from the main head advanced by
    /// the severity of everything on the dev branch since the merge-base;
    /// the pre-release part advances by the policy, driven by the narrower
    /// range since the previous dev tag.
    pub fn tag_dev(
        &self,
        dev_branch: &str,
        suffix: &str,
        style: DevVersionStyle,
    ) -> Result<TagOutcome> {
        let mut diagnostics = Vec::new();
        let prefix = &self.config.version_prefix;
        let versioner = DevVersioner::new(suffix, style)?;

        let main_head = self.repo.branch_head(&self.config.main_branch)?;
        let mut dev_head = self.repo.branch_head(dev_branch)?;

        let (latest_main, _) =
            latest_version(self.repo, prefix, main_head, false, &mut diagnostics)?.ok_or_else(
                || AutotagError::LatestVersionNotFound(self.config.main_branch.clone()),
            )?;

        let (latest_dev, latest_dev_commit) =
            latest_version(self.repo, prefix, dev_head, true, &mut diagnostics)?
                .ok_or_else(|| AutotagError::LatestVersionNotFound(dev_branch.to_string()))?;

        if latest_dev_commit == dev_head {
            return Err(AutotagError::already_tagged(format!(
                "commit {} already carries {}{}",
                dev_head, prefix, latest_dev
            )));
        }

        let bases = self.repo.merge_bases(main_head, dev_head)?;
        if bases.len() != 1 {
            return Err(AutotagError::NoCommonAncestor {
                main: self.config.main_branch.clone(),
                dev: dev_branch.to_string(),
            });
        }

        let base_severity = scan_range(self.repo, bases[0], dev_head)?.severity;
        let dev_severity = scan_range(self.repo, latest_dev_commit, dev_head)?.severity;

        let bumped_base = bump(&latest_main, base_severity);
        let next = versioner.next(&latest_dev, &bumped_base, dev_severity)?;
        if next == latest_dev {
            return Err(AutotagError::already_tagged(format!(
                "no version-affecting commits since {}{}",
                prefix, latest_dev
            )));
        }

        if let Some(file) = self.config.changelog.file.clone() {
            let log = self.build_changelog(
                latest_dev_commit,
                dev_head,
                self.config.changelog.message.as_deref(),
            )?;
            dev_head = self.write_changelog(dev_branch, &file, &next, &log)?;
        }

        let tags = self.publish(dev_head, &next)?;

        Ok(TagOutcome {
            previous_version: format!("{}{}", prefix, latest_dev),
            new_version: format!("{}{}", prefix, next),
            tags,
            diagnostics,
        })
    }

    /// Group the changelog entries of a commit range, with an optional extra
    /// message leading the scope-less bucket.
    pub fn build_changelog(
        &self,
        from: Oid,
        to: Oid,
        extra_message: Option<&str>,
    ) -> Result<Changelog> {
        let mut log = Changelog::new();
        if let Some(message) = extra_message {
            log.push(None, CommitCategory::Other, message.to_string());
        }
        log.merge(scan_range(self.repo, from, to)?.changelog);
        Ok(log)
    }

    /// Render the changelog above any existing content, commit the file on
    /// the branch, and return the new head that the tags should land on.
    fn write_changelog(
        &self,
        branch: &str,
        file: &Path,
        version: &Version,
        log: &Changelog,
    ) -> Result<Oid> {
        let absolute = self.repo.workdir()?.join(file);
        let existing = if absolute.exists() {
            Some(fs::read_to_string(&absolute)?)
        } else {
            None
        };

        let mut document = log.render(version, Local::now());
        if let Some(previous) = existing {
            document.push('\n');
            document.push_str(&previous);
        }
        fs::write(&absolute, document)?;

        let head = self.repo.commit_file_on_branch(
            branch,
            file,
            &format!("Update changelog for {}", version),
        )?;
        if self.config.push {
            self.repo.push_branch(&self.config.remote, branch)?;
        }
        Ok(head)
    }

    fn publish(&self, commit: Oid, version: &Version) -> Result<Vec<String>> {
        let publisher = TagPublisher::new(
            self.repo,
            &self.config.version_prefix,
            self.config.include_shorter_versions,
            &self.config.remote,
        );
        let tags = publisher.publish(commit, version)?;
        if self.config.push {
            self.repo.push_tags(&self.config.remote, &tags)?;
        }
        Ok(tags)
    }
}
