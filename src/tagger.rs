//! Tag name computation and publication.
//!
//! The exact version tag is effectively immutable in normal operation (the
//! workflow rejects unchanged versions before getting here); the shorter
//! aliases are floating and move with every release. The publisher does not
//! distinguish the two: any existing name is deleted locally and on the
//! remote, then recreated, uniformly.

use crate::error::Result;
use crate::git::Repository;
use git2::Oid;
use semver::Version;
use std::collections::HashMap;

pub struct TagPublisher<'a, R: Repository + ?Sized> {
    repo: &'a R,
    prefix: &'a str,
    include_shorter: bool,
    remote: &'a str,
}

impl<'a, R: Repository + ?Sized> TagPublisher<'a, R> {
    pub fn new(repo: &'a R, prefix: &'a str, include_shorter: bool, remote: &'a str) -> Self {
        TagPublisher {
            repo,
            prefix,
            include_shorter,
            remote,
        }
    }

    /// All tag names for a version: the exact tag first, then the floating
    /// aliases when shorter versions are enabled.
    pub fn tag_names(&self, version: &Version) -> Vec<String> {
        let suffix = if version.pre.is_empty() {
            String::new()
        } else {
            // Aliases keep only the first pre-release identifier: v1.3-dev,
            // not v1.3-dev.0.2.0.
            match version.pre.as_str().split('.').next() {
                Some(first) => format!("-{}", first),
                None => String::new(),
            }
        };

        let mut names = vec![format!("{}{}", self.prefix, version)];
        if !self.include_shorter {
            return names;
        }

        if !suffix.is_empty() {
            names.push(format!(
                "{}{}.{}.{}{}",
                self.prefix, version.major, version.minor, version.patch, suffix
            ));
        }
        names.push(format!(
            "{}{}.{}{}",
            self.prefix, version.major, version.minor, suffix
        ));
        names.push(format!("{}{}{}", self.prefix, version.major, suffix));

        names
    }

    /// Apply every tag name to the commit, overwriting existing bindings.
    ///
    /// Existing names are deleted locally and on the remote before being
    /// recreated; tag names absent from the snapshot are created directly.
    /// Returns the applied names.
    pub fn publish(&self, commit: Oid, version: &Version) -> Result<Vec<String>> {
        let existing: HashMap<String, Oid> = self
            .repo
            .tags()?
            .into_iter()
            .map(|tag| (tag.name, tag.target))
            .collect();

        let names = self.tag_names(version);
        for name in &names {
            if existing.contains_key(name) {
                self.repo.delete_tag(name)?;
                self.repo.delete_remote_tag(self.remote, name)?;
            }
            self.repo.create_tag(name, commit)?;
        }

        Ok(names)
    }
}
