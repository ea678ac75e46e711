//! Git operations abstraction layer
//!
//! The [Repository] trait defines the narrow backend interface the version
//! engine needs. Two implementations exist:
//!
//! - [repository::Git2Repository]: the real backend over the `git2` crate
//! - [mock::MockRepository]: a DAG-aware in-memory implementation for tests
//!
//! Engine code depends on the trait, never on a concrete implementation, so
//! every resolution and tagging path can be exercised without a filesystem.

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use git2::Oid;
use std::path::{Path, PathBuf};

/// Commit snapshot for classification
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    pub id: Oid,
    /// Full message text, subject and body
    pub message: String,
}

/// A tag name bound to the commit it points at
#[derive(Debug, Clone, PartialEq)]
pub struct TagRef {
    pub name: String,
    pub target: Oid,
}

/// Backend boundary for all version-control access.
///
/// Implementors must be `Send + Sync`. All calls are blocking; the engine
/// never parallelizes them because ancestry checks are evaluated in strict
/// order with first-hit-wins semantics.
pub trait Repository: Send + Sync {
    /// Head commit of a branch, checking local branches first and falling
    /// back to remote-tracking branches of the same name.
    fn branch_head(&self, branch: &str) -> Result<Oid>;

    /// Commits reachable from `to` but not from `from` (exclusive..inclusive),
    /// newest first in topological order, with full message text.
    fn commits_between(&self, from: Oid, to: Oid) -> Result<Vec<CommitInfo>>;

    /// Snapshot of all tags with their peeled target commits.
    fn tags(&self) -> Result<Vec<TagRef>>;

    /// All merge-bases of two commits. Empty when the histories are
    /// unrelated.
    fn merge_bases(&self, one: Oid, two: Oid) -> Result<Vec<Oid>>;

    /// Create a lightweight tag. Fails if the name already exists.
    fn create_tag(&self, name: &str, target: Oid) -> Result<()>;

    /// Delete a local tag.
    fn delete_tag(&self, name: &str) -> Result<()>;

    /// Delete a tag on the remote. A missing remote is a no-op so that
    /// repositories without one still support floating-tag overwrites.
    fn delete_remote_tag(&self, remote: &str, name: &str) -> Result<()>;

    /// Push the given tags to the remote.
    fn push_tags(&self, remote: &str, names: &[String]) -> Result<()>;

    /// Push a branch head to the remote.
    fn push_branch(&self, remote: &str, branch: &str) -> Result<()>;

    /// Fetch all branches and tags from the remote.
    fn fetch(&self, remote: &str) -> Result<()>;

    /// Stage one file and commit it on top of the branch head, moving the
    /// branch ref. Returns the new head commit.
    fn commit_file_on_branch(&self, branch: &str, path: &Path, message: &str) -> Result<Oid>;

    /// Root of the working tree, for resolving repository-relative paths.
    fn workdir(&self) -> Result<PathBuf>;
}
