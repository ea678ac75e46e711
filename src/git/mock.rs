use crate::error::{AutotagError, Result};
use crate::git::{CommitInfo, Repository, TagRef};
use git2::Oid;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Deterministic Oid for tests: twenty copies of one byte.
pub fn oid(byte: u8) -> Oid {
    Oid::from_bytes(&[byte; 20]).unwrap()
}

#[derive(Debug, Clone)]
struct MockCommit {
    message: String,
    parents: Vec<Oid>,
}

#[derive(Default)]
struct Inner {
    commits: HashMap<Oid, MockCommit>,
    /// Insertion order, oldest first; the walk order for ranges.
    order: Vec<Oid>,
    branches: HashMap<String, Oid>,
    tags: HashMap<String, Oid>,
    deleted_remote_tags: Vec<String>,
    pushed_refs: Vec<String>,
    committed_files: Vec<PathBuf>,
    synthetic_commits: u8,
    workdir: Option<PathBuf>,
}

/// In-memory repository with real DAG semantics for ancestry, ranges and
/// merge-bases, so resolver and orchestration logic can be tested against
/// merge topologies without touching a filesystem.
pub struct MockRepository {
    inner: Mutex<Inner>,
}

impl MockRepository {
    pub fn new() -> Self {
        MockRepository {
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Add a commit with the given parents. Insertion order doubles as
    /// commit time: later additions are newer.
    pub fn add_commit(&self, id: Oid, message: impl Into<String>, parents: &[Oid]) {
        let mut inner = self.inner.lock().unwrap();
        inner.commits.insert(
            id,
            MockCommit {
                message: message.into(),
                parents: parents.to_vec(),
            },
        );
        inner.order.push(id);
    }

    /// Set a branch head
    pub fn set_branch(&self, branch: impl Into<String>, id: Oid) {
        self.inner.lock().unwrap().branches.insert(branch.into(), id);
    }

    /// Add a tag pointing at a commit
    pub fn add_tag(&self, name: impl Into<String>, id: Oid) {
        self.inner.lock().unwrap().tags.insert(name.into(), id);
    }

    pub fn set_workdir(&self, path: impl Into<PathBuf>) {
        self.inner.lock().unwrap().workdir = Some(path.into());
    }

    pub fn tag_target(&self, name: &str) -> Option<Oid> {
        self.inner.lock().unwrap().tags.get(name).copied()
    }

    pub fn tag_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.lock().unwrap().tags.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn remote_tag_deletions(&self) -> Vec<String> {
        self.inner.lock().unwrap().deleted_remote_tags.clone()
    }

    pub fn pushed_refs(&self) -> Vec<String> {
        self.inner.lock().unwrap().pushed_refs.clone()
    }

    pub fn committed_files(&self) -> Vec<PathBuf> {
        self.inner.lock().unwrap().committed_files.clone()
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn ancestors(inner: &Inner, start: Oid) -> HashSet<Oid> {
    let mut seen = HashSet::new();
    let mut queue = VecDeque::from([start]);
    while let Some(id) = queue.pop_front() {
        if !seen.insert(id) {
            continue;
        }
        if let Some(commit) = inner.commits.get(&id) {
            queue.extend(&commit.parents);
        }
    }
    seen
}

impl Repository for MockRepository {
    fn branch_head(&self, branch: &str) -> Result<Oid> {
        self.inner
            .lock()
            .unwrap()
            .branches
            .get(branch)
            .copied()
            .ok_or_else(|| AutotagError::branch_not_found(branch))
    }

    fn commits_between(&self, from: Oid, to: Oid) -> Result<Vec<CommitInfo>> {
        let inner = self.inner.lock().unwrap();
        let mut reachable = ancestors(&inner, to);
        for hidden in ancestors(&inner, from) {
            reachable.remove(&hidden);
        }

        // Newest first, mirroring the real backend's walk direction.
        Ok(inner
            .order
            .iter()
            .rev()
            .filter(|id| reachable.contains(*id))
            .map(|id| CommitInfo {
                id: *id,
                message: inner.commits[id].message.clone(),
            })
            .collect())
    }

    fn tags(&self) -> Result<Vec<TagRef>> {
        let inner = self.inner.lock().unwrap();
        let mut tags: Vec<TagRef> = inner
            .tags
            .iter()
            .map(|(name, target)| TagRef {
                name: name.clone(),
                target: *target,
            })
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    fn merge_bases(&self, one: Oid, two: Oid) -> Result<Vec<Oid>> {
        let inner = self.inner.lock().unwrap();
        let common: HashSet<Oid> = ancestors(&inner, one)
            .intersection(&ancestors(&inner, two))
            .copied()
            .collect();

        // Keep only the maximal elements: common ancestors that are not
        // themselves an ancestor of another common ancestor.
        let mut bases: Vec<Oid> = common
            .iter()
            .filter(|candidate| {
                !common
                    .iter()
                    .any(|other| {
                        other != *candidate && ancestors(&inner, *other).contains(*candidate)
                    })
            })
            .copied()
            .collect();

        bases.sort_by_key(|id| {
            std::cmp::Reverse(inner.order.iter().position(|o| o == id).unwrap_or(0))
        });
        Ok(bases)
    }

    fn create_tag(&self, name: &str, target: Oid) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.tags.contains_key(name) {
            return Err(AutotagError::tag(format!("Tag '{}' already exists", name)));
        }
        inner.tags.insert(name.to_string(), target);
        Ok(())
    }

    fn delete_tag(&self, name: &str) -> Result<()> {
        self.inner
            .lock()
            .unwrap()
            .tags
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| AutotagError::tag(format!("Tag '{}' not found", name)))
    }

    fn delete_remote_tag(&self, _remote: &str, name: &str) -> Result<()> {
        self.inner
            .lock()
            .unwrap()
            .deleted_remote_tags
            .push(name.to_string());
        Ok(())
    }

    fn push_tags(&self, _remote: &str, names: &[String]) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        for name in names {
            inner.pushed_refs.push(format!("refs/tags/{}", name));
        }
        Ok(())
    }

    fn push_branch(&self, _remote: &str, branch: &str) -> Result<()> {
        self.inner
            .lock()
            .unwrap()
            .pushed_refs
            .push(format!("refs/heads/{}", branch));
        Ok(())
    }

    fn fetch(&self, _remote: &str) -> Result<()> {
        Ok(())
    }

    fn commit_file_on_branch(&self, branch: &str, path: &Path, message: &str) -> Result<Oid> {
        let head = self.branch_head(branch)?;
        let mut inner = self.inner.lock().unwrap();

        inner.synthetic_commits += 1;
        let mut bytes = [0xFEu8; 20];
        bytes[19] = inner.synthetic_commits;
        let id = Oid::from_bytes(&bytes).map_err(AutotagError::Git)?;

        inner.committed_files.push(path.to_path_buf());
        inner.commits.insert(
            id,
            MockCommit {
                message: message.to_string(),
                parents: vec![head],
            },
        );
        inner.order.push(id);
        inner.branches.insert(branch.to_string(), id);
        Ok(id)
    }

    fn workdir(&self) -> Result<PathBuf> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .workdir
            .clone()
            .unwrap_or_else(std::env::temp_dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_head() {
        let repo = MockRepository::new();
        repo.add_commit(oid(1), "init", &[]);
        repo.set_branch("main", oid(1));

        assert_eq!(repo.branch_head("main").unwrap(), oid(1));
        assert!(repo.branch_head("missing").is_err());
    }

    #[test]
    fn test_commits_between_linear() {
        let repo = MockRepository::new();
        repo.add_commit(oid(1), "a", &[]);
        repo.add_commit(oid(2), "b", &[oid(1)]);
        repo.add_commit(oid(3), "c", &[oid(2)]);

        let range = repo.commits_between(oid(1), oid(3)).unwrap();
        let messages: Vec<&str> = range.iter().map(|c| c.message.as_str()).collect();
        assert_eq!(messages, vec!["c", "b"]);
    }

    #[test]
    fn test_commits_between_includes_merged_branch() {
        // 1 -- 2 ------ 4 (merge)
        //  \-- 3 ------/
        let repo = MockRepository::new();
        repo.add_commit(oid(1), "root", &[]);
        repo.add_commit(oid(2), "main side", &[oid(1)]);
        repo.add_commit(oid(3), "branch side", &[oid(1)]);
        repo.add_commit(oid(4), "merge", &[oid(2), oid(3)]);

        let range = repo.commits_between(oid(2), oid(4)).unwrap();
        let ids: Vec<Oid> = range.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![oid(4), oid(3)]);
    }

    #[test]
    fn test_merge_bases_linear() {
        let repo = MockRepository::new();
        repo.add_commit(oid(1), "a", &[]);
        repo.add_commit(oid(2), "b", &[oid(1)]);

        assert_eq!(repo.merge_bases(oid(1), oid(2)).unwrap(), vec![oid(1)]);
        assert_eq!(repo.merge_bases(oid(2), oid(2)).unwrap(), vec![oid(2)]);
    }

    #[test]
    fn test_merge_bases_forked() {
        let repo = MockRepository::new();
        repo.add_commit(oid(1), "root", &[]);
        repo.add_commit(oid(2), "left", &[oid(1)]);
        repo.add_commit(oid(3), "right", &[oid(1)]);

        assert_eq!(repo.merge_bases(oid(2), oid(3)).unwrap(), vec![oid(1)]);
    }

    #[test]
    fn test_merge_bases_unrelated() {
        let repo = MockRepository::new();
        repo.add_commit(oid(1), "a", &[]);
        repo.add_commit(oid(2), "b", &[]);

        assert!(repo.merge_bases(oid(1), oid(2)).unwrap().is_empty());
    }

    #[test]
    fn test_create_tag_refuses_duplicates() {
        let repo = MockRepository::new();
        repo.add_commit(oid(1), "a", &[]);
        repo.create_tag("v1.0.0", oid(1)).unwrap();
        assert!(repo.create_tag("v1.0.0", oid(1)).is_err());
    }

    #[test]
    fn test_delete_and_recreate_tag() {
        let repo = MockRepository::new();
        repo.add_commit(oid(1), "a", &[]);
        repo.add_commit(oid(2), "b", &[oid(1)]);
        repo.add_tag("v1", oid(1));

        repo.delete_tag("v1").unwrap();
        repo.create_tag("v1", oid(2)).unwrap();
        assert_eq!(repo.tag_target("v1"), Some(oid(2)));
    }

    #[test]
    fn test_commit_file_on_branch_moves_head() {
        let repo = MockRepository::new();
        repo.add_commit(oid(1), "init", &[]);
        repo.set_branch("main", oid(1));

        let new_head = repo
            .commit_file_on_branch("main", Path::new("CHANGELOG.md"), "Update changelog")
            .unwrap();
        assert_eq!(repo.branch_head("main").unwrap(), new_head);
        assert_eq!(repo.merge_bases(oid(1), new_head).unwrap(), vec![oid(1)]);
    }
}
