use crate::error::{AutotagError, Result};
use crate::git::{CommitInfo, TagRef};
use git2::{BranchType, ErrorCode, Oid, RemoteCallbacks, Repository as Git2Repo, Sort};
use std::path::{Path, PathBuf};

/// Wrapper around git2::Repository implementing the [super::Repository] trait
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository at or above `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;
        Ok(Git2Repository { repo })
    }

    /// Credential chain shared by fetch and push: SSH keys from ~/.ssh,
    /// then the SSH agent, then whatever the default helper provides.
    fn remote_callbacks(&self) -> RemoteCallbacks<'_> {
        let mut callbacks = RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, allowed_types| {
            let username = username_from_url.unwrap_or("git");
            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let key_path = PathBuf::from(&home).join(".ssh").join(key);
                    if key_path.exists() {
                        if let Ok(cred) = git2::Cred::ssh_key(username, None, &key_path, None) {
                            return Ok(cred);
                        }
                    }
                }
                if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                    return Ok(cred);
                }
            }
            git2::Cred::default()
        });
        callbacks
    }
}

impl super::Repository for Git2Repository {
    fn branch_head(&self, branch: &str) -> Result<Oid> {
        if let Ok(local) = self.repo.find_branch(branch, BranchType::Local) {
            if let Some(oid) = local.get().target() {
                return Ok(oid);
            }
        }

        // Remote-tracking fallback: "origin/main" style names, matched on the
        // part after the remote component.
        for entry in self.repo.branches(Some(BranchType::Remote))? {
            let (remote_branch, _) = entry?;
            let Some(name) = remote_branch.name()? else {
                continue;
            };
            let Some((_, short)) = name.split_once('/') else {
                continue;
            };
            if short == branch {
                if let Some(oid) = remote_branch.get().target() {
                    return Ok(oid);
                }
            }
        }

        Err(AutotagError::branch_not_found(branch))
    }

    fn commits_between(&self, from: Oid, to: Oid) -> Result<Vec<CommitInfo>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL)?;
        revwalk.push(to)?;
        revwalk.hide(from)?;

        let mut commits = Vec::new();
        for oid in revwalk {
            let oid = oid?;
            let commit = self.repo.find_commit(oid)?;
            commits.push(CommitInfo {
                id: oid,
                message: commit.message().unwrap_or_default().to_string(),
            });
        }
        Ok(commits)
    }

    fn tags(&self) -> Result<Vec<TagRef>> {
        let names = self.repo.tag_names(None)?;
        let mut tags = Vec::new();

        for name in names.iter().flatten() {
            let Ok(reference) = self.repo.find_reference(&format!("refs/tags/{}", name)) else {
                continue;
            };
            // Peel through annotated tags; skip tags on non-commit objects.
            let Ok(commit) = reference.peel_to_commit() else {
                continue;
            };
            tags.push(TagRef {
                name: name.to_string(),
                target: commit.id(),
            });
        }
        Ok(tags)
    }

    fn merge_bases(&self, one: Oid, two: Oid) -> Result<Vec<Oid>> {
        match self.repo.merge_bases(one, two) {
            Ok(bases) => Ok(bases.to_vec()),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn create_tag(&self, name: &str, target: Oid) -> Result<()> {
        let object = self
            .repo
            .find_object(target, None)
            .map_err(|e| AutotagError::tag(format!("Cannot find object: {}", e)))?;

        self.repo
            .tag_lightweight(name, &object, false)
            .map_err(|e| AutotagError::tag(format!("Cannot create tag '{}': {}", name, e)))?;

        Ok(())
    }

    fn delete_tag(&self, name: &str) -> Result<()> {
        self.repo
            .tag_delete(name)
            .map_err(|e| AutotagError::tag(format!("Cannot delete tag '{}': {}", name, e)))
    }

    fn delete_remote_tag(&self, remote: &str, name: &str) -> Result<()> {
        let mut remote = match self.repo.find_remote(remote) {
            Ok(remote) => remote,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(()),
            Err(e) => return Err(AutotagError::remote(format!("Cannot find remote: {}", e))),
        };

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(self.remote_callbacks());

        // An empty source side of the refspec deletes the remote ref.
        remote
            .push(
                &[&format!(":refs/tags/{}", name)],
                Some(&mut push_options),
            )
            .map_err(|e| {
                AutotagError::remote(format!("Cannot delete remote tag '{}': {}", name, e))
            })
    }

    fn push_tags(&self, remote: &str, names: &[String]) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(remote)
            .map_err(|e| AutotagError::remote(format!("Cannot find remote: {}", e)))?;

        let refspecs: Vec<String> = names
            .iter()
            .map(|tag| format!("refs/tags/{}:refs/tags/{}", tag, tag))
            .collect();
        let refspec_strs: Vec<&str> = refspecs.iter().map(|s| s.as_str()).collect();

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(self.remote_callbacks());

        remote
            .push(&refspec_strs, Some(&mut push_options))
            .map_err(|e| AutotagError::remote(format!("Push failed: {}", e)))
    }

    fn push_branch(&self, remote: &str, branch: &str) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(remote)
            .map_err(|e| AutotagError::remote(format!("Cannot find remote: {}", e)))?;

        let refspec = format!("refs/heads/{}:refs/heads/{}", branch, branch);

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(self.remote_callbacks());

        remote
            .push(&[&refspec], Some(&mut push_options))
            .map_err(|e| AutotagError::remote(format!("Push failed: {}", e)))
    }

    fn fetch(&self, remote: &str) -> Result<()> {
        // All branches into remote-tracking refs, all tags directly.
        let heads = format!("+refs/heads/*:refs/remotes/{}/*", remote);
        let refspecs = &[heads.as_str(), "+refs/tags/*:refs/tags/*"];

        let mut remote = self
            .repo
            .find_remote(remote)
            .map_err(|e| AutotagError::remote(format!("Cannot find remote: {}", e)))?;

        let mut fetch_options = git2::FetchOptions::new();
        fetch_options.remote_callbacks(self.remote_callbacks());

        remote
            .fetch(refspecs, Some(&mut fetch_options), None)
            .map_err(|e| AutotagError::remote(format!("Fetch failed: {}", e)))
    }

    fn commit_file_on_branch(&self, branch: &str, path: &Path, message: &str) -> Result<Oid> {
        let head_oid = self.branch_head(branch)?;
        let parent = self.repo.find_commit(head_oid)?;

        let mut index = self.repo.index()?;
        index.add_path(path)?;
        index.write()?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;

        let signature = self.repo.signature()?;
        let oid = self.repo.commit(
            Some(&format!("refs/heads/{}", branch)),
            &signature,
            &signature,
            message,
            &tree,
            &[&parent],
        )?;
        Ok(oid)
    }

    fn workdir(&self) -> Result<PathBuf> {
        self.repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| AutotagError::config("Repository has no working tree"))
    }
}

// SAFETY: Git2Repository wraps git2::Repository which is Send + Sync.
// git2 library is thread-safe for read operations via libgit2's thread-safe design.
unsafe impl Sync for Git2Repository {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git2_repository_open() {
        // Discovery either succeeds (running inside a checkout) or fails
        // gracefully; integration tests cover real repositories.
        let _ = Git2Repository::open(".");
    }
}
