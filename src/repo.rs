//! Local git repository access.
//!
//! Classification needs to know which commit headlines are reachable from a
//! branch. Branch history is read from the local clone the operator runs the
//! tool in, so the clone must be fetched before validating. A branch is
//! resolved as a local branch first and as a remote-tracking branch of the
//! configured remote second.
use git2::{BranchType, ErrorCode, Oid};
use log::*;
use std::{collections::HashSet, path::Path};

use crate::error::{Result, WardenError};

/// Wrapper around `git2::Repository` for branch and history lookups.
pub struct Repository {
    /// Remote used for remote-tracking branch lookups and URL parsing.
    remote: String,
    /// The underlying git2 repository instance.
    repo: git2::Repository,
}

impl Repository {
    /// Open the repository containing `path`.
    pub fn open(path: &Path, remote: &str) -> Result<Self> {
        let repo = git2::Repository::discover(path)?;
        debug!("opened git repository at {}", repo.path().display());
        Ok(Self {
            remote: remote.to_string(),
            repo,
        })
    }

    /// URL of the configured remote, if the remote exists and has one.
    pub fn remote_url(&self) -> Result<Option<String>> {
        match self.repo.find_remote(&self.remote) {
            Ok(remote) => Ok(remote.url().map(String::from)),
            Err(err) if err.code() == ErrorCode::NotFound => {
                warn!("git remote '{}' not found", self.remote);
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Names of local branches and remote-tracking branches of the
    /// configured remote, the latter with the remote prefix stripped.
    pub fn branch_names(&self) -> Result<Vec<String>> {
        let remote_prefix = format!("{}/", self.remote);
        let mut names = vec![];

        for branch in self.repo.branches(None)? {
            let (branch, branch_type) = branch?;
            let Some(name) = branch.name()? else {
                continue;
            };

            let name = match branch_type {
                BranchType::Local => name.to_string(),
                BranchType::Remote => match name.strip_prefix(&remote_prefix) {
                    Some(stripped) => stripped.to_string(),
                    None => continue,
                },
            };

            if !names.contains(&name) {
                names.push(name);
            }
        }

        Ok(names)
    }

    /// Resolve a branch name to the commit it points at.
    pub fn resolve_branch(&self, branch: &str) -> Result<Oid> {
        let candidates = [
            format!("refs/heads/{branch}"),
            format!("refs/remotes/{}/{branch}", self.remote),
        ];

        for refname in candidates.iter() {
            match self.repo.find_reference(refname) {
                Ok(reference) => {
                    debug!("resolved branch {branch} via {refname}");
                    return Ok(reference.peel_to_commit()?.id());
                }
                Err(err) if err.code() == ErrorCode::NotFound => continue,
                Err(err) => return Err(err.into()),
            }
        }

        Err(WardenError::BranchNotFound(branch.to_string()))
    }

    /// First lines of every commit message reachable from `branch`.
    pub fn commit_headlines(&self, branch: &str) -> Result<HashSet<String>> {
        let oid = self.resolve_branch(branch)?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.push(oid)?;

        let mut headlines = HashSet::new();

        for id in revwalk {
            let commit = self.repo.find_commit(id?)?;
            if let Some(summary) = commit.summary() {
                headlines.insert(summary.to_string());
            }
        }

        debug!(
            "collected {} commit headlines from branch {branch}",
            headlines.len()
        );

        Ok(headlines)
    }
}


#[cfg(test)]
mod tests {
    use super::test_fixtures::FixtureRepo;
    use super::*;

    #[test]
    fn commit_headlines_walks_branch_history() {
        let fixture = FixtureRepo::new();
        let root = fixture.commit(None, "chore: initial commit");
        let second =
            fixture.commit(Some(root), "feat: add widgets (#10)\n\nbody text");
        let unrelated = fixture.commit(Some(root), "fix: elsewhere (#11)");
        fixture.set_ref("refs/heads/release/minor/v3.5.0", second);
        fixture.set_ref("refs/heads/other", unrelated);

        let repo = Repository::open(fixture.dir.path(), "origin").unwrap();
        let headlines = repo.commit_headlines("release/minor/v3.5.0").unwrap();

        assert_eq!(headlines.len(), 2);
        assert!(headlines.contains("feat: add widgets (#10)"));
        assert!(headlines.contains("chore: initial commit"));
        assert!(!headlines.contains("fix: elsewhere (#11)"));
    }

    #[test]
    fn resolve_branch_falls_back_to_remote_tracking_branch() {
        let fixture = FixtureRepo::new();
        let root = fixture.commit(None, "chore: initial commit");
        fixture.set_ref("refs/remotes/origin/next", root);

        let repo = Repository::open(fixture.dir.path(), "origin").unwrap();

        assert_eq!(repo.resolve_branch("next").unwrap(), root);
    }

    #[test]
    fn resolve_branch_missing_is_branch_not_found() {
        let fixture = FixtureRepo::new();
        let root = fixture.commit(None, "chore: initial commit");
        fixture.set_ref("refs/heads/main", root);

        let repo = Repository::open(fixture.dir.path(), "origin").unwrap();
        let err = repo.resolve_branch("next").unwrap_err();

        assert!(matches!(err, WardenError::BranchNotFound(ref b) if b == "next"));
    }

    #[test]
    fn branch_names_strip_remote_prefix_and_dedupe() {
        let fixture = FixtureRepo::new();
        let root = fixture.commit(None, "chore: initial commit");
        fixture.set_ref("refs/heads/next", root);
        fixture.set_ref("refs/remotes/origin/next", root);
        fixture.set_ref("refs/remotes/origin/release/minor/v3.5.0", root);
        fixture.set_ref("refs/remotes/fork/release/minor/v9.9.9", root);

        let repo = Repository::open(fixture.dir.path(), "origin").unwrap();
        let mut names = repo.branch_names().unwrap();
        names.sort();

        assert_eq!(names, vec!["next", "release/minor/v3.5.0"]);
    }

    #[test]
    fn remote_url_reads_configured_remote() {
        let fixture = FixtureRepo::new();
        fixture
            .repo
            .remote("origin", "https://github.com/acme/widgets.git")
            .unwrap();

        let repo = Repository::open(fixture.dir.path(), "origin").unwrap();
        assert_eq!(
            repo.remote_url().unwrap().as_deref(),
            Some("https://github.com/acme/widgets.git")
        );

        let repo = Repository::open(fixture.dir.path(), "upstream").unwrap();
        assert!(repo.remote_url().unwrap().is_none());
    }
}
