//! Expected-milestone classification of merged pull requests.
//!
//! A pull request's merge commit headline is looked up, in order, in the
//! history of the current release branch and in the history of the
//! integration branch. The first hit decides the expected milestone; a PR
//! found in neither falls back to the configured fallback milestone.
//!
//! Matching is exact on the headline. A commit whose message was rewritten
//! by a rebase or squash will not match and falls through to a later tier.
use log::*;
use regex::Regex;
use semver::Version;
use std::{collections::HashSet, sync::LazyLock};

use crate::{
    config::Config,
    error::{Result, WardenError},
    repo::Repository,
};

static TRAILING_PR_REFS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\s*\(#\d+\))+$").unwrap());

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Normalize a commit headline for comparison against the integration
/// branch: whitespace is collapsed and trailing `(#123)` references are
/// removed, since a cherry-pick gains its own PR reference.
pub fn sanitize(message: &str) -> String {
    let collapsed = WHITESPACE.replace_all(message.trim(), " ");
    TRAILING_PR_REFS.replace(&collapsed, "").trim_end().to_string()
}

/// The branch currently cutting a release, e.g. `release/minor/v3.5.0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseBranch {
    pub name: String,
    /// Last path segment of the branch name, e.g. `v3.5.0`.
    pub version: String,
    semver: Version,
}

impl ReleaseBranch {
    /// Parse a release branch name. The last path segment must be a version,
    /// optionally prefixed with `v`.
    pub fn parse(name: &str) -> Result<Self> {
        let segment = name.rsplit('/').next().unwrap_or_default();
        let semver = Version::parse(segment.strip_prefix('v').unwrap_or(segment))
            .map_err(|_| WardenError::InvalidReleaseBranch(name.to_string()))?;

        Ok(Self {
            name: name.to_string(),
            version: segment.to_string(),
            semver,
        })
    }

    /// Pick the release branch with the highest version among `names` that
    /// start with `prefix`. Names whose last segment is not a version are
    /// skipped.
    pub fn detect<S: AsRef<str>>(names: &[S], prefix: &str) -> Option<Self> {
        names
            .iter()
            .map(|n| n.as_ref())
            .filter(|n| n.starts_with(prefix))
            .filter_map(|n| match ReleaseBranch::parse(n) {
                Ok(branch) => Some(branch),
                Err(_) => {
                    debug!("skipping non-version release branch: {n}");
                    None
                }
            })
            .max_by(|a, b| a.semver.cmp(&b.semver))
    }

    /// Resolve the release branch: an explicit name wins, otherwise the
    /// highest versioned branch in the repository is used.
    pub fn resolve(
        explicit: Option<&str>,
        repo: &Repository,
        prefix: &str,
    ) -> Result<Self> {
        if let Some(name) = explicit {
            return ReleaseBranch::parse(name);
        }

        let names = repo.branch_names()?;

        let branch = ReleaseBranch::detect(names.as_slice(), prefix)
            .ok_or_else(|| WardenError::ReleaseBranchNotFound(prefix.into()))?;

        info!("detected release branch: {}", branch.name);

        Ok(branch)
    }
}

/// Which tier decided a pull request's expected milestone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Merge commit is on the release branch.
    Release(String),
    /// Merge commit is on the integration branch.
    NextRelease(String),
    /// Found on neither branch.
    Fallback(String),
}

impl Classification {
    /// Title of the milestone the pull request should carry.
    pub fn milestone(&self) -> &str {
        match self {
            Classification::Release(title)
            | Classification::NextRelease(title)
            | Classification::Fallback(title) => title,
        }
    }
}

/// Commit-membership classifier built from branch histories.
#[derive(Debug)]
pub struct Classifier {
    release_version: String,
    release_headlines: HashSet<String>,
    next_milestone: String,
    next_headlines: HashSet<String>,
    fallback_milestone: String,
}

impl Classifier {
    /// Build a classifier from raw headline sets. Integration branch
    /// headlines are sanitized here.
    pub fn new(
        release: &ReleaseBranch,
        release_headlines: HashSet<String>,
        next_headlines: HashSet<String>,
        config: &Config,
    ) -> Self {
        Self {
            release_version: release.version.clone(),
            release_headlines,
            next_milestone: config.next_milestone.clone(),
            next_headlines: next_headlines.iter().map(|h| sanitize(h)).collect(),
            fallback_milestone: config.fallback_milestone.clone(),
        }
    }

    /// Read the release and integration branch histories from `repo`.
    pub fn from_repository(
        repo: &Repository,
        release: &ReleaseBranch,
        config: &Config,
    ) -> Result<Self> {
        let release_headlines = repo.commit_headlines(&release.name)?;
        let next_headlines = repo.commit_headlines(&config.integration_branch)?;
        Ok(Self::new(release, release_headlines, next_headlines, config))
    }

    pub fn classify(&self, merge_message: &str) -> Classification {
        if self.release_headlines.contains(merge_message) {
            return Classification::Release(self.release_version.clone());
        }

        if self.next_headlines.contains(&sanitize(merge_message)) {
            return Classification::NextRelease(self.next_milestone.clone());
        }

        Classification::Fallback(self.fallback_milestone.clone())
    }
}
