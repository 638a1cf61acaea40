//! Configuration loading and parsing for `.milestone-warden.toml` files.
//!
//! Every field has a default so an absent file or an empty file yields a
//! working configuration for the conventional branch layout.
use log::*;
use serde::{Deserialize, Serialize};
use std::{fs, io::ErrorKind, path::Path};

use crate::error::Result;

/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = ".milestone-warden.toml";
/// Default GitHub API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";
/// Default git remote used to resolve branches and repository coordinates.
pub const DEFAULT_REMOTE: &str = "origin";
/// Milestone assigned when a PR is found in neither branch history.
pub const DEFAULT_FALLBACK_MILESTONE: &str = "v4.0.0";
/// Milestone assigned to PRs that landed on the integration branch.
pub const DEFAULT_NEXT_MILESTONE: &str = "next-release";
/// Branch that collects cherry-picks for the upcoming release.
pub const DEFAULT_INTEGRATION_BRANCH: &str = "next";
/// Prefix shared by release branches, e.g. `release/minor/v3.5.0`.
pub const DEFAULT_RELEASE_BRANCH_PREFIX: &str = "release/";
/// Head branch prefix identifying cherry-pick pull requests.
pub const DEFAULT_CHERRY_PICK_PREFIX: &str = "cherry-pick";
/// Milestone for housekeeping PRs. Never validated.
pub const CHORE_MILESTONE: &str = "chore";

/// A pull request excluded from validation, by node id or by number.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum IgnoreEntry {
    Number(u64),
    Id(String),
}

impl IgnoreEntry {
    /// Whether this entry names the pull request with the given id or number.
    pub fn matches(&self, id: &str, number: u64) -> bool {
        match self {
            IgnoreEntry::Number(n) => *n == number,
            IgnoreEntry::Id(i) => i == id,
        }
    }
}

/// Settings injected into every validation step.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)] // Use default for missing fields
pub struct Config {
    /// Repository owner. Parsed from the git remote URL when unset.
    pub owner: Option<String>,
    /// Repository name. Parsed from the git remote URL when unset.
    pub repo: Option<String>,
    /// Git remote used for remote-tracking branches and URL parsing.
    pub remote: String,
    /// GitHub API base URL.
    pub api_url: String,
    /// Pull requests that are intentionally left on a "wrong" milestone.
    pub ignore_list: Vec<IgnoreEntry>,
    /// Milestone for PRs found in neither the release nor integration branch.
    pub fallback_milestone: String,
    /// Milestone for PRs found on the integration branch.
    pub next_milestone: String,
    /// Integration branch name.
    pub integration_branch: String,
    /// Explicit release branch. Auto-detected when unset.
    pub release_branch: Option<String>,
    /// Prefix used when auto-detecting the release branch.
    pub release_branch_prefix: String,
    /// Head branch prefix of cherry-pick pull requests.
    pub cherry_pick_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            owner: None,
            repo: None,
            remote: DEFAULT_REMOTE.into(),
            api_url: DEFAULT_API_URL.into(),
            ignore_list: vec![],
            fallback_milestone: DEFAULT_FALLBACK_MILESTONE.into(),
            next_milestone: DEFAULT_NEXT_MILESTONE.into(),
            integration_branch: DEFAULT_INTEGRATION_BRANCH.into(),
            release_branch: None,
            release_branch_prefix: DEFAULT_RELEASE_BRANCH_PREFIX.into(),
            cherry_pick_prefix: DEFAULT_CHERRY_PICK_PREFIX.into(),
        }
    }
}

impl Config {
    /// Whether the pull request is on the ignore list.
    pub fn is_ignored(&self, id: &str, number: u64) -> bool {
        self.ignore_list.iter().any(|e| e.matches(id, number))
    }
}

/// Load configuration from `path`, falling back to defaults when the file
/// does not exist.
pub fn load_config(path: &Path) -> Result<Config> {
    match fs::read_to_string(path) {
        Ok(content) => {
            debug!("loading configuration from {}", path.display());
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!(
                "no configuration found at {}: using default",
                path.display()
            );
            Ok(Config::default())
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.fallback_milestone, "v4.0.0");
        assert_eq!(config.next_milestone, "next-release");
        assert_eq!(config.integration_branch, "next");
        assert_eq!(config.release_branch_prefix, "release/");
        assert_eq!(config.remote, "origin");
        assert!(config.owner.is_none());
        assert!(config.ignore_list.is_empty());
    }

    #[test]
    fn parses_mixed_ignore_list() {
        let config: Config = toml::from_str(
            r#"
            owner = "acme"
            repo = "widgets"
            ignore_list = [1234, "PR_kwDOABCD"]
            fallback_milestone = "v5.0.0"
            "#,
        )
        .unwrap();

        assert_eq!(config.owner.as_deref(), Some("acme"));
        assert_eq!(config.repo.as_deref(), Some("widgets"));
        assert_eq!(config.fallback_milestone, "v5.0.0");
        assert_eq!(
            config.ignore_list,
            vec![
                IgnoreEntry::Number(1234),
                IgnoreEntry::Id("PR_kwDOABCD".into())
            ]
        );
    }

    #[test]
    fn is_ignored_matches_id_or_number() {
        let config = Config {
            ignore_list: vec![
                IgnoreEntry::Number(7),
                IgnoreEntry::Id("PR_abc".into()),
            ],
            ..Default::default()
        };

        assert!(config.is_ignored("PR_other", 7));
        assert!(config.is_ignored("PR_abc", 99));
        assert!(!config.is_ignored("PR_other", 8));
    }

    #[test]
    fn load_config_missing_file_returns_default() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = load_config(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.fallback_milestone, DEFAULT_FALLBACK_MILESTONE);
    }

    #[test]
    fn load_config_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"integration_branch = \"develop\"\n").unwrap();
        file.flush().unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.integration_branch, "develop");
        assert_eq!(config.next_milestone, DEFAULT_NEXT_MILESTONE);
    }

    #[test]
    fn load_config_rejects_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"ignore_list = [").unwrap();
        file.flush().unwrap();

        assert!(load_config(file.path()).is_err());
    }
}
