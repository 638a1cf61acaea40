//! Configuration for the GitHub connection.
use git_url_parse::GitUrl;
use secrecy::SecretString;
use std::env;

use crate::{
    config::Config,
    error::{Result, WardenError},
};

/// Environment variable holding the GitHub API token.
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";
/// Maximum number of open milestones fetched.
pub const MILESTONE_PAGE_SIZE: u8 = 10;
/// Maximum number of merged pull requests fetched per milestone.
pub const PULL_REQUEST_PAGE_SIZE: u8 = 100;
/// Maximum number of open pull requests inspected for cherry-picks.
pub const CHERRY_PICK_PAGE_SIZE: u8 = 100;

/// Remote repository connection configuration.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// GitHub API base URL.
    pub api_url: String,
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Access token for authentication.
    pub token: SecretString,
}

/// Read the API token from the environment, failing fast when it is absent
/// or empty.
pub fn token_from_env() -> Result<SecretString> {
    token_from(env::var(TOKEN_ENV_VAR).ok())
}

/// Accept a token value only when it is present and not blank.
pub fn token_from(value: Option<String>) -> Result<SecretString> {
    match value {
        Some(token) if !token.trim().is_empty() => Ok(SecretString::from(token)),
        _ => Err(WardenError::MissingToken(TOKEN_ENV_VAR.into())),
    }
}

/// Parse repository owner and name from a git remote URL.
pub fn parse_remote_url(url: &str) -> Result<(String, String)> {
    let parsed = GitUrl::parse(url)?;

    let owner = parsed.owner.ok_or_else(|| {
        WardenError::InvalidRemoteUrl(format!(
            "unable to parse owner from remote url: {url}"
        ))
    })?;

    if parsed.name.is_empty() {
        return Err(WardenError::InvalidRemoteUrl(format!(
            "unable to parse repository name from remote url: {url}"
        )));
    }

    Ok((owner, parsed.name))
}

impl RemoteConfig {
    /// Build the connection settings. Owner and repository come from the
    /// configuration file when set and from the git remote URL otherwise.
    pub fn resolve(
        config: &Config,
        remote_url: Option<&str>,
        token: SecretString,
    ) -> Result<Self> {
        let (owner, repo) = match (&config.owner, &config.repo) {
            (Some(owner), Some(repo)) => (owner.clone(), repo.clone()),
            (owner, repo) => {
                let url = remote_url.ok_or_else(|| {
                    WardenError::invalid_config(format!(
                        "owner and repo are not configured and remote '{}' has no url",
                        config.remote
                    ))
                })?;
                let (parsed_owner, parsed_repo) = parse_remote_url(url)?;
                (
                    owner.clone().unwrap_or(parsed_owner),
                    repo.clone().unwrap_or(parsed_repo),
                )
            }
        };

        Ok(Self {
            api_url: config.api_url.trim_end_matches('/').to_string(),
            owner,
            repo,
            token,
        })
    }
}
