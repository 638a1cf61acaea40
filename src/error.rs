//! Custom error types for milestone-warden.

use thiserror::Error;

/// Main error type for milestone validation and label checks.
#[derive(Error, Debug)]
pub enum WardenError {
    // Configuration errors
    #[error("Missing credential: set the {0} environment variable")]
    MissingToken(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid git remote URL: {0}")]
    InvalidRemoteUrl(String),

    #[error("Git URL parse error: {0}")]
    GitUrlError(#[from] git_url_parse::GitUrlParseError),

    // Precondition violations
    #[error(
        "Found {} open cherry-pick pull request(s) targeting '{branch}': {}: merge or close them before validating milestones",
        .numbers.len(),
        format_numbers(.numbers)
    )]
    OpenCherryPicks { branch: String, numbers: Vec<u64> },

    #[error(
        "Milestone '{milestone}' has more merged pull requests than a single page can hold: refusing to validate a partial list"
    )]
    PaginationOverflow { milestone: String },

    #[error(
        "More open pull requests target '{branch}' than a single page can hold: refusing to assume none are cherry-picks"
    )]
    CherryPickOverflow { branch: String },

    #[error("Operator declined to continue")]
    OperatorDeclined,

    // Label gate
    #[error(
        "Expected exactly one release label from [{}], found {}: [{}]",
        .allowed.join(", "),
        .found.len(),
        .found.join(", ")
    )]
    LabelCheck {
        allowed: Vec<String>,
        found: Vec<String>,
    },

    // Git errors
    #[error("Invalid release branch '{0}': last path segment must be a version")]
    InvalidReleaseBranch(String),

    #[error("No release branch found with prefix '{0}'")]
    ReleaseBranchNotFound(String),

    #[error("Branch '{0}' not found locally or on the configured remote")]
    BranchNotFound(String),

    #[error("Git operation failed: {0}")]
    GitError(#[from] git2::Error),

    // Forge errors
    #[error("Forge operation failed: {0}")]
    ForgeError(String),

    #[error("API rate limit exceeded")]
    RateLimitExceeded,

    // Parsing errors
    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

fn format_numbers(numbers: &[u64]) -> String {
    numbers
        .iter()
        .map(|n| format!("#{n}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias using WardenError
pub type Result<T> = std::result::Result<T, WardenError>;

impl WardenError {
    /// Create a forge error with context
    pub fn forge(msg: impl Into<String>) -> Self {
        Self::ForgeError(msg.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a pagination overflow error for the named milestone
    pub fn pagination_overflow(milestone: impl Into<String>) -> Self {
        Self::PaginationOverflow {
            milestone: milestone.into(),
        }
    }
}

// Implement From for octocrab errors (GitHub API)
impl From<octocrab::Error> for WardenError {
    fn from(err: octocrab::Error) -> Self {
        match &err {
            octocrab::Error::GitHub { source, .. }
                if source.message.contains("rate limit") =>
            {
                Self::RateLimitExceeded
            }
            _ => Self::ForgeError(format!("GitHub API error: {}", err)),
        }
    }
}
