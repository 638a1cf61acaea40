//! CLI argument parsing.
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_FILE;

/// Keeps release milestones and release labels honest.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    /// Path to the configuration file. Defaults apply when it is absent.
    pub config: PathBuf,

    #[arg(long, default_value = ".", global = true)]
    /// Path to the local clone used to read branch history.
    pub repo_path: PathBuf,

    #[arg(long, default_value_t = false, global = true)]
    /// Enable debug logging.
    pub debug: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check merged pull requests against their expected milestone and fix
    /// mismatches. Requires GITHUB_TOKEN.
    ValidateMilestones {
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        /// Ask before fixing each mismatch. Pass `--prompt false` to fix
        /// every mismatch without asking.
        prompt: bool,

        #[arg(long)]
        /// Release branch to validate against, e.g. release/minor/v3.5.0.
        /// Detected from branch names when omitted.
        release_branch: Option<String>,
    },

    /// Require exactly one release label on a pull request.
    CheckLabels {
        #[arg(long, value_delimiter = ',', num_args = 0..)]
        /// Labels attached to the pull request, comma separated.
        labels: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_milestones_prompts_by_default() {
        let args =
            Args::try_parse_from(["milestone-warden", "validate-milestones"])
                .unwrap();

        assert!(!args.debug);
        assert_eq!(args.config, PathBuf::from(DEFAULT_CONFIG_FILE));
        assert!(matches!(
            args.command,
            Command::ValidateMilestones {
                prompt: true,
                release_branch: None
            }
        ));
    }

    #[test]
    fn validate_milestones_prompt_can_be_disabled() {
        let args = Args::try_parse_from([
            "milestone-warden",
            "validate-milestones",
            "--prompt",
            "false",
            "--release-branch",
            "release/minor/v3.5.0",
        ])
        .unwrap();

        match args.command {
            Command::ValidateMilestones {
                prompt,
                release_branch,
            } => {
                assert!(!prompt);
                assert_eq!(
                    release_branch.as_deref(),
                    Some("release/minor/v3.5.0")
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn check_labels_splits_on_commas() {
        let args = Args::try_parse_from([
            "milestone-warden",
            "check-labels",
            "--labels",
            "bug,release:fix",
        ])
        .unwrap();

        match args.command {
            Command::CheckLabels { labels } => {
                assert_eq!(labels, vec!["bug", "release:fix"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn check_labels_accepts_no_labels() {
        let args =
            Args::try_parse_from(["milestone-warden", "check-labels"]).unwrap();

        match args.command {
            Command::CheckLabels { labels } => assert!(labels.is_empty()),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
