//! Operator-facing side effects: terminal prompts and opening URLs.
use log::*;
use std::{
    io::{self, BufRead, Write},
    process::Command,
};

#[cfg(test)]
use mockall::automock;

use crate::error::Result;

/// Asks the operator a question and returns the raw answer.
#[cfg_attr(test, automock)]
pub trait Prompter: Send + Sync {
    fn ask(&self, question: &str) -> Result<String>;
}

/// Opens a URL for the operator. Best effort: failures are logged only.
#[cfg_attr(test, automock)]
pub trait Browser: Send + Sync {
    fn open(&self, url: &str);
}

/// Prompts on stdout and reads a single line from stdin.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn ask(&self, question: &str) -> Result<String> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{question}")?;
        stdout.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;

        Ok(answer.trim().to_string())
    }
}

/// Opens URLs with the platform's default handler.
pub struct SystemBrowser;

impl SystemBrowser {
    #[cfg(target_os = "macos")]
    fn command(url: &str) -> Command {
        let mut cmd = Command::new("open");
        cmd.arg(url);
        cmd
    }

    #[cfg(target_os = "windows")]
    fn command(url: &str) -> Command {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", "", url]);
        cmd
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    fn command(url: &str) -> Command {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(url);
        cmd
    }
}

impl Browser for SystemBrowser {
    fn open(&self, url: &str) {
        debug!("opening {url} in browser");
        if let Err(err) = Self::command(url).spawn() {
            warn!("failed to open {url}: {err}");
        }
    }
}

/// Operator answer to a milestone mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorResponse {
    /// Open the pull request and ask again.
    Open,
    /// Apply the milestone fix. Also the default for an empty answer.
    Affirm,
    /// Leave the pull request as is.
    Skip,
}

impl OperatorResponse {
    pub fn parse(answer: &str) -> Self {
        match answer.trim().to_lowercase().as_str() {
            "o" | "open" => OperatorResponse::Open,
            "" | "y" | "yes" => OperatorResponse::Affirm,
            _ => OperatorResponse::Skip,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_open() {
        assert_eq!(OperatorResponse::parse("o"), OperatorResponse::Open);
        assert_eq!(OperatorResponse::parse("Open"), OperatorResponse::Open);
    }

    #[test]
    fn empty_answer_defaults_to_affirm() {
        assert_eq!(OperatorResponse::parse(""), OperatorResponse::Affirm);
        assert_eq!(OperatorResponse::parse("  \n"), OperatorResponse::Affirm);
        assert_eq!(OperatorResponse::parse("Y"), OperatorResponse::Affirm);
        assert_eq!(OperatorResponse::parse("yes"), OperatorResponse::Affirm);
    }

    #[test]
    fn anything_else_skips() {
        assert_eq!(OperatorResponse::parse("n"), OperatorResponse::Skip);
        assert_eq!(OperatorResponse::parse("nope"), OperatorResponse::Skip);
        assert_eq!(OperatorResponse::parse("yy"), OperatorResponse::Skip);
    }
}
