//! Implements the validate-milestones command
use log::*;
use std::{collections::HashMap, sync::Arc};

use crate::{
    classify::{Classifier, ReleaseBranch},
    cli::Args,
    config::{CHORE_MILESTONE, Config, load_config},
    error::{Result, WardenError},
    forge::{
        config::{RemoteConfig, token_from_env},
        github::Github,
        traits::Forge,
        types::{CherryPickRequest, Milestone},
    },
    reconcile::{
        Candidate, ReconcileParamsBuilder, Summary,
        operator::{
            Browser, OperatorResponse, Prompter, SystemBrowser,
            TerminalPrompter,
        },
    },
    repo::Repository,
};

/// Wire up the real GitHub client, terminal and local repository, then
/// validate.
pub async fn execute(
    args: &Args,
    prompt: bool,
    release_branch: Option<String>,
) -> crate::result::Result<()> {
    let token = token_from_env()?;
    let config = load_config(&args.config)?;
    let repo = Repository::open(&args.repo_path, &config.remote)?;
    let remote_url = repo.remote_url()?;
    let remote_config =
        RemoteConfig::resolve(&config, remote_url.as_deref(), token)?;

    info!(
        "validating milestones for {}/{}",
        remote_config.owner, remote_config.repo
    );

    let forge: Arc<dyn Forge> = Arc::new(Github::new(remote_config)?);
    let prompter: Arc<dyn Prompter> = Arc::new(TerminalPrompter);
    let browser: Arc<dyn Browser> = Arc::new(SystemBrowser);

    let explicit_branch = release_branch.or_else(|| config.release_branch.clone());

    let summary = validate(
        &config,
        Validation {
            prompt,
            forge,
            prompter,
            browser,
        },
        || {
            let release = ReleaseBranch::resolve(
                explicit_branch.as_deref(),
                &repo,
                &config.release_branch_prefix,
            )?;
            Classifier::from_repository(&repo, &release, &config)
        },
    )
    .await?;

    info!(
        "done: {} ok, {} fixed, {} skipped, {} unresolvable",
        summary.matched, summary.fixed, summary.skipped, summary.unresolvable
    );

    Ok(())
}

/// External collaborators for one validation run.
pub struct Validation {
    pub prompt: bool,
    pub forge: Arc<dyn Forge>,
    pub prompter: Arc<dyn Prompter>,
    pub browser: Arc<dyn Browser>,
}

/// Run the guards, classify every candidate and reconcile mismatches.
///
/// The classifier is built only after both guards pass.
pub async fn validate<F>(
    config: &Config,
    validation: Validation,
    build_classifier: F,
) -> Result<Summary>
where
    F: FnOnce() -> Result<Classifier>,
{
    ensure_no_cherry_picks(validation.forge.as_ref(), config).await?;

    let milestones = fetch_milestones(validation.forge.as_ref()).await?;

    let classifier = build_classifier()?;

    let candidates = collect_candidates(&milestones, config, &classifier);

    if validation.prompt {
        confirm_continue(validation.prompter.as_ref(), &candidates)?;
    }

    let reconciler = ReconcileParamsBuilder::default()
        .prompt(validation.prompt)
        .forge(validation.forge)
        .milestone_ids(milestone_ids(&milestones))
        .prompter(validation.prompter)
        .browser(validation.browser)
        .build()?;

    let mut summary = Summary::default();

    for candidate in candidates.iter() {
        let outcome = reconciler.reconcile(candidate).await?;
        summary.record(outcome);
    }

    Ok(summary)
}

/// Refuse to run while cherry-picks onto the integration branch are open.
pub async fn ensure_no_cherry_picks(
    forge: &dyn Forge,
    config: &Config,
) -> Result<()> {
    let picks = forge
        .open_cherry_picks(CherryPickRequest {
            base_branch: config.integration_branch.clone(),
            head_prefix: config.cherry_pick_prefix.clone(),
        })
        .await?;

    if picks.is_empty() {
        debug!("no open cherry-pick pull requests");
        return Ok(());
    }

    for pick in picks.iter() {
        error!(
            "open cherry-pick #{} {} ({}): {}",
            pick.number, pick.title, pick.head_branch, pick.url
        );
    }

    Err(WardenError::OpenCherryPicks {
        branch: config.integration_branch.clone(),
        numbers: picks.iter().map(|p| p.number).collect(),
    })
}

/// Fetch open milestones, refusing any whose pull request list is
/// truncated.
pub async fn fetch_milestones(forge: &dyn Forge) -> Result<Vec<Milestone>> {
    let milestones = forge.open_milestones().await?;

    if let Some(truncated) =
        milestones.iter().find(|m| m.has_more_pull_requests)
    {
        return Err(WardenError::pagination_overflow(&truncated.title));
    }

    info!("fetched {} open milestones", milestones.len());

    Ok(milestones)
}

/// Milestone title to node id for every fetched milestone.
pub fn milestone_ids(milestones: &[Milestone]) -> HashMap<String, String> {
    milestones
        .iter()
        .map(|m| (m.title.clone(), m.id.clone()))
        .collect()
}

/// Classify every merged pull request outside the chore milestone and the
/// ignore list, in milestone then list order.
pub fn collect_candidates(
    milestones: &[Milestone],
    config: &Config,
    classifier: &Classifier,
) -> Vec<Candidate> {
    milestones
        .iter()
        .filter(|m| m.title != CHORE_MILESTONE)
        .flat_map(|m| m.pull_requests.iter())
        .filter(|pr| {
            let ignored = config.is_ignored(&pr.id, pr.number);
            if ignored {
                debug!("ignoring #{} ({})", pr.number, pr.id);
            }
            !ignored
        })
        .map(|pr| Candidate {
            pull_request: pr.clone(),
            classification: classifier.classify(&pr.merge_message),
        })
        .collect()
}

/// Ask once before reconciling when any candidate is mismatched.
fn confirm_continue(
    prompter: &dyn Prompter,
    candidates: &[Candidate],
) -> Result<()> {
    let mismatched = candidates.iter().filter(|c| !c.is_match()).count();

    if mismatched == 0 {
        return Ok(());
    }

    let question = format!(
        "{mismatched} of {} pull requests have the wrong milestone. Continue? [Y/n] ",
        candidates.len()
    );

    match OperatorResponse::parse(&prompter.ask(&question)?) {
        OperatorResponse::Affirm => Ok(()),
        _ => Err(WardenError::OperatorDeclined),
    }
}
