//! Per pull request milestone reconciliation.
//!
//! Each candidate runs through a small state machine:
//!
//! ```text
//! Comparing ──match──────────────────────────────▶ Done(Matched)
//!     │ mismatch    └──expected not open──────────▶ Done(Unresolvable)
//!     ▼
//! AwaitingOperator ──open──▶ AwaitingOperator
//!     │ affirm                │ skip
//!     ▼                       ▼
//! Mutating ──▶ Done(Fixed)   Done(Skipped)
//! ```
//!
//! With prompting disabled every mismatch is affirmed. Fixes are applied one
//! pull request at a time and are not rolled back if a later one fails.
use derive_builder::Builder;
use log::*;
use std::{collections::HashMap, sync::Arc};

use crate::{
    classify::Classification,
    error::{Result, WardenError},
    forge::{
        traits::Forge,
        types::{PullRequest, UpdateMilestoneRequest},
    },
};

pub mod operator;

use operator::{Browser, OperatorResponse, Prompter};

/// A pull request paired with the milestone it should carry.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub pull_request: PullRequest,
    pub classification: Classification,
}

impl Candidate {
    pub fn expected(&self) -> &str {
        self.classification.milestone()
    }

    pub fn actual(&self) -> &str {
        &self.pull_request.milestone
    }

    pub fn is_match(&self) -> bool {
        self.expected() == self.actual()
    }
}

/// Terminal result of reconciling one pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Milestone was already correct.
    Matched,
    /// Milestone was corrected remotely.
    Fixed,
    /// Operator declined the fix.
    Skipped,
    /// Expected milestone is not an open milestone, nothing to assign.
    Unresolvable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileState {
    Comparing,
    AwaitingOperator,
    Mutating,
    Done(Outcome),
}

/// Tally of outcomes across a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub matched: usize,
    pub fixed: usize,
    pub skipped: usize,
    pub unresolvable: usize,
}

impl Summary {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Matched => self.matched += 1,
            Outcome::Fixed => self.fixed += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::Unresolvable => self.unresolvable += 1,
        }
    }
}

/// Everything a reconciliation step needs, passed explicitly.
#[derive(Builder)]
#[builder(setter(into), build_fn(private, name = "_build"))]
pub struct ReconcileParams {
    /// Ask the operator before fixing. When false, fixes are applied.
    pub prompt: bool,
    pub forge: Arc<dyn Forge>,
    /// Open milestone title to node id.
    pub milestone_ids: Arc<HashMap<String, String>>,
    pub prompter: Arc<dyn Prompter>,
    pub browser: Arc<dyn Browser>,
}

impl ReconcileParamsBuilder {
    pub fn build(&self) -> Result<Reconciler> {
        let params = self._build().map_err(|e| {
            WardenError::invalid_config(format!(
                "Failed to build reconciler: {}",
                e
            ))
        })?;

        Ok(Reconciler { params })
    }
}

pub struct Reconciler {
    params: ReconcileParams,
}

impl Reconciler {
    /// Log the candidate's identity, expected and actual milestone, and
    /// status.
    pub fn report(&self, candidate: &Candidate) {
        let pr = &candidate.pull_request;
        if candidate.is_match() {
            info!(
                "{} #{} {} | expected: {} | actual: {} | ok",
                pr.id,
                pr.number,
                pr.title,
                candidate.expected(),
                candidate.actual()
            );
        } else {
            error!(
                "{} #{} {} | expected: {} | actual: {} | error",
                pr.id,
                pr.number,
                pr.title,
                candidate.expected(),
                candidate.actual()
            );
        }
    }

    /// Drive one candidate to a terminal state.
    pub async fn reconcile(&self, candidate: &Candidate) -> Result<Outcome> {
        self.report(candidate);

        let mut state = ReconcileState::Comparing;

        loop {
            state = match state {
                ReconcileState::Comparing => {
                    if candidate.is_match() {
                        ReconcileState::Done(Outcome::Matched)
                    } else if self.milestone_id(candidate).is_none() {
                        error!(
                            "no open milestone titled {}: cannot reassign #{}",
                            candidate.expected(),
                            candidate.pull_request.number
                        );
                        ReconcileState::Done(Outcome::Unresolvable)
                    } else {
                        ReconcileState::AwaitingOperator
                    }
                }
                ReconcileState::AwaitingOperator => {
                    match self.operator_response(candidate)? {
                        OperatorResponse::Open => {
                            self.params.browser.open(&candidate.pull_request.url);
                            ReconcileState::AwaitingOperator
                        }
                        OperatorResponse::Affirm => ReconcileState::Mutating,
                        OperatorResponse::Skip => {
                            info!(
                                "skipping #{}",
                                candidate.pull_request.number
                            );
                            ReconcileState::Done(Outcome::Skipped)
                        }
                    }
                }
                ReconcileState::Mutating => self.mutate(candidate).await?,
                ReconcileState::Done(outcome) => return Ok(outcome),
            };
        }
    }

    fn milestone_id(&self, candidate: &Candidate) -> Option<&String> {
        self.params.milestone_ids.get(candidate.expected())
    }

    fn operator_response(
        &self,
        candidate: &Candidate,
    ) -> Result<OperatorResponse> {
        if !self.params.prompt {
            return Ok(OperatorResponse::Affirm);
        }

        let question = format!(
            "Move #{} from {} to {}? [Y/n/o(pen)] ",
            candidate.pull_request.number,
            candidate.actual(),
            candidate.expected()
        );

        let answer = self.params.prompter.ask(&question)?;

        Ok(OperatorResponse::parse(&answer))
    }

    async fn mutate(&self, candidate: &Candidate) -> Result<ReconcileState> {
        let expected = candidate.expected();

        let Some(milestone_id) = self.milestone_id(candidate) else {
            return Ok(ReconcileState::Done(Outcome::Unresolvable));
        };

        debug!(
            "assigning {} to milestone {expected} ({milestone_id})",
            candidate.pull_request.id
        );

        self.params
            .forge
            .update_milestone(UpdateMilestoneRequest {
                pull_request_id: candidate.pull_request.id.clone(),
                milestone_id: milestone_id.clone(),
            })
            .await?;

        Ok(ReconcileState::Done(Outcome::Fixed))
    }
}
