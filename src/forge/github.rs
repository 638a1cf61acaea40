//! Implements the Forge trait for Github
use async_trait::async_trait;
use log::*;
use octocrab::Octocrab;
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    error::{Result, WardenError},
    forge::{
        config::{
            CHERRY_PICK_PAGE_SIZE, MILESTONE_PAGE_SIZE, PULL_REQUEST_PAGE_SIZE,
            RemoteConfig,
        },
        graphql::{
            CHERRY_PICKS_QUERY, CherryPicksData, CherryPicksQueryVariables,
            GraphqlResponse, MILESTONES_QUERY, MilestonesData,
            MilestonesQueryVariables, UPDATE_MILESTONE_MUTATION,
            UpdateMilestoneData, UpdateMilestoneVariables,
        },
        traits::Forge,
        types::{
            CherryPick, CherryPickRequest, Milestone, UpdateMilestoneRequest,
        },
    },
};

/// GitHub forge implementation using Octocrab for GraphQL queries and
/// mutations.
pub struct Github {
    config: RemoteConfig,
    instance: Octocrab,
}

impl Github {
    /// Create GitHub client with personal access token authentication and API
    /// base URL configuration.
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let instance = Octocrab::builder()
            .personal_token(config.token.clone())
            .base_uri(config.api_url.clone())?
            .build()?;

        Ok(Self { config, instance })
    }

    async fn graphql<V, T>(&self, query: &str, variables: V) -> Result<T>
    where
        V: Serialize + Send + Sync,
        T: DeserializeOwned + Send + 'static,
    {
        let json = serde_json::json!({
          "query": query,
          "variables": variables,
        });

        let response: GraphqlResponse<T> = self.instance.graphql(&json).await?;

        response.into_data()
    }
}

#[async_trait]
impl Forge for Github {
    async fn open_cherry_picks(
        &self,
        req: CherryPickRequest,
    ) -> Result<Vec<CherryPick>> {
        debug!(
            "querying open pull requests targeting {} with head prefix {}",
            req.base_branch, req.head_prefix
        );

        let vars = CherryPicksQueryVariables {
            owner: self.config.owner.clone(),
            repo: self.config.repo.clone(),
            base: req.base_branch.clone(),
            first: CHERRY_PICK_PAGE_SIZE,
        };

        let data: CherryPicksData =
            self.graphql(CHERRY_PICKS_QUERY, vars).await?;

        data.into_cherry_picks(&req)
    }

    async fn open_milestones(&self) -> Result<Vec<Milestone>> {
        debug!(
            "querying open milestones for {}/{}",
            self.config.owner, self.config.repo
        );

        let vars = MilestonesQueryVariables {
            owner: self.config.owner.clone(),
            repo: self.config.repo.clone(),
            milestones: MILESTONE_PAGE_SIZE,
            pulls: PULL_REQUEST_PAGE_SIZE,
        };

        let data: MilestonesData = self.graphql(MILESTONES_QUERY, vars).await?;

        Ok(data.into_milestones())
    }

    async fn update_milestone(&self, req: UpdateMilestoneRequest) -> Result<()> {
        let vars = UpdateMilestoneVariables {
            pull_request_id: req.pull_request_id.clone(),
            milestone_id: req.milestone_id.clone(),
        };

        let data: UpdateMilestoneData =
            self.graphql(UPDATE_MILESTONE_MUTATION, vars).await?;

        let updated = data.update_pull_request.pull_request;

        match updated.milestone {
            Some(milestone) => {
                info!(
                    "pull request {} now assigned to milestone {}",
                    updated.id, milestone.title
                );
                Ok(())
            }
            None => Err(WardenError::forge(format!(
                "milestone update for pull request {} returned no milestone",
                req.pull_request_id
            ))),
        }
    }
}
