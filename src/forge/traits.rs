//! Traits related to the hosting API
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::{
    error::Result,
    forge::types::{
        CherryPick, CherryPickRequest, Milestone, UpdateMilestoneRequest,
    },
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Forge: Send + Sync {
    async fn open_cherry_picks(
        &self,
        req: CherryPickRequest,
    ) -> Result<Vec<CherryPick>>;
    async fn open_milestones(&self) -> Result<Vec<Milestone>>;
    async fn update_milestone(&self, req: UpdateMilestoneRequest) -> Result<()>;
}
