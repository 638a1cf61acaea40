/// A merged pull request attached to a milestone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequest {
    /// GraphQL node id.
    pub id: String,
    pub number: u64,
    pub title: String,
    pub url: String,
    /// First line of the merge commit message. Empty if GitHub reported no
    /// merge commit.
    pub merge_message: String,
    /// Title of the milestone the pull request is currently assigned to.
    pub milestone: String,
}

/// An open milestone and its merged pull requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Milestone {
    /// GraphQL node id.
    pub id: String,
    pub title: String,
    pub pull_requests: Vec<PullRequest>,
    /// More merged pull requests exist than fit in one page.
    pub has_more_pull_requests: bool,
}

/// An open cherry-pick pull request onto the integration branch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CherryPick {
    pub number: u64,
    pub title: String,
    pub head_branch: String,
    pub url: String,
}

#[derive(Debug, Clone)]
/// Request to list open cherry-pick pull requests.
pub struct CherryPickRequest {
    pub base_branch: String,
    pub head_prefix: String,
}

#[derive(Debug, Clone)]
/// Request to reassign a pull request to another milestone.
pub struct UpdateMilestoneRequest {
    pub pull_request_id: String,
    pub milestone_id: String,
}
