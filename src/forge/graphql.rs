use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, WardenError},
    forge::types::{CherryPick, CherryPickRequest, Milestone, PullRequest},
};

pub const CHERRY_PICKS_QUERY: &str = r#"
query GetOpenCherryPicks($owner: String!, $repo: String!, $base: String!, $first: Int!) {
  repository(owner: $owner, name: $repo) {
    pullRequests(states: OPEN, baseRefName: $base, first: $first) {
      pageInfo {
        hasNextPage
        endCursor
      }
      nodes {
        number
        title
        headRefName
        url
      }
    }
  }
}"#;

pub const MILESTONES_QUERY: &str = r#"
query GetOpenMilestones($owner: String!, $repo: String!, $milestones: Int!, $pulls: Int!) {
  repository(owner: $owner, name: $repo) {
    milestones(first: $milestones, states: OPEN) {
      nodes {
        id
        title
        pullRequests(first: $pulls, states: MERGED) {
          pageInfo {
            hasNextPage
            endCursor
          }
          nodes {
            id
            number
            title
            url
            mergeCommit {
              messageHeadline
            }
          }
        }
      }
    }
  }
}"#;

pub const UPDATE_MILESTONE_MUTATION: &str = r#"
mutation UpdatePullRequestMilestone($pullRequestId: ID!, $milestoneId: ID!) {
  updatePullRequest(input: { pullRequestId: $pullRequestId, milestoneId: $milestoneId }) {
    pullRequest {
      id
      milestone {
        title
      }
    }
  }
}"#;

#[derive(Debug, Deserialize)]
pub struct GraphqlError {
    pub message: String,
}

/// Top level GraphQL envelope. GitHub answers query errors with `200 OK`
/// and an `errors` array, so `data` may be absent.
#[derive(Debug, Deserialize)]
pub struct GraphqlResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphqlError>>,
}

impl<T> GraphqlResponse<T> {
    /// Extract `data`, converting reported errors into a forge error.
    pub fn into_data(self) -> Result<T> {
        if let Some(errors) = self.errors
            && !errors.is_empty()
        {
            let messages = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(WardenError::forge(format!("GraphQL error: {messages}")));
        }

        self.data
            .ok_or_else(|| WardenError::forge("GraphQL response had no data"))
    }
}

#[derive(Debug, Deserialize)]
pub struct PageInfo {
    #[serde(rename = "endCursor")]
    pub end_cursor: Option<String>,
    #[serde(rename = "hasNextPage")]
    pub has_next_page: bool,
}

#[derive(Debug, Serialize)]
pub struct CherryPicksQueryVariables {
    pub owner: String,
    pub repo: String,
    pub base: String,
    pub first: u8,
}

#[derive(Debug, Deserialize)]
pub struct CherryPickNode {
    pub number: u64,
    pub title: String,
    #[serde(rename = "headRefName")]
    pub head_ref_name: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct CherryPickConnection {
    #[serde(rename = "pageInfo")]
    pub page_info: PageInfo,
    pub nodes: Vec<CherryPickNode>,
}

#[derive(Debug, Deserialize)]
pub struct CherryPicksRepository {
    #[serde(rename = "pullRequests")]
    pub pull_requests: CherryPickConnection,
}

#[derive(Debug, Deserialize)]
pub struct CherryPicksData {
    pub repository: CherryPicksRepository,
}

impl CherryPicksData {
    /// Keep only pull requests whose head branch marks them as cherry-picks.
    ///
    /// Filtering happens client side, so a truncated page cannot prove the
    /// absence of cherry-picks and is rejected.
    pub fn into_cherry_picks(
        self,
        req: &CherryPickRequest,
    ) -> Result<Vec<CherryPick>> {
        let connection = self.repository.pull_requests;

        if connection.page_info.has_next_page {
            return Err(WardenError::CherryPickOverflow {
                branch: req.base_branch.clone(),
            });
        }

        Ok(connection
            .nodes
            .into_iter()
            .filter(|n| n.head_ref_name.starts_with(&req.head_prefix))
            .map(|n| CherryPick {
                number: n.number,
                title: n.title,
                head_branch: n.head_ref_name,
                url: n.url,
            })
            .collect())
    }
}

#[derive(Debug, Serialize)]
pub struct MilestonesQueryVariables {
    pub owner: String,
    pub repo: String,
    pub milestones: u8,
    pub pulls: u8,
}

#[derive(Debug, Deserialize)]
pub struct MergeCommit {
    #[serde(rename = "messageHeadline")]
    pub message_headline: String,
}

#[derive(Debug, Deserialize)]
pub struct MilestonePullRequestNode {
    pub id: String,
    pub number: u64,
    pub title: String,
    pub url: String,
    #[serde(rename = "mergeCommit")]
    pub merge_commit: Option<MergeCommit>,
}

#[derive(Debug, Deserialize)]
pub struct MilestonePullRequests {
    #[serde(rename = "pageInfo")]
    pub page_info: PageInfo,
    pub nodes: Vec<MilestonePullRequestNode>,
}

#[derive(Debug, Deserialize)]
pub struct MilestoneNode {
    pub id: String,
    pub title: String,
    #[serde(rename = "pullRequests")]
    pub pull_requests: MilestonePullRequests,
}

#[derive(Debug, Deserialize)]
pub struct MilestoneConnection {
    pub nodes: Vec<MilestoneNode>,
}

#[derive(Debug, Deserialize)]
pub struct MilestonesRepository {
    pub milestones: MilestoneConnection,
}

#[derive(Debug, Deserialize)]
pub struct MilestonesData {
    pub repository: MilestonesRepository,
}

impl MilestonesData {
    pub fn into_milestones(self) -> Vec<Milestone> {
        self.repository
            .milestones
            .nodes
            .into_iter()
            .map(|m| {
                let title = m.title;
                let pull_requests = m
                    .pull_requests
                    .nodes
                    .into_iter()
                    .map(|pr| PullRequest {
                        id: pr.id,
                        number: pr.number,
                        title: pr.title,
                        url: pr.url,
                        merge_message: pr
                            .merge_commit
                            .map(|c| c.message_headline)
                            .unwrap_or_default(),
                        milestone: title.clone(),
                    })
                    .collect();

                Milestone {
                    id: m.id,
                    title,
                    pull_requests,
                    has_more_pull_requests: m
                        .pull_requests
                        .page_info
                        .has_next_page,
                }
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateMilestoneVariables {
    #[serde(rename = "pullRequestId")]
    pub pull_request_id: String,
    #[serde(rename = "milestoneId")]
    pub milestone_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatedMilestone {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatedPullRequest {
    pub id: String,
    pub milestone: Option<UpdatedMilestone>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePullRequestPayload {
    #[serde(rename = "pullRequest")]
    pub pull_request: UpdatedPullRequest,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMilestoneData {
    #[serde(rename = "updatePullRequest")]
    pub update_pull_request: UpdatePullRequestPayload,
}

#[cfg(test)]
mod tests {
    use super::*;

    const MILESTONES_RESPONSE: &str = r#"{
      "data": {
        "repository": {
          "milestones": {
            "nodes": [
              {
                "id": "MI_350",
                "title": "v3.5.0",
                "pullRequests": {
                  "pageInfo": { "hasNextPage": false, "endCursor": "Y3Vy" },
                  "nodes": [
                    {
                      "id": "PR_1",
                      "number": 101,
                      "title": "Fix the widget",
                      "url": "https://github.com/acme/widgets/pull/101",
                      "mergeCommit": { "messageHeadline": "fix: the widget (#101)" }
                    },
                    {
                      "id": "PR_2",
                      "number": 102,
                      "title": "Odd one",
                      "url": "https://github.com/acme/widgets/pull/102",
                      "mergeCommit": null
                    }
                  ]
                }
              },
              {
                "id": "MI_chore",
                "title": "chore",
                "pullRequests": {
                  "pageInfo": { "hasNextPage": true, "endCursor": null },
                  "nodes": []
                }
              }
            ]
          }
        }
      }
    }"#;

    #[test]
    fn milestones_response_normalizes() {
        let response: GraphqlResponse<MilestonesData> =
            serde_json::from_str(MILESTONES_RESPONSE).unwrap();
        let milestones = response.into_data().unwrap().into_milestones();

        assert_eq!(milestones.len(), 2);

        let first = &milestones[0];
        assert_eq!(first.id, "MI_350");
        assert!(!first.has_more_pull_requests);
        assert_eq!(first.pull_requests.len(), 2);
        assert_eq!(first.pull_requests[0].merge_message, "fix: the widget (#101)");
        assert_eq!(first.pull_requests[0].milestone, "v3.5.0");
        assert_eq!(first.pull_requests[1].merge_message, "");

        assert!(milestones[1].has_more_pull_requests);
    }

    fn cherry_pick_request() -> CherryPickRequest {
        CherryPickRequest {
            base_branch: "next".into(),
            head_prefix: "cherry-pick".into(),
        }
    }

    #[test]
    fn cherry_picks_filtered_by_head_prefix() {
        let response: GraphqlResponse<CherryPicksData> = serde_json::from_str(
            r#"{
              "data": {
                "repository": {
                  "pullRequests": {
                    "pageInfo": { "hasNextPage": false, "endCursor": "Y3Vy" },
                    "nodes": [
                      { "number": 5, "title": "cp", "headRefName": "cherry-pick-101", "url": "u5" },
                      { "number": 6, "title": "feature", "headRefName": "feat/thing", "url": "u6" }
                    ]
                  }
                }
              }
            }"#,
        )
        .unwrap();

        let picks = response
            .into_data()
            .unwrap()
            .into_cherry_picks(&cherry_pick_request())
            .unwrap();
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].number, 5);
        assert_eq!(picks[0].head_branch, "cherry-pick-101");
    }

    #[test]
    fn truncated_cherry_pick_page_is_rejected() {
        assert!(CHERRY_PICKS_QUERY.contains("hasNextPage"));

        let nodes = (1..=100)
            .map(|n| {
                serde_json::json!({
                    "number": n,
                    "title": format!("feature {n}"),
                    "headRefName": format!("feat/{n}"),
                    "url": format!("u{n}"),
                })
            })
            .collect::<Vec<_>>();
        let body = serde_json::json!({
            "data": {
                "repository": {
                    "pullRequests": {
                        "pageInfo": { "hasNextPage": true, "endCursor": "Y3Vy" },
                        "nodes": nodes,
                    }
                }
            }
        });

        let response: GraphqlResponse<CherryPicksData> =
            serde_json::from_value(body).unwrap();
        let err = response
            .into_data()
            .unwrap()
            .into_cherry_picks(&cherry_pick_request())
            .unwrap_err();

        assert!(matches!(
            err,
            WardenError::CherryPickOverflow { ref branch } if branch == "next"
        ));
    }

    #[test]
    fn graphql_errors_become_forge_errors() {
        let response: GraphqlResponse<MilestonesData> = serde_json::from_str(
            r#"{ "data": null, "errors": [{ "message": "Could not resolve to a Repository" }] }"#,
        )
        .unwrap();

        let err = response.into_data().unwrap_err();
        assert!(matches!(err, WardenError::ForgeError(ref m) if m.contains("Could not resolve")));
    }

    #[test]
    fn missing_data_is_an_error() {
        let response: GraphqlResponse<MilestonesData> =
            serde_json::from_str(r#"{}"#).unwrap();
        assert!(response.into_data().is_err());
    }

    #[test]
    fn update_variables_use_graphql_names() {
        let vars = UpdateMilestoneVariables {
            pull_request_id: "PR_1".into(),
            milestone_id: "MI_350".into(),
        };
        let json = serde_json::to_value(&vars).unwrap();
        assert_eq!(json["pullRequestId"], "PR_1");
        assert_eq!(json["milestoneId"], "MI_350");
    }
}
