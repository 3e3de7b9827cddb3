pub mod jira;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::issue::Issue;
use crate::model::record::{Board, Identity, Sprint};

#[derive(Debug, Error)]
pub enum TrackerError {
    /// The tracker answered with something other than 200 OK.
    #[error("{code} - {body}")]
    Status { code: u16, body: String },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl TrackerError {
    /// Human-readable message for the workflow record, e.g.
    /// `Failed to fetch boards: 401 - Unauthorized`.
    pub fn describe(&self, action: &str) -> String {
        match self {
            Self::Status { .. } => format!("Failed to {action}: {self}"),
            _ => format!("Exception occurred: {self}"),
        }
    }
}

/// Read-only view of the issue tracker used by the pipeline.
#[async_trait]
pub trait Tracker: Send + Sync {
    async fn current_user(&self) -> Result<Identity, TrackerError>;
    async fn boards(&self, project_key: &str) -> Result<Vec<Board>, TrackerError>;
    async fn sprints(&self, board_id: &str) -> Result<Vec<Sprint>, TrackerError>;
    /// Issues in a sprint, restricted to one issue type.
    async fn sprint_issues(
        &self,
        sprint_id: &str,
        issue_type: &str,
    ) -> Result<Vec<Issue>, TrackerError>;
}
