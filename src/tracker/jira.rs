use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::{Tracker, TrackerError};
use crate::model::issue::Issue;
use crate::model::record::{Board, Credentials, Identity, Sprint};

const AGILE_API: &str = "rest/agile/1.0";

/// Ceiling the Agile API enforces on a single page.
const MAX_RESULTS: u32 = 1000;

const ISSUE_FIELDS: &str =
    "summary,description,status,assignee,created,updated,priority,issuetype,project,sprint";

pub struct JiraClient {
    base_url: String,
    auth_header: String,
    client: reqwest::Client,
}

impl JiraClient {
    pub fn new(
        endpoint: &str,
        credentials: &Credentials,
        timeout: Duration,
    ) -> Result<Self, TrackerError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(endpoint, credentials, client))
    }

    fn with_client(endpoint: &str, credentials: &Credentials, client: reqwest::Client) -> Self {
        let creds = format!("{}:{}", credentials.email, credentials.api_token);
        let encoded = base64::engine::general_purpose::STANDARD.encode(creds);
        Self {
            base_url: endpoint.trim_end_matches('/').to_string(),
            auth_header: format!("Basic {encoded}"),
            client,
        }
    }

    fn myself_url(&self) -> String {
        format!("{}/rest/api/3/myself", self.base_url)
    }

    fn boards_url(&self, project_key: &str) -> String {
        format!(
            "{}/{AGILE_API}/board?projectKeyOrId={}",
            self.base_url,
            urlencoding::encode(project_key)
        )
    }

    fn sprints_url(&self, board_id: &str) -> String {
        format!(
            "{}/{AGILE_API}/board/{}/sprint",
            self.base_url,
            urlencoding::encode(board_id)
        )
    }

    fn sprint_issues_url(&self, sprint_id: &str, issue_type: &str) -> String {
        let jql = format!("issuetype = '{issue_type}'");
        format!(
            "{}/{AGILE_API}/sprint/{}/issue?maxResults={MAX_RESULTS}&fields={ISSUE_FIELDS}&jql={}",
            self.base_url,
            urlencoding::encode(sprint_id),
            urlencoding::encode(&jql)
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, TrackerError> {
        let resp = self
            .client
            .get(url)
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = resp.status();
        debug!(%url, status = status.as_u16(), "Jira response");

        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            return Err(TrackerError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[derive(Deserialize)]
struct ValuesPage<T> {
    #[serde(default = "Vec::new")]
    values: Vec<T>,
}

#[derive(Deserialize)]
struct IssuePage {
    #[serde(default)]
    issues: Vec<Issue>,
}

#[async_trait]
impl Tracker for JiraClient {
    async fn current_user(&self) -> Result<Identity, TrackerError> {
        self.get_json(&self.myself_url()).await
    }

    async fn boards(&self, project_key: &str) -> Result<Vec<Board>, TrackerError> {
        let page: ValuesPage<Board> = self.get_json(&self.boards_url(project_key)).await?;
        Ok(page.values)
    }

    async fn sprints(&self, board_id: &str) -> Result<Vec<Sprint>, TrackerError> {
        let page: ValuesPage<Sprint> = self.get_json(&self.sprints_url(board_id)).await?;
        Ok(page.values)
    }

    async fn sprint_issues(
        &self,
        sprint_id: &str,
        issue_type: &str,
    ) -> Result<Vec<Issue>, TrackerError> {
        let page: IssuePage = self
            .get_json(&self.sprint_issues_url(sprint_id, issue_type))
            .await?;
        Ok(page.issues)
    }
}
