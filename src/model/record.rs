use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::issue::Issue;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    #[default]
    Pending,
    Success,
    Error,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub api_token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("api_token", &"<redacted>")
            .finish()
    }
}

/// The authenticated account as reported by the tracker's `myself` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(rename = "accountId")]
    pub account_id: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    #[serde(rename = "emailAddress")]
    pub email: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Board {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprint {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    /// Remaining attributes of the sprint record (dates, goal, board id).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// State threaded through every pipeline step.
///
/// Steps take the record by value and hand back the updated copy. `error` is
/// set exactly when `status` is [`RunStatus::Error`].
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowRecord {
    pub endpoint: String,
    pub credentials: Credentials,
    pub identity: Option<Identity>,
    pub sprints: Vec<Sprint>,
    pub issues: Vec<Issue>,
    pub error: Option<String>,
    pub status: RunStatus,
}

impl WorkflowRecord {
    pub fn new(endpoint: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            endpoint: endpoint.into(),
            credentials,
            identity: None,
            sprints: Vec::new(),
            issues: Vec::new(),
            error: None,
            status: RunStatus::Pending,
        }
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }

    pub fn is_failed(&self) -> bool {
        self.status == RunStatus::Error
    }

    pub fn succeed(&mut self) {
        self.status = RunStatus::Success;
        self.error = None;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = RunStatus::Error;
        self.error = Some(message.into());
    }
}

/// Tracker ids arrive as numbers from some endpoints and strings from others.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or numeric id, got {other}"
        ))),
    }
}
