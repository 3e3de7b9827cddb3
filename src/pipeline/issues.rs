use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info};

use super::Step;
use crate::model::issue::Issue;
use crate::model::record::{Sprint, WorkflowRecord};
use crate::tracker::Tracker;

/// Fetches the issues of the configured sprint.
pub struct IssueFetch {
    tracker: Arc<dyn Tracker>,
    sprint_name: String,
    issue_type: String,
}

impl IssueFetch {
    pub fn new(tracker: Arc<dyn Tracker>, sprint_name: String, issue_type: String) -> Self {
        Self {
            tracker,
            sprint_name,
            issue_type,
        }
    }
}

/// Id of the first sprint whose name matches exactly. A matching sprint
/// without an id counts as not found.
pub fn find_sprint_id<'a>(sprints: &'a [Sprint], name: &str) -> Option<&'a str> {
    sprints
        .iter()
        .find(|s| s.name.as_deref() == Some(name))
        .map(|s| s.id.as_str())
        .filter(|id| !id.is_empty())
}

fn log_first_issue_sprint(issues: &[Issue]) {
    let Some(first) = issues.first() else {
        return;
    };
    match first.field("sprint") {
        Some(sprint) => debug!(%sprint, "Sprint data in first ticket"),
        None => debug!(
            fields = ?first.field_names(),
            "No sprint field in first ticket"
        ),
    }
}

#[async_trait]
impl Step for IssueFetch {
    fn name(&self) -> &'static str {
        "issue_fetch"
    }

    async fn run(&self, mut record: WorkflowRecord) -> WorkflowRecord {
        let Some(sprint_id) = find_sprint_id(&record.sprints, &self.sprint_name).map(str::to_owned)
        else {
            let message = format!("Sprint '{}' not found", self.sprint_name);
            error!("{message} in fetched sprints");
            record.issues = Vec::new();
            record.fail(message);
            return record;
        };

        info!(%sprint_id, issue_type = %self.issue_type, "Fetching sprint tickets");

        match self.tracker.sprint_issues(&sprint_id, &self.issue_type).await {
            Ok(issues) => {
                info!(count = issues.len(), "Fetched tickets");
                log_first_issue_sprint(&issues);
                record.issues = issues;
                record.succeed();
            }
            Err(err) => {
                let message = err.describe("fetch tickets");
                error!("{message}");
                record.issues = Vec::new();
                record.fail(message);
            }
        }

        record
    }
}
