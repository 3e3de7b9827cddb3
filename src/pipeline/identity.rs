use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use super::Step;
use crate::model::record::{Identity, WorkflowRecord};
use crate::tracker::Tracker;

pub const STEP_NAME: &str = "identity_check";

const NOT_AVAILABLE: &str = "N/A";

/// Verifies the configured credentials against the tracker's current-user endpoint.
pub struct IdentityCheck {
    tracker: Arc<dyn Tracker>,
}

impl IdentityCheck {
    pub fn new(tracker: Arc<dyn Tracker>) -> Self {
        Self { tracker }
    }
}

pub fn render_identity(identity: &Identity) -> String {
    let or_na = |v: Option<&str>| v.unwrap_or(NOT_AVAILABLE).to_string();
    let rule = "=".repeat(80);
    format!(
        "{rule}\nAUTHENTICATION SUCCESSFUL\n{rule}\nAccount ID: {}\nDisplay Name: {}\nEmail: {}\nActive: {}\n{rule}\n",
        or_na(identity.account_id.as_deref()),
        or_na(identity.display_name.as_deref()),
        or_na(identity.email.as_deref()),
        identity
            .active
            .map(|a| a.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    )
}

#[async_trait]
impl Step for IdentityCheck {
    fn name(&self) -> &'static str {
        STEP_NAME
    }

    async fn run(&self, mut record: WorkflowRecord) -> WorkflowRecord {
        info!("Fetching current user information");

        match self.tracker.current_user().await {
            Ok(identity) => {
                println!("{}", render_identity(&identity));
                record.identity = Some(identity);
                record.succeed();
            }
            Err(err) => {
                let message = err.describe("fetch user info");
                error!("{message}");
                record.identity = None;
                record.fail(message);
            }
        }

        record
    }
}
