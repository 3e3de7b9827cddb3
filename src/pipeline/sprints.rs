use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use super::Step;
use crate::model::record::{Sprint, WorkflowRecord};
use crate::tracker::Tracker;

/// Lists the sprints on the first board of a project.
pub struct SprintLookup {
    tracker: Arc<dyn Tracker>,
    project_key: String,
}

impl SprintLookup {
    pub fn new(tracker: Arc<dyn Tracker>, project_key: String) -> Self {
        Self {
            tracker,
            project_key,
        }
    }

    /// Sprints of the first board, or `None` when the project has no board.
    pub(super) async fn lookup(&self) -> Result<Option<Vec<Sprint>>, String> {
        let boards = self
            .tracker
            .boards(&self.project_key)
            .await
            .map_err(|e| e.describe("fetch boards"))?;

        // No board is not an error: the project simply has no sprints to offer.
        let Some(board) = boards.first() else {
            warn!(project_key = %self.project_key, "No boards found for project");
            return Ok(None);
        };

        info!(
            board_id = %board.id,
            board_name = board.name.as_deref().unwrap_or("Unknown"),
            "Found board"
        );

        self.tracker
            .sprints(&board.id)
            .await
            .map(Some)
            .map_err(|e| e.describe("fetch sprints"))
    }
}

pub fn render_sprints(project_key: &str, sprints: &[Sprint]) -> String {
    let rule = "=".repeat(80);
    let mut out = format!(
        "{rule}\nAVAILABLE SPRINTS IN {project_key} PROJECT ({} total)\n{rule}\n\n",
        sprints.len()
    );
    for (idx, sprint) in sprints.iter().enumerate() {
        let id = if sprint.id.is_empty() { "N/A" } else { sprint.id.as_str() };
        out.push_str(&format!(
            "{}. [{id}] {} (State: {})\n",
            idx + 1,
            sprint.name.as_deref().unwrap_or("No name"),
            sprint.state.as_deref().unwrap_or("Unknown"),
        ));
    }
    out.push_str(&format!("\n{rule}\n"));
    out
}

#[async_trait]
impl Step for SprintLookup {
    fn name(&self) -> &'static str {
        "sprint_lookup"
    }

    async fn run(&self, mut record: WorkflowRecord) -> WorkflowRecord {
        info!(project_key = %self.project_key, "Fetching sprints");

        match self.lookup().await {
            Ok(sprints) => {
                if let Some(sprints) = &sprints {
                    println!("{}", render_sprints(&self.project_key, sprints));
                }
                record.sprints = sprints.unwrap_or_default();
                record.succeed();
            }
            Err(message) => {
                error!("{message}");
                record.sprints = Vec::new();
                record.fail(message);
            }
        }

        record
    }
}
