use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use super::Step;
use crate::generator::{GenerationError, TextGenerator};
use crate::model::issue::Issue;
use crate::model::record::WorkflowRecord;
use crate::output;

pub const SYSTEM_PROMPT: &str =
    "You are a technical documentation writer specializing in clear, concise release notes.";

const PREVIEW_CHARS: usize = 500;

/// One issue, reduced to what the changelog prompt needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogEntry {
    pub key: String,
    pub summary: String,
    pub description: String,
    pub assignee: String,
    pub priority: String,
    pub status: String,
}

impl ChangelogEntry {
    pub fn from_issue(issue: &Issue) -> Self {
        Self {
            key: issue.key().unwrap_or("N/A").into(),
            summary: issue.summary().unwrap_or("No summary").into(),
            description: issue.description_text().unwrap_or_default(),
            assignee: issue.assignee_name().unwrap_or("Unassigned").into(),
            priority: issue.priority_name().unwrap_or("None").into(),
            status: issue.status_name().unwrap_or("Unknown").into(),
        }
    }
}

/// Build the single prompt sent to the generator. The expected changelog
/// format is given by example; `base_url` makes the issue links clickable.
pub fn build_prompt(entries: &[ChangelogEntry], base_url: &str) -> String {
    let base_url = base_url.trim_end_matches('/');
    let mut prompt = format!(
        r#"You are a technical documentation writer creating a release document for a sprint.

**IMPORTANT FORMAT REQUIREMENTS:**
Start with "* Change log" header, then list each ticket using this EXACT format with clickable links:

* Change log
1. [[TICKET-KEY]({base_url}/browse/TICKET-KEY)] [Component Tags] Title
Description paragraph (2-3 sentences) explaining what the ticket accomplishes, the problem it solves, and its impact.

2. [[TICKET-KEY]({base_url}/browse/TICKET-KEY)] [Component Tags] Title
Description paragraph...

**EXAMPLE:**
* Change log
1. [[SPARK-3352]({base_url}/browse/SPARK-3352)] [JAMS] [ML] Preserve Original Character Names Throughout the Pipeline
Ensures that original character names are retained and propagated consistently across the entire ML pipeline. Prevents unintended renaming or loss of identity metadata between stages, improving traceability and output correctness.

**INSTRUCTIONS:**
1. Make the ticket key a clickable markdown link: [[TICKET-KEY]({base_url}/browse/TICKET-KEY)]
2. Extract component tags from the summary (e.g., [JAMS], [ML], [Backend], [API])
3. Remove the tags from the title to avoid duplication
4. Write clear 2-3 sentence descriptions focusing on:
   - What the change accomplishes
   - What problem it solves
   - Impact on the system/users
5. Number entries sequentially (1, 2, 3...)
6. Keep the title concise and descriptive

**Here are the tickets to document:**

"#
    );

    for (idx, entry) in entries.iter().enumerate() {
        prompt.push_str(&format!(
            "\nTicket #{}:\nKey: {}\nSummary: {}\nDescription: {}\nAssignee: {}\nPriority: {}\nStatus: {}\n---\n",
            idx + 1,
            entry.key,
            entry.summary,
            entry.description,
            entry.assignee,
            entry.priority,
            entry.status,
        ));
    }

    prompt.push_str(
        "\n\n**OUTPUT:**\nReturn ONLY the markdown-formatted change log starting with \"* Change log\". No additional commentary or explanations.",
    );
    prompt
}

/// First 500 characters of the generated text, with `...` when cut.
pub fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let head: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

/// Turns the fetched issues into a markdown changelog via the text generator.
pub struct ChangelogSynthesizer {
    generator: Arc<dyn TextGenerator>,
    sprint_name: String,
    output_dir: PathBuf,
}

impl ChangelogSynthesizer {
    pub fn new(generator: Arc<dyn TextGenerator>, sprint_name: String, output_dir: PathBuf) -> Self {
        Self {
            generator,
            sprint_name,
            output_dir,
        }
    }

    async fn synthesize(
        &self,
        record: &WorkflowRecord,
    ) -> Result<(PathBuf, String), GenerationError> {
        let entries: Vec<ChangelogEntry> =
            record.issues.iter().map(ChangelogEntry::from_issue).collect();
        let prompt = build_prompt(&entries, record.base_url());

        info!(tickets = entries.len(), "Calling text generator for release documentation");
        let changelog = self.generator.generate(SYSTEM_PROMPT, &prompt).await?;
        let path = output::write_changelog(&self.output_dir, &self.sprint_name, &changelog)?;

        Ok((path, changelog))
    }
}

#[async_trait]
impl Step for ChangelogSynthesizer {
    fn name(&self) -> &'static str {
        "changelog_synthesis"
    }

    async fn run(&self, mut record: WorkflowRecord) -> WorkflowRecord {
        if record.is_failed() {
            warn!(
                error = record.error.as_deref().unwrap_or_default(),
                "Cannot generate release doc"
            );
            return record;
        }

        if record.issues.is_empty() {
            info!("No tickets to document");
            return record;
        }

        match self.synthesize(&record).await {
            Ok((path, changelog)) => {
                info!(path = %path.display(), "Release documentation generated");
                let rule = "-".repeat(80);
                println!("Preview:\n{rule}\n{}\n{rule}", preview(&changelog));
            }
            Err(e) => {
                let message = format!("Failed to generate release doc: {e}");
                error!("{message}");
                record.fail(message);
            }
        }

        record
    }
}
