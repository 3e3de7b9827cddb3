use async_trait::async_trait;

use super::Step;
use crate::model::issue::Issue;
use crate::model::record::WorkflowRecord;

const NO_DESCRIPTION: &str = "No description";

/// Prints the fetched issues. Never changes the record.
pub struct IssueReporter;

fn rule() -> String {
    "-".repeat(80)
}

pub fn render_issue(position: usize, issue: &Issue) -> String {
    let key = issue.key().unwrap_or("N/A");
    let id = issue.id().unwrap_or_else(|| "N/A".to_string());
    let description = issue
        .description_text()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| NO_DESCRIPTION.to_string());

    format!(
        "{position}. [{key}] (ID: {id}) {summary}\n   Project: {project} | Type: {kind} | Status: {status} | Priority: {priority}\n   Sprint: {sprint} | Assignee: {assignee}\n   Created: {created}\n   Description: {description}\n{rule}\n",
        summary = issue.summary().unwrap_or("No summary"),
        project = issue.project_key().unwrap_or("Unknown"),
        kind = issue.issue_type_name().unwrap_or("Unknown"),
        status = issue.status_name().unwrap_or("Unknown"),
        priority = issue.priority_name().unwrap_or("None"),
        sprint = issue.sprint_name(),
        assignee = issue.assignee_name().unwrap_or("Unassigned"),
        created = issue.created().unwrap_or("Unknown"),
        rule = rule(),
    )
}

pub fn render_report(record: &WorkflowRecord) -> String {
    let banner = "=".repeat(80);
    let mut out = format!("{banner}\nJIRA TICKETS\n{banner}\n\n");

    if record.is_failed() {
        out.push_str(&format!(
            "Error: {}\n",
            record.error.as_deref().unwrap_or("unknown error")
        ));
        return out;
    }

    if record.issues.is_empty() {
        out.push_str("No tickets found.\n");
        return out;
    }

    for (idx, issue) in record.issues.iter().enumerate() {
        out.push_str(&render_issue(idx + 1, issue));
    }
    out.push_str(&format!("\nTotal tickets: {}\n", record.issues.len()));
    out
}

#[async_trait]
impl Step for IssueReporter {
    fn name(&self) -> &'static str {
        "issue_report"
    }

    async fn run(&self, record: WorkflowRecord) -> WorkflowRecord {
        print!("{}", render_report(&record));
        record
    }
}
