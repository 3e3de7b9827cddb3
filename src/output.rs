use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::model::issue::Issue;
use crate::model::record::{RunStatus, WorkflowRecord};

pub const ISSUES_FILE: &str = "jira_tickets.json";

/// File name for a sprint's changelog: spaces become underscores, colons are dropped.
pub fn changelog_filename(sprint_name: &str) -> String {
    let stem: String = sprint_name
        .chars()
        .filter(|c| *c != ':')
        .map(|c| if c == ' ' { '_' } else { c })
        .collect();
    format!("release_doc_{stem}.md")
}

/// Write the raw issue array as pretty JSON, replacing any earlier export.
pub fn save_issues(dir: &Path, issues: &[Issue]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(ISSUES_FILE);
    let json = serde_json::to_string_pretty(issues)?;
    std::fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Export the record's issues only when the whole run succeeded and found some.
/// A failed changelog synthesis therefore also suppresses the export.
pub fn export_issues(dir: &Path, record: &WorkflowRecord) -> Result<Option<PathBuf>> {
    if record.status != RunStatus::Success || record.issues.is_empty() {
        return Ok(None);
    }
    save_issues(dir, &record.issues).map(Some)
}

/// Write the changelog document, replacing any earlier one for the same sprint.
pub fn write_changelog(dir: &Path, sprint_name: &str, changelog: &str) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(changelog_filename(sprint_name));
    let document = format!("# Release Documentation - {sprint_name}\n\n{changelog}");
    std::fs::write(&path, document)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filename_replaces_spaces_and_strips_colons() {
        assert_eq!(
            changelog_filename("SPARK Sprint: 42"),
            "release_doc_SPARK_Sprint_42.md"
        );
        assert_eq!(changelog_filename("Sprint5"), "release_doc_Sprint5.md");
    }

    #[test]
    fn saved_issues_parse_back_to_the_same_array() {
        let dir = tempfile::tempdir().unwrap();
        let issues: Vec<Issue> = serde_json::from_value(json!([
            {
                "expand": "renderedFields",
                "id": "10001",
                "self": "https://example.atlassian.net/rest/agile/1.0/issue/10001",
                "key": "SPARK-1",
                "fields": {
                    "summary": "[API] Add endpoint",
                    "description": {"type": "doc", "version": 1, "content": []},
                    "sprint": {"id": 7, "name": "Sprint 5"},
                    "assignee": null
                }
            },
            {"id": "10002", "key": "SPARK-2", "fields": {"summary": "Second"}}
        ]))
        .unwrap();

        let path = save_issues(dir.path(), &issues).unwrap();
        assert_eq!(path, dir.path().join(ISSUES_FILE));

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<Issue> = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed, issues);
    }

    #[test]
    fn changelog_document_has_header_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("docs");

        write_changelog(&out, "Sprint 5", "first").unwrap();
        let path = write_changelog(&out, "Sprint 5", "* Change log\n1. entry").unwrap();

        assert_eq!(path, out.join("release_doc_Sprint_5.md"));
        assert_eq!(
            std::fs::read_to_string(path).unwrap(),
            "# Release Documentation - Sprint 5\n\n* Change log\n1. entry"
        );
    }

    fn fetched_record() -> WorkflowRecord {
        let mut record = WorkflowRecord::new(
            "https://example.atlassian.net",
            crate::model::record::Credentials {
                email: "dev@example.com".into(),
                api_token: "token".into(),
            },
        );
        record.issues =
            serde_json::from_value(json!([{"id": 10001, "key": "SPARK-1", "fields": {}}])).unwrap();
        record.succeed();
        record
    }

    #[test]
    fn successful_run_exports_issues() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_issues(dir.path(), &fetched_record()).unwrap();
        assert_eq!(path, Some(dir.path().join(ISSUES_FILE)));
    }

    #[test]
    fn failed_run_exports_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut record = fetched_record();
        record.fail("Failed to generate release doc: generation service returned 429: busy");

        assert_eq!(export_issues(dir.path(), &record).unwrap(), None);
        assert!(!dir.path().join(ISSUES_FILE).exists());
    }

    #[test]
    fn empty_issue_list_exports_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut record = fetched_record();
        record.issues.clear();

        assert_eq!(export_issues(dir.path(), &record).unwrap(), None);
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }
}
