//! Remote tracker access.
//!
//! [`Tracker`] is the seam the reconcilers talk through: a stateless
//! request/response gateway, one blocking call at a time, no retries. The
//! production implementation is [`jira::JiraTracker`]; tests substitute a
//! scripted double.

pub mod jira;

pub use jira::JiraTracker;

use serde_json::Value;

use crate::error::Result;
use crate::model::RemoteIssue;

/// Fields for an outbound issue create.
#[derive(Debug, Clone, Copy)]
pub struct NewIssue<'a> {
    pub project: &'a str,
    pub summary: &'a str,
    pub description: &'a str,
    /// Empty means no due date.
    pub due_date: &'a str,
    pub issue_type: &'a str,
    pub label: &'a str,
    /// Account the new issue is assigned to (the bot).
    pub assignee_account: &'a str,
}

/// Thin gateway to the tracker's HTTP API.
///
/// Every method is a single attempt; callers decide what a failure means.
pub trait Tracker {
    /// Issues carrying `label` in `project` whose status is not excluded,
    /// bounded to one page of `max_results`.
    fn search(
        &self,
        project: &str,
        label: &str,
        excluded_statuses: &[String],
        max_results: usize,
    ) -> Result<Vec<RemoteIssue>>;

    /// Current assignee of the issue, rendered as a display form.
    fn assignee_display(&self, key: &str) -> Result<Option<String>>;

    /// Create an issue and return its key.
    fn create_issue(&self, issue: &NewIssue<'_>) -> Result<String>;

    /// Update summary, description, and due date of an existing issue.
    fn update_issue(
        &self,
        key: &str,
        summary: &str,
        description: &str,
        due_date: &str,
    ) -> Result<()>;

    /// Body of the most recent comment, if any.
    fn last_comment(&self, key: &str) -> Result<Option<String>>;

    /// Append a comment.
    fn add_comment(&self, key: &str, body: &str) -> Result<()>;
}

/// Build the search query string: fixed label, terminal statuses excluded.
#[must_use]
pub fn build_search_jql(project: &str, label: &str, excluded_statuses: &[String]) -> String {
    let mut jql = format!("project = {project} AND labels = {label}");
    if !excluded_statuses.is_empty() {
        let excluded = excluded_statuses
            .iter()
            .map(|status| format!("\"{status}\""))
            .collect::<Vec<_>>()
            .join(", ");
        jql.push_str(&format!(" AND status NOT IN ({excluded})"));
    }
    jql
}

/// Render an assignee object as `"Display Name (account)"`.
///
/// Mirrors how assignees are shown in the sheet so string comparison against
/// stored values is exact.
#[must_use]
pub fn assignee_display_from_fields(fields: &Value) -> Option<String> {
    let assignee = fields.get("assignee")?;
    let display = assignee.get("displayName")?.as_str()?;
    if display.is_empty() {
        return None;
    }
    let account = assignee
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default();
    Some(format!("{display} ({account})"))
}

/// Extract the issue list from a search response.
pub(crate) fn parse_search_response(value: &Value) -> Vec<RemoteIssue> {
    let Some(issues) = value.get("issues").and_then(Value::as_array) else {
        return Vec::new();
    };

    issues
        .iter()
        .filter_map(|issue| {
            let key = issue.get("key")?.as_str()?.to_string();
            let fields = issue.get("fields").cloned().unwrap_or(Value::Null);
            Some(RemoteIssue {
                key,
                summary: str_field(&fields, "summary"),
                description: str_field(&fields, "description"),
                due_date: str_field(&fields, "duedate"),
                status: fields
                    .pointer("/status/name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                assignee_display: assignee_display_from_fields(&fields),
            })
        })
        .collect()
}

/// Body of the last comment in a comment-list response.
pub(crate) fn parse_last_comment(value: &Value) -> Option<String> {
    value
        .get("comments")
        .and_then(Value::as_array)
        .and_then(|comments| comments.last())
        .and_then(|comment| comment.get("body"))
        .and_then(Value::as_str)
        .map(ToString::to_string)
}

fn str_field(fields: &Value, name: &str) -> String {
    fields
        .get(name)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
