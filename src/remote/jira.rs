//! Blocking HTTP implementation of [`Tracker`] against the Jira REST v2 API.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::{Value, json};

use crate::config::Config;
use crate::error::{Result, SyncError};
use crate::model::RemoteIssue;
use crate::remote::{NewIssue, Tracker, build_search_jql, parse_last_comment, parse_search_response};

/// Longest response-body excerpt carried into an error.
const ERROR_DETAIL_LIMIT: usize = 300;

/// Stateless gateway to one Jira instance.
pub struct JiraTracker {
    base_url: String,
    http: Client,
}

impl std::fmt::Debug for JiraTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JiraTracker")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl JiraTracker {
    /// Build a client with the bearer token installed as a default header.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not a valid header value or the
    /// underlying client cannot be constructed.
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut token = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|e| SyncError::Auth(format!("token is not a valid header value: {e}")))?;
        token.set_sensitive(true);
        headers.insert(AUTHORIZATION, token);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.base_url.clone(),
            http,
        })
    }

    fn api_url(&self, tail: &str) -> String {
        format!("{}/rest/api/2/{tail}", self.base_url)
    }

    /// Map a non-success response to a typed API error with a body excerpt.
    fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let detail = response
            .text()
            .unwrap_or_default()
            .chars()
            .take(ERROR_DETAIL_LIMIT)
            .collect::<String>();
        Err(SyncError::api(status.as_u16(), detail))
    }
}

impl Tracker for JiraTracker {
    fn search(
        &self,
        project: &str,
        label: &str,
        excluded_statuses: &[String],
        max_results: usize,
    ) -> Result<Vec<RemoteIssue>> {
        let jql = build_search_jql(project, label, excluded_statuses);
        let response = self
            .http
            .get(self.api_url("search"))
            .query(&[
                ("jql", jql.as_str()),
                ("maxResults", &max_results.to_string()),
                ("fields", "summary,description,duedate,status,assignee"),
            ])
            .send()?;
        let value = Self::check(response)?.json::<Value>()?;
        Ok(parse_search_response(&value))
    }

    fn assignee_display(&self, key: &str) -> Result<Option<String>> {
        let response = self
            .http
            .get(self.api_url(&format!("issue/{key}")))
            .query(&[("fields", "assignee")])
            .send()?;
        let value = Self::check(response)?.json::<Value>()?;
        let fields = value.get("fields").cloned().unwrap_or(Value::Null);
        Ok(super::assignee_display_from_fields(&fields))
    }

    fn create_issue(&self, issue: &NewIssue<'_>) -> Result<String> {
        let body = json!({
            "fields": {
                "project": {"key": issue.project},
                "summary": issue.summary,
                "description": issue.description,
                "duedate": nullable(issue.due_date),
                "issuetype": {"name": issue.issue_type},
                "labels": [issue.label],
                "assignee": {"name": issue.assignee_account},
            }
        });

        let response = self.http.post(self.api_url("issue")).json(&body).send()?;
        let value = Self::check(response)?.json::<Value>()?;
        value
            .get("key")
            .and_then(Value::as_str)
            .map(ToString::to_string)
            .ok_or_else(|| SyncError::api(200, "create response carried no issue key"))
    }

    fn update_issue(
        &self,
        key: &str,
        summary: &str,
        description: &str,
        due_date: &str,
    ) -> Result<()> {
        let body = json!({
            "fields": {
                "summary": summary,
                "description": description,
                "duedate": nullable(due_date),
            }
        });

        let response = self
            .http
            .put(self.api_url(&format!("issue/{key}")))
            .json(&body)
            .send()?;
        Self::check(response)?;
        Ok(())
    }

    fn last_comment(&self, key: &str) -> Result<Option<String>> {
        let response = self
            .http
            .get(self.api_url(&format!("issue/{key}/comment")))
            .send()?;
        let value = Self::check(response)?.json::<Value>()?;
        Ok(parse_last_comment(&value))
    }

    fn add_comment(&self, key: &str, body: &str) -> Result<()> {
        let payload = json!({"body": body});
        let response = self
            .http
            .post(self.api_url(&format!("issue/{key}/comment")))
            .json(&payload)
            .send()?;
        Self::check(response)?;
        Ok(())
    }
}

/// Empty strings become JSON null; the tracker rejects empty due dates.
fn nullable(value: &str) -> Value {
    if value.trim().is_empty() {
        Value::Null
    } else {
        Value::String(value.to_string())
    }
}
