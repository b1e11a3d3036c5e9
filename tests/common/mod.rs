#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use sheetsync::config::Config;
use sheetsync::error::{Result, SyncError};
use sheetsync::model::{BotIdentity, Record, RemoteIssue, SyncMark};
use sheetsync::remote::{NewIssue, Tracker};

pub fn init_test_logging() {
    sheetsync::logging::init_test_logging();
}

/// Baseline config used by reconciler tests.
pub fn test_config() -> Config {
    Config {
        base_url: "https://tracker.example.com".to_string(),
        token: "secret".to_string(),
        project: "PROJ".to_string(),
        label: "customer_qa".to_string(),
        issue_type: "Task".to_string(),
        page_size: 50,
        excluded_statuses: vec!["Done".to_string(), "Canceled".to_string()],
        timeout_secs: 5,
        bot: BotIdentity {
            name: "subaru".to_string(),
            display_name: "Harada, Naohisa".to_string(),
            account_id: "uig17323".to_string(),
        },
    }
}

pub fn pending_record(sequence: u64, summary: &str) -> Record {
    Record {
        sequence: Some(sequence),
        summary: summary.to_string(),
        sync: SyncMark::Pending,
        ..Record::default()
    }
}

pub fn keyed_record(sequence: u64, summary: &str, key: &str, assignee: &str) -> Record {
    Record {
        sequence: Some(sequence),
        summary: summary.to_string(),
        remote_url: Some(format!("https://tracker.example.com/browse/{key}")),
        assignee: assignee.to_string(),
        sync: SyncMark::Pending,
        ..Record::default()
    }
}

pub fn remote_issue(key: &str, summary: &str) -> RemoteIssue {
    RemoteIssue {
        key: key.to_string(),
        summary: summary.to_string(),
        description: String::new(),
        due_date: String::new(),
        status: "Open".to_string(),
        assignee_display: None,
    }
}

/// One tracker call, recorded in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Search,
    AssigneeDisplay { key: String },
    CreateIssue { summary: String },
    UpdateIssue { key: String, summary: String },
    LastComment { key: String },
    AddComment { key: String, body: String },
}

/// Scripted stand-in for the tracker; single-threaded by design, like the
/// real client's usage.
#[derive(Default)]
pub struct FakeTracker {
    pub calls: RefCell<Vec<Call>>,

    pub search_issues: Vec<RemoteIssue>,
    pub last_comments: HashMap<String, String>,
    pub assignees: HashMap<String, String>,
    /// Keys handed out by successive create calls.
    pub create_keys: RefCell<Vec<String>>,

    pub fail_search: bool,
    pub fail_create: bool,
    pub fail_update: bool,
    pub fail_last_comment: bool,
    pub fail_add_comment: bool,
    pub fail_assignee: bool,
}

impl FakeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_create_key(mut self, key: &str) -> Self {
        self.create_keys.get_mut().push(key.to_string());
        self
    }

    pub fn with_issue(mut self, issue: RemoteIssue) -> Self {
        self.search_issues.push(issue);
        self
    }

    pub fn with_last_comment(mut self, key: &str, body: &str) -> Self {
        self.last_comments.insert(key.to_string(), body.to_string());
        self
    }

    pub fn with_assignee(mut self, key: &str, display: &str) -> Self {
        self.assignees.insert(key.to_string(), display.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count_creates(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, Call::CreateIssue { .. }))
            .count()
    }

    pub fn count_updates(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, Call::UpdateIssue { .. }))
            .count()
    }

    pub fn count_comment_adds(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, Call::AddComment { .. }))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn fail(op: &str) -> SyncError {
        SyncError::api(500, format!("scripted {op} failure"))
    }
}

impl Tracker for FakeTracker {
    fn search(
        &self,
        _project: &str,
        _label: &str,
        _excluded_statuses: &[String],
        _max_results: usize,
    ) -> Result<Vec<RemoteIssue>> {
        self.record(Call::Search);
        if self.fail_search {
            return Err(Self::fail("search"));
        }
        Ok(self.search_issues.clone())
    }

    fn assignee_display(&self, key: &str) -> Result<Option<String>> {
        self.record(Call::AssigneeDisplay {
            key: key.to_string(),
        });
        if self.fail_assignee {
            return Err(Self::fail("assignee fetch"));
        }
        Ok(self.assignees.get(key).cloned())
    }

    fn create_issue(&self, issue: &NewIssue<'_>) -> Result<String> {
        self.record(Call::CreateIssue {
            summary: issue.summary.to_string(),
        });
        if self.fail_create {
            return Err(Self::fail("create"));
        }
        let mut keys = self.create_keys.borrow_mut();
        if keys.is_empty() {
            Ok(format!("{}-900", issue.project))
        } else {
            Ok(keys.remove(0))
        }
    }

    fn update_issue(
        &self,
        key: &str,
        summary: &str,
        _description: &str,
        _due_date: &str,
    ) -> Result<()> {
        self.record(Call::UpdateIssue {
            key: key.to_string(),
            summary: summary.to_string(),
        });
        if self.fail_update {
            return Err(Self::fail("update"));
        }
        Ok(())
    }

    fn last_comment(&self, key: &str) -> Result<Option<String>> {
        self.record(Call::LastComment {
            key: key.to_string(),
        });
        if self.fail_last_comment {
            return Err(Self::fail("comment fetch"));
        }
        Ok(self.last_comments.get(key).cloned())
    }

    fn add_comment(&self, key: &str, body: &str) -> Result<()> {
        self.record(Call::AddComment {
            key: key.to_string(),
            body: body.to_string(),
        });
        if self.fail_add_comment {
            return Err(Self::fail("comment append"));
        }
        Ok(())
    }
}
