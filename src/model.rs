//! Core data types for `sheetsync`.
//!
//! A [`Record`] is one row of the local sheet; a [`RemoteIssue`] is the
//! tracker-side view of the same work item.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Per-record marker requesting an outbound push on the next run.
///
/// Rows that predate the marker column deserialize as [`SyncMark::Pending`]
/// so they are picked up on the next pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SyncMark {
    #[default]
    Pending,
    Clear,
}

impl SyncMark {
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Clear => "clear",
        }
    }
}

impl fmt::Display for SyncMark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SyncMark {
    type Err = crate::error::SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "clear" | "" => Ok(Self::Clear),
            other => Err(crate::error::SyncError::validation(
                "sync",
                format!("unknown sync mark: {other}"),
            )),
        }
    }
}

/// Who currently holds a record, derived once per read from its assignee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// The assignee matches the automation identity's sentinel name.
    Bot,
    /// Any other assignee value, including the empty string.
    Human,
}

impl Ownership {
    /// Derive ownership from an assignee label and the bot sentinel name.
    ///
    /// Only a case-insensitive match against the sentinel counts as
    /// bot-owned; the bot's full display form is deliberately human-owned
    /// (it means a person picked the ticket up in the tracker).
    #[must_use]
    pub fn of(assignee: &str, sentinel: &str) -> Self {
        if assignee.trim().to_lowercase() == sentinel.trim().to_lowercase() {
            Self::Bot
        } else {
            Self::Human
        }
    }

    #[must_use]
    pub const fn is_bot(self) -> bool {
        matches!(self, Self::Bot)
    }
}

/// The automation identity the reconcilers act as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotIdentity {
    /// Short sentinel name written into the sheet's assignee column to mark
    /// a record as bot-owned.
    pub name: String,
    /// Human-readable display name registered with the tracker.
    pub display_name: String,
    /// Tracker account the bot authenticates and self-assigns as.
    pub account_id: String,
}

impl BotIdentity {
    /// The form stamped into the sheet after a successful create, matching
    /// how tracker assignees are rendered: `"Display Name (account)"`.
    #[must_use]
    pub fn display_form(&self) -> String {
        format!("{} ({})", self.display_name, self.account_id)
    }
}

/// One row of the local sheet.
///
/// Unknown columns are collected into `extra` and written back verbatim on
/// save; the reconcilers only ever touch the named fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Record {
    /// Stable row number; assigned as `max(existing) + 1` for appended rows.
    #[serde(rename = "no", default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u64>,

    /// Tracker URL of the issue this row is linked to, if it has been pushed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,

    #[serde(default)]
    pub summary: String,

    #[serde(default)]
    pub assignee: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub due_date: String,

    #[serde(default)]
    pub comment: String,

    #[serde(default)]
    pub sync: SyncMark,

    #[serde(default)]
    pub status: String,

    /// Columns the core does not touch, preserved across load/save.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Record {
    /// Derive the issue key from the trailing path segment of `remote_url`.
    ///
    /// The key is parse-only state: it is never persisted as its own column.
    #[must_use]
    pub fn remote_key(&self) -> Option<&str> {
        self.remote_url
            .as_deref()
            .and_then(|url| url.trim_end_matches('/').rsplit('/').next())
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// A record whose status reads "done" is frozen for the rest of the run.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.status.trim().to_lowercase() == "done"
    }

    #[must_use]
    pub fn ownership(&self, sentinel: &str) -> Ownership {
        Ownership::of(&self.assignee, sentinel)
    }
}

/// Tracker-side view of a work item, as returned by search.
///
/// The last comment is not part of the search payload; it costs one extra
/// call per issue and is fetched only when a merge rule needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteIssue {
    pub key: String,
    pub summary: String,
    pub description: String,
    pub due_date: String,
    pub status: String,
    /// Rendered `"Display Name (account)"`, or `None` when unassigned.
    pub assignee_display: Option<String>,
}
