//! Sheet/tracker reconciliation.
//!
//! This module owns the run driver plus the helpers both passes share:
//! - [`outbound`]: walk the sheet in row order, create or update remote
//!   issues for pending bot-owned records.
//! - [`inbound`]: pull labeled remote issues back in, appending unseen ones
//!   and merging comment/assignee changes under the ownership rules.
//!
//! A run is load -> outbound -> inbound -> save. Both passes are idempotent
//! against unchanged remote state, so a crash between phases is recovered by
//! the next run.

pub mod inbound;
pub mod outbound;

use std::path::Path;

use serde::Serialize;

use crate::config::Config;
use crate::error::Result;
use crate::remote::{JiraTracker, Tracker};
use crate::sheet::Sheet;

/// Prefix the summary with the bracketed project label, once.
///
/// Whitespace is the caller's concern; trimming here would break the
/// fixpoint property for summaries that are already prefixed.
#[must_use]
pub fn ensure_summary_header(summary: &str, project: &str) -> String {
    let header = format!("[{project}]");
    if summary.starts_with(&header) {
        summary.to_string()
    } else {
        format!("{header} {summary}")
    }
}

/// Deterministic issue URL; `Record::remote_key` parses it back.
#[must_use]
pub fn browse_url(base_url: &str, key: &str) -> String {
    format!("{}/browse/{key}", base_url.trim_end_matches('/'))
}

/// Validate a due-date cell before pushing it.
///
/// The tracker rejects malformed dates with an opaque 400; dropping the
/// field keeps the rest of the record syncable. Empty means no due date.
#[must_use]
pub fn valid_due_date(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match chrono::NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        Ok(date) => Some(date.format("%Y-%m-%d").to_string()),
        Err(_) => {
            tracing::warn!(due_date = %trimmed, "unparseable due date, not pushed");
            None
        }
    }
}

/// Counts reported at the end of a run. Observational only; no
/// reconciliation decision depends on them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Remote issues created by the outbound pass.
    pub created: usize,
    /// Remote issues updated by the outbound pass.
    pub updated: usize,
    /// Records appended by the inbound pass.
    pub added: usize,
    /// Records whose comment/assignee the inbound pass merged.
    pub merged: usize,
    /// Records skipped by the outbound pass without mutation.
    pub skipped: usize,
    /// Per-record operations that failed and will retry next run.
    pub failed: usize,
}

impl RunReport {
    #[must_use]
    pub const fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Run a full reconciliation against the configured tracker.
///
/// # Errors
///
/// Returns an error for config/auth problems or sheet load/save failures.
/// Per-record remote failures are logged, counted, and do not abort the run.
pub fn run_sync(sheet_path: &Path, config: &Config) -> Result<RunReport> {
    config.validate_for_sync()?;
    let tracker = JiraTracker::new(config)?;
    run_with_tracker(sheet_path, config, &tracker)
}

/// Driver body, generic over the tracker so tests can script the remote.
///
/// # Errors
///
/// Returns an error if the sheet cannot be loaded or saved.
pub fn run_with_tracker(
    sheet_path: &Path,
    config: &Config,
    tracker: &dyn Tracker,
) -> Result<RunReport> {
    tracing::info!(sheet = %sheet_path.display(), project = %config.project, "starting reconciliation");

    let mut sheet = Sheet::load(sheet_path)?;

    let out = outbound::run(&mut sheet, tracker, config);
    let inb = inbound::run(&mut sheet, tracker, config);

    sheet.save(sheet_path)?;

    let report = RunReport {
        created: out.created,
        updated: out.updated,
        skipped: out.skipped,
        added: inb.added,
        merged: inb.merged,
        failed: out.failed + inb.failed,
    };

    tracing::info!(
        created = report.created,
        updated = report.updated,
        added = report.added,
        merged = report.merged,
        skipped = report.skipped,
        failed = report.failed,
        "reconciliation finished"
    );

    Ok(report)
}
