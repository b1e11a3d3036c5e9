//! Outbound pass: push pending local records to the tracker.
//!
//! Records are visited in ascending row order. A pending record with a
//! summary and no remote key becomes a create; a pending bot-owned record
//! with a key becomes an update; everything else is skipped untouched.
//! Failures are scoped to the record: it keeps its pending mark and is
//! retried on the next run.

use crate::config::Config;
use crate::model::{Record, SyncMark};
use crate::remote::{NewIssue, Tracker};
use crate::sheet::Sheet;
use crate::sync::{browse_url, ensure_summary_header, valid_due_date};

/// Outbound counters, folded into the run report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutboundCounts {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// What the pass decided to do with one record.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Create,
    Update { key: String },
    Skip { reason: &'static str },
}

/// Decide create vs. update vs. skip for an eligible (pending, not done)
/// record.
fn decide(record: &Record, sentinel: &str) -> Action {
    match record.remote_key() {
        Some(key) => {
            if record.ownership(sentinel).is_bot() {
                Action::Update {
                    key: key.to_string(),
                }
            } else {
                // Human-owned records are never pushed; remote edits win.
                Action::Skip {
                    reason: "human-owned",
                }
            }
        }
        None => {
            if record.summary.trim().is_empty() {
                Action::Skip {
                    reason: "no summary to create from",
                }
            } else {
                Action::Create
            }
        }
    }
}

/// Walk the sheet in row order and reconcile each eligible record outward.
pub fn run(sheet: &mut Sheet, tracker: &dyn Tracker, config: &Config) -> OutboundCounts {
    let mut counts = OutboundCounts::default();

    for sequence in 1..=sheet.max_sequence() {
        // Row numbers may have gaps after deletions; a missing number is
        // not a missing record.
        let Some(record) = sheet.record_by_sequence_mut(sequence) else {
            continue;
        };

        if record.is_done() {
            tracing::debug!(sequence, "skipping done record");
            counts.skipped += 1;
            continue;
        }
        if !record.sync.is_pending() {
            tracing::debug!(sequence, "skipping record without pending mark");
            counts.skipped += 1;
            continue;
        }

        match decide(record, &config.bot.name) {
            Action::Create => create_issue(record, tracker, config, &mut counts),
            Action::Update { key } => update_issue(record, &key, tracker, config, &mut counts),
            Action::Skip { reason } => {
                tracing::info!(sequence, reason, "skipping record");
                counts.skipped += 1;
            }
        }
    }

    counts
}

fn create_issue(
    record: &mut Record,
    tracker: &dyn Tracker,
    config: &Config,
    counts: &mut OutboundCounts,
) {
    let summary = ensure_summary_header(record.summary.trim(), &config.project);
    let due_date = valid_due_date(&record.due_date).unwrap_or_default();
    let request = NewIssue {
        project: &config.project,
        summary: &summary,
        description: &record.description,
        due_date: &due_date,
        issue_type: &config.issue_type,
        label: &config.label,
        assignee_account: &config.bot.account_id,
    };

    let key = match tracker.create_issue(&request) {
        Ok(key) => key,
        Err(e) => {
            tracing::error!(sequence = record.sequence, error = %e, "issue create failed");
            counts.failed += 1;
            return;
        }
    };

    // Record the link immediately: even if the staged comment below fails,
    // the next run must take the update path rather than create a duplicate.
    record.remote_url = Some(browse_url(&config.base_url, &key));
    tracing::info!(key = %key, sequence = record.sequence, "created issue");

    if !record.comment.trim().is_empty() {
        if let Err(e) = tracker.add_comment(&key, &record.comment) {
            tracing::error!(key = %key, error = %e, "staged comment failed, record stays pending");
            counts.failed += 1;
            return;
        }
    }

    record.sync = SyncMark::Clear;
    record.assignee = config.bot.display_form();
    counts.created += 1;
}

fn update_issue(
    record: &mut Record,
    key: &str,
    tracker: &dyn Tracker,
    config: &Config,
    counts: &mut OutboundCounts,
) {
    let summary = ensure_summary_header(record.summary.trim(), &config.project);
    let due_date = valid_due_date(&record.due_date).unwrap_or_default();

    if let Err(e) = tracker.update_issue(key, &summary, &record.description, &due_date) {
        tracing::error!(key = %key, error = %e, "issue update failed");
        counts.failed += 1;
        return;
    }

    // Append the staged comment only when the remote's last comment differs,
    // so repeated runs with an unchanged sheet stay quiet.
    if !record.comment.trim().is_empty() {
        let last = match tracker.last_comment(key) {
            Ok(last) => last,
            Err(e) => {
                tracing::error!(key = %key, error = %e, "comment fetch failed, record stays pending");
                counts.failed += 1;
                return;
            }
        };
        if last.as_deref() != Some(record.comment.as_str()) {
            if let Err(e) = tracker.add_comment(key, &record.comment) {
                tracing::error!(key = %key, error = %e, "comment append failed, record stays pending");
                counts.failed += 1;
                return;
            }
            tracing::info!(key = %key, "appended staged comment");
        }
    }

    // The tracker is the source of truth for the assignee once the issue
    // exists there.
    match tracker.assignee_display(key) {
        Ok(Some(display)) => record.assignee = display,
        Ok(None) => {}
        Err(e) => {
            tracing::error!(key = %key, error = %e, "assignee refresh failed, record stays pending");
            counts.failed += 1;
            return;
        }
    }

    record.sync = SyncMark::Clear;
    tracing::info!(key = %key, sequence = record.sequence, "updated issue");
    counts.updated += 1;
}
