//! Inbound pass: pull remote state the outbound pass cannot see.
//!
//! A single-page search fetches every labeled, non-terminal issue. Unseen
//! issues are appended to the sheet; seen issues merge comment and assignee
//! changes under the ownership rules, including the reclaim rule that hands
//! a human-owned record back to the bot queue when the tracker grew a new
//! comment.

use crate::config::Config;
use crate::model::{Ownership, Record, RemoteIssue, SyncMark};
use crate::remote::Tracker;
use crate::sheet::Sheet;
use crate::sync::browse_url;

/// Inbound counters, folded into the run report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InboundCounts {
    pub added: usize,
    pub merged: usize,
    pub failed: usize,
}

/// Merge remote issues into the sheet.
///
/// A failure of the search itself yields zero counts; per-issue failures
/// skip that issue and keep going.
pub fn run(sheet: &mut Sheet, tracker: &dyn Tracker, config: &Config) -> InboundCounts {
    let mut counts = InboundCounts::default();

    let issues = match tracker.search(
        &config.project,
        &config.label,
        &config.excluded_statuses,
        config.page_size,
    ) {
        Ok(issues) => issues,
        Err(e) => {
            tracing::error!(error = %e, "inbound search failed, nothing merged this run");
            counts.failed += 1;
            return counts;
        }
    };
    tracing::info!(count = issues.len(), "fetched remote issues");

    // No pagination loop: one page bounds the sweep. Reaching the cap means
    // the population may be larger than what was fetched.
    if issues.len() >= config.page_size {
        tracing::warn!(
            page_size = config.page_size,
            "search hit the page bound; remote issues beyond it were not fetched"
        );
    }

    let key_index = sheet.key_index();

    for issue in issues {
        match key_index.get(issue.key.as_str()).copied() {
            None => append_record(sheet, &issue, tracker, config, &mut counts),
            Some(index) => {
                let Some(record) = sheet.record_mut(index) else {
                    continue;
                };
                merge_record(record, &issue, tracker, config, &mut counts);
            }
        }
    }

    tracing::info!(
        added = counts.added,
        merged = counts.merged,
        "inbound pass finished"
    );
    counts
}

/// A remote issue with no local row: append one, already reconciled
/// (it originated remotely, there is nothing to push).
fn append_record(
    sheet: &mut Sheet,
    issue: &RemoteIssue,
    tracker: &dyn Tracker,
    config: &Config,
    counts: &mut InboundCounts,
) {
    let comment = match tracker.last_comment(&issue.key) {
        Ok(comment) => comment.unwrap_or_default(),
        Err(e) => {
            tracing::error!(key = %issue.key, error = %e, "comment fetch failed, issue skipped");
            counts.failed += 1;
            return;
        }
    };

    let record = Record {
        sequence: Some(sheet.next_sequence()),
        remote_url: Some(browse_url(&config.base_url, &issue.key)),
        summary: issue.summary.clone(),
        description: issue.description.clone(),
        due_date: issue.due_date.clone(),
        comment,
        assignee: issue
            .assignee_display
            .clone()
            .unwrap_or_else(|| config.bot.name.clone()),
        sync: SyncMark::Clear,
        status: String::new(),
        ..Record::default()
    };

    tracing::info!(key = %issue.key, sequence = record.sequence, "appending remote issue to sheet");
    sheet.push(record);
    counts.added += 1;
}

/// Merge a remote issue into the record already linked to it.
fn merge_record(
    record: &mut Record,
    issue: &RemoteIssue,
    tracker: &dyn Tracker,
    config: &Config,
    counts: &mut InboundCounts,
) {
    if record.is_done() {
        tracing::debug!(key = %issue.key, "record is done, frozen");
        return;
    }

    match record.ownership(&config.bot.name) {
        Ownership::Bot => {
            // Acknowledgment gate: a bot-owned record that is not pending is
            // already reconciled; touching it would fight an in-flight
            // outbound update.
            if !record.sync.is_pending() {
                tracing::debug!(key = %issue.key, "bot-owned and not pending, left alone");
                return;
            }

            if let Some(assignee_name) = &issue.assignee_display {
                if *assignee_name != record.assignee {
                    tracing::info!(key = %issue.key, assignee = %assignee_name, "assignee merged from tracker");
                    record.assignee = assignee_name.clone();
                    counts.merged += 1;
                }
            }

            match tracker.last_comment(&issue.key) {
                Ok(Some(remote_comment))
                    if !remote_comment.is_empty() && remote_comment != record.comment =>
                {
                    tracing::info!(key = %issue.key, "comment merged from tracker");
                    record.comment = remote_comment;
                    counts.merged += 1;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!(key = %issue.key, error = %e, "comment fetch failed");
                    counts.failed += 1;
                }
            }
        }
        Ownership::Human => {
            // Reclaim rule: a fresh remote comment on a human-owned record
            // returns it to the bot queue for the next outbound pass.
            match tracker.last_comment(&issue.key) {
                Ok(Some(remote_comment))
                    if !remote_comment.is_empty() && remote_comment != record.comment =>
                {
                    tracing::info!(key = %issue.key, "new remote comment, reclaiming for the bot");
                    record.comment = remote_comment;
                    record.assignee = config.bot.name.clone();
                    counts.merged += 1;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!(key = %issue.key, error = %e, "comment fetch failed");
                    counts.failed += 1;
                }
            }
        }
    }
}
