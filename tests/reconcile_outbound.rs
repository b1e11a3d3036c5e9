//! Outbound reconciler behavior against a scripted tracker.

mod common;

use common::{FakeTracker, keyed_record, pending_record, test_config};
use sheetsync::model::SyncMark;
use sheetsync::sheet::Sheet;
use sheetsync::sync::outbound;

#[test]
fn create_stamps_key_url_assignee_and_clears_pending() {
    common::init_test_logging();
    let config = test_config();
    let tracker = FakeTracker::new().with_create_key("PROJ-42");

    let mut sheet = Sheet::new();
    sheet.push(pending_record(1, "Fix login"));

    let counts = outbound::run(&mut sheet, &tracker, &config);
    assert_eq!(counts.created, 1);
    assert_eq!(counts.failed, 0);

    let record = &sheet.records()[0];
    assert_eq!(record.remote_key(), Some("PROJ-42"));
    assert_eq!(
        record.remote_url.as_deref(),
        Some("https://tracker.example.com/browse/PROJ-42")
    );
    assert_eq!(record.sync, SyncMark::Clear);
    assert_eq!(record.assignee, "Harada, Naohisa (uig17323)");

    let calls = tracker.calls();
    assert!(matches!(
        &calls[0],
        common::Call::CreateIssue { summary } if summary == "[PROJ] Fix login"
    ));
}

#[test]
fn create_is_idempotent_across_runs() {
    common::init_test_logging();
    let config = test_config();
    let tracker = FakeTracker::new().with_create_key("PROJ-42");

    let mut sheet = Sheet::new();
    sheet.push(pending_record(1, "Fix login"));

    outbound::run(&mut sheet, &tracker, &config);
    // Second run sees the stored key and the cleared mark; nothing to push.
    let counts = outbound::run(&mut sheet, &tracker, &config);

    assert_eq!(tracker.count_creates(), 1);
    assert_eq!(tracker.count_updates(), 0);
    assert_eq!(counts.created, 0);
    assert_eq!(counts.skipped, 1);
}

#[test]
fn create_failure_leaves_the_record_pending() {
    common::init_test_logging();
    let config = test_config();
    let tracker = FakeTracker {
        fail_create: true,
        ..FakeTracker::new()
    };

    let mut sheet = Sheet::new();
    sheet.push(pending_record(1, "Fix login"));
    sheet.push(pending_record(2, "Second item"));

    let counts = outbound::run(&mut sheet, &tracker, &config);

    assert_eq!(counts.failed, 2);
    assert_eq!(sheet.records()[0].sync, SyncMark::Pending);
    assert_eq!(sheet.records()[0].remote_url, None);
    // The loop reached the sibling record despite the first failure.
    assert_eq!(tracker.count_creates(), 2);
}

#[test]
fn staged_comment_is_appended_exactly_once_on_create() {
    common::init_test_logging();
    let config = test_config();
    let tracker = FakeTracker::new().with_create_key("PROJ-42");

    let mut sheet = Sheet::new();
    let mut record = pending_record(1, "Fix login");
    record.comment = "please prioritize".to_string();
    sheet.push(record);

    outbound::run(&mut sheet, &tracker, &config);

    assert_eq!(tracker.count_comment_adds(), 1);
    let calls = tracker.calls();
    assert!(matches!(
        &calls[1],
        common::Call::AddComment { key, body } if key == "PROJ-42" && body == "please prioritize"
    ));
}

#[test]
fn human_owned_record_is_never_pushed() {
    common::init_test_logging();
    let config = test_config();
    let tracker = FakeTracker::new();

    let mut sheet = Sheet::new();
    sheet.push(keyed_record(1, "Fix login", "PROJ-7", "Sato, Yui (uid991)"));

    let counts = outbound::run(&mut sheet, &tracker, &config);

    assert_eq!(tracker.count_updates(), 0);
    assert!(tracker.calls().is_empty());
    assert_eq!(counts.skipped, 1);
    // The pending mark survives; only the tracker may hand the record back.
    assert_eq!(sheet.records()[0].sync, SyncMark::Pending);
}

#[test]
fn update_skips_the_comment_call_when_remote_matches() {
    common::init_test_logging();
    let config = test_config();
    let tracker = FakeTracker::new()
        .with_last_comment("PROJ-7", "already there")
        .with_assignee("PROJ-7", "Harada, Naohisa (uig17323)");

    let mut sheet = Sheet::new();
    let mut record = keyed_record(1, "Fix login", "PROJ-7", "subaru");
    record.comment = "already there".to_string();
    sheet.push(record);

    let counts = outbound::run(&mut sheet, &tracker, &config);

    assert_eq!(counts.updated, 1);
    assert_eq!(tracker.count_updates(), 1);
    assert_eq!(tracker.count_comment_adds(), 0);
    // Assignee refreshed from the tracker after the update.
    assert_eq!(sheet.records()[0].assignee, "Harada, Naohisa (uig17323)");
    assert_eq!(sheet.records()[0].sync, SyncMark::Clear);
}

#[test]
fn update_appends_the_comment_when_remote_differs() {
    common::init_test_logging();
    let config = test_config();
    let tracker = FakeTracker::new().with_last_comment("PROJ-7", "older remark");

    let mut sheet = Sheet::new();
    let mut record = keyed_record(1, "Fix login", "PROJ-7", "subaru");
    record.comment = "new findings".to_string();
    sheet.push(record);

    outbound::run(&mut sheet, &tracker, &config);

    assert_eq!(tracker.count_comment_adds(), 1);
}

#[test]
fn update_failure_keeps_the_pending_mark() {
    common::init_test_logging();
    let config = test_config();
    let tracker = FakeTracker {
        fail_update: true,
        ..FakeTracker::new()
    };

    let mut sheet = Sheet::new();
    sheet.push(keyed_record(1, "Fix login", "PROJ-7", "subaru"));

    let counts = outbound::run(&mut sheet, &tracker, &config);

    assert_eq!(counts.failed, 1);
    assert_eq!(sheet.records()[0].sync, SyncMark::Pending);
}

#[test]
fn done_record_is_frozen() {
    common::init_test_logging();
    let config = test_config();
    let tracker = FakeTracker::new();

    let mut sheet = Sheet::new();
    let mut record = keyed_record(1, "Fix login", "PROJ-7", "subaru");
    record.status = "Done".to_string();
    sheet.push(record.clone());

    outbound::run(&mut sheet, &tracker, &config);

    assert!(tracker.calls().is_empty());
    assert_eq!(sheet.records()[0], record);
}

#[test]
fn cleared_record_is_skipped_silently() {
    common::init_test_logging();
    let config = test_config();
    let tracker = FakeTracker::new();

    let mut sheet = Sheet::new();
    let mut record = keyed_record(1, "Fix login", "PROJ-7", "subaru");
    record.sync = SyncMark::Clear;
    sheet.push(record);

    let counts = outbound::run(&mut sheet, &tracker, &config);

    assert!(tracker.calls().is_empty());
    assert_eq!(counts.skipped, 1);
}

#[test]
fn rows_are_visited_in_sequence_order_with_gaps_skipped() {
    common::init_test_logging();
    let config = test_config();
    let tracker = FakeTracker::new();

    let mut sheet = Sheet::new();
    sheet.push(pending_record(5, "late row"));
    sheet.push(pending_record(2, "early row"));

    outbound::run(&mut sheet, &tracker, &config);

    let calls = tracker.calls();
    assert_eq!(calls.len(), 2);
    assert!(matches!(
        &calls[0],
        common::Call::CreateIssue { summary } if summary == "[PROJ] early row"
    ));
    assert!(matches!(
        &calls[1],
        common::Call::CreateIssue { summary } if summary == "[PROJ] late row"
    ));
}
