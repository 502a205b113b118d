//! Worker integration tests against a real on-disk store.
//!
//! Mirrors the operational contract end to end: seed obligations, run a
//! pass, and verify exactly one new transaction per due obligation with a
//! strictly advanced due date.

use std::path::Path;
use std::time::Duration;

use chrono::NaiveDate;
use recurd::domain::Frequency;
use recurd::store::{DueStore, ObligationStore};
use recurd::worker::{ShutdownFlag, run_pass};
use tempfile::TempDir;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// Corrupt an obligation's frequency column through a second connection,
/// so materialize fails while selector eligibility is untouched.
fn break_frequency(db_path: &Path, id: i64) {
    let raw = rusqlite::Connection::open(db_path).unwrap();
    raw.execute("UPDATE obligations SET frequency = 'sometimes' WHERE id = ?1", [id])
        .unwrap();
}

/// Integration test: a due obligation gets exactly one new transaction
/// and its due date strictly advances.
#[test]
fn test_pass_materializes_due_obligation() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = ObligationStore::open(&temp_dir.path().join("recurd.db")).unwrap();

    let id = store
        .insert("Rent", 1200.0, Frequency::Monthly, d(2024, 1, 1))
        .unwrap();

    // Current date five days past due
    let summary = run_pass(&mut store, d(2024, 1, 5));

    assert_eq!(summary.selected, 1);
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.failed, 0);

    assert_eq!(store.transaction_count(id).unwrap(), 1);
    let obligation = store.get(id).unwrap().unwrap();
    assert_eq!(obligation.next_due_date, d(2024, 2, 1));
    assert!(obligation.next_due_date > d(2024, 1, 1));
}

/// Integration test: inactive obligations are never selected regardless
/// of how overdue they are.
#[test]
fn test_pass_skips_inactive_obligation() {
    let mut store = ObligationStore::open_in_memory().unwrap();

    let id = store
        .insert("Cancelled sub", 9.99, Frequency::Monthly, d(2024, 1, 1))
        .unwrap();
    store.set_active(id, false).unwrap();

    let summary = run_pass(&mut store, d(2024, 6, 1));
    assert_eq!(summary.selected, 0);
    assert_eq!(store.transaction_count(id).unwrap(), 0);
}

/// Integration test: a failing obligation does not block the rest of the
/// due set, and stays due for the next pass.
#[test]
fn test_pass_isolates_per_obligation_failure() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("recurd.db");
    let mut store = ObligationStore::open(&db_path).unwrap();

    let broken = store
        .insert("Broken", 10.0, Frequency::Monthly, d(2024, 1, 1))
        .unwrap();
    let healthy = store
        .insert("Healthy", 20.0, Frequency::Monthly, d(2024, 1, 1))
        .unwrap();
    break_frequency(&db_path, broken);

    let summary = run_pass(&mut store, d(2024, 1, 5));

    assert_eq!(summary.selected, 2);
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.failed, 1);

    // Healthy one advanced, broken one untouched and still due
    assert_eq!(store.transaction_count(healthy).unwrap(), 1);
    assert_eq!(store.transaction_count(broken).unwrap(), 0);
    let still_due = store.select_due(d(2024, 1, 5)).unwrap();
    assert_eq!(still_due, vec![broken]);
}

/// Integration test: consecutive passes re-select an obligation whose
/// materialization keeps failing, with no retry state in between.
#[test]
fn test_failed_obligation_retried_next_pass() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("recurd.db");
    let mut store = ObligationStore::open(&db_path).unwrap();

    let broken = store
        .insert("Broken", 10.0, Frequency::Monthly, d(2024, 1, 1))
        .unwrap();
    break_frequency(&db_path, broken);

    let first = run_pass(&mut store, d(2024, 1, 5));
    let second = run_pass(&mut store, d(2024, 1, 5));

    assert_eq!(first.failed, 1);
    assert_eq!(second.failed, 1);
    assert_eq!(store.transaction_count(broken).unwrap(), 0);
}

/// Integration test: the run loop drains the due set and stops once the
/// shutdown flag is set, leaving no partial state.
#[tokio::test]
async fn test_run_loop_with_real_store_and_shutdown() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("recurd.db");

    let id = {
        let store = ObligationStore::open(&db_path).unwrap();
        store
            .insert("Rent", 1200.0, Frequency::Monthly, d(2020, 1, 1))
            .unwrap()
    };

    let store = ObligationStore::open(&db_path).unwrap();
    let shutdown = ShutdownFlag::new();

    let stopper = shutdown.clone();
    let stop_task = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        stopper.request();
    });

    let state = tokio::time::timeout(
        Duration::from_secs(5),
        recurd::worker::run(store, Duration::from_secs(3600), shutdown),
    )
    .await
    .expect("worker should stop after shutdown request");
    stop_task.await.unwrap();

    // Long interval: exactly one pass ran before the flag cut the sleep
    assert_eq!(state.pass_count, 1);
    assert_eq!(state.total_processed, 1);

    let store = ObligationStore::open(&db_path).unwrap();
    assert_eq!(store.transaction_count(id).unwrap(), 1);
    let obligation = store.get(id).unwrap().unwrap();
    assert!(obligation.next_due_date > d(2020, 1, 1));
}
