//! Integration tests for per-row silent saves.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;

use common::{date, drain, eventually, student, view_with, FakeBackend};
use rollcall_core::attendance::{AttendanceEntry, AttendanceStatus};
use rollcall_core::grades::Grade;
use rollcall_core::CoreError;
use rollcall_view::ViewError;

// ---------------------------------------------------------------------------
// Test: setting the current status is a no-op
// ---------------------------------------------------------------------------

#[tokio::test]
async fn setting_current_status_sends_nothing() {
    let backend = Arc::new(FakeBackend::with_roster(vec![student(1, AttendanceStatus::Present)]));
    let (view, mut rx) = view_with(backend.clone());
    view.load(Grade::default(), date()).await.unwrap();
    let before = view.snapshot().await.records;

    let changed = view.set_status(1, AttendanceStatus::Present).await.unwrap();
    view.wait_idle().await;

    assert!(!changed);
    assert!(backend.saves().is_empty());
    assert_eq!(view.snapshot().await.records, before);
    assert!(drain(&mut rx).is_empty());
}

// ---------------------------------------------------------------------------
// Test: a successful silent save reconciles only that student
// ---------------------------------------------------------------------------

#[tokio::test]
async fn silent_save_reconciles_only_that_student() {
    let backend = Arc::new(FakeBackend::with_roster(vec![
        student(1, AttendanceStatus::None),
        student(2, AttendanceStatus::None),
    ]));
    let (view, mut rx) = view_with(backend.clone());
    view.load(Grade::default(), date()).await.unwrap();

    // Local edit to student 2 that is never saved.
    view.set_remarks(2, "pending").await.unwrap();
    assert!(view.set_status(1, AttendanceStatus::Absent).await.unwrap());
    view.wait_idle().await;

    let saves = backend.saves();
    assert_eq!(saves.len(), 1);
    assert_eq!(saves[0].date, date());
    assert_eq!(
        saves[0].records,
        vec![AttendanceEntry {
            student_id: 1,
            status: AttendanceStatus::Absent,
            remarks: String::new(),
        }]
    );

    let snapshot = view.snapshot().await;
    let first = snapshot.record(1).unwrap();
    assert_eq!(first.last_saved_status, first.status);
    assert_eq!(snapshot.record(2).unwrap().last_saved_status, AttendanceStatus::None);
    assert!(snapshot.saving.is_empty());

    // Silent: no success notification.
    assert!(drain(&mut rx).is_empty());
}

// ---------------------------------------------------------------------------
// Test: late + "Sick" from the dropdown posts one record with both
// ---------------------------------------------------------------------------

#[tokio::test]
async fn canned_remark_selection_posts_status_and_remark() {
    let backend = Arc::new(FakeBackend::with_roster(vec![student(10, AttendanceStatus::Present)]));
    let (view, _rx) = view_with(backend.clone());
    view.load(Grade::default(), date()).await.unwrap();

    view.set_status(10, AttendanceStatus::Late).await.unwrap();
    view.wait_idle().await;
    let after_toggle = backend.saves().len();

    view.select_remark(10, "sick").await.unwrap();
    view.wait_idle().await;

    let saves = backend.saves();
    assert_eq!(saves.len(), after_toggle + 1);
    assert_eq!(
        saves.last().unwrap().records,
        vec![AttendanceEntry {
            student_id: 10,
            status: AttendanceStatus::Late,
            remarks: "Sick".into(),
        }]
    );
}

#[tokio::test]
async fn free_text_remarks_wait_for_commit() {
    let backend = Arc::new(FakeBackend::with_roster(vec![student(3, AttendanceStatus::Leave)]));
    let (view, _rx) = view_with(backend.clone());
    view.load(Grade::default(), date()).await.unwrap();

    view.set_remarks(3, "wedding in the family").await.unwrap();
    view.wait_idle().await;
    assert!(backend.saves().is_empty());

    view.commit_remarks(3).await.unwrap();
    view.wait_idle().await;

    let saves = backend.saves();
    assert_eq!(saves.len(), 1);
    assert_eq!(saves[0].records[0].remarks, "wedding in the family");
    assert_eq!(saves[0].records[0].status, AttendanceStatus::Leave);
}

#[tokio::test]
async fn unknown_canned_remark_is_rejected() {
    let backend = Arc::new(FakeBackend::with_roster(vec![student(3, AttendanceStatus::Late)]));
    let (view, _rx) = view_with(backend.clone());
    view.load(Grade::default(), date()).await.unwrap();

    assert_matches!(
        view.select_remark(3, "abducted by aliens").await,
        Err(ViewError::Core(CoreError::Validation(_)))
    );
    assert_matches!(
        view.set_status(42, AttendanceStatus::Late).await,
        Err(ViewError::Core(CoreError::NotFound { id: 42, .. }))
    );
    assert!(backend.saves().is_empty());
}

// ---------------------------------------------------------------------------
// Test: the saving indicator tracks in-flight requests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn student_is_saving_while_request_in_flight() {
    let (backend, gate) = FakeBackend::gated(vec![
        student(1, AttendanceStatus::None),
        student(2, AttendanceStatus::None),
    ]);
    let backend = Arc::new(backend);
    let (view, _rx) = view_with(backend.clone());
    view.load(Grade::default(), date()).await.unwrap();

    view.set_status(1, AttendanceStatus::Present).await.unwrap();
    eventually(|| backend.saves().len() == 1).await;

    let snapshot = view.snapshot().await;
    assert!(snapshot.is_saving(1));
    assert!(!snapshot.is_saving(2));
    assert!(snapshot.record(1).unwrap().is_dirty());

    gate.add_permits(1);
    view.wait_idle().await;

    let snapshot = view.snapshot().await;
    assert!(!snapshot.is_saving(1));
    assert!(!snapshot.record(1).unwrap().is_dirty());
    assert_eq!(backend.completed_saves(), 1);
}

// ---------------------------------------------------------------------------
// Test: a failed silent save leaves the row dirty and is not retried
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_silent_save_leaves_row_dirty() {
    let backend = Arc::new(FakeBackend::with_roster(vec![student(1, AttendanceStatus::Present)]));
    backend.fail_saves(400);
    let (view, mut rx) = view_with(backend.clone());
    view.load(Grade::default(), date()).await.unwrap();

    view.set_status(1, AttendanceStatus::Absent).await.unwrap();
    view.wait_idle().await;

    let snapshot = view.snapshot().await;
    let record = snapshot.record(1).unwrap();
    assert_eq!(record.status, AttendanceStatus::Absent);
    assert_eq!(record.last_saved_status, AttendanceStatus::Present);
    assert!(record.is_dirty());
    assert!(!snapshot.is_saving(1));
    assert_eq!(backend.saves().len(), 1);

    let notes = drain(&mut rx);
    assert_eq!(notes.len(), 1);
    assert!(notes[0].is_error());
    assert_eq!(notes[0].student_id, Some(1));
}
