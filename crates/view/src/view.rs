//! Attendance reconciliation view.
//!
//! [`AttendanceView`] loads a roster, applies edits to it optimistically and
//! persists them:
//!
//! - status toggles and remark commits are *silent saves*: one-record
//!   requests spawned in the background, no success notification;
//! - "save all" and [`AttendanceView::mark_all`] are *bulk saves*: the whole
//!   roster in one awaited request, reported on the notification bus.
//!
//! A row's snapshot only moves once the backend acknowledges it. Failed
//! saves are never retried and never roll back local edits.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tokio::sync::Mutex;
use tokio_util::task::TaskTracker;

use rollcall_client::AttendanceBackend;
use rollcall_core::attendance::{AttendanceEntry, AttendanceStatus, SaveRequest};
use rollcall_core::grades::{validate_attendance_date, Grade};
use rollcall_core::remarks;
use rollcall_core::roster::{Roster, RosterKey};
use rollcall_core::types::StudentId;
use rollcall_events::{EventBus, Notification};

use crate::error::{failure_message, ViewError};
use crate::state::{SaveTicket, ViewSnapshot, ViewState};

/// Fallback success text when the backend sends no `message`.
const DEFAULT_SAVED_MESSAGE: &str = "Attendance saved successfully!";

const FETCH_FAILED: &str = "Failed to fetch students.";
const SAVE_FAILED: &str = "Failed to save attendance.";

/// Handle to one attendance view. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct AttendanceView {
    shared: Arc<Shared>,
}

struct Shared {
    backend: Arc<dyn AttendanceBackend>,
    bus: Arc<EventBus>,
    state: Mutex<ViewState>,
    /// Background silent saves.
    tasks: TaskTracker,
}

impl AttendanceView {
    pub fn new(backend: Arc<dyn AttendanceBackend>, bus: Arc<EventBus>) -> Self {
        Self {
            shared: Arc::new(Shared {
                backend,
                bus,
                state: Mutex::new(ViewState::default()),
                tasks: TaskTracker::new(),
            }),
        }
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.shared.bus
    }

    pub async fn snapshot(&self) -> ViewSnapshot {
        self.shared.state.lock().await.snapshot()
    }

    // ---- roster loader ----

    /// Load the roster of `grade` for `date`, replacing the current one.
    ///
    /// A fetch still in flight for the previous roster is cancelled; saves
    /// already sent complete but their responses are discarded. On
    /// failure the roster is left empty and an error notification is
    /// published; nothing is retried. Returns the number of students.
    pub async fn load(&self, grade: Grade, date: NaiveDate) -> Result<usize, ViewError> {
        validate_attendance_date(date, Local::now().date_naive())?;
        let key = RosterKey::new(grade, date);

        let ticket = self.shared.state.lock().await.begin_session(key);
        tracing::info!(grade = %grade, date = %date, "Loading roster");

        let result = tokio::select! {
            _ = ticket.cancel.cancelled() => return Err(ViewError::Superseded(key)),
            result = self.shared.backend.fetch_roster(grade, date) => result,
        };

        let mut state = self.shared.state.lock().await;
        if !state.is_current(&ticket) {
            return Err(ViewError::Superseded(key));
        }

        match result {
            Ok(entries) => {
                let roster = Roster::new(key, entries);
                let count = roster.len();
                state.finish_loading(roster);
                tracing::info!(grade = %grade, date = %date, students = count, "Roster loaded");
                Ok(count)
            }
            Err(e) => {
                state.finish_loading(Roster::empty(key));
                tracing::error!(grade = %grade, date = %date, error = %e, "Failed to fetch roster");
                self.shared.bus.publish(Notification::error(failure_message(FETCH_FAILED, &e)));
                Err(e.into())
            }
        }
    }

    // ---- local edit buffer ----

    /// Set one student's status and save it silently.
    ///
    /// Returns `Ok(false)` and sends nothing when the status is unchanged.
    pub async fn set_status(
        &self,
        student_id: StudentId,
        status: AttendanceStatus,
    ) -> Result<bool, ViewError> {
        let (ticket, entry) = {
            let mut state = self.shared.state.lock().await;
            let roster = state.roster_mut()?;
            if !roster.set_status(student_id, status)? {
                return Ok(false);
            }
            let entry = roster.entry(student_id)?;
            state.begin_save(student_id);
            (state.current_ticket()?, entry)
        };

        tracing::debug!(student_id, status = %status, "Status changed");
        self.spawn_silent_save(ticket, entry);
        Ok(true)
    }

    /// Edit one student's remarks locally. Nothing is sent until
    /// [`commit_remarks`](Self::commit_remarks).
    pub async fn set_remarks(
        &self,
        student_id: StudentId,
        remarks: impl Into<String>,
    ) -> Result<(), ViewError> {
        let mut state = self.shared.state.lock().await;
        state.roster_mut()?.set_remarks(student_id, remarks)?;
        Ok(())
    }

    /// Silently save one student's current status and remarks (the Enter
    /// key on the free-text field).
    pub async fn commit_remarks(&self, student_id: StudentId) -> Result<(), ViewError> {
        let (ticket, entry) = {
            let mut state = self.shared.state.lock().await;
            let entry = state.roster()?.entry(student_id)?;
            state.begin_save(student_id);
            (state.current_ticket()?, entry)
        };

        self.spawn_silent_save(ticket, entry);
        Ok(())
    }

    /// Pick a canned remark from the dropdown: set it and save at once.
    pub async fn select_remark(&self, student_id: StudentId, remark: &str) -> Result<(), ViewError> {
        let remark = remarks::canned(remark).ok_or_else(|| {
            rollcall_core::CoreError::Validation(format!("'{remark}' is not a canned remark"))
        })?;

        let (ticket, entry) = {
            let mut state = self.shared.state.lock().await;
            let roster = state.roster_mut()?;
            roster.set_remarks(student_id, remark)?;
            let entry = roster.entry(student_id)?;
            state.begin_save(student_id);
            (state.current_ticket()?, entry)
        };

        self.spawn_silent_save(ticket, entry);
        Ok(())
    }

    // ---- bulk marker ----

    /// Mark every unmarked student as `status`.
    ///
    /// [`AttendanceStatus::None`] resets the whole roster locally without
    /// touching the network. Any other status is saved in bulk straight
    /// away, using the roster as just computed. Returns the number of rows
    /// that changed.
    pub async fn mark_all(&self, status: AttendanceStatus) -> Result<usize, ViewError> {
        let (ticket, request, changed) = {
            let mut state = self.shared.state.lock().await;

            if !status.is_marked() {
                let changed = state.roster_mut()?.mark_all(status);
                tracing::info!(changed, "Roster reset");
                self.shared.bus.publish(Notification::success("Roster unmarked/reset"));
                return Ok(changed);
            }

            if state.is_bulk_saving() {
                return Err(ViewError::SaveInProgress);
            }
            let roster = state.roster_mut()?;
            let changed = roster.mark_all(status);
            if roster.is_empty() {
                return Ok(0);
            }
            let request = roster.save_request();
            state.begin_bulk(&student_ids(&request))?;
            (state.current_ticket()?, request, changed)
        };

        tracing::info!(status = %status, changed, "Marked all unmarked students");
        self.bulk_save(ticket, request, Some(format!("Marked everyone as {status}")))
            .await?;
        Ok(changed)
    }

    // ---- save dispatcher ----

    /// Save the whole roster in one request.
    ///
    /// Returns `Ok(None)` without sending anything when the roster is empty,
    /// otherwise the backend's confirmation message.
    pub async fn save_all(&self) -> Result<Option<String>, ViewError> {
        let (ticket, request) = {
            let mut state = self.shared.state.lock().await;
            let roster = state.roster()?;
            if roster.is_empty() {
                return Ok(None);
            }
            let request = roster.save_request();
            state.begin_bulk(&student_ids(&request))?;
            (state.current_ticket()?, request)
        };

        self.bulk_save(ticket, request, None).await.map(Some)
    }

    /// Wait until every background silent save has finished.
    pub async fn wait_idle(&self) {
        self.shared.tasks.close();
        self.shared.tasks.wait().await;
        self.shared.tasks.reopen();
    }

    fn spawn_silent_save(&self, ticket: SaveTicket, entry: AttendanceEntry) {
        let view = self.clone();
        self.shared.tasks.spawn(async move {
            view.silent_save(ticket, entry).await;
        });
    }

    async fn silent_save(&self, ticket: SaveTicket, entry: AttendanceEntry) {
        let student_id = entry.student_id;
        let request = SaveRequest::single(ticket.date(), entry);

        // Requests always run to completion; only a stale response is dropped.
        let result = self.shared.backend.save_attendance(&request).await;

        let mut state = self.shared.state.lock().await;
        if !state.is_current(&ticket) {
            tracing::debug!(student_id, roster = %ticket.key, "Discarding response for superseded roster");
            return;
        }
        state.end_save(student_id);

        match result {
            Ok(_) => match state.roster_mut() {
                Ok(roster) => {
                    roster.confirm_all(&request.records);
                    tracing::debug!(student_id, "Silent save acknowledged");
                }
                Err(e) => tracing::warn!(student_id, error = %e, "Acknowledged save has no roster to reconcile"),
            },
            Err(e) => {
                tracing::warn!(student_id, error = %e, "Silent save failed");
                self.shared
                    .bus
                    .publish(Notification::error(failure_message(SAVE_FAILED, &e)).for_student(student_id));
            }
        }
    }

    async fn bulk_save(
        &self,
        ticket: SaveTicket,
        request: SaveRequest,
        success_message: Option<String>,
    ) -> Result<String, ViewError> {
        let ids = student_ids(&request);
        tracing::info!(roster = %ticket.key, records = ids.len(), "Saving roster");

        let result = self.shared.backend.save_attendance(&request).await;

        let mut state = self.shared.state.lock().await;
        if !state.is_current(&ticket) {
            tracing::debug!(roster = %ticket.key, "Discarding bulk response for superseded roster");
            return Err(ViewError::Superseded(ticket.key));
        }
        state.end_bulk(&ids);

        match result {
            Ok(response) => {
                state.roster_mut()?.confirm_all(&request.records);
                let message = success_message
                    .or(response.message)
                    .unwrap_or_else(|| DEFAULT_SAVED_MESSAGE.to_string());
                tracing::info!(roster = %ticket.key, records = ids.len(), "Roster saved");
                self.shared.bus.publish(Notification::success(message.clone()));
                Ok(message)
            }
            Err(e) => {
                tracing::error!(roster = %ticket.key, error = %e, "Bulk save failed");
                self.shared.bus.publish(Notification::error(failure_message(SAVE_FAILED, &e)));
                Err(e.into())
            }
        }
    }
}

fn student_ids(request: &SaveRequest) -> Vec<StudentId> {
    request.records.iter().map(|r| r.student_id).collect()
}
