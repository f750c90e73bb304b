#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::{broadcast, Semaphore};

use rollcall_client::{ApiError, AttendanceBackend, SaveResponse};
use rollcall_core::attendance::{AttendanceStatus, RosterEntry, SaveRequest};
use rollcall_core::grades::Grade;
use rollcall_core::types::StudentId;
use rollcall_events::{EventBus, Notification};
use rollcall_view::AttendanceView;

/// In-memory backend that records every request it receives.
#[derive(Default)]
pub struct FakeBackend {
    roster: Mutex<Vec<RosterEntry>>,
    fetch_status: Mutex<Option<u16>>,
    save_status: Mutex<Option<u16>>,
    saves: Mutex<Vec<SaveRequest>>,
    fetches: Mutex<Vec<(String, NaiveDate)>>,
    completed_saves: AtomicUsize,
    /// When set, saves block until a permit is added.
    gate: Option<Arc<Semaphore>>,
}

impl FakeBackend {
    pub fn with_roster(roster: Vec<RosterEntry>) -> Self {
        Self {
            roster: Mutex::new(roster),
            ..Default::default()
        }
    }

    /// Saves wait on the returned semaphore before answering.
    pub fn gated(roster: Vec<RosterEntry>) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let backend = Self {
            roster: Mutex::new(roster),
            gate: Some(gate.clone()),
            ..Default::default()
        };
        (backend, gate)
    }

    pub fn fail_fetch(&self, status: u16) {
        *self.fetch_status.lock().unwrap() = Some(status);
    }

    pub fn fail_saves(&self, status: u16) {
        *self.save_status.lock().unwrap() = Some(status);
    }

    pub fn set_roster(&self, roster: Vec<RosterEntry>) {
        *self.roster.lock().unwrap() = roster;
    }

    /// Every save request issued, in order of arrival.
    pub fn saves(&self) -> Vec<SaveRequest> {
        self.saves.lock().unwrap().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.lock().unwrap().len()
    }

    pub fn completed_saves(&self) -> usize {
        self.completed_saves.load(Ordering::SeqCst)
    }
}

fn api_error(status: u16) -> ApiError {
    ApiError::Api {
        status,
        body: r#"{"error": "backend unavailable"}"#.to_string(),
    }
}

#[async_trait]
impl AttendanceBackend for FakeBackend {
    async fn fetch_roster(&self, grade: Grade, date: NaiveDate) -> Result<Vec<RosterEntry>, ApiError> {
        self.fetches.lock().unwrap().push((grade.code().to_string(), date));
        if let Some(status) = *self.fetch_status.lock().unwrap() {
            return Err(api_error(status));
        }
        Ok(self.roster.lock().unwrap().clone())
    }

    async fn save_attendance(&self, request: &SaveRequest) -> Result<SaveResponse, ApiError> {
        self.saves.lock().unwrap().push(request.clone());
        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }
        self.completed_saves.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = *self.save_status.lock().unwrap() {
            return Err(api_error(status));
        }
        Ok(SaveResponse {
            message: Some(format!("Attendance recorded for {} students", request.records.len())),
        })
    }
}

pub fn student(id: StudentId, status: AttendanceStatus) -> RosterEntry {
    RosterEntry {
        student_id: id,
        student_name: format!("Student {id}"),
        status,
        remarks: None,
        student_image: None,
    }
}

pub fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 2).unwrap()
}

pub fn view_with(backend: Arc<FakeBackend>) -> (AttendanceView, broadcast::Receiver<Notification>) {
    let bus = Arc::new(EventBus::default());
    let rx = bus.subscribe();
    (AttendanceView::new(backend, bus), rx)
}

/// Drain every notification published so far.
pub fn drain(rx: &mut broadcast::Receiver<Notification>) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(n) = rx.try_recv() {
        out.push(n);
    }
    out
}

/// Poll until `cond` holds, yielding to spawned tasks in between.
pub async fn eventually<F>(mut cond: F)
where
    F: FnMut() -> bool,
{
    for _ in 0..200 {
        if cond() {
            return;
        }
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}
