//! Backend abstraction used by the attendance view.
//!
//! [`AttendanceBackend`] is the seam between the view's reconciliation
//! logic and the network; [`AttendanceApi`] is the production
//! implementation.

use async_trait::async_trait;
use chrono::NaiveDate;

use rollcall_core::attendance::{RosterEntry, SaveRequest};
use rollcall_core::grades::Grade;

use crate::api::{ApiError, AttendanceApi, SaveResponse};

#[async_trait]
pub trait AttendanceBackend: Send + Sync {
    /// Roster rows for one class on one date.
    async fn fetch_roster(&self, grade: Grade, date: NaiveDate) -> Result<Vec<RosterEntry>, ApiError>;

    /// Upsert attendance rows; the backend is idempotent per student and date.
    async fn save_attendance(&self, request: &SaveRequest) -> Result<SaveResponse, ApiError>;
}

#[async_trait]
impl AttendanceBackend for AttendanceApi {
    async fn fetch_roster(&self, grade: Grade, date: NaiveDate) -> Result<Vec<RosterEntry>, ApiError> {
        AttendanceApi::fetch_roster(self, grade, date).await
    }

    async fn save_attendance(&self, request: &SaveRequest) -> Result<SaveResponse, ApiError> {
        AttendanceApi::save_attendance(self, request).await
    }
}
