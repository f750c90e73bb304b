//! Mutable state behind the attendance view's lock.
//!
//! Every roster load opens a new session. Requests carry a [`SaveTicket`]
//! naming the session they were issued in; results for any other session
//! are dropped on arrival.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;

use rollcall_core::attendance::AttendanceRecord;
use rollcall_core::roster::{Roster, RosterKey};
use rollcall_core::types::StudentId;

use crate::error::ViewError;

/// Identifies the session a request belongs to.
#[derive(Debug, Clone)]
pub(crate) struct SaveTicket {
    pub session: u64,
    pub key: RosterKey,
    pub cancel: CancellationToken,
}

impl SaveTicket {
    pub fn date(&self) -> NaiveDate {
        self.key.date
    }
}

#[derive(Debug, Default)]
pub(crate) struct ViewState {
    session: u64,
    cancel: CancellationToken,
    roster: Option<Roster>,
    /// In-flight save count per student; a student is "saving" while > 0.
    in_flight: HashMap<StudentId, usize>,
    bulk_saving: bool,
    loading: bool,
}

impl ViewState {
    /// Start a new session for `key`, cancelling the previous roster fetch
    /// and discarding its roster. Saves already sent still complete, but
    /// their responses no longer match the session.
    pub fn begin_session(&mut self, key: RosterKey) -> SaveTicket {
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        self.session += 1;
        self.roster = Some(Roster::empty(key));
        self.in_flight.clear();
        self.bulk_saving = false;
        self.loading = true;
        self.ticket(key)
    }

    fn ticket(&self, key: RosterKey) -> SaveTicket {
        SaveTicket {
            session: self.session,
            key,
            cancel: self.cancel.clone(),
        }
    }

    /// Ticket for a request issued against the current roster.
    pub fn current_ticket(&self) -> Result<SaveTicket, ViewError> {
        let key = self.roster.as_ref().ok_or(ViewError::NoRoster)?.key();
        Ok(self.ticket(key))
    }

    pub fn is_current(&self, ticket: &SaveTicket) -> bool {
        self.session == ticket.session
    }

    pub fn finish_loading(&mut self, roster: Roster) {
        self.roster = Some(roster);
        self.loading = false;
    }

    pub fn roster(&self) -> Result<&Roster, ViewError> {
        self.roster.as_ref().ok_or(ViewError::NoRoster)
    }

    pub fn roster_mut(&mut self) -> Result<&mut Roster, ViewError> {
        self.roster.as_mut().ok_or(ViewError::NoRoster)
    }

    pub fn begin_save(&mut self, student_id: StudentId) {
        *self.in_flight.entry(student_id).or_insert(0) += 1;
    }

    pub fn end_save(&mut self, student_id: StudentId) {
        if let Some(count) = self.in_flight.get_mut(&student_id) {
            *count -= 1;
            if *count == 0 {
                self.in_flight.remove(&student_id);
            }
        }
    }

    /// Mark a bulk save as started; fails if one is already running.
    pub fn begin_bulk(&mut self, students: &[StudentId]) -> Result<(), ViewError> {
        if self.bulk_saving {
            return Err(ViewError::SaveInProgress);
        }
        self.bulk_saving = true;
        for id in students {
            self.begin_save(*id);
        }
        Ok(())
    }

    pub fn end_bulk(&mut self, students: &[StudentId]) {
        self.bulk_saving = false;
        for id in students {
            self.end_save(*id);
        }
    }

    pub fn is_bulk_saving(&self) -> bool {
        self.bulk_saving
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            key: self.roster.as_ref().map(Roster::key),
            records: self
                .roster
                .as_ref()
                .map(|r| r.records().to_vec())
                .unwrap_or_default(),
            saving: self.in_flight.keys().copied().collect(),
            bulk_saving: self.bulk_saving,
            loading: self.loading,
        }
    }
}

/// Point-in-time copy of what the view would render.
#[derive(Debug, Clone, Default)]
pub struct ViewSnapshot {
    pub key: Option<RosterKey>,
    pub records: Vec<AttendanceRecord>,
    /// Students with at least one save in flight.
    pub saving: HashSet<StudentId>,
    pub bulk_saving: bool,
    pub loading: bool,
}

impl ViewSnapshot {
    pub fn record(&self, student_id: StudentId) -> Option<&AttendanceRecord> {
        self.records.iter().find(|r| r.student_id == student_id)
    }

    pub fn is_saving(&self, student_id: StudentId) -> bool {
        self.saving.contains(&student_id)
    }
}
