//! Local edit buffer for one class on one date.
//!
//! [`Roster`] owns the editable [`AttendanceRecord`]s. Status and remarks
//! edits land here immediately; the acknowledged snapshot
//! (`last_saved_status`) only moves through [`Roster::confirm_saved`] /
//! [`Roster::confirm_all`], which callers invoke once the backend has
//! accepted a save.

use std::fmt;

use chrono::NaiveDate;

use crate::attendance::{AttendanceEntry, AttendanceRecord, AttendanceStatus, RosterEntry, SaveRequest};
use crate::error::CoreError;
use crate::grades::Grade;
use crate::types::StudentId;

/// Identifies the roster being marked: one class on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RosterKey {
    pub grade: Grade,
    pub date: NaiveDate,
}

impl RosterKey {
    pub fn new(grade: Grade, date: NaiveDate) -> Self {
        Self { grade, date }
    }
}

impl fmt::Display for RosterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.grade, self.date)
    }
}

#[derive(Debug, Clone)]
pub struct Roster {
    key: RosterKey,
    records: Vec<AttendanceRecord>,
}

impl Roster {
    /// Seed a roster from backend rows; each row's status becomes its snapshot.
    pub fn new(key: RosterKey, entries: Vec<RosterEntry>) -> Self {
        Self {
            key,
            records: entries.into_iter().map(AttendanceRecord::from).collect(),
        }
    }

    pub fn empty(key: RosterKey) -> Self {
        Self {
            key,
            records: Vec::new(),
        }
    }

    pub fn key(&self) -> RosterKey {
        self.key
    }

    pub fn records(&self) -> &[AttendanceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, student_id: StudentId) -> Option<&AttendanceRecord> {
        self.records.iter().find(|r| r.student_id == student_id)
    }

    fn get_mut(&mut self, student_id: StudentId) -> Result<&mut AttendanceRecord, CoreError> {
        self.records
            .iter_mut()
            .find(|r| r.student_id == student_id)
            .ok_or(CoreError::NotFound {
                entity: "student",
                id: student_id,
            })
    }

    /// Set one student's status.
    ///
    /// Returns `Ok(false)` without touching anything when the status is
    /// already `status`.
    pub fn set_status(
        &mut self,
        student_id: StudentId,
        status: AttendanceStatus,
    ) -> Result<bool, CoreError> {
        let record = self.get_mut(student_id)?;
        if record.status == status {
            return Ok(false);
        }
        record.status = status;
        Ok(true)
    }

    /// Replace one student's remarks. Local only.
    pub fn set_remarks(&mut self, student_id: StudentId, remarks: impl Into<String>) -> Result<(), CoreError> {
        self.get_mut(student_id)?.remarks = remarks.into();
        Ok(())
    }

    /// Apply `status` to every unmarked student, or to everyone when
    /// `status` is [`AttendanceStatus::None`].
    ///
    /// Remarks of the affected rows are cleared when the status is
    /// `present` or `none`. Returns the number of rows changed.
    pub fn mark_all(&mut self, status: AttendanceStatus) -> usize {
        let reset = !status.is_marked();
        let mut changed = 0;

        for record in &mut self.records {
            if !reset && record.status.is_marked() {
                continue;
            }
            let mut touched = record.status != status;
            record.status = status;
            if status.clears_remarks() && !record.remarks.is_empty() {
                record.remarks.clear();
                touched = true;
            }
            if touched {
                changed += 1;
            }
        }

        changed
    }

    /// Payload row for one student's current local state.
    pub fn entry(&self, student_id: StudentId) -> Result<AttendanceEntry, CoreError> {
        self.get(student_id)
            .map(AttendanceRecord::entry)
            .ok_or(CoreError::NotFound {
                entity: "student",
                id: student_id,
            })
    }

    /// Payload rows for the whole roster, in roster order.
    pub fn entries(&self) -> Vec<AttendanceEntry> {
        self.records.iter().map(AttendanceRecord::entry).collect()
    }

    /// Bulk save request for the whole roster.
    pub fn save_request(&self) -> SaveRequest {
        SaveRequest::new(self.key.date, self.entries())
    }

    /// Record that the backend acknowledged `entry`.
    ///
    /// The snapshot takes the acknowledged status, which may already be
    /// behind the local status if the user kept editing. Returns `false`
    /// when the student is no longer on the roster.
    pub fn confirm_saved(&mut self, entry: &AttendanceEntry) -> bool {
        match self.records.iter_mut().find(|r| r.student_id == entry.student_id) {
            Some(record) => {
                record.last_saved_status = entry.status;
                true
            }
            None => false,
        }
    }

    /// Record that the backend acknowledged every row of a bulk save.
    pub fn confirm_all(&mut self, entries: &[AttendanceEntry]) {
        for entry in entries {
            self.confirm_saved(entry);
        }
    }

    /// Students whose local status has not been acknowledged yet.
    pub fn dirty_ids(&self) -> Vec<StudentId> {
        self.records
            .iter()
            .filter(|r| r.is_dirty())
            .map(|r| r.student_id)
            .collect()
    }
}
