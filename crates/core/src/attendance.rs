//! Attendance status, roster rows and save payloads.
//!
//! [`RosterEntry`] is the row shape returned by the backend's by-class
//! endpoint; [`AttendanceRecord`] is the locally editable copy of it,
//! carrying the last status the backend acknowledged.
//! [`AttendanceEntry`] / [`SaveRequest`] are what gets posted back.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::StudentId;

// ---------------------------------------------------------------------------
// AttendanceStatus
// ---------------------------------------------------------------------------

/// Attendance status of one student on one date.
///
/// There are no forbidden transitions: any status may replace any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    /// Not marked yet.
    #[default]
    None,
    Present,
    Absent,
    Leave,
    Late,
}

impl AttendanceStatus {
    /// Every status, in the order the roll-call buttons are shown.
    pub const ALL: [AttendanceStatus; 5] = [
        Self::Present,
        Self::Absent,
        Self::Leave,
        Self::Late,
        Self::None,
    ];

    /// Wire / CLI name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Present => "present",
            Self::Absent => "absent",
            Self::Leave => "leave",
            Self::Late => "late",
        }
    }

    /// Human label.
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "Unmarked",
            Self::Present => "Present",
            Self::Absent => "Absent",
            Self::Leave => "Leave",
            Self::Late => "Late",
        }
    }

    pub fn is_marked(self) -> bool {
        self != Self::None
    }

    /// Bulk marking to this status wipes existing remarks.
    pub fn clears_remarks(self) -> bool {
        matches!(self, Self::None | Self::Present)
    }

    /// Whether the remarks field is offered for a row in this status.
    pub fn accepts_remarks(self) -> bool {
        matches!(self, Self::Absent | Self::Leave | Self::Late)
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            "leave" => Ok(Self::Leave),
            "late" => Ok(Self::Late),
            other => Err(CoreError::Validation(format!(
                "Invalid attendance status '{other}'. Must be one of: none, present, absent, leave, late"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Roster rows
// ---------------------------------------------------------------------------

/// One student row as returned by `GET /attendance/by-class/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub student_id: StudentId,
    pub student_name: String,
    #[serde(default)]
    pub status: AttendanceStatus,
    /// The backend sends `null` for rows that were never annotated.
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub student_image: Option<String>,
}

/// Locally editable attendance row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRecord {
    pub student_id: StudentId,
    pub student_name: String,
    pub student_image: Option<String>,
    pub status: AttendanceStatus,
    pub remarks: String,
    /// Last status the backend acknowledged for this student and date.
    pub last_saved_status: AttendanceStatus,
}

impl AttendanceRecord {
    /// Local status differs from the acknowledged one.
    pub fn is_dirty(&self) -> bool {
        self.status != self.last_saved_status
    }

    /// Backend holds a marked status for this row ("Saved" badge).
    pub fn is_saved(&self) -> bool {
        self.last_saved_status.is_marked()
    }

    /// Payload row for this record's current local state.
    pub fn entry(&self) -> AttendanceEntry {
        AttendanceEntry {
            student_id: self.student_id,
            status: self.status,
            remarks: self.remarks.clone(),
        }
    }
}

impl From<RosterEntry> for AttendanceRecord {
    fn from(entry: RosterEntry) -> Self {
        Self {
            student_id: entry.student_id,
            student_name: entry.student_name,
            student_image: entry.student_image,
            status: entry.status,
            remarks: entry.remarks.unwrap_or_default(),
            last_saved_status: entry.status,
        }
    }
}

// ---------------------------------------------------------------------------
// Save payloads
// ---------------------------------------------------------------------------

/// One row of a save request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceEntry {
    pub student_id: StudentId,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub remarks: String,
}

/// Body of `POST /attendance/bulk/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRequest {
    pub date: NaiveDate,
    pub records: Vec<AttendanceEntry>,
}

impl SaveRequest {
    pub fn new(date: NaiveDate, records: Vec<AttendanceEntry>) -> Self {
        Self { date, records }
    }

    /// Single-record payload used by silent saves.
    pub fn single(date: NaiveDate, entry: AttendanceEntry) -> Self {
        Self {
            date,
            records: vec![entry],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
