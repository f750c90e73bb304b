//! Domain model for daily roll call.
//!
//! Pure, synchronous building blocks shared by the REST client and the
//! attendance view:
//!
//! - [`attendance`] — status enum, roster rows and save payloads.
//! - [`roster`] — the local edit buffer and the bulk marker.
//! - [`grades`] — class catalogue and date validation.
//! - [`remarks`] — canned remarks offered next to the free-text field.

pub mod attendance;
pub mod error;
pub mod grades;
pub mod remarks;
pub mod roster;
pub mod types;

pub use attendance::{AttendanceEntry, AttendanceRecord, AttendanceStatus, RosterEntry, SaveRequest};
pub use error::CoreError;
pub use grades::Grade;
pub use roster::{Roster, RosterKey};
pub use types::{StudentId, Timestamp};
