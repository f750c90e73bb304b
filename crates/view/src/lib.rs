//! Attendance reconciliation view for daily roll call.
//!
//! Owns the roster being marked, applies edits optimistically, and
//! reconciles the per-student saved snapshot as the backend acknowledges
//! silent (single-row) and bulk (whole-roster) saves.

pub mod error;
mod state;
pub mod view;

pub use error::ViewError;
pub use state::ViewSnapshot;
pub use view::AttendanceView;
