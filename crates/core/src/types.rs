/// Student primary keys are the backend's integer ids.
pub type StudentId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
