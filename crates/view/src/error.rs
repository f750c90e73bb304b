use rollcall_client::ApiError;
use rollcall_core::error::CoreError;
use rollcall_core::roster::RosterKey;

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("No roster loaded")]
    NoRoster,

    #[error("A bulk save is already in progress")]
    SaveInProgress,

    /// Another roster was loaded before the response for this one arrived.
    #[error("Roster {0} was superseded before the backend responded")]
    Superseded(RosterKey),
}

/// User-facing failure text: a fixed prefix plus the backend's reason when
/// it sent one.
pub(crate) fn failure_message(prefix: &str, err: &ApiError) -> String {
    match err.detail() {
        Some(detail) => format!("{prefix} {detail}"),
        None => prefix.to_string(),
    }
}
