//! REST client for the school backend's attendance API.
//!
//! - [`AttendanceApi`] — `reqwest` wrapper for the by-class and bulk
//!   attendance endpoints.
//! - [`AttendanceBackend`] — trait the attendance view is written against.
//! - [`ClientConfig`] — base URL, bearer token and timeout from the
//!   environment.

pub mod api;
pub mod backend;
pub mod config;

pub use api::{ApiError, AttendanceApi, RosterResponse, SaveResponse};
pub use backend::AttendanceBackend;
pub use config::{ClientConfig, ConfigError};
