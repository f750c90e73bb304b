//! Roll-call notification bus.
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`Notification`] — a transient, user-facing message (the roll-call
//!   equivalent of a toast).

pub mod bus;

pub use bus::{EventBus, Notification, NotificationLevel};
