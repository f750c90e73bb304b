//! `rollcall-cli` library crate.
//!
//! Argument parsing, command dispatch and rendering, split out of
//! `main.rs` so they can be tested without a backend.

pub mod cli;
pub mod render;
