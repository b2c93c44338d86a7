//! Core event logic
//!
//! Decides which inbound payloads deserve a notification.

pub mod handler;

pub use handler::{EventHandler, Outcome};
