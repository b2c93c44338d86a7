//! Data Module
//!
//! Inbound event feed over WebSocket.

pub mod event_stream;

pub use event_stream::{EventStream, SessionEnd};
