//! round-alert library
//!
//! Watches a WebSocket event feed and pings a Telegram chat whenever a
//! `new_round` event shows up.
//!
//! - `data`: the supervised stream connection
//! - `core`: payload matching and the two-step alert
//! - `comms`: Telegram delivery
//! - `config`: environment-derived settings

pub mod core;
pub mod data;
pub mod comms;
pub mod config;
