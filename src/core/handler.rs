//! Event handler
//!
//! Decodes one inbound frame and, for a `new_round` event, sends the
//! two-step alert: an immediate heads-up and a follow-up after a fixed delay.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info};

use crate::comms::Notifier;

pub const DISCRIMINATOR: &str = "type";
pub const SENTINEL: &str = "new_round";

pub const MSG_TRIGGERED: &str = "🎯 Event triggered!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Valid JSON, but not the event of interest
    Ignored,
    /// Not JSON at all
    Undecodable,
    /// Both notifications were attempted
    Notified,
}

/// Heads-up text, naming the configured follow-up delay.
pub fn detected_message(delay: Duration) -> String {
    let delay = if delay.subsec_millis() == 0 {
        format!("{}s", delay.as_secs())
    } else {
        format!("{}ms", delay.as_millis())
    };
    format!("⚠️ Event detected — {} delay...", delay)
}

/// True for a JSON object whose discriminator is the sentinel string.
pub fn is_trigger(event: &Value) -> bool {
    event
        .as_object()
        .and_then(|map| map.get(DISCRIMINATOR))
        .and_then(Value::as_str)
        == Some(SENTINEL)
}

pub struct EventHandler<'a, N: Notifier + ?Sized> {
    notifier: &'a N,
    follow_up_delay: Duration,
    detected: String,
}

impl<'a, N: Notifier + ?Sized> EventHandler<'a, N> {
    pub fn new(notifier: &'a N, follow_up_delay: Duration) -> Self {
        Self {
            notifier,
            follow_up_delay,
            detected: detected_message(follow_up_delay),
        }
    }

    /// Handle one text frame.
    ///
    /// Holds the caller for `follow_up_delay` on a match, so later frames on
    /// the same connection wait until the follow-up has gone out.
    pub async fn handle(&self, text: &str) -> Outcome {
        info!("Incoming message: {}", text);

        let event: Value = match serde_json::from_str(text) {
            Ok(v) => v,
            Err(e) => {
                debug!("Discarding undecodable frame: {}", e);
                return Outcome::Undecodable;
            }
        };
        debug!("Parsed data: {}", event);

        if !is_trigger(&event) {
            return Outcome::Ignored;
        }

        self.notifier.notify(&self.detected).await;
        tokio::time::sleep(self.follow_up_delay).await;
        self.notifier.notify(MSG_TRIGGERED).await;

        Outcome::Notified
    }
}
