//! Communications Module
//!
//! - `Notifier` seam used by the stream and the event handler
//! - Telegram Bot API implementation

pub mod telegram;

use async_trait::async_trait;

pub use telegram::{NotifyError, TelegramNotifier};

/// Best-effort delivery of a text message.
///
/// Implementations absorb their own failures: callers never see an error
/// and never retry.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, text: &str);
}
