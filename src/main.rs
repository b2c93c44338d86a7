//! round-alert - WebSocket event feed to Telegram bridge
//!
//! Loads its settings from the environment, announces itself in the chat,
//! then keeps one supervised stream connection alive forever.

use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use round_alert::comms::{Notifier, TelegramNotifier};
use round_alert::config::Config;
use round_alert::data::{event_stream, EventStream};

const MSG_STARTED: &str = "🤖 Service started — listening...";

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env().unwrap_or_else(|e| {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    });

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting round-alert");
    info!("Feed: {}", cfg.ws_url);
    info!("Chat: {}", cfg.chat_id);

    let cfg = Arc::new(cfg);
    let notifier = Arc::new(TelegramNotifier::new(&cfg));

    notifier.notify(MSG_STARTED).await;

    let stream = EventStream::new(cfg.clone(), notifier);
    let task = tokio::spawn(async move { stream.run().await });

    // The stream task does all the work; this keeps the process up and
    // notices if that task ever dies.
    let err = event_stream::keep_alive(task, cfg.timing.keep_alive).await;
    error!("{}", err);
    Err(err)
}
