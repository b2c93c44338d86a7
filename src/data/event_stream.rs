//! Event stream connection
//!
//! A single supervising loop owns the WebSocket: dial, listen until the
//! session ends, wait, dial again. No task is spawned per attempt, so only
//! one connection ever feeds the handler.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use futures_util::{SinkExt, StreamExt};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

use crate::comms::Notifier;
use crate::config::Config;
use crate::core::handler::EventHandler;

pub const MSG_CONNECTED: &str = "🚀 Connected to WebSocket — waiting for events";

/// How a single connection session ended.
#[derive(Debug)]
pub enum SessionEnd {
    /// Close frame from the peer, or the stream simply ended
    Closed,
    /// Dial failure or read/write error
    Failed(anyhow::Error),
}

pub struct EventStream<N: Notifier + ?Sized> {
    cfg: Arc<Config>,
    notifier: Arc<N>,
}

impl<N: Notifier + ?Sized> EventStream<N> {
    pub fn new(cfg: Arc<Config>, notifier: Arc<N>) -> Self {
        Self { cfg, notifier }
    }

    /// Reconnect loop. Never returns.
    pub async fn run(&self) {
        let delay = self.cfg.timing.reconnect_delay;
        let mut attempt = 0u64;

        loop {
            attempt += 1;
            info!("Connecting to event stream (attempt #{})...", attempt);

            match self.session().await {
                SessionEnd::Closed => {
                    warn!("Connection closed. Reconnecting in {:?}...", delay);
                }
                SessionEnd::Failed(e) => {
                    warn!("WebSocket error: {}. Reconnecting in {:?}...", e, delay);
                }
            }

            tokio::time::sleep(delay).await;
        }
    }

    /// One dial-and-listen cycle.
    pub async fn session(&self) -> SessionEnd {
        match self.listen().await {
            Ok(()) => SessionEnd::Closed,
            Err(e) => SessionEnd::Failed(e),
        }
    }

    async fn listen(&self) -> Result<()> {
        let (ws_stream, _) = connect_async(self.cfg.ws_url.as_str()).await?;
        let (mut write, mut read) = ws_stream.split();

        info!("Connected to {}", self.cfg.ws_url);
        self.notifier.notify(MSG_CONNECTED).await;

        let handler = EventHandler::new(self.notifier.as_ref(), self.cfg.timing.follow_up_delay);

        while let Some(msg) = read.next().await {
            match msg? {
                Message::Text(text) => {
                    let outcome = handler.handle(&text).await;
                    debug!("Frame handled: {:?}", outcome);
                }
                Message::Binary(data) => match std::str::from_utf8(&data) {
                    Ok(text) => {
                        let outcome = handler.handle(text).await;
                        debug!("Binary frame handled: {:?}", outcome);
                    }
                    Err(_) => debug!("Discarding non-UTF-8 binary frame ({} bytes)", data.len()),
                },
                Message::Ping(data) => {
                    write.send(Message::Pong(data)).await?;
                }
                Message::Close(frame) => {
                    info!("Close frame received: {:?}", frame);
                    // Flushes the queued close reply so the peer sees a clean shutdown
                    if let Err(e) = write.close().await {
                        debug!("Close handshake not completed: {}", e);
                    }
                    return Ok(());
                }
                _ => {}
            }
        }

        Ok(())
    }
}

/// Idle next to the stream task, waking every `interval`.
///
/// `run` never returns, so this only completes if the task panicked or was
/// cancelled; the returned error says which.
pub async fn keep_alive(mut task: JoinHandle<()>, interval: Duration) -> anyhow::Error {
    let started = Instant::now();
    let mut tick = tokio::time::interval(interval);
    tick.tick().await;

    loop {
        tokio::select! {
            res = &mut task => {
                return match res {
                    Ok(()) => anyhow!("event stream task exited"),
                    Err(e) => anyhow!("event stream task failed: {}", e),
                };
            }
            _ = tick.tick() => {
                debug!("Alive for {}s", started.elapsed().as_secs());
            }
        }
    }
}
