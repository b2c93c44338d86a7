//! Telegram notifications
//!
//! One `sendMessage` call per notification. Failures are logged and dropped.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::Notifier;
use crate::config::Config;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("telegram returned {status}: {description}")]
    Status {
        status: reqwest::StatusCode,
        description: String,
    },
}

/// Error body returned by the Bot API on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    description: Option<String>,
}

pub struct TelegramNotifier {
    client: reqwest::Client,
    url: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(cfg: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: format!("{}/bot{}/sendMessage", cfg.api_base, cfg.bot_token),
            chat_id: cfg.chat_id.clone(),
        }
    }

    /// Single delivery attempt.
    pub async fn send(&self, message: &str) -> Result<(), NotifyError> {
        let params = [("chat_id", self.chat_id.as_str()), ("text", message)];

        let resp = self.client.post(&self.url).form(&params).send().await?;
        let status = resp.status();
        if status.is_success() {
            debug!("Telegram accepted message ({})", status);
            return Ok(());
        }

        let description = resp
            .json::<ApiError>()
            .await
            .ok()
            .and_then(|body| body.description)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());
        Err(NotifyError::Status { status, description })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, text: &str) {
        if let Err(e) = self.send(text).await {
            // reqwest errors carry the URL, which embeds the bot token
            let e = match e {
                NotifyError::Request(inner) => NotifyError::Request(inner.without_url()),
                other => other,
            };
            warn!("Telegram send error: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_with_base(base: String) -> Config {
        Config::from_lookup(|key| match key {
            "TELEGRAM_CHAT" => Some("42".to_string()),
            "TELEGRAM_TOKEN" => Some("123:abc".to_string()),
            "WS_URL" => Some("ws://127.0.0.1:1".to_string()),
            "TELEGRAM_API_BASE" => Some(base.clone()),
            _ => None,
        })
        .unwrap()
    }

    fn config_for(server: &MockServer) -> Config {
        config_with_base(server.uri())
    }

    #[tokio::test]
    async fn test_send_posts_form_to_bot_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .and(body_string_contains("chat_id=42"))
            .and(body_string_contains("text=hello"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = TelegramNotifier::new(&config_for(&server));
        notifier.send("hello").await.unwrap();
    }

    #[tokio::test]
    async fn test_send_reports_status_and_description() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: chat not found"
            })))
            .mount(&server)
            .await;

        let notifier = TelegramNotifier::new(&config_for(&server));
        match notifier.send("hello").await {
            Err(NotifyError::Status { status, description }) => {
                assert_eq!(status.as_u16(), 400);
                assert_eq!(description, "Bad Request: chat not found");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_error_without_body_uses_reason() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let notifier = TelegramNotifier::new(&config_for(&server));
        let err = notifier.send("hello").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "telegram returned 500 Internal Server Error: Internal Server Error"
        );
    }

    #[tokio::test]
    async fn test_notify_swallows_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;

        let notifier = TelegramNotifier::new(&config_for(&server));
        notifier.notify("first").await;
        notifier.notify("second").await;
    }

    #[tokio::test]
    async fn test_notify_survives_unreachable_endpoint() {
        // Nothing listens on a port we just released.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);
        let cfg = config_with_base(base);

        let notifier = TelegramNotifier::new(&cfg);
        assert!(matches!(
            notifier.send("hello").await,
            Err(NotifyError::Request(_))
        ));
        notifier.notify("hello").await;
    }
}
