//! Telegram Bot API delivery.

use crate::error::NotifyError;
use crate::notify::{Delivery, Notifier};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

pub const TELEGRAM_API: &str = "https://api.telegram.org";

/// Bot token and destination chat.
#[derive(Clone)]
pub struct TelegramCredentials {
    pub bot_token: String,
    pub chat_id: String,
}

impl TelegramCredentials {
    /// Returns credentials only when both parts are present and non-empty.
    pub fn from_parts(bot_token: Option<String>, chat_id: Option<String>) -> Option<Self> {
        let bot_token = bot_token.filter(|t| !t.trim().is_empty())?;
        let chat_id = chat_id.filter(|c| !c.trim().is_empty())?;
        Some(Self { bot_token, chat_id })
    }
}

impl std::fmt::Debug for TelegramCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramCredentials")
            .field("bot_token", &"***")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Sends reports through `sendMessage`. Without credentials every send is
/// skipped with a warning.
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    client: reqwest::Client,
    api_url: String,
    credentials: Option<TelegramCredentials>,
}

impl TelegramNotifier {
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        credentials: Option<TelegramCredentials>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: TELEGRAM_API.to_string(),
            credentials,
        })
    }

    /// Points the notifier at a different Bot API root.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<Delivery, NotifyError> {
        let Some(credentials) = &self.credentials else {
            warn!("Telegram credentials missing (TG_BOT_TOKEN / TG_CHAT_ID), skipping delivery");
            return Ok(Delivery::Skipped);
        };

        let url = format!("{}/bot{}/sendMessage", self.api_url, credentials.bot_token);
        let response = self
            .client
            .post(url)
            .json(&SendMessage {
                chat_id: &credentials.chat_id,
                text,
            })
            .send()
            .await
            // the request URL embeds the bot token
            .map_err(|e| NotifyError::Transport(e.without_url()))?;

        let status = response.status();
        info!(status = status.as_u16(), "Telegram response");
        if !status.is_success() {
            return Err(NotifyError::Status(status));
        }
        Ok(Delivery::Sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_require_both_parts() {
        assert!(TelegramCredentials::from_parts(Some("t".into()), Some("1".into())).is_some());
        assert!(TelegramCredentials::from_parts(Some("t".into()), None).is_none());
        assert!(TelegramCredentials::from_parts(Some("  ".into()), Some("1".into())).is_none());
        assert!(TelegramCredentials::from_parts(None, Some("1".into())).is_none());
    }

    #[test]
    fn test_debug_hides_token() {
        let creds =
            TelegramCredentials::from_parts(Some("secret".into()), Some("42".into())).unwrap();
        let shown = format!("{creds:?}");
        assert!(!shown.contains("secret"));
        assert!(shown.contains("42"));
    }

    #[tokio::test]
    async fn test_missing_credentials_skip_delivery() {
        let notifier = TelegramNotifier::new(None, Duration::from_secs(1)).unwrap();
        assert_eq!(notifier.send("hello").await.unwrap(), Delivery::Skipped);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_fails() {
        let creds = TelegramCredentials::from_parts(Some("t".into()), Some("1".into()));
        let notifier = TelegramNotifier::new(creds, Duration::from_millis(500))
            .unwrap()
            .with_api_url("http://127.0.0.1:9");
        let err = notifier.send("hello").await.unwrap_err();
        assert!(matches!(err, NotifyError::Transport(_)));
    }

    #[tokio::test]
    async fn test_transport_error_does_not_leak_token() {
        let creds =
            TelegramCredentials::from_parts(Some("SECRET123:abc".into()), Some("1".into()));
        let notifier = TelegramNotifier::new(creds, Duration::from_millis(500))
            .unwrap()
            .with_api_url("http://127.0.0.1:9");
        let err = notifier.send("hello").await.unwrap_err();
        assert!(!format!("{err}").contains("SECRET123"));
        assert!(!format!("{err:?}").contains("SECRET123"));
    }
}
