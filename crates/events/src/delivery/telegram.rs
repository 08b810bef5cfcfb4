//! Telegram bot API delivery.

use super::http_client;

/// Public Telegram bot API endpoint.
const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Error type for Telegram delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Telegram API returned HTTP {0}")]
    HttpStatus(u16),
}

/// Sends messages through a bot's `sendMessage` method.
pub struct TelegramDelivery {
    client: reqwest::Client,
    api_base: String,
}

impl TelegramDelivery {
    pub fn new() -> Self {
        Self::with_api_base(TELEGRAM_API_BASE)
    }

    /// Point at a different bot API host (self-hosted Bot API server, tests).
    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Self {
            client: http_client(),
            api_base: api_base.into(),
        }
    }

    /// `sendMessage` URL for the given bot token.
    pub fn send_message_url(&self, bot_token: &str) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_base.trim_end_matches('/'),
            bot_token
        )
    }

    /// POST `{ chat_id, text }` to the bot API.
    pub async fn deliver(
        &self,
        bot_token: &str,
        chat_id: &str,
        message: &str,
    ) -> Result<(), TelegramError> {
        let payload = serde_json::json!({ "chat_id": chat_id, "text": message });

        let response = self
            .client
            .post(self.send_message_url(bot_token))
            .json(&payload)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(TelegramError::HttpStatus(response.status().as_u16()));
        }

        tracing::info!(chat_id, "Telegram notification sent");
        Ok(())
    }
}

impl Default for TelegramDelivery {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
