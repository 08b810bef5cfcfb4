//! Generic webhook delivery.
//!
//! [`WebhookDelivery`] POSTs `{ "text": message }` to an external URL. The
//! shape is accepted as-is by Slack/Mattermost/Discord-compatible incoming
//! webhooks. A single attempt is made; failures are returned to the caller.

use super::http_client;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for webhook delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("Webhook returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// WebhookDelivery
// ---------------------------------------------------------------------------

/// Delivers alert messages to external webhook endpoints.
pub struct WebhookDelivery {
    client: reqwest::Client,
}

impl WebhookDelivery {
    /// Create a new delivery service with a pre-configured HTTP client.
    pub fn new() -> Self {
        Self {
            client: http_client(),
        }
    }

    /// POST the message to `url`.
    pub async fn deliver(&self, url: &str, message: &str) -> Result<(), WebhookError> {
        let payload = serde_json::json!({ "text": message });

        let response = self.client.post(url).json(&payload).send().await?;
        if !response.status().is_success() {
            return Err(WebhookError::HttpStatus(response.status().as_u16()));
        }

        tracing::info!(url, "Webhook notification sent");
        Ok(())
    }
}

impl Default for WebhookDelivery {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
