//! Notification channel connection parameters.

use serde::{Deserialize, Serialize};

/// Default SMTP port (STARTTLS).
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Connection parameters for every notification channel.
///
/// Owned by the configuration layer; the alert engine only reads it.
/// Blank values are normalised to `None` so "configured" checks are simple
/// `Option` matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub webhook_url: Option<String>,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    /// Recipient address.
    pub smtp_to: Option<String>,
    /// Sender address; falls back to `smtp_user` when unset.
    pub smtp_from: Option<String>,
}

impl NotificationConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable       | Default |
    /// |----------------|---------|
    /// | `WEBHOOK_URL`  | --      |
    /// | `TG_BOT_TOKEN` | --      |
    /// | `TG_CHAT_ID`   | --      |
    /// | `SMTP_HOST`    | --      |
    /// | `SMTP_PORT`    | `587`   |
    /// | `SMTP_USER`    | --      |
    /// | `SMTP_PASS`    | --      |
    /// | `SMTP_TO`      | --      |
    /// | `SMTP_FROM`    | `SMTP_USER` |
    pub fn from_env() -> Self {
        Self {
            webhook_url: env_opt("WEBHOOK_URL"),
            telegram_bot_token: env_opt("TG_BOT_TOKEN"),
            telegram_chat_id: env_opt("TG_CHAT_ID"),
            smtp_host: env_opt("SMTP_HOST"),
            smtp_port: parse_port(env_opt("SMTP_PORT").as_deref()),
            smtp_user: env_opt("SMTP_USER"),
            smtp_password: env_opt("SMTP_PASS"),
            smtp_to: env_opt("SMTP_TO"),
            smtp_from: env_opt("SMTP_FROM"),
        }
        .normalized()
    }

    /// Turn blank strings into `None` and a zero SMTP port into the default.
    pub fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            webhook_url: clean(self.webhook_url),
            telegram_bot_token: clean(self.telegram_bot_token),
            telegram_chat_id: clean(self.telegram_chat_id),
            smtp_host: clean(self.smtp_host),
            smtp_port: if self.smtp_port == 0 {
                DEFAULT_SMTP_PORT
            } else {
                self.smtp_port
            },
            smtp_user: clean(self.smtp_user),
            smtp_password: clean(self.smtp_password),
            smtp_to: clean(self.smtp_to),
            smtp_from: clean(self.smtp_from),
        }
    }

    /// Telegram bot token and chat id, if both are set.
    pub fn telegram_target(&self) -> Option<(&str, &str)> {
        match (&self.telegram_bot_token, &self.telegram_chat_id) {
            (Some(token), Some(chat)) => Some((token, chat)),
            _ => None,
        }
    }

    /// Sender address for outgoing mail.
    pub fn smtp_sender(&self) -> Option<&str> {
        self.smtp_from.as_deref().or(self.smtp_user.as_deref())
    }

    /// Whether enough SMTP settings are present to attempt delivery.
    pub fn email_configured(&self) -> bool {
        self.smtp_host.is_some() && self.smtp_to.is_some() && self.smtp_sender().is_some()
    }
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Parse an `SMTP_PORT` value, warning and using the default when invalid.
fn parse_port(raw: Option<&str>) -> u16 {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return DEFAULT_SMTP_PORT;
    };
    match raw.parse() {
        Ok(port) => port,
        Err(e) => {
            tracing::warn!(value = raw, error = %e, default = DEFAULT_SMTP_PORT, "Invalid SMTP_PORT, using default");
            DEFAULT_SMTP_PORT
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
