//! Channel routing for rendered alert messages.

use tokio::sync::RwLock;
use zerostat_core::alert::NotificationChannel;
use zerostat_core::channels::{CHANNEL_EMAIL, CHANNEL_TELEGRAM, CHANNEL_WEBHOOK};

use crate::config::NotificationConfig;
use crate::delivery::email::{EmailDelivery, EmailError};
use crate::delivery::telegram::{TelegramDelivery, TelegramError};
use crate::delivery::webhook::{WebhookDelivery, WebhookError};

/// Failure to deliver a message on the selected channel.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("webhook delivery failed: {0}")]
    Webhook(#[from] WebhookError),

    #[error("telegram delivery failed: {0}")]
    Telegram(#[from] TelegramError),

    #[error("email delivery failed: {0}")]
    Email(#[from] EmailError),

    /// The channel was selected but its settings are missing.
    #[error("{channel} channel is not configured")]
    NotConfigured { channel: &'static str },
}

/// Sends messages over whichever channel a rule selects.
///
/// The config sits behind a lock so it can be replaced at runtime; each send
/// takes a snapshot and releases the lock before any network I/O.
pub struct Notifier {
    config: RwLock<NotificationConfig>,
    webhook: WebhookDelivery,
    telegram: TelegramDelivery,
    email: EmailDelivery,
}

impl Notifier {
    pub fn new(config: NotificationConfig) -> Self {
        Self::with_telegram(config, TelegramDelivery::new())
    }

    /// Use a custom Telegram transport (alternate API host).
    pub fn with_telegram(config: NotificationConfig, telegram: TelegramDelivery) -> Self {
        Self {
            config: RwLock::new(config.normalized()),
            webhook: WebhookDelivery::new(),
            telegram,
            email: EmailDelivery::new(),
        }
    }

    /// Current channel settings.
    pub async fn config(&self) -> NotificationConfig {
        self.config.read().await.clone()
    }

    pub async fn update_config(&self, config: NotificationConfig) {
        *self.config.write().await = config.normalized();
        tracing::info!("Notification settings updated");
    }

    /// Deliver `message` on `channel`. [`NotificationChannel::None`] is a no-op.
    pub async fn send(&self, channel: NotificationChannel, message: &str) -> Result<(), NotifyError> {
        let config = self.config().await;

        match channel {
            NotificationChannel::None => Ok(()),
            NotificationChannel::Webhook => {
                let url = config.webhook_url.as_deref().ok_or(NotifyError::NotConfigured {
                    channel: CHANNEL_WEBHOOK,
                })?;
                self.webhook.deliver(url, message).await?;
                Ok(())
            }
            NotificationChannel::Telegram => {
                let (token, chat_id) = config.telegram_target().ok_or(NotifyError::NotConfigured {
                    channel: CHANNEL_TELEGRAM,
                })?;
                self.telegram.deliver(token, chat_id, message).await?;
                Ok(())
            }
            NotificationChannel::Email => {
                if !config.email_configured() {
                    return Err(NotifyError::NotConfigured {
                        channel: CHANNEL_EMAIL,
                    });
                }
                self.email.deliver(&config, message).await?;
                Ok(())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
