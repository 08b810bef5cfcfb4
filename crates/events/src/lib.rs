//! ZeroStat notification transports.
//!
//! - [`NotificationConfig`] -- channel connection parameters, loaded from
//!   the environment.
//! - [`delivery`] -- webhook, Telegram and SMTP senders.
//! - [`Notifier`] -- routes a rendered message to the selected channel.
//!
//! Every transport is fire-and-forget: a single attempt, no retry, and no
//! confirmation beyond a non-error HTTP/SMTP response.

pub mod config;
pub mod delivery;
pub mod notifier;

pub use config::NotificationConfig;
pub use delivery::email::EmailDelivery;
pub use delivery::telegram::TelegramDelivery;
pub use delivery::webhook::WebhookDelivery;
pub use notifier::{NotifyError, Notifier};
