//! Well-known notification channel name constants.
//!
//! These must match the `channel` values stored on alert rules and accepted
//! by the test-notification endpoint.

/// No notification; the rule only runs its shell command (if any).
pub const CHANNEL_NONE: &str = "none";

/// JSON `{ "text": ... }` POST to an external HTTP endpoint.
pub const CHANNEL_WEBHOOK: &str = "webhook";

/// Telegram bot API `sendMessage`.
pub const CHANNEL_TELEGRAM: &str = "telegram";

/// Plain-text email delivered via SMTP.
pub const CHANNEL_EMAIL: &str = "email";
