//! Email notification delivery via SMTP.
//!
//! [`EmailDelivery`] wraps the `lettre` async SMTP transport to send
//! plain-text alert emails. Connection details come from
//! [`NotificationConfig`] at send time so settings changes apply to the next
//! message without rebuilding anything.

use crate::config::NotificationConfig;

/// Subject line used for every alert email.
pub const EMAIL_SUBJECT: &str = "ZeroStat Alert";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),

    /// Host, recipient or sender is missing.
    #[error("SMTP settings incomplete")]
    Incomplete,
}

// ---------------------------------------------------------------------------
// EmailDelivery
// ---------------------------------------------------------------------------

/// Sends alert emails via SMTP.
#[derive(Debug, Default)]
pub struct EmailDelivery;

impl EmailDelivery {
    pub fn new() -> Self {
        Self
    }

    /// Build the plain-text message for `body`.
    pub fn build_message(
        config: &NotificationConfig,
        body: &str,
    ) -> Result<lettre::Message, EmailError> {
        use lettre::message::header::ContentType;

        let (Some(to), Some(from)) = (config.smtp_to.as_deref(), config.smtp_sender()) else {
            return Err(EmailError::Incomplete);
        };

        lettre::Message::builder()
            .from(from.parse()?)
            .to(to.parse()?)
            .subject(EMAIL_SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| EmailError::Build(e.to_string()))
    }

    /// Send `body` to the configured recipient.
    pub async fn deliver(&self, config: &NotificationConfig, body: &str) -> Result<(), EmailError> {
        use lettre::{
            transport::smtp::authentication::Credentials, AsyncSmtpTransport, AsyncTransport,
            Tokio1Executor,
        };

        let Some(host) = config.smtp_host.as_deref() else {
            return Err(EmailError::Incomplete);
        };
        let email = Self::build_message(config, body)?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?.port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;

        tracing::info!(to = ?config.smtp_to, "Notification email sent");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn config() -> NotificationConfig {
        NotificationConfig {
            smtp_host: Some("smtp.example.com".to_string()),
            smtp_port: 587,
            smtp_user: Some("alerts@example.com".to_string()),
            smtp_to: Some("ops@example.com".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn builds_message_with_fallback_sender() {
        let message = EmailDelivery::build_message(&config(), "CPU high");
        assert!(message.is_ok());
    }

    #[test]
    fn missing_recipient_is_incomplete() {
        let mut cfg = config();
        cfg.smtp_to = None;
        assert_matches!(
            EmailDelivery::build_message(&cfg, "x"),
            Err(EmailError::Incomplete)
        );
    }

    #[test]
    fn bad_address_is_reported() {
        let mut cfg = config();
        cfg.smtp_to = Some("not-an-email".to_string());
        let err = EmailDelivery::build_message(&cfg, "x").expect_err("address must fail");
        assert!(err.to_string().contains("Email address parse error"));
    }

    #[test]
    fn email_error_display_build() {
        let err = EmailError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");
    }
}
