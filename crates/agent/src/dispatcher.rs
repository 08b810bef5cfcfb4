//! Side effects of a fired or recovered rule.
//!
//! [`ActionDispatcher`] renders the message, runs the rule's shell command
//! (fires only) and sends the notification. Each action runs on its own
//! detached task so a slow transport or a long command never delays the
//! evaluation pass that triggered it.

use std::sync::Arc;

use zerostat_core::alert::{AlertRule, NotificationChannel};
use zerostat_core::template::render_message;
use zerostat_events::{Notifier, NotifyError};

use crate::shell::ShellRunner;

/// Fixed body of a manual test notification.
pub const TEST_MESSAGE: &str = "ZeroStat Test Message - System Successfully Verified!";

/// Receiver of evaluator decisions. Implementations must not block.
pub trait ActionSink: Send + Sync {
    fn fire(&self, rule: &AlertRule, value: f64, is_recovery: bool);
}

pub struct ActionDispatcher {
    notifier: Arc<Notifier>,
    shell: Arc<ShellRunner>,
    hostname: String,
}

impl ActionDispatcher {
    pub fn new(notifier: Arc<Notifier>, shell: ShellRunner, hostname: impl Into<String>) -> Self {
        Self {
            notifier,
            shell: Arc::new(shell),
            hostname: hostname.into(),
        }
    }

    pub fn notifier(&self) -> &Arc<Notifier> {
        &self.notifier
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Send [`TEST_MESSAGE`] on `channel` and wait for the result.
    pub async fn send_test(&self, channel: NotificationChannel) -> Result<(), NotifyError> {
        let result = self.notifier.send(channel, TEST_MESSAGE).await;
        match &result {
            Ok(()) => tracing::info!(%channel, "Test notification sent"),
            Err(e) => tracing::warn!(%channel, error = %e, "Test notification failed"),
        }
        result
    }
}

impl ActionSink for ActionDispatcher {
    fn fire(&self, rule: &AlertRule, value: f64, is_recovery: bool) {
        let message = render_message(&rule.definition, &self.hostname, value, is_recovery);

        if !is_recovery {
            if let Some(command) = rule.definition.command() {
                let shell = Arc::clone(&self.shell);
                let rule_id = rule.id.clone();
                let command = command.to_string();
                tokio::spawn(async move {
                    shell.execute(&rule_id, &command).await;
                });
            }
        }

        let channel = rule.definition.channel;
        if channel == NotificationChannel::None {
            return;
        }

        let notifier = Arc::clone(&self.notifier);
        let rule_id = rule.id.clone();
        tokio::spawn(async move {
            match notifier.send(channel, &message).await {
                Ok(()) => {
                    tracing::debug!(rule_id = %rule_id, %channel, is_recovery, "Notification delivered");
                }
                Err(NotifyError::NotConfigured { channel }) => {
                    tracing::warn!(rule_id = %rule_id, channel, "Notification channel not configured, skipping");
                }
                Err(e) => {
                    tracing::error!(rule_id = %rule_id, %channel, error = %e, "Notification delivery failed");
                }
            }
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use zerostat_events::NotificationConfig;

    use super::*;

    fn dispatcher() -> ActionDispatcher {
        ActionDispatcher::new(
            Arc::new(Notifier::new(NotificationConfig::default())),
            ShellRunner::default(),
            "test-host",
        )
    }

    #[tokio::test]
    async fn send_test_reports_missing_configuration() {
        let d = dispatcher();
        assert_matches!(
            d.send_test(NotificationChannel::Telegram).await,
            Err(NotifyError::NotConfigured { channel: "telegram" })
        );
    }

    #[tokio::test]
    async fn send_test_on_none_is_ok() {
        assert!(dispatcher().send_test(NotificationChannel::None).await.is_ok());
    }

    #[tokio::test]
    async fn fire_without_channel_or_command_is_silent() {
        use zerostat_core::alert::{Comparison, MetricKind, RuleDefinition};

        let rule = AlertRule::new(
            "r1",
            RuleDefinition {
                metric: MetricKind::Ram,
                operator: Comparison::Greater,
                threshold: 50.0,
                duration_secs: 0,
                cooldown_secs: 0,
                message_template: String::new(),
                shell_command: None,
                channel: NotificationChannel::None,
            },
        );
        dispatcher().fire(&rule, 75.0, false);
        dispatcher().fire(&rule, 10.0, true);
    }
}
