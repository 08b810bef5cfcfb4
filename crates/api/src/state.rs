use std::sync::Arc;

use tokio::sync::Mutex;
use zerostat_agent::dispatcher::ActionDispatcher;
use zerostat_agent::persistence::{RuleFile, SettingsFile};
use zerostat_events::NotificationConfig;
use zerostat_agent::sampler::Sampler;
use zerostat_agent::store::RuleStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Alert rules, shared with the evaluator.
    pub rules: Arc<RuleStore>,
    /// Host sampler, shared with the evaluator.
    pub sampler: Arc<Sampler>,
    /// Notification and shell dispatch; used here for test notifications.
    pub dispatcher: Arc<ActionDispatcher>,
    pub rule_file: Arc<RuleFile>,
    pub settings_file: Arc<SettingsFile>,
    /// Serializes writes of `rule_file` so the newest list always lands last.
    save_lock: Arc<Mutex<()>>,
    /// Serializes settings updates so the applied and saved copies agree.
    settings_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        rules: Arc<RuleStore>,
        sampler: Arc<Sampler>,
        dispatcher: Arc<ActionDispatcher>,
        rule_file: RuleFile,
        settings_file: SettingsFile,
    ) -> Self {
        Self {
            config: Arc::new(config),
            rules,
            sampler,
            dispatcher,
            rule_file: Arc::new(rule_file),
            settings_file: Arc::new(settings_file),
            save_lock: Arc::new(Mutex::new(())),
            settings_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Write the current rule list to disk. Best-effort.
    pub async fn persist_rules(&self) {
        let _guard = self.save_lock.lock().await;
        let rules = self.rules.list_rules().await;
        self.rule_file.save(&rules).await;
    }

    /// Apply new notification settings and write them to disk. Returns the
    /// normalized settings now in effect.
    pub async fn replace_notification_settings(&self, config: NotificationConfig) -> NotificationConfig {
        let _guard = self.settings_lock.lock().await;
        let notifier = self.dispatcher.notifier();
        notifier.update_config(config).await;
        let applied = notifier.config().await;
        self.settings_file.save(&applied).await;
        applied
    }
}
