//! JSON file persistence for alert rules and notification settings.
//!
//! The rules file holds a pretty-printed array of rules. Runtime state is
//! written along with the definitions but discarded on load, so a restart
//! always begins every rule in the idle phase.
//!
//! The settings file holds the notification channel parameters last saved
//! through the API. It carries credentials, so on Unix it is written with
//! owner-only permissions.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use zerostat_core::alert::{AlertRule, RuleState};
use zerostat_events::NotificationConfig;

/// Rules file name inside the data directory.
pub const RULES_FILE_NAME: &str = "rules.json";

/// Notification settings file name inside the data directory.
pub const SETTINGS_FILE_NAME: &str = "notifications.json";

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("data file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("data file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read `path`, treating a missing file as `None`.
async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, PersistenceError> {
    match tokio::fs::read(path).await {
        Ok(raw) => Ok(Some(raw)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Write `body` to `path` through a sibling temp file and a rename.
async fn write_atomic(path: &Path, body: Vec<u8>, private: bool) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, body).await?;
    if private {
        restrict_to_owner(&tmp).await?;
    }
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(unix)]
async fn restrict_to_owner(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await
}

#[cfg(not(unix))]
async fn restrict_to_owner(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

/// Location of the persisted rule list.
#[derive(Debug, Clone)]
pub struct RuleFile {
    path: PathBuf,
}

impl RuleFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `rules.json` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(RULES_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the rule list. A missing file is an empty list.
    pub async fn try_load(&self) -> Result<Vec<AlertRule>, PersistenceError> {
        let Some(raw) = read_optional(&self.path).await? else {
            return Ok(Vec::new());
        };

        let mut rules: Vec<AlertRule> = serde_json::from_slice(&raw)?;
        for rule in &mut rules {
            rule.state = RuleState::default();
        }
        Ok(rules)
    }

    /// Like [`try_load`](Self::try_load), but logs failures and returns an
    /// empty list.
    pub async fn load(&self) -> Vec<AlertRule> {
        match self.try_load().await {
            Ok(rules) => {
                tracing::info!(path = %self.path.display(), count = rules.len(), "Rules loaded");
                rules
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to load rules, starting empty");
                Vec::new()
            }
        }
    }

    /// Write the rule list atomically (temp file, then rename).
    pub async fn try_save(&self, rules: &[AlertRule]) -> Result<(), PersistenceError> {
        write_atomic(&self.path, serde_json::to_vec_pretty(rules)?, false).await
    }

    /// Best-effort save; failures are logged.
    pub async fn save(&self, rules: &[AlertRule]) {
        match self.try_save(rules).await {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), count = rules.len(), "Rules saved");
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to save rules");
            }
        }
    }
}

/// Location of the saved notification settings.
#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `notifications.json` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(SETTINGS_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read saved settings. `None` if nothing was ever saved.
    pub async fn try_load(&self) -> Result<Option<NotificationConfig>, PersistenceError> {
        let Some(raw) = read_optional(&self.path).await? else {
            return Ok(None);
        };
        let config: NotificationConfig = serde_json::from_slice(&raw)?;
        Ok(Some(config.normalized()))
    }

    /// Saved settings, or `None` when absent or unreadable (logged).
    pub async fn load(&self) -> Option<NotificationConfig> {
        match self.try_load().await {
            Ok(Some(config)) => {
                tracing::info!(path = %self.path.display(), "Notification settings loaded");
                Some(config)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to load notification settings, using environment");
                None
            }
        }
    }

    pub async fn try_save(&self, config: &NotificationConfig) -> Result<(), PersistenceError> {
        write_atomic(&self.path, serde_json::to_vec_pretty(config)?, true).await
    }

    /// Best-effort save; failures are logged.
    pub async fn save(&self, config: &NotificationConfig) {
        match self.try_save(config).await {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Notification settings saved"),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to save notification settings");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Utc;
    use zerostat_core::alert::{Comparison, MetricKind, NotificationChannel, RuleDefinition};

    use super::*;

    fn rule(id: &str) -> AlertRule {
        AlertRule::new(
            id,
            RuleDefinition {
                metric: MetricKind::Disk,
                operator: Comparison::Greater,
                threshold: 90.0,
                duration_secs: 30,
                cooldown_secs: 300,
                message_template: "{hostname} disk at {value}%".to_string(),
                shell_command: Some("systemctl restart my-app".to_string()),
                channel: NotificationChannel::Webhook,
            },
        )
    }

    #[tokio::test]
    async fn missing_file_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = RuleFile::in_dir(dir.path());
        assert!(file.try_load().await.expect("load").is_empty());
    }

    #[tokio::test]
    async fn save_creates_directory_and_reload_resets_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = RuleFile::in_dir(dir.path().join("nested"));

        let mut stored = rule("r1");
        stored.active = false;
        stored.state.violating_since = Some(Utc::now());
        stored.state.has_triggered = true;
        stored.state.sent_count = 4;

        file.try_save(&[stored.clone(), rule("r2")]).await.expect("save");
        assert!(file.path().exists());
        assert!(!file.path().with_extension("json.tmp").exists());

        let loaded = file.try_load().await.expect("load");
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, "r1");
        assert_eq!(loaded[0].definition, stored.definition);
        assert!(!loaded[0].active);
        assert_eq!(loaded[0].state, RuleState::default());
        assert_eq!(loaded[1].id, "r2");
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error_and_load_falls_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = RuleFile::in_dir(dir.path());
        tokio::fs::write(file.path(), b"{not json").await.expect("write");

        assert_matches!(file.try_load().await, Err(PersistenceError::Json(_)));
        assert!(file.load().await.is_empty());
    }

    #[tokio::test]
    async fn settings_round_trip_and_missing_file_is_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = SettingsFile::in_dir(dir.path());
        assert!(file.try_load().await.expect("load").is_none());

        let config = NotificationConfig {
            webhook_url: Some("https://hooks.example.com/zs".to_string()),
            smtp_host: Some("smtp.example.com".to_string()),
            smtp_port: 465,
            smtp_password: Some("hunter2".to_string()),
            ..Default::default()
        };
        file.try_save(&config).await.expect("save");

        assert_eq!(file.try_load().await.expect("load"), Some(config));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn settings_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let file = SettingsFile::in_dir(dir.path());
        file.try_save(&NotificationConfig::default()).await.expect("save");

        let mode = std::fs::metadata(file.path()).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn partial_settings_fill_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = SettingsFile::in_dir(dir.path());
        tokio::fs::write(file.path(), br#"{"telegram_bot_token":"1:a","telegram_chat_id":" 42 "}"#)
            .await
            .expect("write");

        let config = file.try_load().await.expect("load").expect("present");
        assert_eq!(config.telegram_target(), Some(("1:a", "42")));
        assert_eq!(config.smtp_port, zerostat_events::config::DEFAULT_SMTP_PORT);
    }
}
