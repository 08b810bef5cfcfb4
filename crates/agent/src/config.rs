//! Runtime settings for the sampler, evaluator and shell runner.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Default evaluation cadence.
pub const DEFAULT_TICK_SECS: u64 = 3;

/// Default hard timeout for rule shell commands.
pub const DEFAULT_SHELL_TIMEOUT_SECS: u64 = 30;

/// Agent configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Directory holding `rules.json` and `notifications.json`.
    pub data_dir: PathBuf,
    pub tick_secs: u64,
    pub shell_timeout_secs: u64,
    /// Mount point whose usage feeds the `Disk` metric.
    pub disk_mount: PathBuf,
}

impl AgentConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                        | Default |
    /// |--------------------------------|---------|
    /// | `ZEROSTAT_DATA_DIR`            | `data`  |
    /// | `ZEROSTAT_TICK_SECS`           | `3`     |
    /// | `ZEROSTAT_SHELL_TIMEOUT_SECS`  | `30`    |
    /// | `ZEROSTAT_DISK_MOUNT`          | `/`     |
    pub fn from_env() -> Self {
        let data_dir = std::env::var("ZEROSTAT_DATA_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "data".into());

        let disk_mount = std::env::var("ZEROSTAT_DISK_MOUNT")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "/".into());

        Self {
            data_dir: PathBuf::from(data_dir),
            tick_secs: env_parse("ZEROSTAT_TICK_SECS", DEFAULT_TICK_SECS).max(1),
            shell_timeout_secs: env_parse("ZEROSTAT_SHELL_TIMEOUT_SECS", DEFAULT_SHELL_TIMEOUT_SECS),
            disk_mount: PathBuf::from(disk_mount),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_secs)
    }

    pub fn shell_timeout(&self) -> Duration {
        Duration::from_secs(self.shell_timeout_secs)
    }

    /// Location of the persisted rule list.
    pub fn rules_path(&self) -> PathBuf {
        self.data_dir.join(crate::persistence::RULES_FILE_NAME)
    }

    /// Location of the notification settings saved through the API.
    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join(crate::persistence::SETTINGS_FILE_NAME)
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            tick_secs: DEFAULT_TICK_SECS,
            shell_timeout_secs: DEFAULT_SHELL_TIMEOUT_SECS,
            disk_mount: PathBuf::from("/"),
        }
    }
}

/// Parse `key` as `T`, warning and falling back to `default` on bad input.
pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, %default, "Invalid number in environment, using default");
            default
        }),
        _ => default,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
