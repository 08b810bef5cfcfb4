//! Alert rule model: the user-authored definition plus engine-owned state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::channels::{CHANNEL_EMAIL, CHANNEL_NONE, CHANNEL_TELEGRAM, CHANNEL_WEBHOOK};
use crate::error::CoreError;
use crate::metric_names::{METRIC_CPU, METRIC_DISK, METRIC_RAM, OP_EQUAL, OP_GREATER, OP_LESS};
use crate::snapshot::MetricSnapshot;
use crate::types::{RuleId, Timestamp};

// ---------------------------------------------------------------------------
// MetricKind
// ---------------------------------------------------------------------------

/// Which snapshot percentage a rule watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MetricKind {
    Cpu,
    Ram,
    Disk,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Cpu => METRIC_CPU,
            MetricKind::Ram => METRIC_RAM,
            MetricKind::Disk => METRIC_DISK,
        }
    }

    /// Pick this metric's percentage out of a snapshot.
    pub fn value_in(&self, snapshot: &MetricSnapshot) -> f64 {
        match self {
            MetricKind::Cpu => snapshot.cpu_percent,
            MetricKind::Ram => snapshot.mem_percent,
            MetricKind::Disk => snapshot.disk_percent,
        }
    }
}

impl TryFrom<String> for MetricKind {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            METRIC_CPU => Ok(MetricKind::Cpu),
            METRIC_RAM => Ok(MetricKind::Ram),
            METRIC_DISK => Ok(MetricKind::Disk),
            other => Err(CoreError::Validation(format!("unknown metric '{other}'"))),
        }
    }
}

impl From<MetricKind> for String {
    fn from(kind: MetricKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

/// Comparison between the observed value and the rule threshold.
///
/// Any operator string other than `>`, `<` or `==` is kept verbatim as
/// [`Comparison::Unrecognized`] and evaluated as `value >= threshold`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Comparison {
    Greater,
    Less,
    Equal,
    Unrecognized(String),
}

impl Comparison {
    pub fn as_str(&self) -> &str {
        match self {
            Comparison::Greater => OP_GREATER,
            Comparison::Less => OP_LESS,
            Comparison::Equal => OP_EQUAL,
            Comparison::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for Comparison {
    fn from(value: String) -> Self {
        match value.as_str() {
            OP_GREATER => Comparison::Greater,
            OP_LESS => Comparison::Less,
            OP_EQUAL => Comparison::Equal,
            _ => Comparison::Unrecognized(value),
        }
    }
}

impl From<Comparison> for String {
    fn from(op: Comparison) -> Self {
        match op {
            Comparison::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// NotificationChannel
// ---------------------------------------------------------------------------

/// Where a fired rule's message is delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NotificationChannel {
    #[default]
    None,
    Webhook,
    Telegram,
    Email,
}

impl NotificationChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationChannel::None => CHANNEL_NONE,
            NotificationChannel::Webhook => CHANNEL_WEBHOOK,
            NotificationChannel::Telegram => CHANNEL_TELEGRAM,
            NotificationChannel::Email => CHANNEL_EMAIL,
        }
    }
}

impl TryFrom<String> for NotificationChannel {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "" | CHANNEL_NONE => Ok(NotificationChannel::None),
            CHANNEL_WEBHOOK => Ok(NotificationChannel::Webhook),
            CHANNEL_TELEGRAM => Ok(NotificationChannel::Telegram),
            CHANNEL_EMAIL => Ok(NotificationChannel::Email),
            other => Err(CoreError::Validation(format!(
                "unknown notification channel '{other}'"
            ))),
        }
    }
}

impl From<NotificationChannel> for String {
    fn from(channel: NotificationChannel) -> Self {
        channel.as_str().to_string()
    }
}

impl fmt::Display for NotificationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AlertRule
// ---------------------------------------------------------------------------

/// The user-authored part of a rule. Only changed by an explicit edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub metric: MetricKind,
    pub operator: Comparison,
    pub threshold: f64,
    /// Sustained-breach time required before the first fire.
    #[serde(default)]
    pub duration_secs: u64,
    /// Minimum time between repeated fires while still triggered; 0 disables re-fire.
    #[serde(default)]
    pub cooldown_secs: u64,
    /// Empty means "use the built-in template".
    #[serde(default)]
    pub message_template: String,
    #[serde(default)]
    pub shell_command: Option<String>,
    #[serde(default)]
    pub channel: NotificationChannel,
}

impl RuleDefinition {
    /// The configured shell command, if it is non-blank.
    pub fn command(&self) -> Option<&str> {
        self.shell_command
            .as_deref()
            .filter(|cmd| !cmd.trim().is_empty())
    }
}

/// Engine-owned runtime state, advanced once per evaluation tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleState {
    /// Start of the current breach episode.
    #[serde(default)]
    pub violating_since: Option<Timestamp>,
    /// Set once the debounce duration is satisfied and the first action fired.
    #[serde(default)]
    pub has_triggered: bool,
    /// Last time an action fired; gates cooldown re-fires.
    #[serde(default)]
    pub last_sent_at: Option<Timestamp>,
    #[serde(default)]
    pub sent_count: u64,
}

/// Coarse phase derived from [`RuleState`], used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RulePhase {
    Idle,
    Violating,
    Triggered,
}

impl RuleState {
    pub fn phase(&self) -> RulePhase {
        match (self.violating_since, self.has_triggered) {
            (Some(_), true) => RulePhase::Triggered,
            (Some(_), false) => RulePhase::Violating,
            (None, _) => RulePhase::Idle,
        }
    }

    /// Clear the breach episode (recovery, toggle, reload).
    pub fn reset_episode(&mut self) {
        self.violating_since = None;
        self.has_triggered = false;
    }
}

/// A rule definition plus its runtime state, stored and updated as one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRule {
    pub id: RuleId,
    #[serde(flatten)]
    pub definition: RuleDefinition,
    pub active: bool,
    #[serde(flatten)]
    pub state: RuleState,
}

impl AlertRule {
    /// A new, active rule with zeroed runtime state.
    pub fn new(id: impl Into<RuleId>, definition: RuleDefinition) -> Self {
        Self {
            id: id.into(),
            definition,
            active: true,
            state: RuleState::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
