//! Guarded execution of rule shell commands.
//!
//! Commands are screened with [`inspect_command`] and then run through
//! `sh -c` under a hard wall-clock timeout. The child is killed when the
//! timeout expires. stdout and stderr are captured together.

use std::time::{Duration, Instant};

use tokio::process::Command;
use zerostat_core::shell_guard::{inspect_command, CommandVerdict};

use crate::config::DEFAULT_SHELL_TIMEOUT_SECS;

/// Captured result of a successful command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellOutput {
    /// stdout followed by stderr, lossily decoded.
    pub output: String,
    pub duration_ms: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("command rejected: contains '{offending}'")]
    Rejected { offending: char },

    #[error("failed to spawn shell: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("command timed out after {secs}s")]
    TimedOut { secs: u64 },

    #[error("command exited with code {code}: {output}")]
    Failed { code: i32, output: String },
}

/// Runs rule commands with a fixed timeout.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    timeout: Duration,
}

impl ShellRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Screen and run `command`, returning its combined output.
    pub async fn run(&self, command: &str) -> Result<ShellOutput, ShellError> {
        if let CommandVerdict::Rejected { offending } = inspect_command(command) {
            return Err(ShellError::Rejected { offending });
        }

        let start = Instant::now();
        let output = tokio::time::timeout(
            self.timeout,
            Command::new("sh")
                .arg("-c")
                .arg(command.trim())
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| ShellError::TimedOut {
            secs: self.timeout.as_secs(),
        })??;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        let combined = combined.trim().to_string();

        if !output.status.success() {
            return Err(ShellError::Failed {
                code: output.status.code().unwrap_or(-1),
                output: combined,
            });
        }

        Ok(ShellOutput {
            output: combined,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Run `command` for rule `rule_id` and log the outcome. Never fails.
    pub async fn execute(&self, rule_id: &str, command: &str) {
        tracing::info!(rule_id, command, "Executing rule shell command");

        match self.run(command).await {
            Ok(out) => {
                tracing::info!(
                    rule_id,
                    duration_ms = out.duration_ms,
                    output = %out.output,
                    "Shell command succeeded"
                );
            }
            Err(ShellError::Rejected { offending }) => {
                tracing::warn!(
                    security = true,
                    rule_id,
                    command,
                    %offending,
                    "Blocked unsafe shell command"
                );
            }
            Err(ShellError::TimedOut { secs }) => {
                tracing::error!(rule_id, command, timeout_secs = secs, "Shell command timed out and was killed");
            }
            Err(ShellError::Failed { code, output }) => {
                tracing::error!(rule_id, command, code, %output, "Shell command failed");
            }
            Err(e @ ShellError::Spawn(_)) => {
                tracing::error!(rule_id, command, error = %e, "Shell command could not be started");
            }
        }
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_SHELL_TIMEOUT_SECS))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
