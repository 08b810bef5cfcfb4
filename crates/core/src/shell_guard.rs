//! Screening of rule shell commands before execution.
//!
//! This is a heuristic, not a sandbox. Operator presets are accepted as
//! exact (trimmed) matches even though they contain metacharacters; every
//! other command is rejected if it contains any character from
//! [`SHELL_METACHARACTERS`].

/// Commands the rule editor offers as presets. Matched after trimming.
pub const SHELL_PRESETS: [&str; 3] = [
    "docker stop $(docker ps -q)",
    "sync; echo 1 > /proc/sys/vm/drop_caches",
    "systemctl restart my-app",
];

/// Characters that make a non-preset command unsafe to hand to `sh -c`.
pub const SHELL_METACHARACTERS: [char; 11] =
    [';', '&', '|', '$', '>', '<', '`', '\n', '\r', '(', ')'];

/// Result of screening a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandVerdict {
    /// Exact match of an operator preset.
    Preset,
    /// Free-form command with no metacharacters.
    Plain,
    /// Contains `offending`; must not be executed.
    Rejected { offending: char },
}

impl CommandVerdict {
    pub fn is_allowed(&self) -> bool {
        !matches!(self, CommandVerdict::Rejected { .. })
    }
}

/// Screen `command` against the preset allow-list and the metacharacter deny-list.
pub fn inspect_command(command: &str) -> CommandVerdict {
    let trimmed = command.trim();
    if SHELL_PRESETS.contains(&trimmed) {
        return CommandVerdict::Preset;
    }

    match command.chars().find(|c| SHELL_METACHARACTERS.contains(c)) {
        Some(offending) => CommandVerdict::Rejected { offending },
        None => CommandVerdict::Plain,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
