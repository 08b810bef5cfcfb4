//! Well-known metric selector and comparison operator names.
//!
//! These are the literal strings stored in `rules.json`, accepted by the
//! management API, and substituted into the `{metric}` / `{operator}`
//! message placeholders.

/// Host CPU utilization percentage (0-100).
pub const METRIC_CPU: &str = "CPU";

/// Physical memory used as a percentage of total.
pub const METRIC_RAM: &str = "RAM";

/// Root filesystem (or configured mount) used as a percentage of total.
pub const METRIC_DISK: &str = "Disk";

/// Strictly greater than the threshold.
pub const OP_GREATER: &str = ">";

/// Strictly less than the threshold.
pub const OP_LESS: &str = "<";

/// Within [`EQUALITY_TOLERANCE`](crate::evaluation::EQUALITY_TOLERANCE) of the threshold.
pub const OP_EQUAL: &str = "==";
