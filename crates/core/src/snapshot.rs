//! Point-in-time host metric readings.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// One immutable reading of every tracked host metric.
///
/// Produced once per sampling call and never mutated afterwards; the
/// sampler shares it behind an `Arc` between the caller and the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    /// When the reading was taken.
    pub taken_at: Timestamp,
    /// Global CPU utilization (0-100).
    pub cpu_percent: f64,
    /// Number of logical CPUs.
    pub cpu_cores: usize,
    pub mem_used_bytes: u64,
    pub mem_total_bytes: u64,
    /// `mem_used_bytes / mem_total_bytes` as a percentage, 0 when total is 0.
    pub mem_percent: f64,
    pub disk_used_bytes: u64,
    pub disk_total_bytes: u64,
    /// `disk_used_bytes / disk_total_bytes` as a percentage, 0 when total is 0.
    pub disk_percent: f64,
    /// Cumulative bytes received across all interfaces.
    pub net_rx_bytes: u64,
    /// Cumulative bytes transmitted across all interfaces.
    pub net_tx_bytes: u64,
    /// Receive rate in bytes/second since the previous snapshot (0 on the first).
    pub net_rx_rate: f64,
    /// Transmit rate in bytes/second since the previous snapshot (0 on the first).
    pub net_tx_rate: f64,
}

impl MetricSnapshot {
    /// An all-zero snapshot taken at `taken_at`.
    pub fn empty(taken_at: Timestamp) -> Self {
        Self {
            taken_at,
            cpu_percent: 0.0,
            cpu_cores: 0,
            mem_used_bytes: 0,
            mem_total_bytes: 0,
            mem_percent: 0.0,
            disk_used_bytes: 0,
            disk_total_bytes: 0,
            disk_percent: 0.0,
            net_rx_bytes: 0,
            net_tx_bytes: 0,
            net_rx_rate: 0.0,
            net_tx_rate: 0.0,
        }
    }
}

/// `used / total * 100`, or 0 when `total` is 0.
pub fn percent(used: u64, total: u64) -> f64 {
    if total > 0 {
        (used as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
