//! Snapshot production and the rolling history.
//!
//! [`Sampler`] turns raw readings into immutable [`MetricSnapshot`]s,
//! deriving network rates from the previous call's counters, and appends
//! each snapshot to a fixed-capacity history. The history has its own lock
//! so chart readers never contend with the source.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::Utc;
use zerostat_core::history::{HistoryRing, DEFAULT_HISTORY_CAPACITY};
use zerostat_core::snapshot::{percent, MetricSnapshot};
use zerostat_core::types::Timestamp;

use crate::collector::MetricsSource;

/// Network counters and the time they were read.
#[derive(Debug, Clone, Copy)]
struct CounterMark {
    at: Timestamp,
    rx_bytes: u64,
    tx_bytes: u64,
}

struct SourceState {
    source: Box<dyn MetricsSource>,
    previous: Option<CounterMark>,
}

pub struct Sampler {
    state: Mutex<SourceState>,
    history: RwLock<HistoryRing<Arc<MetricSnapshot>>>,
}

impl Sampler {
    pub fn new(source: Box<dyn MetricsSource>) -> Self {
        Self::with_capacity(source, DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(source: Box<dyn MetricsSource>, capacity: usize) -> Self {
        Self {
            state: Mutex::new(SourceState {
                source,
                previous: None,
            }),
            history: RwLock::new(HistoryRing::new(capacity)),
        }
    }

    /// Take a reading now. Blocking; call from a blocking-capable context.
    pub fn sample(&self) -> Arc<MetricSnapshot> {
        self.sample_at(Utc::now())
    }

    /// Take a reading stamped `now`.
    ///
    /// Rates are zero on the first call and whenever no time has passed
    /// since the previous call. A counter that went backwards (interface
    /// reset) yields a zero rate for that call.
    ///
    /// A stamp older than the previous sample is raised to it, so callers
    /// that stamped before waiting on the lock never reorder the history.
    pub fn sample_at(&self, now: Timestamp) -> Arc<MetricSnapshot> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let now = match state.previous {
            Some(prev) => now.max(prev.at),
            None => now,
        };
        let raw = state.source.read();

        let (net_rx_rate, net_tx_rate) = match state.previous {
            Some(prev) => {
                let elapsed = now.signed_duration_since(prev.at).num_milliseconds() as f64 / 1000.0;
                if elapsed > 0.0 {
                    (
                        raw.net_rx_bytes.saturating_sub(prev.rx_bytes) as f64 / elapsed,
                        raw.net_tx_bytes.saturating_sub(prev.tx_bytes) as f64 / elapsed,
                    )
                } else {
                    (0.0, 0.0)
                }
            }
            None => (0.0, 0.0),
        };

        state.previous = Some(CounterMark {
            at: now,
            rx_bytes: raw.net_rx_bytes,
            tx_bytes: raw.net_tx_bytes,
        });

        let snapshot = Arc::new(MetricSnapshot {
            taken_at: now,
            cpu_percent: raw.cpu_percent,
            cpu_cores: raw.cpu_cores,
            mem_used_bytes: raw.mem_used_bytes,
            mem_total_bytes: raw.mem_total_bytes,
            mem_percent: percent(raw.mem_used_bytes, raw.mem_total_bytes),
            disk_used_bytes: raw.disk_used_bytes,
            disk_total_bytes: raw.disk_total_bytes,
            disk_percent: percent(raw.disk_used_bytes, raw.disk_total_bytes),
            net_rx_bytes: raw.net_rx_bytes,
            net_tx_bytes: raw.net_tx_bytes,
            net_rx_rate,
            net_tx_rate,
        });

        // Pushed while the source lock is held so history order matches
        // sampling order.
        self.history
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::clone(&snapshot));

        snapshot
    }

    /// Retained snapshots, oldest first.
    pub fn recent_history(&self) -> Vec<Arc<MetricSnapshot>> {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .ordered()
    }

    pub fn latest(&self) -> Option<Arc<MetricSnapshot>> {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .latest()
            .cloned()
    }

    pub fn history_capacity(&self) -> usize {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .capacity()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
