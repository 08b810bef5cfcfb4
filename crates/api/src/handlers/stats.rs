//! Handlers for live host metrics and trend history.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use zerostat_core::chart::chart_points;
use zerostat_core::snapshot::MetricSnapshot;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Dashboard chart viewbox width.
pub const CHART_WIDTH: f64 = 100.0;
/// Dashboard chart viewbox height.
pub const CHART_HEIGHT: f64 = 30.0;
/// Upper bound of every chart's y-axis (percent, or KiB/s for network).
pub const CHART_MAX: f64 = 100.0;

const BYTES_PER_KIB: f64 = 1024.0;

/// SVG polyline points for each dashboard trend line.
#[derive(Debug, Serialize)]
pub struct ChartSet {
    pub cpu: String,
    pub memory: String,
    /// Receive rate in KiB/s.
    pub net_rx: String,
    /// Transmit rate in KiB/s.
    pub net_tx: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub capacity: usize,
    /// Oldest first.
    pub samples: Vec<MetricSnapshot>,
    pub charts: ChartSet,
}

/// GET /stats
///
/// Take a fresh sample. The sample also joins the trend history.
pub async fn get_stats(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<MetricSnapshot>>> {
    let sampler = Arc::clone(&state.sampler);
    let snapshot = tokio::task::spawn_blocking(move || sampler.sample())
        .await
        .map_err(|e| AppError::InternalError(format!("sampling task failed: {e}")))?;

    Ok(Json(DataResponse {
        data: MetricSnapshot::clone(&snapshot),
    }))
}

/// GET /stats/history
pub async fn get_history(State(state): State<AppState>) -> Json<DataResponse<HistoryResponse>> {
    let capacity = state.sampler.history_capacity();
    let samples: Vec<MetricSnapshot> = state
        .sampler
        .recent_history()
        .iter()
        .map(|snap| snap.as_ref().clone())
        .collect();

    let charts = build_charts(&samples, capacity);

    Json(DataResponse {
        data: HistoryResponse {
            capacity,
            samples,
            charts,
        },
    })
}

fn build_charts(samples: &[MetricSnapshot], capacity: usize) -> ChartSet {
    let line = |pick: fn(&MetricSnapshot) -> f64| {
        let values: Vec<f64> = samples.iter().map(pick).collect();
        chart_points(&values, CHART_WIDTH, CHART_HEIGHT, CHART_MAX, capacity)
    };

    ChartSet {
        cpu: line(|s| s.cpu_percent),
        memory: line(|s| s.mem_percent),
        net_rx: line(|s| s.net_rx_rate / BYTES_PER_KIB),
        net_tx: line(|s| s.net_tx_rate / BYTES_PER_KIB),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
