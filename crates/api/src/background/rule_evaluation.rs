//! Periodic alert rule evaluation.
//!
//! Drives [`Evaluator::tick`] on a fixed `tokio::time::interval`. A pass
//! that overruns the interval delays the next tick rather than dropping it,
//! and passes never overlap because each one is awaited inside the loop.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use zerostat_agent::evaluator::Evaluator;

/// Run the evaluation loop until `cancel` is triggered.
pub async fn run(evaluator: Arc<Evaluator>, interval: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = interval.as_secs(), "Rule evaluation loop started");

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Rule evaluation loop stopping");
                break;
            }
            _ = ticker.tick() => {
                let summary = evaluator.tick().await;
                if summary.fired > 0 || summary.recovered > 0 {
                    tracing::debug!(
                        evaluated = summary.evaluated,
                        fired = summary.fired,
                        recovered = summary.recovered,
                        "Evaluation pass complete"
                    );
                }
            }
        }
    }
}
