//! Per-tick rule evaluation.
//!
//! One pass = one fresh snapshot shared by every rule, a decision per rule
//! from [`evaluate_rule`], then the store writes and actions that decision
//! calls for. Passes are serialized; the rule store lock is never held
//! while actions are dispatched.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use zerostat_core::evaluation::{evaluate_rule, RuleOutcome};
use zerostat_core::snapshot::MetricSnapshot;
use zerostat_core::types::Timestamp;

use crate::dispatcher::ActionSink;
use crate::sampler::Sampler;
use crate::store::RuleStore;

/// Counts from one evaluation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Active rules looked at.
    pub evaluated: usize,
    pub fired: usize,
    pub recovered: usize,
}

pub struct Evaluator {
    store: Arc<RuleStore>,
    sampler: Arc<Sampler>,
    sink: Arc<dyn ActionSink>,
    pass_guard: Mutex<()>,
}

impl Evaluator {
    pub fn new(store: Arc<RuleStore>, sampler: Arc<Sampler>, sink: Arc<dyn ActionSink>) -> Self {
        Self {
            store,
            sampler,
            sink,
            pass_guard: Mutex::new(()),
        }
    }

    /// Sample and evaluate at the current time.
    pub async fn tick(&self) -> PassSummary {
        self.tick_at(Utc::now()).await
    }

    /// Sample stamped `now`, then evaluate every rule against that sample.
    pub async fn tick_at(&self, now: Timestamp) -> PassSummary {
        let _pass = self.pass_guard.lock().await;

        let sampler = Arc::clone(&self.sampler);
        let snapshot = match tokio::task::spawn_blocking(move || sampler.sample_at(now)).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!(error = %e, "Metric sampling task failed, skipping tick");
                return PassSummary::default();
            }
        };

        self.apply(&snapshot, now).await
    }

    /// Evaluate every rule against an existing snapshot.
    pub async fn evaluate_snapshot(&self, snapshot: &MetricSnapshot, now: Timestamp) -> PassSummary {
        let _pass = self.pass_guard.lock().await;
        self.apply(snapshot, now).await
    }

    async fn apply(&self, snapshot: &MetricSnapshot, now: Timestamp) -> PassSummary {
        let mut summary = PassSummary::default();

        for rule in self.store.list_rules().await {
            let value = rule.definition.metric.value_in(snapshot);
            let outcome = evaluate_rule(&rule, value, now);
            if outcome != RuleOutcome::Skipped {
                summary.evaluated += 1;
            }

            match outcome {
                RuleOutcome::Skipped | RuleOutcome::Idle | RuleOutcome::Pending => {}
                RuleOutcome::ViolationStarted => {
                    tracing::debug!(rule_id = %rule.id, metric = %rule.definition.metric, value, "Violation started");
                    self.store.start_violation(&rule.id, now).await;
                }
                RuleOutcome::Fire | RuleOutcome::Refire => {
                    if !self
                        .store
                        .mark_fired(&rule.id, rule.state.violating_since, now)
                        .await
                    {
                        continue;
                    }
                    if outcome == RuleOutcome::Refire {
                        tracing::info!(rule_id = %rule.id, metric = %rule.definition.metric, value, "Alert rule re-fired after cooldown");
                    } else {
                        tracing::info!(rule_id = %rule.id, metric = %rule.definition.metric, value, "Alert rule fired");
                    }
                    self.sink.fire(&rule, value, false);
                    summary.fired += 1;
                }
                RuleOutcome::Suppressed => {
                    tracing::debug!(rule_id = %rule.id, "Re-fire suppressed by cooldown");
                }
                RuleOutcome::Recovered { notify } => {
                    if !self.store.end_episode(&rule.id).await {
                        continue;
                    }
                    if notify {
                        tracing::info!(rule_id = %rule.id, metric = %rule.definition.metric, value, "Alert rule recovered");
                        self.sink.fire(&rule, value, true);
                        summary.recovered += 1;
                    }
                }
            }
        }

        summary
    }
}
