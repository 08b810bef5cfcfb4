//! Integration tests for the evaluator tick loop.
//!
//! Drives [`Evaluator`] with a scripted metrics source and a recording
//! action sink, stamping each tick explicitly so debounce and cooldown
//! boundaries are exact.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use zerostat_agent::collector::{MetricsSource, RawReading};
use zerostat_agent::dispatcher::ActionSink;
use zerostat_agent::evaluator::{Evaluator, PassSummary};
use zerostat_agent::sampler::Sampler;
use zerostat_agent::store::RuleStore;
use zerostat_core::alert::{
    AlertRule, Comparison, MetricKind, NotificationChannel, RuleDefinition, RuleState,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Feeds queued CPU percentages; repeats the last one when the queue runs dry.
#[derive(Clone, Default)]
struct ScriptedCpu {
    queue: Arc<Mutex<VecDeque<f64>>>,
    last: Arc<Mutex<f64>>,
}

impl ScriptedCpu {
    fn push(&self, values: &[f64]) {
        self.queue.lock().unwrap().extend(values.iter().copied());
    }
}

impl MetricsSource for ScriptedCpu {
    fn read(&mut self) -> RawReading {
        let mut last = self.last.lock().unwrap();
        if let Some(next) = self.queue.lock().unwrap().pop_front() {
            *last = next;
        }
        RawReading {
            cpu_percent: *last,
            cpu_cores: 4,
            mem_used_bytes: 2,
            mem_total_bytes: 8,
            ..Default::default()
        }
    }
}

/// Records every `fire` call as `(rule_id, value, is_recovery)`.
#[derive(Default)]
struct RecordingSink {
    calls: Mutex<Vec<(String, f64, bool)>>,
}

impl RecordingSink {
    fn calls(&self) -> Vec<(String, f64, bool)> {
        self.calls.lock().unwrap().clone()
    }
}

impl ActionSink for RecordingSink {
    fn fire(&self, rule: &AlertRule, value: f64, is_recovery: bool) {
        self.calls
            .lock()
            .unwrap()
            .push((rule.id.clone(), value, is_recovery));
    }
}

struct Harness {
    cpu: ScriptedCpu,
    store: Arc<RuleStore>,
    sink: Arc<RecordingSink>,
    evaluator: Evaluator,
}

fn harness(rules: Vec<AlertRule>) -> Harness {
    let cpu = ScriptedCpu::default();
    let store = Arc::new(RuleStore::with_rules(rules));
    let sink = Arc::new(RecordingSink::default());
    let sampler = Arc::new(Sampler::new(Box::new(cpu.clone())));
    let evaluator = Evaluator::new(Arc::clone(&store), sampler, sink.clone());
    Harness {
        cpu,
        store,
        sink,
        evaluator,
    }
}

fn cpu_rule(id: &str, threshold: f64, duration: u64, cooldown: u64) -> AlertRule {
    AlertRule::new(
        id,
        RuleDefinition {
            metric: MetricKind::Cpu,
            operator: Comparison::Greater,
            threshold,
            duration_secs: duration,
            cooldown_secs: cooldown,
            message_template: String::new(),
            shell_command: None,
            channel: NotificationChannel::None,
        },
    )
}

fn t(secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap() + Duration::seconds(secs)
}

// ---------------------------------------------------------------------------
// Test: debounce then cooldown suppression (3-second ticks)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sustained_breach_fires_once_at_duration_boundary() {
    let h = harness(vec![cpu_rule("cpu-hot", 80.0, 10, 60)]);
    h.cpu.push(&[85.0, 85.0, 85.0, 85.0, 85.0, 82.0]);

    // Breach begins at t0 and is tracked without firing.
    h.evaluator.tick_at(t(0)).await;
    let rule = h.store.get_rule("cpu-hot").await.unwrap();
    assert_eq!(rule.state.violating_since, Some(t(0)));
    assert!(!rule.state.has_triggered);

    for secs in [3, 6, 9] {
        let summary = h.evaluator.tick_at(t(secs)).await;
        assert_eq!(summary.fired, 0, "no fire at +{secs}s");
    }
    assert!(h.sink.calls().is_empty());

    let summary = h.evaluator.tick_at(t(12)).await;
    assert_eq!(summary.fired, 1);

    // Still above threshold, but inside the cooldown window.
    let summary = h.evaluator.tick_at(t(15)).await;
    assert_eq!(summary.fired, 0);

    assert_eq!(h.sink.calls(), vec![("cpu-hot".to_string(), 85.0, false)]);

    let rule = h.store.get_rule("cpu-hot").await.unwrap();
    assert_eq!(rule.state.violating_since, Some(t(0)));
    assert!(rule.state.has_triggered);
    assert_eq!(rule.state.last_sent_at, Some(t(12)));
    assert_eq!(rule.state.sent_count, 1);
}

// ---------------------------------------------------------------------------
// Test: cooldown re-fire and zero-cooldown single shot
// ---------------------------------------------------------------------------

#[tokio::test]
async fn refires_only_after_cooldown() {
    let h = harness(vec![
        cpu_rule("with-cooldown", 50.0, 0, 6),
        cpu_rule("no-cooldown", 50.0, 0, 0),
    ]);
    h.cpu.push(&[90.0]);

    h.evaluator.tick_at(t(0)).await; // both start violating
    h.evaluator.tick_at(t(3)).await; // both fire (duration 0)
    h.evaluator.tick_at(t(6)).await; // 3s since send: suppressed
    h.evaluator.tick_at(t(9)).await; // 6s since send: with-cooldown re-fires
    h.evaluator.tick_at(t(30)).await; // 21s since: re-fires again

    let fired: Vec<_> = h.sink.calls().into_iter().map(|(id, _, _)| id).collect();
    assert_eq!(
        fired,
        vec![
            "with-cooldown",
            "no-cooldown",
            "with-cooldown",
            "with-cooldown"
        ]
    );

    let no_cooldown = h.store.get_rule("no-cooldown").await.unwrap();
    assert_eq!(no_cooldown.state.sent_count, 1);
    let with_cooldown = h.store.get_rule("with-cooldown").await.unwrap();
    assert_eq!(with_cooldown.state.sent_count, 3);
    assert_eq!(with_cooldown.state.last_sent_at, Some(t(30)));
}

// ---------------------------------------------------------------------------
// Test: recovery
// ---------------------------------------------------------------------------

#[tokio::test]
async fn recovery_notifies_only_after_trigger() {
    let h = harness(vec![
        cpu_rule("triggered", 80.0, 0, 0),
        cpu_rule("pending", 80.0, 60, 0),
    ]);
    h.cpu.push(&[95.0, 95.0, 40.0, 40.0]);

    h.evaluator.tick_at(t(0)).await;
    h.evaluator.tick_at(t(3)).await; // "triggered" fires, "pending" still waiting
    let summary = h.evaluator.tick_at(t(6)).await;
    assert_eq!(
        summary,
        PassSummary {
            evaluated: 2,
            fired: 0,
            recovered: 1
        }
    );

    assert_eq!(
        h.sink.calls(),
        vec![
            ("triggered".to_string(), 95.0, false),
            ("triggered".to_string(), 40.0, true),
        ]
    );

    for rule in h.store.list_rules().await {
        assert!(rule.state.violating_since.is_none(), "{} cleared", rule.id);
        assert!(!rule.state.has_triggered);
    }

    // A further healthy tick does not notify again.
    h.evaluator.tick_at(t(9)).await;
    assert_eq!(h.sink.calls().len(), 2);
}

#[tokio::test]
async fn new_episode_after_recovery_debounces_again() {
    let h = harness(vec![cpu_rule("flappy", 80.0, 5, 0)]);
    h.cpu.push(&[90.0, 90.0, 10.0, 90.0, 90.0, 90.0]);

    h.evaluator.tick_at(t(0)).await;
    h.evaluator.tick_at(t(6)).await; // fire
    h.evaluator.tick_at(t(9)).await; // recover
    h.evaluator.tick_at(t(12)).await; // new episode starts
    h.evaluator.tick_at(t(15)).await; // 3s into episode: pending
    h.evaluator.tick_at(t(17)).await; // 5s: fires

    let calls = h.sink.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[2], ("flappy".to_string(), 90.0, false));
    let rule = h.store.get_rule("flappy").await.unwrap();
    assert_eq!(rule.state.violating_since, Some(t(12)));
    assert_eq!(rule.state.sent_count, 2);
}

// ---------------------------------------------------------------------------
// Test: inactive rules are frozen
// ---------------------------------------------------------------------------

#[tokio::test]
async fn inactive_rule_state_never_changes() {
    let mut rule = cpu_rule("paused", 10.0, 0, 0);
    rule.active = false;
    let h = harness(vec![rule.clone()]);
    h.cpu.push(&[99.0, 0.0, 99.0, 99.0]);

    for secs in [0, 3, 6, 9] {
        let summary = h.evaluator.tick_at(t(secs)).await;
        assert_eq!(summary.evaluated, 0);
    }

    assert_eq!(h.store.get_rule("paused").await.unwrap(), rule);
    assert!(h.sink.calls().is_empty());
}

// ---------------------------------------------------------------------------
// Test: one snapshot per pass
// ---------------------------------------------------------------------------

#[tokio::test]
async fn every_rule_in_a_pass_sees_the_same_reading() {
    let h = harness(vec![
        cpu_rule("a", 50.0, 0, 0),
        cpu_rule("b", 50.0, 0, 0),
        cpu_rule("c", 50.0, 0, 0),
    ]);
    h.cpu.push(&[70.0, 71.0]);

    h.evaluator.tick_at(t(0)).await;
    h.evaluator.tick_at(t(3)).await;

    let values: Vec<f64> = h.sink.calls().into_iter().map(|(_, v, _)| v).collect();
    assert_eq!(values, vec![71.0, 71.0, 71.0]);
}

// ---------------------------------------------------------------------------
// Test: concurrent deletion and disabling
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rule_deleted_between_ticks_is_ignored() {
    let h = harness(vec![cpu_rule("doomed", 50.0, 0, 0), cpu_rule("kept", 50.0, 0, 0)]);
    h.cpu.push(&[90.0]);

    h.evaluator.tick_at(t(0)).await;
    assert!(h.store.delete_rule("doomed").await);
    h.evaluator.tick_at(t(3)).await;

    assert_eq!(h.sink.calls(), vec![("kept".to_string(), 90.0, false)]);
    assert!(h.store.get_rule("doomed").await.is_none());
}

/// On its first fire, deletes one rule and disables another while the pass
/// that fired is still iterating over its copy of the rule list.
struct MutatingSink {
    store: Arc<RuleStore>,
    delete: &'static str,
    disable: &'static str,
    calls: Mutex<Vec<String>>,
}

impl ActionSink for MutatingSink {
    fn fire(&self, rule: &AlertRule, _value: f64, _is_recovery: bool) {
        let first = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(rule.id.clone());
            calls.len() == 1
        };
        if first {
            let store = Arc::clone(&self.store);
            let (delete, disable) = (self.delete, self.disable);
            tokio::task::block_in_place(|| {
                tokio::runtime::Handle::current().block_on(async move {
                    assert!(store.delete_rule(delete).await);
                    assert!(store.toggle_rule(disable).await.is_some());
                });
            });
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn rules_removed_during_a_pass_are_not_fired_or_written() {
    let cpu = ScriptedCpu::default();
    cpu.push(&[90.0]);
    let store = Arc::new(RuleStore::with_rules(vec![
        cpu_rule("first", 50.0, 0, 0),
        cpu_rule("deleted", 50.0, 0, 0),
        cpu_rule("disabled", 50.0, 0, 0),
    ]));
    let sink = Arc::new(MutatingSink {
        store: Arc::clone(&store),
        delete: "deleted",
        disable: "disabled",
        calls: Mutex::new(Vec::new()),
    });
    let sampler = Arc::new(Sampler::new(Box::new(cpu)));
    let evaluator = Arc::new(Evaluator::new(Arc::clone(&store), sampler, sink.clone()));

    evaluator.tick_at(t(0)).await; // all three start violating

    // Run on a worker so the sink can block on the store mid-pass.
    let summary = tokio::spawn({
        let evaluator = Arc::clone(&evaluator);
        async move { evaluator.tick_at(t(3)).await }
    })
    .await
    .unwrap();

    assert_eq!(summary.fired, 1);
    assert_eq!(*sink.calls.lock().unwrap(), vec!["first".to_string()]);
    assert!(store.get_rule("deleted").await.is_none());

    let disabled = store.get_rule("disabled").await.unwrap();
    assert!(!disabled.active);
    assert_eq!(disabled.state, RuleState::default());
}

// ---------------------------------------------------------------------------
// Test: passes never overlap
// ---------------------------------------------------------------------------

#[tokio::test]
async fn overlapping_ticks_are_serialized() {
    let h = harness(vec![cpu_rule("solo", 50.0, 0, 0)]);
    h.cpu.push(&[90.0]);

    // Serialized, the first pass opens the episode and the second (same
    // instant, zero duration) fires it.
    let (a, b) = tokio::join!(h.evaluator.tick_at(t(0)), h.evaluator.tick_at(t(0)));
    assert_eq!(a.fired + b.fired, 1);
    assert_eq!(h.sink.calls(), vec![("solo".to_string(), 90.0, false)]);

    let rule = h.store.get_rule("solo").await.unwrap();
    assert_eq!(rule.state.violating_since, Some(t(0)));
    assert!(rule.state.has_triggered);
    assert_eq!(rule.state.sent_count, 1);

    // Zero cooldown: further concurrent ticks stay suppressed.
    let (a, b) = tokio::join!(h.evaluator.tick_at(t(3)), h.evaluator.tick_at(t(3)));
    assert_eq!(a.fired + b.fired, 0);
    assert_eq!(h.sink.calls().len(), 1);
}

// ---------------------------------------------------------------------------
// Test: evaluating a supplied snapshot
// ---------------------------------------------------------------------------

#[tokio::test]
async fn evaluate_snapshot_uses_the_given_reading() {
    let mut ram_rule = cpu_rule("ram", 20.0, 0, 0);
    ram_rule.definition.metric = MetricKind::Ram;
    let h = harness(vec![ram_rule]);

    let mut snapshot = zerostat_core::snapshot::MetricSnapshot::empty(t(0));
    snapshot.mem_percent = 25.0;
    h.evaluator.evaluate_snapshot(&snapshot, t(0)).await;
    snapshot.taken_at = t(3);
    let summary = h.evaluator.evaluate_snapshot(&snapshot, t(3)).await;

    assert_eq!(summary.fired, 1);
    assert_eq!(h.sink.calls(), vec![("ram".to_string(), 25.0, false)]);
}
