//! In-memory rule store.
//!
//! Readers get deep copies so an evaluation pass never holds the lock while
//! it fires actions. Writers locate the target by id first; a rule that
//! vanished in the meantime is reported as not found and nothing changes.
//! The evaluator's writers also re-check `active` under the same lock, so a
//! rule disabled after the pass copied it is left alone.

use indexmap::IndexMap;
use tokio::sync::RwLock;
use zerostat_core::alert::{AlertRule, RuleDefinition, RuleState};
use zerostat_core::types::{RuleId, Timestamp};

/// Insertion-ordered collection of alert rules keyed by id.
#[derive(Debug, Default)]
pub struct RuleStore {
    rules: RwLock<IndexMap<RuleId, AlertRule>>,
}

impl RuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: Vec<AlertRule>) -> Self {
        Self {
            rules: RwLock::new(index(rules)),
        }
    }

    /// Copy of every rule, in insertion order.
    pub async fn list_rules(&self) -> Vec<AlertRule> {
        self.rules.read().await.values().cloned().collect()
    }

    pub async fn get_rule(&self, id: &str) -> Option<AlertRule> {
        self.rules.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.rules.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rules.read().await.is_empty()
    }

    /// Set the breach-episode fields of rule `id`. Returns `false` if the
    /// rule no longer exists.
    pub async fn upsert_rule_state(
        &self,
        id: &str,
        violating_since: Option<Timestamp>,
        has_triggered: bool,
    ) -> bool {
        let mut rules = self.rules.write().await;
        match rules.get_mut(id) {
            Some(rule) => {
                rule.state.violating_since = violating_since;
                rule.state.has_triggered = has_triggered;
                true
            }
            None => false,
        }
    }

    /// Record that rule `id` fired at `at`.
    pub async fn mark_sent(&self, id: &str, at: Timestamp) -> bool {
        let mut rules = self.rules.write().await;
        match rules.get_mut(id) {
            Some(rule) => {
                rule.state.last_sent_at = Some(at);
                rule.state.sent_count += 1;
                true
            }
            None => false,
        }
    }

    /// Open a breach episode on an active rule.
    pub async fn start_violation(&self, id: &str, since: Timestamp) -> bool {
        self.update_active(id, |state| {
            state.violating_since = Some(since);
            state.has_triggered = false;
        })
        .await
    }

    /// Mark an active rule triggered and record the send at `at`, in one
    /// write. Returns `false` (and changes nothing) if the rule is gone or
    /// was disabled.
    pub async fn mark_fired(&self, id: &str, violating_since: Option<Timestamp>, at: Timestamp) -> bool {
        self.update_active(id, |state| {
            state.violating_since = violating_since;
            state.has_triggered = true;
            state.last_sent_at = Some(at);
            state.sent_count += 1;
        })
        .await
    }

    /// Close the breach episode of an active rule.
    pub async fn end_episode(&self, id: &str) -> bool {
        self.update_active(id, RuleState::reset_episode).await
    }

    async fn update_active(&self, id: &str, update: impl FnOnce(&mut RuleState)) -> bool {
        let mut rules = self.rules.write().await;
        match rules.get_mut(id) {
            Some(rule) if rule.active => {
                update(&mut rule.state);
                true
            }
            _ => false,
        }
    }

    /// Swap in a whole new rule list.
    pub async fn replace_rules(&self, rules: Vec<AlertRule>) {
        *self.rules.write().await = index(rules);
    }

    /// Append a new active rule with a fresh id.
    pub async fn add_rule(&self, definition: RuleDefinition) -> AlertRule {
        let rule = AlertRule::new(uuid::Uuid::new_v4().to_string(), definition);
        self.rules
            .write()
            .await
            .insert(rule.id.clone(), rule.clone());
        rule
    }

    /// Flip `active` and restart breach tracking.
    pub async fn toggle_rule(&self, id: &str) -> Option<AlertRule> {
        let mut rules = self.rules.write().await;
        let rule = rules.get_mut(id)?;
        rule.active = !rule.active;
        rule.state.reset_episode();
        Some(rule.clone())
    }

    pub async fn delete_rule(&self, id: &str) -> bool {
        self.rules.write().await.shift_remove(id).is_some()
    }
}

fn index(rules: Vec<AlertRule>) -> IndexMap<RuleId, AlertRule> {
    rules
        .into_iter()
        .map(|rule| (rule.id.clone(), rule))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
