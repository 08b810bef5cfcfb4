//! Per-rule debounce / cooldown state machine.
//!
//! Pure logic -- no locks and no side effects. The evaluator reads a copy of
//! each rule, asks [`evaluate_rule`] what should happen on this tick, and then
//! performs the side effects and state writes the returned [`RuleOutcome`]
//! calls for.
//!
//! ```text
//!             breach                 elapsed >= duration
//!   Idle ───────────────▶ Violating ─────────────────────▶ Triggered
//!    ▲                        │                              │   ▲
//!    │        recovered       │                              │   │ cooldown elapsed
//!    └────────────────────────┴──────────────────────────────┘   │ (re-fire)
//!                                                                └─┘
//! ```

use crate::alert::{AlertRule, Comparison};
use crate::types::Timestamp;

/// Absolute tolerance used by the `==` operator.
pub const EQUALITY_TOLERANCE: f64 = 0.01;

/// What a single tick decided for one rule.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    /// Rule is inactive; its state is left untouched.
    Skipped,
    /// Not violating and nothing to clear.
    Idle,
    /// First breached tick of an episode: record `violating_since = now`.
    ViolationStarted,
    /// Still violating but the debounce duration has not elapsed.
    Pending,
    /// Debounce satisfied: fire the action and mark the rule triggered.
    Fire,
    /// Already triggered and the cooldown has elapsed: fire again.
    Refire,
    /// Already triggered and re-fire is not allowed yet (or at all).
    Suppressed,
    /// Breach ended: clear the episode, notifying only if the rule had fired.
    Recovered { notify: bool },
}

impl RuleOutcome {
    /// Whether this outcome fires the (non-recovery) action.
    pub fn fires(&self) -> bool {
        matches!(self, RuleOutcome::Fire | RuleOutcome::Refire)
    }
}

/// Compare `value` against `threshold` with the rule's operator.
pub fn compare(operator: &Comparison, value: f64, threshold: f64) -> bool {
    match operator {
        Comparison::Greater => value > threshold,
        Comparison::Less => value < threshold,
        Comparison::Equal => (value - threshold).abs() < EQUALITY_TOLERANCE,
        Comparison::Unrecognized(_) => value >= threshold,
    }
}

/// Decide what happens to `rule` on a tick at `now` observing `value`.
pub fn evaluate_rule(rule: &AlertRule, value: f64, now: Timestamp) -> RuleOutcome {
    if !rule.active {
        return RuleOutcome::Skipped;
    }

    let def = &rule.definition;
    let state = &rule.state;

    if !compare(&def.operator, value, def.threshold) {
        if state.violating_since.is_some() || state.has_triggered {
            return RuleOutcome::Recovered {
                notify: state.has_triggered,
            };
        }
        return RuleOutcome::Idle;
    }

    let Some(since) = state.violating_since else {
        return RuleOutcome::ViolationStarted;
    };

    if !has_elapsed(since, now, def.duration_secs) {
        return RuleOutcome::Pending;
    }

    if !state.has_triggered {
        return RuleOutcome::Fire;
    }

    match state.last_sent_at {
        Some(last) if def.cooldown_secs > 0 && has_elapsed(last, now, def.cooldown_secs) => {
            RuleOutcome::Refire
        }
        _ => RuleOutcome::Suppressed,
    }
}

/// `now - since >= secs`, inclusive at the boundary.
fn has_elapsed(since: Timestamp, now: Timestamp, secs: u64) -> bool {
    let required_ms = i64::try_from(secs).unwrap_or(i64::MAX).saturating_mul(1000);
    now.signed_duration_since(since).num_milliseconds() >= required_ms
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
