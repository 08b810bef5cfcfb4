//! Alert and recovery message rendering.
//!
//! Placeholders are replaced literally; there are no conditionals and no
//! escaping.
//!
//! | Placeholder   | Value                                  |
//! |---------------|----------------------------------------|
//! | `{hostname}`  | host name of the machine               |
//! | `{metric}`    | `CPU`, `RAM` or `Disk`                 |
//! | `{value}`     | observed value, 2 decimals             |
//! | `{threshold}` | rule threshold, 2 decimals             |
//! | `{operator}`  | rule operator as written               |
//! | `{duration}`  | sustained-breach duration, whole secs  |

use crate::alert::RuleDefinition;

/// Used when a rule fires and has no template of its own.
pub const DEFAULT_ALERT_TEMPLATE: &str = "[ZeroStat] {hostname} Warning: {metric} value is {value}%! (Threshold: {operator}{threshold}, Duration: {duration}s)";

/// Used when a triggered rule recovers and has no template of its own.
pub const DEFAULT_RECOVERY_TEMPLATE: &str =
    "[ZeroStat] {hostname} Recovery: {metric} is now at {value}%. System is safe.";

/// Fallback when the host name cannot be determined.
pub const UNKNOWN_HOST: &str = "unknown-host";

/// Render the message for a fire (`is_recovery == false`) or a recovery.
///
/// A rule-provided template is used for both; the built-in defaults differ.
pub fn render_message(
    definition: &RuleDefinition,
    hostname: &str,
    value: f64,
    is_recovery: bool,
) -> String {
    let template = match (definition.message_template.is_empty(), is_recovery) {
        (false, _) => definition.message_template.as_str(),
        (true, true) => DEFAULT_RECOVERY_TEMPLATE,
        (true, false) => DEFAULT_ALERT_TEMPLATE,
    };
    let hostname = if hostname.is_empty() {
        UNKNOWN_HOST
    } else {
        hostname
    };

    template
        .replace("{hostname}", hostname)
        .replace("{metric}", definition.metric.as_str())
        .replace("{value}", &format!("{value:.2}"))
        .replace("{threshold}", &format!("{:.2}", definition.threshold))
        .replace("{operator}", definition.operator.as_str())
        .replace("{duration}", &definition.duration_secs.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::{Comparison, MetricKind, NotificationChannel};

    fn definition(template: &str) -> RuleDefinition {
        RuleDefinition {
            metric: MetricKind::Cpu,
            operator: Comparison::Greater,
            threshold: 80.0,
            duration_secs: 10,
            cooldown_secs: 60,
            message_template: template.to_string(),
            shell_command: None,
            channel: NotificationChannel::Webhook,
        }
    }

    #[test]
    fn default_alert_message() {
        let msg = render_message(&definition(""), "web-1", 85.126, false);
        assert_eq!(
            msg,
            "[ZeroStat] web-1 Warning: CPU value is 85.13%! (Threshold: >80.00, Duration: 10s)"
        );
    }

    #[test]
    fn default_recovery_message() {
        let msg = render_message(&definition(""), "web-1", 42.0, true);
        assert_eq!(
            msg,
            "[ZeroStat] web-1 Recovery: CPU is now at 42.00%. System is safe."
        );
    }

    #[test]
    fn custom_template_used_for_recovery_too() {
        let def = definition("{metric}={value} on {hostname}");
        assert_eq!(render_message(&def, "db", 1.0, true), "CPU=1.00 on db");
        assert_eq!(render_message(&def, "db", 99.999, false), "CPU=100.00 on db");
    }

    #[test]
    fn repeated_placeholders_all_replaced() {
        let def = definition("{value} {value} {unknown}");
        assert_eq!(render_message(&def, "h", 3.0, false), "3.00 3.00 {unknown}");
    }

    #[test]
    fn empty_hostname_falls_back() {
        let def = definition("{hostname}");
        assert_eq!(render_message(&def, "", 0.0, false), UNKNOWN_HOST);
    }
}
