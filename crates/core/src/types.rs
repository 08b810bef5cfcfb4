/// Rule identifiers are opaque strings, stable across edits.
pub type RuleId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
