//! Audit module - append-only SQLite log of findings
//!
//! Every run appends one row per finding to the `events` table, stamped with
//! the run's id, the time of the write, tool version and regime. Rows are
//! never updated or deleted. The same store answers the read-only queries
//! behind `ccscan history`.

mod store;

pub use store::AuditStore;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use uuid::Uuid;

use crate::rules::Regime;

/// Timestamp layout stored in the log: ISO-8601 UTC, seconds, `Z` suffix
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Context shared by every event of one invocation
#[derive(Debug, Clone)]
pub struct Run {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub version: String,
    pub regime: Regime,
}

impl Run {
    /// Start a run now with a fresh random id
    pub fn new(regime: Regime, version: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            version: version.into(),
            regime,
        }
    }

}

/// Render a time the way the log stores it
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Outcome of a successful append
#[derive(Debug, Clone, PartialEq)]
pub struct AuditReceipt {
    /// Rows written
    pub count: usize,
    /// Database file the rows went to
    pub location: PathBuf,
}

/// One persisted finding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEvent {
    pub id: i64,
    pub ts: String,
    pub run_id: String,
    pub version: String,
    pub regime: String,
    pub doc: String,
    pub rule_id: String,
    pub label: String,
    pub severity: String,
    pub snippet: String,
}

/// Conjunctive filter over audit events. `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub regime: Option<Regime>,
    pub rule_id: Option<String>,
    pub doc: Option<String>,
    pub run_id: Option<String>,
    /// Inclusive lower bound, compared against the stored timestamp text
    pub since: Option<String>,
    pub limit: Option<usize>,
}

/// Aggregates over the events matching a filter
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuditSummary {
    pub total: usize,
    pub unique_docs: usize,
    pub unique_rules: usize,
    pub latest_run: Option<LatestRun>,
    /// `(rule_id, count)`, most frequent first
    pub by_rule: Vec<(String, usize)>,
    /// `(doc, count)`, most frequent first
    pub by_doc: Vec<(String, usize)>,
}

/// Most recent run among the matching events
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestRun {
    pub run_id: String,
    pub ts: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(format_timestamp(at), "2024-03-09T07:05:01Z");
    }

    #[test]
    fn test_run_ids_are_unique() {
        let a = Run::new(Regime::Soc2, "0.3.0");
        let b = Run::new(Regime::Soc2, "0.3.0");
        assert_ne!(a.run_id, b.run_id);
        assert_eq!(a.run_id.get_version_num(), 4);
    }
}
