//! SQLite-backed audit store

use chrono::{DateTime, Utc};
use rusqlite::types::ToSql;
use rusqlite::{params, Connection, Row};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{format_timestamp, AuditEvent, AuditReceipt, AuditSummary, EventFilter, LatestRun, Run};
use crate::error::PersistenceError;
use crate::rules::Finding;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS events (
        id       INTEGER PRIMARY KEY AUTOINCREMENT,
        ts       TEXT NOT NULL,
        run_id   TEXT NOT NULL,
        version  TEXT NOT NULL,
        regime   TEXT NOT NULL,
        doc      TEXT NOT NULL,
        rule_id  TEXT NOT NULL,
        label    TEXT NOT NULL,
        severity TEXT NOT NULL,
        snippet  TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_events_run    ON events(run_id);
    CREATE INDEX IF NOT EXISTS idx_events_doc    ON events(doc);
    CREATE INDEX IF NOT EXISTS idx_events_regime ON events(regime);
    CREATE INDEX IF NOT EXISTS idx_events_rule   ON events(rule_id);
";

const EVENT_COLUMNS: &str =
    "id, ts, run_id, version, regime, doc, rule_id, label, severity, snippet";

const INSERT_EVENT: &str = "
    INSERT INTO events (ts, run_id, version, regime, doc, rule_id, label, severity, snippet)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
";

/// Append-only event log
pub struct AuditStore {
    conn: Connection,
    path: PathBuf,
}

impl AuditStore {
    /// Open (or create) the log at `path`, creating parent directories and
    /// the schema if missing.
    pub fn open(path: &Path) -> Result<Self, PersistenceError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| PersistenceError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path).map_err(|source| PersistenceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        conn.execute_batch(SCHEMA)
            .map_err(PersistenceError::Schema)?;

        debug!(path = %path.display(), "Audit log ready");
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one event per finding, all in one transaction and sharing the
    /// run's id and one timestamp taken now. On error nothing from the batch
    /// is kept.
    pub fn append_run(
        &mut self,
        run: &Run,
        findings: &[Finding],
    ) -> Result<AuditReceipt, PersistenceError> {
        self.append_run_at(run, findings, Utc::now())
    }

    /// [`AuditStore::append_run`] with an explicit write time
    pub fn append_run_at(
        &mut self,
        run: &Run,
        findings: &[Finding],
        written_at: DateTime<Utc>,
    ) -> Result<AuditReceipt, PersistenceError> {
        let ts = format_timestamp(written_at);
        let run_id = run.run_id.to_string();
        let regime = run.regime.as_str();

        let tx = self.conn.transaction().map_err(PersistenceError::Write)?;
        {
            let mut stmt = tx.prepare(INSERT_EVENT).map_err(PersistenceError::Write)?;
            for f in findings {
                stmt.execute(params![
                    ts,
                    run_id,
                    run.version,
                    regime,
                    f.doc,
                    f.rule_id,
                    f.label,
                    f.severity.as_str(),
                    f.snippet,
                ])
                .map_err(PersistenceError::Write)?;
            }
        }
        tx.commit().map_err(PersistenceError::Write)?;

        debug!(run_id = %run_id, count = findings.len(), "Audit events appended");
        Ok(AuditReceipt {
            count: findings.len(),
            location: self.path.clone(),
        })
    }

    /// Total number of events
    pub fn count(&self) -> Result<usize, PersistenceError> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))
            .map_err(PersistenceError::Query)?;
        Ok(n as usize)
    }

    /// Events matching `filter`, newest first
    pub fn query(&self, filter: &EventFilter) -> Result<Vec<AuditEvent>, PersistenceError> {
        let (clause, mut params) = where_clause(filter);
        let mut sql = format!("SELECT {EVENT_COLUMNS} FROM events{clause} ORDER BY id DESC");
        if let Some(limit) = filter.limit {
            sql.push_str(&format!(" LIMIT ?{}", params.len() + 1));
            params.push(Box::new(limit as i64));
        }

        let mut stmt = self.conn.prepare(&sql).map_err(PersistenceError::Query)?;
        let params_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let rows = stmt
            .query_map(params_refs.as_slice(), parse_event_row)
            .map_err(PersistenceError::Query)?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(PersistenceError::Query)
    }

    /// Aggregate counts over events matching `filter` (its limit is ignored)
    pub fn summary(&self, filter: &EventFilter) -> Result<AuditSummary, PersistenceError> {
        let (clause, params) = where_clause(filter);
        let params_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let params = params_refs.as_slice();

        let (total, unique_docs, unique_rules): (i64, i64, i64) = self
            .conn
            .query_row(
                &format!(
                    "SELECT COUNT(*), COUNT(DISTINCT doc), COUNT(DISTINCT rule_id) FROM events{clause}"
                ),
                params,
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .map_err(PersistenceError::Query)?;

        let latest_run = {
            let mut stmt = self
                .conn
                .prepare(&format!(
                    "SELECT run_id, ts FROM events{clause} ORDER BY id DESC LIMIT 1"
                ))
                .map_err(PersistenceError::Query)?;
            let mut rows = stmt
                .query_map(params, |row| {
                    Ok(LatestRun {
                        run_id: row.get(0)?,
                        ts: row.get(1)?,
                    })
                })
                .map_err(PersistenceError::Query)?;
            let latest = rows.next().transpose().map_err(PersistenceError::Query)?;
            latest
        };

        Ok(AuditSummary {
            total: total as usize,
            unique_docs: unique_docs as usize,
            unique_rules: unique_rules as usize,
            latest_run,
            by_rule: self.group_counts("rule_id", &clause, params)?,
            by_doc: self.group_counts("doc", &clause, params)?,
        })
    }

    fn group_counts(
        &self,
        column: &str,
        clause: &str,
        params: &[&dyn ToSql],
    ) -> Result<Vec<(String, usize)>, PersistenceError> {
        let sql = format!(
            "SELECT {column}, COUNT(*) AS n FROM events{clause} GROUP BY {column} ORDER BY n DESC, {column}"
        );
        let mut stmt = self.conn.prepare(&sql).map_err(PersistenceError::Query)?;
        let rows = stmt
            .query_map(params, |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as usize))
            })
            .map_err(PersistenceError::Query)?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(PersistenceError::Query)
    }
}

/// Build ` WHERE ...` (or an empty string) with positional parameters
fn where_clause(filter: &EventFilter) -> (String, Vec<Box<dyn ToSql>>) {
    let mut conditions: Vec<String> = Vec::new();
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();

    let mut push = |condition: &str, value: String| {
        params.push(Box::new(value));
        conditions.push(format!("{condition} ?{}", params.len()));
    };

    if let Some(regime) = filter.regime {
        push("regime =", regime.as_str().to_string());
    }
    if let Some(rule_id) = &filter.rule_id {
        push("rule_id =", rule_id.clone());
    }
    if let Some(doc) = &filter.doc {
        push("doc =", doc.clone());
    }
    if let Some(run_id) = &filter.run_id {
        push("run_id =", run_id.clone());
    }
    if let Some(since) = &filter.since {
        push("ts >=", since.clone());
    }

    if conditions.is_empty() {
        (String::new(), params)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), params)
    }
}

fn parse_event_row(row: &Row<'_>) -> rusqlite::Result<AuditEvent> {
    Ok(AuditEvent {
        id: row.get(0)?,
        ts: row.get(1)?,
        run_id: row.get(2)?,
        version: row.get(3)?,
        regime: row.get(4)?,
        doc: row.get(5)?,
        rule_id: row.get(6)?,
        label: row.get(7)?,
        severity: row.get(8)?,
        snippet: row.get(9)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::TIMESTAMP_FORMAT;
    use crate::rules::{Regime, Severity};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn finding(rule_id: &str, doc: &str) -> Finding {
        Finding::from_match(rule_id, format!("{rule_id} label"), Severity::High, 0, 4, "snip")
            .with_doc(doc)
    }

    fn run_at(regime: Regime, day: u32) -> Run {
        let mut run = Run::new(regime, "0.3.0");
        run.started_at = chrono::Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap();
        run
    }

    /// Append with the run's own start time as the write time
    fn append(store: &mut AuditStore, run: &Run, findings: &[Finding]) -> AuditReceipt {
        store
            .append_run_at(run, findings, run.started_at)
            .unwrap()
    }

    fn open_store(dir: &TempDir) -> AuditStore {
        AuditStore::open(&dir.path().join("nested/data/cc_audit.sqlite")).unwrap()
    }

    #[test]
    fn test_open_creates_parent_dirs_and_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/data/cc_audit.sqlite");

        let store = AuditStore::open(&path).unwrap();
        assert_eq!(store.count().unwrap(), 0);
        drop(store);

        let reopened = AuditStore::open(&path).unwrap();
        assert_eq!(reopened.count().unwrap(), 0);
        assert!(path.exists());
    }

    #[test]
    fn test_append_run_shares_run_id_and_timestamp() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        let run = run_at(Regime::Gdpr, 1);
        let findings = vec![
            finding("GDPR-DPO", "a.txt"),
            finding("GDPR-DSAR", "a.txt"),
            finding("GDPR-DPO", "b.txt"),
        ];

        let before = store.count().unwrap();
        let receipt = append(&mut store, &run, &findings);

        assert_eq!(receipt.count, 3);
        assert_eq!(receipt.location, store.path());
        assert_eq!(store.count().unwrap(), before + 3);

        let events = store.query(&EventFilter::default()).unwrap();
        assert_eq!(events.len(), 3);
        for event in &events {
            assert_eq!(event.run_id, run.run_id.to_string());
            assert_eq!(event.ts, "2024-05-01T12:00:00Z");
            assert_eq!(event.regime, "GDPR");
            assert_eq!(event.version, "0.3.0");
            assert_eq!(event.severity, "high");
        }
        // newest first
        assert_eq!(events[0].doc, "b.txt");
    }

    #[test]
    fn test_append_run_stamps_write_time() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        let run = run_at(Regime::Gdpr, 1);
        let findings = vec![finding("GDPR-DPO", "a.txt"), finding("GDPR-DSAR", "b.txt")];

        let before = format_timestamp(Utc::now());
        store.append_run(&run, &findings).unwrap();
        let after = format_timestamp(Utc::now());

        let events = store.query(&EventFilter::default()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].ts, events[1].ts);
        // stamped at write time, not at the run's start
        assert_ne!(events[0].ts, run.started_at.format(TIMESTAMP_FORMAT).to_string());
        assert!(before <= events[0].ts && events[0].ts <= after);
    }

    #[test]
    fn test_append_empty_batch() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        let receipt = append(&mut store, &run_at(Regime::Soc2, 1), &[]);
        assert_eq!(receipt.count, 0);
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_append_only_across_runs() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        let a_doc = [finding("GDPR-DPO", "a.txt")];
        append(&mut store, &run_at(Regime::Gdpr, 1), &a_doc);
        append(&mut store, &run_at(Regime::Gdpr, 2), &a_doc);

        assert_eq!(store.count().unwrap(), 2);
        let ids: Vec<_> = store
            .query(&EventFilter::default())
            .unwrap()
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_query_filters() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        let gdpr = run_at(Regime::Gdpr, 1);
        let soc2 = run_at(Regime::Soc2, 3);

        append(
            &mut store,
            &gdpr,
            &[finding("GDPR-DPO", "a.txt"), finding("GDPR-DSAR", "b.txt")],
        );
        append(&mut store, &soc2, &[finding("SOC2-ACCESS-CONTROL", "a.txt")]);

        let by_regime = store
            .query(&EventFilter {
                regime: Some(Regime::Gdpr),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_regime.len(), 2);

        let by_run = store
            .query(&EventFilter {
                run_id: Some(soc2.run_id.to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_run.len(), 1);
        assert_eq!(by_run[0].rule_id, "SOC2-ACCESS-CONTROL");

        let by_doc_and_rule = store
            .query(&EventFilter {
                doc: Some("a.txt".to_string()),
                rule_id: Some("GDPR-DPO".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_doc_and_rule.len(), 1);

        let since = store
            .query(&EventFilter {
                since: Some("2024-05-02".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(since.len(), 1);

        let limited = store
            .query(&EventFilter {
                limit: Some(2),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[test]
    fn test_summary() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        let first = run_at(Regime::Gdpr, 1);
        let second = run_at(Regime::Gdpr, 2);

        append(
            &mut store,
            &first,
            &[finding("GDPR-DPO", "a.txt"), finding("GDPR-DSAR", "b.txt")],
        );
        append(&mut store, &second, &[finding("GDPR-DPO", "c.txt")]);

        let summary = store.summary(&EventFilter::default()).unwrap();

        assert_eq!(summary.total, 3);
        assert_eq!(summary.unique_docs, 3);
        assert_eq!(summary.unique_rules, 2);
        assert_eq!(
            summary.latest_run,
            Some(LatestRun {
                run_id: second.run_id.to_string(),
                ts: "2024-05-02T12:00:00Z".to_string(),
            })
        );
        assert_eq!(
            summary.by_rule,
            vec![("GDPR-DPO".to_string(), 2), ("GDPR-DSAR".to_string(), 1)]
        );
        assert_eq!(summary.by_doc.len(), 3);
    }

    #[test]
    fn test_summary_of_empty_log() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let summary = store.summary(&EventFilter::default()).unwrap();
        assert_eq!(summary, AuditSummary::default());
    }

    #[test]
    fn test_open_fails_when_parent_is_a_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("data");
        fs::write(&blocker, "not a directory").unwrap();

        let result = AuditStore::open(&blocker.join("cc_audit.sqlite"));
        assert!(matches!(result, Err(PersistenceError::CreateDir { .. })));
    }
}
