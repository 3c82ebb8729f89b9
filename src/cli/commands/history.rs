//! History command - read-only view of the audit log

use serde::Serialize;

use super::{HistoryArgs, HistoryFormat};
use crate::audit::{AuditEvent, AuditStore, AuditSummary, EventFilter};
use crate::cli::exit_codes;
use crate::cli::output::TerminalOutput;
use crate::config::Config;
use crate::error::{CcError, ExportError};

#[derive(Serialize)]
struct HistoryOutput<'a> {
    summary: &'a AuditSummary,
    events: &'a [AuditEvent],
}

/// Execute the history command
pub async fn execute(args: HistoryArgs, config: Config) -> Result<i32, CcError> {
    let store = AuditStore::open(&config.paths.audit_db)?;

    let filter = EventFilter {
        regime: args.regime,
        rule_id: args.rule,
        doc: args.doc,
        run_id: args.run,
        since: args.since,
        limit: Some(args.limit),
    };

    let summary = store.summary(&filter)?;
    let events = store.query(&filter)?;

    let rendered = match args.format {
        HistoryFormat::Terminal => TerminalOutput::new().render_history(&summary, &events),
        HistoryFormat::Json => serde_json::to_string_pretty(&HistoryOutput {
            summary: &summary,
            events: &events,
        })
        .map_err(ExportError::from)?,
    };

    println!("{rendered}");
    Ok(exit_codes::SUCCESS)
}
