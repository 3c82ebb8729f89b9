//! Terminal output formatting with colors

use colored::Colorize;

use crate::audit::{AuditEvent, AuditReceipt, AuditSummary};
use crate::export::ExportPaths;
use crate::rules::{Finding, ScanReport};
use crate::utils::{format_duration, RunTiming};

/// Characters of snippet shown per previewed finding
const PREVIEW_CHARS: usize = 140;
/// Findings shown in the scan preview
const PREVIEW_COUNT: usize = 3;

pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }

    fn separator(&self, title: &str) -> String {
        format!("\n{}\n{}\n\n", "━".repeat(50).dimmed(), title.bold())
    }

    /// Results block printed after a scan
    pub fn render_scan(&self, report: &ScanReport) -> String {
        let mut output = format!(
            "\n{} v{}\n",
            "ccscan".cyan().bold(),
            env!("CARGO_PKG_VERSION")
        );
        output.push_str(&self.separator(&format!(
            "  COMPLIANCE RESULTS - {}",
            report.regime
        )));

        output.push_str(&format!(
            "{} {}\n",
            "Processed docs:".dimmed(),
            report.processed().len()
        ));
        for doc in report.processed() {
            output.push_str(&format!("  {} {}\n", "•".dimmed(), doc));
        }
        if !report.skipped().is_empty() {
            output.push_str(&format!(
                "{} {}\n",
                "Skipped docs:".yellow(),
                report.skipped().len()
            ));
            for skipped in report.skipped() {
                output.push_str(&format!(
                    "  {} {} {}\n",
                    "•".dimmed(),
                    skipped.doc,
                    format!("({})", skipped.reason).dimmed()
                ));
            }
        }

        output.push_str(&format!(
            "{} {}  {}\n",
            "Total findings:".dimmed(),
            report.total_count().to_string().white().bold(),
            format!("(AI adds: {})", report.augmented_count()).dimmed()
        ));

        if report.is_clean() {
            output.push_str(&format!("\n  {}\n", "No matches found.".green()));
            return output;
        }

        output.push_str(&format!("\n{}\n", "Top rules:".bold()));
        for (rule_id, label, count) in report.counts_by_rule() {
            output.push_str(&format!(
                "  - {} ({}): {}\n",
                rule_id.cyan(),
                label,
                count
            ));
        }

        output.push_str(&format!(
            "\n{}\n",
            format!("Preview (first {} findings):", PREVIEW_COUNT).bold()
        ));
        for finding in report.findings().iter().take(PREVIEW_COUNT) {
            output.push_str(&self.format_preview(finding));
        }

        output
    }

    fn format_preview(&self, finding: &Finding) -> String {
        let extra = match (finding.is_augmented(), finding.confidence) {
            (true, Some(conf)) => format!(" [{}, conf={}]", finding.source.as_str(), conf),
            (true, None) => format!(" [{}]", finding.source.as_str()),
            _ => String::new(),
        };
        format!(
            "  {} [{}] {}{}: {}\n",
            "•".dimmed(),
            finding.doc,
            finding.rule_id.cyan(),
            extra.dimmed(),
            truncate_preview(&finding.snippet)
        )
    }

    /// Where the run's artifacts went
    pub fn render_artifacts(
        &self,
        receipt: Option<&AuditReceipt>,
        run_id: &str,
        exports: Option<&ExportPaths>,
    ) -> String {
        let mut output = String::new();

        if let Some(receipt) = receipt {
            output.push_str(&format!(
                "\n{} wrote {} events to {} (run_id={})\n",
                "Audit log:".dimmed(),
                receipt.count,
                receipt.location.display(),
                run_id
            ));
        }

        match exports {
            Some(paths) => {
                output.push_str(&format!("\n{}\n", "Outputs written:".green()));
                output.push_str(&format!("  CSV : {}\n", paths.csv.display()));
                output.push_str(&format!("  JSON: {}\n", paths.json.display()));
            }
            None => output.push_str(&format!(
                "\n{}\n",
                "No outputs written (no findings).".dimmed()
            )),
        }

        output
    }

    /// Per-stage durations, shown with `-v`
    pub fn render_timing(&self, timing: &RunTiming) -> String {
        let mut output = self.separator("  TIMING");
        for stage in timing.stages() {
            output.push_str(&format!(
                "  {:<8} {}\n",
                stage.name,
                format_duration(stage.duration).dimmed()
            ));
        }
        output.push_str(&format!(
            "  {:<8} {}\n",
            "total",
            format_duration(timing.total()).bold()
        ));
        output
    }

    /// Audit log overview plus the most recent matching events
    pub fn render_history(&self, summary: &AuditSummary, events: &[AuditEvent]) -> String {
        let mut output = self.separator("  AUDIT HISTORY");

        if summary.total == 0 {
            output.push_str(&format!("  {}\n", "No audit events recorded.".dimmed()));
            return output;
        }

        output.push_str(&format!(
            "{} {}   {} {}   {} {}\n",
            "Total findings:".dimmed(),
            summary.total.to_string().white().bold(),
            "Unique docs:".dimmed(),
            summary.unique_docs,
            "Unique rules:".dimmed(),
            summary.unique_rules
        ));
        if let Some(latest) = &summary.latest_run {
            output.push_str(&format!(
                "{} {} ({})\n",
                "Latest run:".dimmed(),
                latest.ts,
                latest.run_id.dimmed()
            ));
        }

        output.push_str(&format!("\n{}\n", "Findings by rule:".bold()));
        for (rule_id, count) in &summary.by_rule {
            output.push_str(&format!("  - {}: {}\n", rule_id.cyan(), count));
        }

        output.push_str(&format!("\n{}\n", "Findings by document:".bold()));
        for (doc, count) in &summary.by_doc {
            output.push_str(&format!("  - {}: {}\n", doc, count));
        }

        output.push_str(&format!(
            "\n{}\n",
            format!("Recent events ({}):", events.len()).bold()
        ));
        for event in events {
            output.push_str(&format!(
                "  {} {} {} [{}] {} {}\n",
                "•".dimmed(),
                event.ts.dimmed(),
                event.regime,
                event.doc,
                event.rule_id.cyan(),
                format!("({})", event.severity).dimmed()
            ));
        }

        output
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

/// First 140 characters of a snippet, with `...` when cut
fn truncate_preview(snippet: &str) -> String {
    let mut chars = snippet.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
