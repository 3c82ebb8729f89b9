//! # Scan Results Structures
//!
//! This module defines the data structures for representing findings and
//! the aggregated result of one scan run.
//!
//! ## Overview
//!
//! - [`Severity`] - Rule severity levels (info, low, medium, high)
//! - [`FindingSource`] - Whether a finding came from a rule or from augmentation
//! - [`Finding`] - One detected match within a document
//! - [`ScanReport`] - Findings plus processed/skipped documents of a run
//!
//! ## Examples
//!
//! ```rust
//! use ccscan::rules::{Finding, Regime, ScanReport, Severity};
//!
//! let mut report = ScanReport::new(Regime::Gdpr);
//! report.add_findings(vec![Finding::augmented(
//!     "GDPR-BREACH-72H-IMPLICIT",
//!     "Breach Notification (timing implied)",
//!     Severity::Medium,
//!     0.65,
//!     "Implied timing",
//!     "We will promptly inform regulators.",
//! )
//! .with_doc("policy.txt")]);
//!
//! assert_eq!(report.augmented_count(), 1);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Regime;

/// Severity levels attached to rules and findings.
///
/// Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational signal; the default when a rule omits severity
    #[default]
    Info,
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn from_string(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "info" | "information" | "note" => Some(Self::Info),
            "low" => Some(Self::Low),
            "medium" | "moderate" => Some(Self::Medium),
            "high" | "critical" => Some(Self::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Origin of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingSource {
    /// Produced by a regex rule
    #[default]
    Rules,
    /// Produced by the augmentation layer (heuristic or language model)
    Llm,
}

impl FindingSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rules => "rules",
            Self::Llm => "llm",
        }
    }
}

/// A single detected rule or heuristic match within a document.
///
/// Rule findings carry character offsets into the normalized text;
/// augmented findings leave `start`/`end` unset. After creation the only
/// mutations are stamping the owning document name with [`Finding::with_doc`]
/// and retagging augmenter output with [`Finding::into_augmented`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub rule_id: String,
    pub label: String,
    pub severity: Severity,
    /// Character offset of the match start, if rule-sourced
    pub start: Option<usize>,
    /// Character offset one past the match end, if rule-sourced
    pub end: Option<usize>,
    /// Bounded, newline-free context window
    pub snippet: String,
    /// Source document, relative to the input root
    #[serde(default)]
    pub doc: String,
    #[serde(default)]
    pub source: FindingSource,
    /// Model or heuristic confidence in [0, 1]
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub rationale: Option<String>,
}

impl Finding {
    /// Create a rule-sourced finding
    pub fn from_match(
        rule_id: impl Into<String>,
        label: impl Into<String>,
        severity: Severity,
        start: usize,
        end: usize,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            label: label.into(),
            severity,
            start: Some(start),
            end: Some(end),
            snippet: snippet.into(),
            doc: String::new(),
            source: FindingSource::Rules,
            confidence: None,
            rationale: None,
        }
    }

    /// Create an augmentation-sourced finding
    pub fn augmented(
        rule_id: impl Into<String>,
        label: impl Into<String>,
        severity: Severity,
        confidence: f64,
        rationale: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            label: label.into(),
            severity,
            start: None,
            end: None,
            snippet: snippet.into(),
            doc: String::new(),
            source: FindingSource::Llm,
            confidence: Some(round_confidence(confidence)),
            rationale: Some(rationale.into()),
        }
    }

    /// Stamp the owning document name
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    /// Tag as augmentation output: `source = llm`, no offsets
    pub fn into_augmented(mut self) -> Self {
        self.source = FindingSource::Llm;
        self.start = None;
        self.end = None;
        self
    }

    pub fn is_augmented(&self) -> bool {
        self.source == FindingSource::Llm
    }
}

/// Clamp to [0, 1] and round to two decimals
fn round_confidence(value: f64) -> f64 {
    (value.clamp(0.0, 1.0) * 100.0).round() / 100.0
}

/// A document that was discovered but could not be processed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedDocument {
    pub doc: String,
    pub reason: String,
}

/// Aggregated output of one scan run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub regime: Regime,
    findings: Vec<Finding>,
    processed: Vec<String>,
    skipped: Vec<SkippedDocument>,
}

impl ScanReport {
    pub fn new(regime: Regime) -> Self {
        Self {
            regime,
            findings: Vec::new(),
            processed: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn add_findings(&mut self, findings: impl IntoIterator<Item = Finding>) {
        self.findings.extend(findings);
    }

    pub fn mark_processed(&mut self, doc: impl Into<String>) {
        self.processed.push(doc.into());
    }

    pub fn mark_skipped(&mut self, doc: impl Into<String>, reason: impl Into<String>) {
        self.skipped.push(SkippedDocument {
            doc: doc.into(),
            reason: reason.into(),
        });
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Documents scanned successfully, relative to the input root
    pub fn processed(&self) -> &[String] {
        &self.processed
    }

    pub fn skipped(&self) -> &[SkippedDocument] {
        &self.skipped
    }

    pub fn total_count(&self) -> usize {
        self.findings.len()
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Number of findings contributed by augmentation
    pub fn augmented_count(&self) -> usize {
        self.findings.iter().filter(|f| f.is_augmented()).count()
    }

    /// Count findings per rule, most frequent first.
    ///
    /// Ties keep first-seen order. Each entry is `(rule_id, label, count)`
    /// where the label is taken from the first finding of that rule.
    pub fn counts_by_rule(&self) -> Vec<(&str, &str, usize)> {
        let mut counts: Vec<(&str, &str, usize)> = Vec::new();
        for finding in &self.findings {
            match counts.iter_mut().find(|(id, _, _)| *id == finding.rule_id) {
                Some(entry) => entry.2 += 1,
                None => counts.push((&finding.rule_id, &finding.label, 1)),
            }
        }
        // stable sort keeps first-seen order among equal counts
        counts.sort_by(|a, b| b.2.cmp(&a.2));
        counts
    }
}
