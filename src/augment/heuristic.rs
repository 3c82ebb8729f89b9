//! Deterministic keyword heuristics used when no language model is configured

use async_trait::async_trait;

use super::{augmented_snippet, Augmenter};
use crate::error::AugmentError;
use crate::rules::{Finding, Regime, Severity};

const GDPR_TIMING: &[&str] = &[
    "72 hours",
    "seventy-two hours",
    "three days",
    "undue delay",
    "promptly",
];
const GDPR_NOTIFY: &[&str] = &["notify", "notification", "inform", "report"];
const GDPR_REGULATOR: &[&str] = &["supervisory authority", "regulator", "controller"];

const SOC2_MFA: &[&str] = &["mfa", "multi-factor", "multifactor"];
const SOC2_ENCRYPTION: &[&str] = &["encryption", "tls", "at rest", "in transit"];

/// Keyword co-occurrence classifier.
///
/// GDPR: flags text that mentions notifying a regulator together with a
/// timing cue. SOC2: flags MFA and encryption mentions as supporting
/// evidence.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicAugmenter;

impl HeuristicAugmenter {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous classification, shared with the remote provider's fallback
    pub fn classify(&self, regime: Regime, text: &str) -> Vec<Finding> {
        let lowered = text.to_lowercase();
        let snippet = augmented_snippet(text);

        match regime {
            Regime::Gdpr => classify_gdpr(&lowered, &snippet),
            Regime::Soc2 => classify_soc2(&lowered, &snippet),
        }
    }
}

fn mentions_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}

fn classify_gdpr(text: &str, snippet: &str) -> Vec<Finding> {
    let timing = mentions_any(text, GDPR_TIMING);
    let notify = mentions_any(text, GDPR_NOTIFY);
    let regulator = mentions_any(text, GDPR_REGULATOR);

    if !(notify && regulator && timing) {
        return Vec::new();
    }

    let confidence = if text.contains("promptly") && !text.contains("72") {
        0.65
    } else {
        0.85
    };

    vec![Finding::augmented(
        "GDPR-BREACH-72H-IMPLICIT",
        "Breach Notification (timing implied)",
        Severity::Medium,
        confidence,
        "Detected notification to regulator with implied/approximate timing \
         (e.g., 'promptly'); recommend human review.",
        snippet,
    )]
}

fn classify_soc2(text: &str, snippet: &str) -> Vec<Finding> {
    let mut findings = Vec::new();

    if mentions_any(text, SOC2_MFA) {
        findings.push(Finding::augmented(
            "SOC2-ACCESS-CONTROL-IMPLICIT",
            "Access Controls (policy signal)",
            Severity::Low,
            0.6,
            "Mentions MFA/multi-factor; treat as supporting evidence, not a pass/fail.",
            snippet,
        ));
    }

    if mentions_any(text, SOC2_ENCRYPTION) {
        findings.push(Finding::augmented(
            "SOC2-ENCRYPTION-IMPLICIT",
            "Encryption (policy signal)",
            Severity::Low,
            0.6,
            "Mentions encryption/TLS; treat as supporting evidence, not a pass/fail.",
            snippet,
        ));
    }

    findings
}

#[async_trait]
impl Augmenter for HeuristicAugmenter {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    async fn analyze(&self, regime: Regime, text: &str) -> Result<Vec<Finding>, AugmentError> {
        Ok(self.classify(regime, text))
    }
}
