//! Rules module - regimes, rule loading, and result types

pub mod loader;
pub mod regime;
pub mod results;

pub use loader::{load_ruleset, Rule, RuleSet};
pub use regime::Regime;
pub use results::{Finding, FindingSource, ScanReport, SkippedDocument, Severity};

/// Rule files shipped with the binary, written out by `ccscan init`
pub const BUNDLED_RULE_FILES: &[(&str, &str)] = &[
    (
        "gdpr_critical.yml",
        include_str!("../../rules/gdpr_critical.yml"),
    ),
    (
        "soc2_critical.yml",
        include_str!("../../rules/soc2_critical.yml"),
    ),
];
