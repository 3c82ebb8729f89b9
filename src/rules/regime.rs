//! Compliance regimes

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named compliance framework selecting which rule set applies to a run.
///
/// Rules from different regimes are never mixed in one run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum Regime {
    /// EU General Data Protection Regulation
    #[serde(rename = "GDPR")]
    #[value(name = "GDPR")]
    Gdpr,
    /// AICPA SOC 2 trust services criteria
    #[serde(rename = "SOC2")]
    #[value(name = "SOC2")]
    Soc2,
}

impl Regime {
    /// All known regimes
    pub const ALL: [Regime; 2] = [Regime::Gdpr, Regime::Soc2];

    /// Canonical identifier, as stored in the audit log
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gdpr => "GDPR",
            Self::Soc2 => "SOC2",
        }
    }

    /// Lowercase slug used in export file names
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Gdpr => "gdpr",
            Self::Soc2 => "soc2",
        }
    }

    /// Rule resources shipped for this regime, relative to the rules directory
    pub fn default_rule_files(&self) -> &'static [&'static str] {
        match self {
            Self::Gdpr => &["gdpr_critical.yml"],
            Self::Soc2 => &["soc2_critical.yml"],
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
