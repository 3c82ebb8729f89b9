//! Rule-set loading
//!
//! A rule-set resource is a YAML document:
//!
//! ```yaml
//! rules:
//!   - id: GDPR-BREACH-72H
//!     label: Breach Notification (72 hours)
//!     severity: high
//!     type: regex
//!     value: '(?i)supervisory authority.{0,120}?(?:72|seventy-two)\s+hours'
//! ```
//!
//! Entries whose `type` is anything other than `regex` are skipped so newer
//! rule files stay loadable.

use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

use super::results::Severity;
use super::Regime;
use crate::error::RuleError;

const REGEX_KIND: &str = "regex";

/// A compiled rule. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: String,
    pub label: String,
    pub severity: Severity,
    pub pattern: Regex,
}

/// Ordered rules for a single regime
#[derive(Debug, Clone)]
pub struct RuleSet {
    regime: Regime,
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(regime: Regime, rules: Vec<Rule>) -> Self {
        Self { regime, rules }
    }

    pub fn regime(&self) -> Regime {
        self.regime
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct RuleDocument {
    #[serde(default)]
    rules: Vec<RuleEntry>,
}

#[derive(Debug, Deserialize)]
struct RuleEntry {
    id: String,
    label: String,
    value: String,
    #[serde(default)]
    severity: Severity,
    #[serde(rename = "type", default = "default_kind")]
    kind: String,
}

fn default_kind() -> String {
    REGEX_KIND.to_string()
}

/// Resolve a regime to its rule files and load them in order.
///
/// `files` is the list of resources for the regime, relative to `rules_dir`.
/// An empty list means the regime has no rule set.
pub fn load_ruleset(regime: Regime, rules_dir: &Path, files: &[String]) -> Result<RuleSet, RuleError> {
    if files.is_empty() {
        return Err(RuleError::MissingRuleSet {
            regime: regime.to_string(),
        });
    }

    let mut rules = Vec::new();
    let mut seen = HashSet::new();

    for file in files {
        let path = rules_dir.join(file);
        if !path.is_file() {
            return Err(RuleError::MissingRuleFile { path });
        }

        for rule in load_rules_file(&path)? {
            if !seen.insert(rule.id.clone()) {
                return Err(RuleError::DuplicateRuleId {
                    rule_id: rule.id,
                    path,
                });
            }
            rules.push(rule);
        }
    }

    debug!(regime = %regime, rule_count = rules.len(), "Rule set loaded");
    Ok(RuleSet::new(regime, rules))
}

/// Parse and compile a single rules file
pub fn load_rules_file(path: &Path) -> Result<Vec<Rule>, RuleError> {
    let content = fs::read_to_string(path).map_err(|source| RuleError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    parse_rules(&content, path)
}

/// Parse and compile rules from YAML text. `origin` is used in error messages.
pub fn parse_rules(content: &str, origin: &Path) -> Result<Vec<Rule>, RuleError> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let document: RuleDocument =
        serde_yaml::from_str(content).map_err(|source| RuleError::InvalidRuleFile {
            path: origin.to_path_buf(),
            source,
        })?;

    let mut rules = Vec::with_capacity(document.rules.len());
    for entry in document.rules {
        if entry.kind != REGEX_KIND {
            debug!(rule_id = %entry.id, kind = %entry.kind, "Skipping non-regex rule");
            continue;
        }

        let pattern = Regex::new(&entry.value).map_err(|source| RuleError::InvalidPattern {
            rule_id: entry.id.clone(),
            path: origin.to_path_buf(),
            source,
        })?;

        rules.push(Rule {
            id: entry.id,
            label: entry.label,
            severity: entry.severity,
            pattern,
        });
    }

    Ok(rules)
}
