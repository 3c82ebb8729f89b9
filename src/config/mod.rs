//! Configuration module
//!
//! Settings live in `.ccscan.toml` at the working directory root. Every
//! section is optional; missing keys fall back to the layout below.
//!
//! ```toml
//! [paths]
//! docs = "data/docs"
//! rules = "rules"
//! outputs = "data/outputs"
//! audit_db = "data/cc_audit.sqlite"
//!
//! [augment]
//! provider = "auto"          # auto | heuristic | openai
//! model = "gpt-4o-mini"
//! base_url = "https://api.openai.com/v1"
//! api_key_env = "OPENAI_API_KEY"
//! timeout_secs = 30
//!
//! [rulesets]
//! GDPR = ["gdpr_critical.yml", "gdpr_extra.yml"]
//! ```

pub mod loader;

pub use loader::{Config, CONFIG_FILENAME};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Filesystem locations used by a scan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PathsConfig {
    /// Input document root
    #[serde(default = "default_docs_dir")]
    pub docs: PathBuf,

    /// Directory holding rule-set YAML files
    #[serde(default = "default_rules_dir")]
    pub rules: PathBuf,

    /// Directory receiving CSV/JSON exports
    #[serde(default = "default_outputs_dir")]
    pub outputs: PathBuf,

    /// SQLite audit log
    #[serde(default = "default_audit_db")]
    pub audit_db: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            docs: default_docs_dir(),
            rules: default_rules_dir(),
            outputs: default_outputs_dir(),
            audit_db: default_audit_db(),
        }
    }
}

fn default_docs_dir() -> PathBuf {
    PathBuf::from("data/docs")
}

fn default_rules_dir() -> PathBuf {
    PathBuf::from("rules")
}

fn default_outputs_dir() -> PathBuf {
    PathBuf::from("data/outputs")
}

fn default_audit_db() -> PathBuf {
    PathBuf::from("data/cc_audit.sqlite")
}

/// Which augmentation backend `--ai` uses
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AugmentProvider {
    /// OpenAI when an API key is present, otherwise heuristics
    #[default]
    Auto,
    Heuristic,
    #[serde(rename = "openai")]
    OpenAi,
}

/// Augmentation settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AugmentConfig {
    #[serde(default)]
    pub provider: AugmentProvider,

    /// Chat model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            provider: AugmentProvider::default(),
            model: default_model(),
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AugmentConfig {
    /// API key from the configured environment variable, if set and non-empty
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}
