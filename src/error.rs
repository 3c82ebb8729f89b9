//! Error types for ccscan
//!
//! This module defines custom error types using `thiserror`. Each concern
//! (rules, ingestion, augmentation, audit persistence, export, configuration)
//! has its own enum. [`CcError`] aggregates the ones that abort a command;
//! [`IngestError`] stays per document and is reported as a skip.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for ccscan
#[derive(Error, Debug)]
pub enum CcError {
    /// Rule loading errors (fatal, raised before any document is processed)
    #[error("Rule error: {0}")]
    Rules(#[from] RuleError),

    /// Augmentation provider errors
    #[error("Augmentation error: {0}")]
    Augment(#[from] AugmentError),

    /// Audit log persistence errors
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Export (CSV/JSON) errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised while resolving and parsing a rule set
#[derive(Error, Debug)]
pub enum RuleError {
    /// The regime resolves to no rule resource
    #[error("No rule set is defined for regime '{regime}'")]
    MissingRuleSet {
        /// Regime identifier
        regime: String,
    },

    /// A resource the regime maps to does not exist
    #[error("Missing rules file: {}", path.display())]
    MissingRuleFile {
        /// Expected location of the rules file
        path: PathBuf,
    },

    /// A rules file could not be read
    #[error("Failed to read rules file '{}': {source}", path.display())]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A rules file is not a valid rule document
    #[error("Invalid rules file '{}': {source}", path.display())]
    InvalidRuleFile {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// A rule pattern failed to compile
    #[error("Invalid pattern for rule '{rule_id}' in '{}': {source}", path.display())]
    InvalidPattern {
        rule_id: String,
        path: PathBuf,
        source: regex::Error,
    },

    /// Two rules in one set share an identifier
    #[error("Duplicate rule id '{rule_id}' in '{}'", path.display())]
    DuplicateRuleId { rule_id: String, path: PathBuf },
}

/// Errors raised while reading a single input document
#[derive(Error, Debug)]
pub enum IngestError {
    /// Failed to read the file from disk
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// No reader is registered for the file extension
    #[error("Unsupported document format: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// PDF text extraction failed
    #[error("PDF extraction failed for '{}': {message}", path.display())]
    Pdf { path: PathBuf, message: String },

    /// DOCX extraction failed
    #[error("DOCX extraction failed for '{}': {message}", path.display())]
    Docx { path: PathBuf, message: String },
}

/// Errors raised by augmentation providers
#[derive(Error, Debug)]
pub enum AugmentError {
    /// HTTP transport failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status
    #[error("{provider} API returned status {status}: {message}")]
    Api {
        provider: String,
        status: u16,
        message: String,
    },

    /// The provider answer could not be interpreted
    #[error("Failed to parse {provider} response: {message}")]
    Parse { provider: String, message: String },

    /// The configured API key variable is not set
    #[error("Environment variable '{0}' is not set")]
    MissingApiKey(String),
}

/// Errors raised by the audit log
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Could not create the directory holding the database
    #[error("Failed to create audit directory '{}': {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Could not open the database
    #[error("Failed to open audit log '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },

    /// Schema creation failed
    #[error("Failed to initialize audit schema: {0}")]
    Schema(#[source] rusqlite::Error),

    /// Appending a batch failed; nothing from the batch was committed
    #[error("Failed to append audit events: {0}")]
    Write(#[source] rusqlite::Error),

    /// Reading events failed
    #[error("Failed to query audit events: {0}")]
    Query(#[source] rusqlite::Error),
}

/// Errors raised while writing export artifacts
#[derive(Error, Debug)]
pub enum ExportError {
    /// Could not create the output directory
    #[error("Failed to create output directory '{}': {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// CSV serialization failed
    #[error("Failed to write CSV '{}': {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialization failed
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing the file failed
    #[error("Failed to write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },

    /// Failed to parse configuration
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Failed to serialize configuration
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Failed to write a scaffolded file
    #[error("Failed to write '{path}': {source}")]
    FileWrite {
        path: String,
        source: std::io::Error,
    },

    /// Refused to overwrite an existing file
    #[error("'{0}' already exists (use --force to overwrite)")]
    AlreadyExists(String),
}

impl From<toml::de::Error> for CcError {
    fn from(err: toml::de::Error) -> Self {
        CcError::Config(ConfigError::Parse(err))
    }
}

impl From<toml::ser::Error> for CcError {
    fn from(err: toml::ser::Error) -> Self {
        CcError::Config(ConfigError::Serialize(err))
    }
}
