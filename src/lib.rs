//! ccscan library
//!
//! Scans business documents (plain text, PDF, DOCX) against regulatory
//! regex rule sets, optionally augments documents without rule hits, and
//! records findings to an append-only SQLite audit log plus CSV/JSON exports.

pub mod audit;
pub mod augment;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod ingest;
pub mod pipeline;
pub mod rules;
pub mod scanner;
pub mod utils;

pub use error::CcError;
