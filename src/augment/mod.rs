//! Augmentation module
//!
//! A second opinion for documents where no rule matched. An [`Augmenter`]
//! receives the normalized text of one document and returns findings with
//! no offsets, `source = llm`, and a confidence score.
//!
//! Two implementations exist:
//!
//! - [`HeuristicAugmenter`] - keyword co-occurrence, fully offline
//! - [`OpenAiAugmenter`] - chat completions call with heuristic fallback
//!
//! [`build_augmenter`] picks one from [`AugmentConfig`].

pub mod heuristic;
pub mod openai;

pub use heuristic::HeuristicAugmenter;
pub use openai::OpenAiAugmenter;

use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

use crate::config::{AugmentConfig, AugmentProvider};
use crate::error::AugmentError;
use crate::rules::{Finding, Regime};
use crate::scanner::flatten_lines;

/// Characters of document text kept as the snippet of an augmented finding
pub const AUGMENTED_SNIPPET_CHARS: usize = 200;

/// Produces supplementary findings for a document's text
#[async_trait]
pub trait Augmenter: Send + Sync {
    /// Short provider name for logs
    fn name(&self) -> &'static str;

    async fn analyze(&self, regime: Regime, text: &str) -> Result<Vec<Finding>, AugmentError>;
}

/// Leading text of a document, flattened to one line
pub(crate) fn augmented_snippet(text: &str) -> String {
    let head: String = text.chars().take(AUGMENTED_SNIPPET_CHARS).collect();
    flatten_lines(&head)
}

/// Build the augmenter selected by configuration.
///
/// `auto` uses the remote provider when its API key variable is set.
/// Requesting `openai` explicitly without a key is an error.
pub fn build_augmenter(config: &AugmentConfig) -> Result<Box<dyn Augmenter>, AugmentError> {
    let api_key = config.api_key();

    let augmenter: Box<dyn Augmenter> = match (config.provider, api_key) {
        (AugmentProvider::Heuristic, _) | (AugmentProvider::Auto, None) => {
            Box::new(HeuristicAugmenter::new())
        }
        (AugmentProvider::OpenAi, None) => {
            return Err(AugmentError::MissingApiKey(config.api_key_env.clone()));
        }
        (AugmentProvider::Auto | AugmentProvider::OpenAi, Some(key)) => {
            Box::new(OpenAiAugmenter::new(
                key,
                &config.model,
                &config.base_url,
                Duration::from_secs(config.timeout_secs),
            )?)
        }
    };

    info!(provider = augmenter.name(), "Augmentation enabled");
    Ok(augmenter)
}
