//! Scan pipeline
//!
//! Drives one run: load the regime's rules, discover documents, then for each
//! document read, normalize, scan and (when nothing matched) augment. A
//! document that cannot be read is recorded as skipped; the run goes on.

use tracing::{debug, info, info_span, warn, Instrument};

use crate::augment::Augmenter;
use crate::config::Config;
use crate::error::CcError;
use crate::ingest::{discover, InputDocument, ReaderRegistry};
use crate::rules::{load_ruleset, Regime, RuleSet, ScanReport};
use crate::scanner::{normalize, scan};

/// Orchestrates ingest, matching and augmentation for one regime
pub struct Pipeline {
    config: Config,
    readers: ReaderRegistry,
    augmenter: Option<Box<dyn Augmenter>>,
}

impl Pipeline {
    /// Create a pipeline with the default readers and no augmentation
    pub fn new(config: Config) -> Self {
        Self {
            config,
            readers: ReaderRegistry::default(),
            augmenter: None,
        }
    }

    /// Enable augmentation for documents without rule hits
    pub fn set_augmenter(&mut self, augmenter: Box<dyn Augmenter>) {
        self.augmenter = Some(augmenter);
    }

    /// Load the rule set for a regime from the configured rules directory
    pub fn load_rules(&self, regime: Regime) -> Result<RuleSet, CcError> {
        let files = self.config.rule_files(regime);
        Ok(load_ruleset(regime, &self.config.paths.rules, &files)?)
    }

    /// Run the pipeline.
    ///
    /// Rule-set errors are returned before any document is touched.
    pub async fn run(&self, regime: Regime) -> Result<ScanReport, CcError> {
        let ruleset = self.load_rules(regime)?;
        let mut report = ScanReport::new(regime);

        let documents = discover(&self.config.paths.docs);
        if documents.is_empty() {
            warn!(
                docs = %self.config.paths.docs.display(),
                "No documents found"
            );
            return Ok(report);
        }

        if ruleset.is_empty() {
            warn!(regime = %regime, "No rules loaded");
            return Ok(report);
        }

        info!(
            regime = %regime,
            documents = documents.len(),
            rules = ruleset.len(),
            "Starting scan"
        );

        for document in &documents {
            self.process_document(&ruleset, document, &mut report)
                .instrument(info_span!("document", doc = %document.name))
                .await;
        }

        info!(
            processed = report.processed().len(),
            skipped = report.skipped().len(),
            findings = report.total_count(),
            augmented = report.augmented_count(),
            "Scan complete"
        );

        Ok(report)
    }

    async fn process_document(
        &self,
        ruleset: &RuleSet,
        document: &InputDocument,
        report: &mut ScanReport,
    ) {
        let raw = match self.readers.read(&document.path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %document.path.display(), error = %e, "Skipping document");
                report.mark_skipped(&document.name, e.to_string());
                return;
            }
        };

        let text = normalize(&raw);
        let hits: Vec<_> = scan(&text, ruleset.rules())
            .map(|f| f.with_doc(&document.name))
            .collect();
        debug!(hits = hits.len(), "Rules applied");

        if hits.is_empty() {
            if let Some(augmenter) = &self.augmenter {
                match augmenter.analyze(ruleset.regime(), &text).await {
                    Ok(extra) => {
                        debug!(provider = augmenter.name(), added = extra.len(), "Augmented");
                        report.add_findings(
                            extra
                                .into_iter()
                                .map(|f| f.into_augmented().with_doc(&document.name)),
                        );
                    }
                    Err(e) => {
                        warn!(provider = augmenter.name(), error = %e, "Augmentation failed");
                    }
                }
            }
        } else {
            report.add_findings(hits);
        }

        report.mark_processed(&document.name);
    }
}
