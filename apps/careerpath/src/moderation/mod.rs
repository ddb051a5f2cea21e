//! Content moderation run before user content is persisted.

pub mod audit;
pub mod batch;
pub mod classifier;
pub mod dedup;
pub mod keywords;
pub mod similarity;
pub mod validation;

use std::sync::Arc;

use serde::Serialize;

use crate::models::content::ContentItem;
use crate::store::Store;

pub use audit::ActionLogger;
pub use batch::{BatchDeleter, DeleteOutcome, DeleteTarget};
pub use classifier::{ClassifierConfig, SafetyClassifier, SafetyReport, SafetyVerdict};
pub use dedup::{DuplicateCandidate, DuplicateDetector};
pub use keywords::KeywordSets;
pub use similarity::similarity;
pub use validation::{schema_for, validate, TableSchema, ValidationResult};

/// Outcome of the pre-save review.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewReport {
    pub verdict: SafetyVerdict,
    pub safety: SafetyReport,
    pub validation: ValidationResult,
    pub duplicates: Vec<DuplicateCandidate>,
}

impl ReviewReport {
    /// Invalid or flagged content must not be saved. Warnings and possible
    /// duplicates are surfaced to the user but do not block.
    pub fn should_block(&self) -> bool {
        !self.validation.is_valid || self.verdict == SafetyVerdict::Flagged
    }
}

/// Runs validation, classification and duplicate lookup against one item.
#[derive(Clone)]
pub struct ContentGuard {
    classifier: SafetyClassifier,
    detector: DuplicateDetector,
}

impl ContentGuard {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self::with_classifier(store, SafetyClassifier::default())
    }

    pub fn with_classifier(store: Arc<dyn Store>, classifier: SafetyClassifier) -> Self {
        Self {
            classifier,
            detector: DuplicateDetector::new(store),
        }
    }

    /// `exclude_id` is the id of the record being edited, if any.
    pub async fn review(
        &self,
        item: &ContentItem,
        table: &str,
        exclude_id: Option<&str>,
    ) -> ReviewReport {
        let validation = validate(item, table);
        let safety = self.classifier.analyze(Some(item));
        let duplicates = self.detector.find_duplicates(item, table, exclude_id).await;

        ReviewReport {
            verdict: safety.verdict,
            safety,
            validation,
            duplicates,
        }
    }
}
