//! Extraction orchestration
//!
//! One call to [`ExtractionOrchestrator::process`] runs a claim through the
//! whole pipeline. Extraction and parse failures end the request; missing
//! fields and store errors are reported as warnings alongside the result.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

use core_kernel::ClaimId;

use crate::claim::{ClaimFields, ExtractedFields};
use crate::error::ClaimError;
use crate::highlight::{highlight_or_skip, Highlights};
use crate::metrics::ComparisonMetrics;
use crate::parser::{parse_response, ParseOutcome};
use crate::ports::{ClaimExtractor, HistoryStore};
use crate::recommendation::Recommendation;
use crate::rules::RecommendationEngine;
use crate::validation::{validate_fields, Completeness, ValidationReport};

/// Non-fatal problem encountered while processing a claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProcessingWarning {
    /// Required keys absent from the model reply
    MissingFields { fields: Vec<String>, message: String },
    /// The history store rejected a write
    Persistence { operation: String, details: String },
}

/// Everything produced for one processed claim
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    pub claim_text: String,
    /// Decoded model reply, unmodified
    pub extracted: Map<String, Value>,
    /// Reply with sentinel defaults applied
    pub fields: ClaimFields,
    pub validation: ValidationReport,
    /// Scored on `fields`, matching what a stored record reports
    pub completeness: Completeness,
    pub metrics: ComparisonMetrics,
    /// In rule order
    pub recommendations: Vec<Recommendation>,
    pub highlights: Highlights,
    /// Set when the record was persisted
    pub record_id: Option<ClaimId>,
    pub warnings: Vec<ProcessingWarning>,
}

impl ExtractionReport {
    pub fn is_stored(&self) -> bool {
        self.record_id.is_some()
    }
}

/// Runs claims through extraction, parsing, validation and persistence
#[derive(Clone)]
pub struct ExtractionOrchestrator {
    extractor: Arc<dyn ClaimExtractor>,
    store: Option<Arc<dyn HistoryStore>>,
    engine: RecommendationEngine,
}

impl ExtractionOrchestrator {
    /// An orchestrator that does not persist anything
    pub fn new(extractor: Arc<dyn ClaimExtractor>) -> Self {
        Self {
            extractor,
            store: None,
            engine: RecommendationEngine::new(),
        }
    }

    pub fn with_store(mut self, store: Arc<dyn HistoryStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn store(&self) -> Option<&Arc<dyn HistoryStore>> {
        self.store.as_ref()
    }

    /// Processes one claim description end to end
    #[instrument(skip(self, claim_text), fields(chars = claim_text.chars().count()))]
    pub async fn process(&self, claim_text: &str) -> Result<ExtractionReport, ClaimError> {
        if claim_text.trim().is_empty() {
            return Err(ClaimError::EmptyClaim);
        }

        let raw = self.extractor.extract(claim_text).await.map_err(|e| {
            warn!(error = %e, "Extraction call failed");
            ClaimError::extraction(&e)
        })?;

        let extracted = match parse_response(&raw) {
            ParseOutcome::Parsed(map) => map,
            ParseOutcome::Failed(failure) => {
                warn!(details = %failure.details, "Model reply could not be parsed");
                return Err(ClaimError::Parse(failure));
            }
        };

        let mut warnings = Vec::new();

        let validation = validate_fields(&extracted);
        if let Some(message) = validation.warning() {
            warn!(missing = ?validation.missing, "Extraction is missing fields");
            warnings.push(ProcessingWarning::MissingFields {
                fields: validation.missing.iter().map(|f| f.to_string()).collect(),
                message,
            });
        }

        let typed = ExtractedFields::from_mapping(&extracted);
        let fields = typed.resolve();
        let completeness = fields.completeness();
        let metrics = ComparisonMetrics::compute(claim_text, &fields);

        let record_id = match &self.store {
            Some(store) => match store.save(claim_text, &typed).await {
                Ok(id) => Some(id),
                Err(e) => {
                    warn!(error = %e, "Failed to save claim");
                    warnings.push(ProcessingWarning::Persistence {
                        operation: "save_claim".to_string(),
                        details: e.to_string(),
                    });
                    None
                }
            },
            None => None,
        };

        let recommendations = self.engine.generate(&typed);

        if let (Some(store), Some(id)) = (&self.store, record_id) {
            if let Err(e) = store.save_recommendations(id, &recommendations).await {
                warn!(claim_id = %id, error = %e, "Failed to save recommendations");
                warnings.push(ProcessingWarning::Persistence {
                    operation: "save_recommendations".to_string(),
                    details: e.to_string(),
                });
            }
        }

        let highlights = highlight_or_skip(claim_text, &fields.extraction_explanation);

        info!(
            claim_id = ?record_id.map(|id| id.to_string()),
            completeness = completeness.percentage,
            recommendations = recommendations.len(),
            warnings = warnings.len(),
            "Claim processed"
        );

        Ok(ExtractionReport {
            claim_text: claim_text.to_string(),
            extracted,
            fields,
            validation,
            completeness,
            metrics,
            recommendations,
            highlights,
            record_id,
            warnings,
        })
    }

    /// Reruns the rules for a stored claim and replaces its recommendations
    #[instrument(skip(self), fields(claim_id = %id))]
    pub async fn regenerate_recommendations(
        &self,
        id: ClaimId,
    ) -> Result<Vec<Recommendation>, ClaimError> {
        let store = self.store.as_ref().ok_or(ClaimError::StoreUnavailable)?;

        let record = store
            .get_by_id(id)
            .await
            .map_err(|e| ClaimError::Persistence(e.to_string()))?
            .ok_or(ClaimError::ClaimNotFound(id))?;

        let recommendations = self.engine.generate(&ExtractedFields::from(&record.fields));
        store
            .replace_recommendations(id, &recommendations)
            .await
            .map_err(|e| ClaimError::Persistence(e.to_string()))?;

        info!(count = recommendations.len(), "Recommendations regenerated");
        Ok(recommendations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mock::{InMemoryHistoryStore, StaticExtractor};

    const REPLY: &str = r#"```json
{
  "loss_type": "Theft",
  "severity": "High",
  "affected_assets": "Laptop",
  "estimated_loss": "$2,500",
  "incident_date": "yesterday",
  "location": "Cafe on MG Road",
  "confidence": "High",
  "extraction_explanation": "Classified as 'Theft' because the 'laptop was stolen'"
}
```"#;

    #[tokio::test]
    async fn test_process_without_store() {
        let orchestrator = ExtractionOrchestrator::new(Arc::new(StaticExtractor::replying(REPLY)));
        let report = orchestrator
            .process("My laptop was stolen at a cafe yesterday")
            .await
            .unwrap();

        assert!(!report.is_stored());
        assert!(report.warnings.is_empty());
        assert_eq!(report.fields.loss_type, "Theft");
        assert_eq!(report.completeness.percentage, 100.0);
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.action == "Verify Police Report"));
        assert_eq!(report.highlights.keywords(), ["Theft", "laptop was stolen"]);
    }

    #[tokio::test]
    async fn test_blank_claim_skips_extractor() {
        let extractor = Arc::new(StaticExtractor::replying(REPLY));
        let orchestrator = ExtractionOrchestrator::new(extractor.clone());

        let err = orchestrator.process("   \n").await.unwrap_err();
        assert!(matches!(err, ClaimError::EmptyClaim));
        assert_eq!(extractor.calls(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_is_a_warning() {
        let store = Arc::new(InMemoryHistoryStore::unavailable());
        let orchestrator = ExtractionOrchestrator::new(Arc::new(StaticExtractor::replying(REPLY)))
            .with_store(store);

        let report = orchestrator.process("Laptop stolen").await.unwrap();
        assert!(!report.is_stored());
        assert!(matches!(
            report.warnings.as_slice(),
            [ProcessingWarning::Persistence { .. }]
        ));
        assert!(!report.recommendations.is_empty());
    }

    #[tokio::test]
    async fn test_off_scale_severity_scored_as_stored() {
        let store = Arc::new(InMemoryHistoryStore::new());
        let reply = REPLY.replace("\"severity\": \"High\"", "\"severity\": \"Severe\"");
        let orchestrator = ExtractionOrchestrator::new(Arc::new(StaticExtractor::replying(reply)))
            .with_store(store.clone());

        let report = orchestrator.process("Laptop stolen").await.unwrap();
        assert_eq!(report.completeness.percentage, 87.5);
        assert_eq!(report.metrics.fields_filled, 7);

        let record = store.get_by_id(report.record_id.unwrap()).await.unwrap().unwrap();
        assert_eq!(record.fields.completeness(), report.completeness);
    }

    #[tokio::test]
    async fn test_regenerate_requires_store() {
        let orchestrator = ExtractionOrchestrator::new(Arc::new(StaticExtractor::replying(REPLY)));
        let err = orchestrator
            .regenerate_recommendations(ClaimId::new(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ClaimError::StoreUnavailable));
    }
}
