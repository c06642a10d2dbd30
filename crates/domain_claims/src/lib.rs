//! Claims Normalization Domain
//!
//! This crate turns free-text insurance claim descriptions into structured
//! records and recommended next actions. The extraction itself is delegated
//! to a large-language-model API behind the [`ClaimExtractor`] port; everything
//! around it lives here.
//!
//! # Processing Pipeline
//!
//! ```text
//! claim text -> extractor -> raw reply -> parser -> mapping
//!     -> validation (warning only) -> history store
//!     -> recommendation rules -> history store
//! ```

pub mod claim;
pub mod parser;
pub mod validation;
pub mod metrics;
pub mod highlight;
pub mod recommendation;
pub mod rules;
pub mod analytics;
pub mod export;
pub mod prompt;
pub mod ports;
pub mod orchestrator;
pub mod adapters;
pub mod error;

pub use claim::{ClaimRecord, ClaimFields, ExtractedFields, Severity, Confidence};
pub use parser::{parse_response, ParseOutcome, ParseFailure};
pub use validation::{validate_fields, completeness_score, Completeness, ValidationReport, REQUIRED_FIELDS};
pub use metrics::{ComparisonMetrics, StructureQuality};
pub use highlight::{extract_keywords, highlight, highlight_explanation, highlight_or_skip, HighlightError, Highlights};
pub use recommendation::{Recommendation, Priority, sort_for_display};
pub use rules::{RecommendationEngine, parse_estimated_loss};
pub use analytics::{AnalyticsSnapshot, HistoryStats};
pub use ports::{HistoryStore, ClaimExtractor, HistoryQuery};
pub use orchestrator::{ExtractionOrchestrator, ExtractionReport, ProcessingWarning};
pub use error::ClaimError;
