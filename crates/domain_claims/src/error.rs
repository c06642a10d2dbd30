//! Claims domain errors

use thiserror::Error;

use core_kernel::{ClaimId, PortError};
use crate::parser::ParseFailure;

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Claim description is empty")]
    EmptyClaim,

    #[error("Extraction failed: {details}")]
    Extraction { details: String, transient: bool },

    #[error("Failed to parse model response: {}", .0.details)]
    Parse(ParseFailure),

    #[error("Claim not found: {0}")]
    ClaimNotFound(ClaimId),

    #[error("Persistence failed: {0}")]
    Persistence(String),

    #[error("History store is not configured")]
    StoreUnavailable,

    #[error("Export failed: {0}")]
    Export(String),
}

impl ClaimError {
    /// Stable machine-readable tag for the error category
    pub fn tag(&self) -> &'static str {
        match self {
            ClaimError::EmptyClaim => "empty_claim",
            ClaimError::Extraction { .. } => "extraction_failure",
            ClaimError::Parse(_) => "parse_failure",
            ClaimError::ClaimNotFound(_) => "not_found",
            ClaimError::Persistence(_) => "persistence_failure",
            ClaimError::StoreUnavailable => "store_unavailable",
            ClaimError::Export(_) => "export_failure",
        }
    }

    /// Wraps an extractor failure
    pub fn extraction(error: &PortError) -> Self {
        ClaimError::Extraction {
            details: error.to_string(),
            transient: error.is_transient(),
        }
    }
}

impl From<serde_json::Error> for ClaimError {
    fn from(error: serde_json::Error) -> Self {
        ClaimError::Export(error.to_string())
    }
}
