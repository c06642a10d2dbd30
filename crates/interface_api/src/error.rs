//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use core_kernel::{CoreError, PortError};
use domain_claims::{ClaimError, HighlightError};

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        details: Option<Vec<String>>,
    },

    #[error("Claim description is empty")]
    EmptyClaim,

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Failed to parse model response: {message}")]
    Parse {
        message: String,
        raw_response: String,
    },

    #[error("Persistence failed: {0}")]
    Persistence(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
    /// Unparseable model reply, verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Validation { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
            ApiError::EmptyClaim => (StatusCode::UNPROCESSABLE_ENTITY, "empty_claim"),
            ApiError::Extraction(_) => (StatusCode::BAD_GATEWAY, "extraction_failure"),
            ApiError::Parse { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "parse_failure"),
            ApiError::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, "persistence_failure"),
            ApiError::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let message = match &self {
            ApiError::NotFound(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Extraction(msg)
            | ApiError::Persistence(msg)
            | ApiError::ServiceUnavailable(msg)
            | ApiError::Internal(msg) => msg.clone(),
            ApiError::Validation { message, .. } | ApiError::Parse { message, .. } => message.clone(),
            ApiError::EmptyClaim => self.to_string(),
        };

        let (details, raw_response) = match self {
            ApiError::Validation { details, .. } => (details, None),
            ApiError::Parse { raw_response, .. } => (None, Some(raw_response)),
            _ => (None, None),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
            raw_response,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ClaimError> for ApiError {
    fn from(err: ClaimError) -> Self {
        match err {
            ClaimError::EmptyClaim => ApiError::EmptyClaim,
            ClaimError::Extraction { details, .. } => ApiError::Extraction(details),
            ClaimError::Parse(failure) => ApiError::Parse {
                message: failure.details,
                raw_response: failure.raw_response,
            },
            ClaimError::ClaimNotFound(id) => ApiError::NotFound(format!("Claim {id} not found")),
            ClaimError::Persistence(msg) => ApiError::Persistence(msg),
            ClaimError::StoreUnavailable => {
                ApiError::ServiceUnavailable("history store is not configured".to_string())
            }
            ClaimError::Export(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Identifier(_) | CoreError::Validation(_) => ApiError::BadRequest(err.to_string()),
            CoreError::NotFound(msg) => ApiError::NotFound(msg),
            CoreError::Configuration(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<PortError> for ApiError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            PortError::Validation { message, field } => ApiError::Validation {
                message,
                details: field.map(|f| vec![f]),
            },
            ref e if e.is_transient() => ApiError::ServiceUnavailable(e.to_string()),
            other => ApiError::Persistence(other.to_string()),
        }
    }
}

impl From<HighlightError> for ApiError {
    fn from(err: HighlightError) -> Self {
        ApiError::Validation {
            message: err.to_string(),
            details: None,
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => format!("{field}: {msg}"),
                    None => format!("{field}: {}", e.code),
                })
            })
            .collect();
        details.sort();

        ApiError::Validation {
            message: "Request validation failed".to_string(),
            details: Some(details),
        }
    }
}
