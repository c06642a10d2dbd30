//! Keyword highlighting handler

use axum::Json;
use validator::Validate;

use domain_claims::{highlight_explanation, Highlights};

use crate::dto::claims::HighlightRequest;
use crate::error::ApiError;

/// Marks the phrases quoted in an explanation within a text
pub async fn highlight_text(
    Json(request): Json<HighlightRequest>,
) -> Result<Json<Highlights>, ApiError> {
    request.validate()?;
    Ok(Json(highlight_explanation(&request.text, &request.explanation)?))
}
