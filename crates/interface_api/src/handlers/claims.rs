//! Claims handlers

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use tracing::info;
use validator::Validate;

use core_kernel::{ClaimId, CoreError};
use domain_claims::export::{export_fields, export_file_name, export_history, HISTORY_EXPORT_LIMIT};
use domain_claims::{highlight_or_skip, sort_for_display, ClaimRecord, ExtractionReport, HistoryStore};

use crate::dto::claims::*;
use crate::{error::ApiError, AppState};

fn parse_id(raw: &str) -> Result<ClaimId, ApiError> {
    Ok(raw.parse::<ClaimId>().map_err(CoreError::from)?)
}

async fn load_record(state: &AppState, id: ClaimId) -> Result<ClaimRecord, ApiError> {
    state
        .store
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Claim {id} not found")))
}

fn json_attachment(file_name: String, body: String) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "application/json; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{file_name}\"")),
        ],
        body,
    )
}

/// Runs a claim description through extraction and stores the result
pub async fn extract_claim(
    State(state): State<AppState>,
    Json(request): Json<ExtractClaimRequest>,
) -> Result<(StatusCode, Json<ExtractionReport>), ApiError> {
    request.validate()?;

    let report = state.orchestrator.process(&request.claim_text).await?;
    let status = if report.is_stored() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(report)))
}

/// Lists stored claims, newest first, optionally filtered
pub async fn list_claims(
    State(state): State<AppState>,
    Query(params): Query<ListClaimsParams>,
) -> Result<Json<Vec<ClaimRecord>>, ApiError> {
    params.validate()?;
    let records = state.store.search(&params.to_query()).await?;
    Ok(Json(records))
}

/// Downloads the whole history as one JSON document
pub async fn export_claims(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let records = state.store.list(HISTORY_EXPORT_LIMIT).await?;
    let body = export_history(&records)?;
    Ok(json_attachment(export_file_name("claims_history", Utc::now()), body))
}

/// Gets a claim by ID
pub async fn get_claim(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ClaimDetailResponse>, ApiError> {
    let id = parse_id(&id)?;
    let record = load_record(&state, id).await?;

    let completeness = record.fields.completeness();
    let highlights = highlight_or_skip(&record.claim_text, &record.fields.extraction_explanation);
    let has_recommendations = state.store.has_recommendations(id).await?;

    Ok(Json(ClaimDetailResponse {
        record,
        completeness,
        highlights,
        has_recommendations,
    }))
}

/// Downloads the eight structured fields of one claim
pub async fn export_claim(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let record = load_record(&state, id).await?;
    let body = export_fields(&record.fields)?;
    let prefix = format!("claim_{}", id.value());
    Ok(json_attachment(export_file_name(&prefix, Utc::now()), body))
}

/// Deletes a claim and its recommendations
pub async fn delete_claim(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteClaimResponse>, ApiError> {
    let id = parse_id(&id)?;
    let deleted = state.store.delete(id).await?;
    if deleted {
        info!(claim_id = %id, "Claim deleted");
    }
    Ok(Json(DeleteClaimResponse { deleted }))
}

/// Deletes every stored claim
pub async fn clear_claims(
    State(state): State<AppState>,
) -> Result<Json<ClearHistoryResponse>, ApiError> {
    let deleted = state.store.clear_all().await?;
    info!(deleted, "History cleared");
    Ok(Json(ClearHistoryResponse { deleted }))
}

/// Gets the stored recommendations for a claim
pub async fn get_recommendations(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RecommendationsResponse>, ApiError> {
    let id = parse_id(&id)?;
    load_record(&state, id).await?;

    let stored = state.store.get_recommendations(id).await?;
    Ok(Json(RecommendationsResponse {
        claim_id: id,
        recommendations: sort_for_display(&stored),
    }))
}

/// Reruns the rules for a stored claim
pub async fn regenerate_recommendations(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RecommendationsResponse>, ApiError> {
    let id = parse_id(&id)?;
    let regenerated = state.orchestrator.regenerate_recommendations(id).await?;
    Ok(Json(RecommendationsResponse {
        claim_id: id,
        recommendations: sort_for_display(&regenerated),
    }))
}
