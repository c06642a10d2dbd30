//! Analytics handlers

use axum::{extract::State, Json};

use domain_claims::{HistoryStats, HistoryStore};

use crate::dto::analytics::AnalyticsResponse;
use crate::{error::ApiError, AppState};

/// Aggregate view over the whole history
pub async fn get_analytics(
    State(state): State<AppState>,
) -> Result<Json<AnalyticsResponse>, ApiError> {
    let snapshot = state.store.analytics().await?;
    Ok(Json(snapshot.into()))
}

/// Totals, severity breakdown and latest claim time
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<HistoryStats>, ApiError> {
    Ok(Json(state.store.stats().await?))
}
