//! HTTP API Layer
//!
//! This crate provides the REST API for the claims normalizer using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: extraction, history, recommendations, highlighting, analytics, health
//! - **Middleware**: request ids, tracing, audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let app = create_router(extractor, store, config);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_claims::{ClaimExtractor, ExtractionOrchestrator, HistoryStore};

use crate::config::ApiConfig;
use crate::handlers::{analytics, claims, health, highlight};
use crate::middleware::audit_middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: ExtractionOrchestrator,
    pub store: Arc<dyn HistoryStore>,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    /// Wires the orchestrator to the extractor and store
    pub fn new(
        extractor: Arc<dyn ClaimExtractor>,
        store: Arc<dyn HistoryStore>,
        config: ApiConfig,
    ) -> Self {
        Self {
            orchestrator: ExtractionOrchestrator::new(extractor).with_store(store.clone()),
            store,
            config: Arc::new(config),
        }
    }
}

/// Creates the main API router
///
/// # Arguments
///
/// * `extractor` - Model client used for extraction
/// * `store` - History store chosen at startup
/// * `config` - API configuration
///
/// # Returns
///
/// Configured Axum router with all routes under `/api/v1`
pub fn create_router(
    extractor: Arc<dyn ClaimExtractor>,
    store: Arc<dyn HistoryStore>,
    config: ApiConfig,
) -> Router {
    let state = AppState::new(extractor, store, config);

    let health_routes = Router::new()
        .route("/", get(health::health_check))
        .route("/ready", get(health::readiness_check));

    let claims_routes = Router::new()
        .route("/", get(claims::list_claims).delete(claims::clear_claims))
        .route("/extract", post(claims::extract_claim))
        .route("/export", get(claims::export_claims))
        .route("/:id", get(claims::get_claim).delete(claims::delete_claim))
        .route("/:id/export", get(claims::export_claim))
        .route(
            "/:id/recommendations",
            get(claims::get_recommendations).post(claims::regenerate_recommendations),
        );

    let analytics_routes = Router::new()
        .route("/", get(analytics::get_analytics))
        .route("/stats", get(analytics::get_stats));

    let api_routes = Router::new()
        .nest("/health", health_routes)
        .nest("/claims", claims_routes)
        .nest("/analytics", analytics_routes)
        .route("/highlight", post(highlight::highlight_text))
        .layer(axum_middleware::from_fn(audit_middleware));

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
