//! Claims Normalizer - API Server Binary
//!
//! This binary starts the HTTP API server for claim extraction and history.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration (SQLite file in the working directory)
//! GEMINI_API_KEY=... cargo run --bin claims-api
//!
//! # Run against PostgreSQL with JSON logs
//! DATABASE_TYPE=postgresql DATABASE_URL=postgres://... LOG_FORMAT=json cargo run --bin claims-api
//! ```
//!
//! # Environment Variables
//!
//! * `HOST` / `PORT` - Bind address (default: 0.0.0.0:8080)
//! * `LOG_LEVEL` - trace, debug, info, warn, error (default: info); `RUST_LOG` wins when set
//! * `LOG_FORMAT` - text or json (default: text)
//! * `DATABASE_TYPE` - sqlite or postgresql (default: sqlite)
//! * `DATABASE_URL` - Connection string (default: sqlite://claims_history.db)
//! * `DATABASE_MAX_CONNECTIONS` - Pool size (default: 10)
//! * `DATABASE_STATEMENT_TIMEOUT_SECS` - PostgreSQL statement timeout (default: 5)
//! * `GEMINI_API_KEY` - Required
//! * `GEMINI_MODEL` - Model name (default: gemini-2.0-flash-exp)
//! * `GEMINI_BASE_URL` - API root
//! * `GEMINI_TIMEOUT_SECS` - Per-request timeout (default: 60)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_claims::adapters::GeminiExtractor;
use interface_api::config::{ApiConfig, LogFormat};
use interface_api::create_router;

/// Main entry point for the API server.
///
/// Initializes logging, loads configuration, connects the history store,
/// and starts the HTTP server.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration cannot be loaded from environment
/// - The Gemini API key is missing
/// - Database connection or schema creation fails
/// - Server fails to bind to the configured address
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("Failed to load configuration")?;

    init_tracing(&config);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        database = %config.database_type,
        model = %config.gemini_model,
        "Starting claims API server"
    );

    let db_config = config
        .database_config()
        .context("Invalid database configuration")?;
    let store = infra_db::connect_store(&db_config)
        .await
        .context("Failed to open history store")?;

    let extractor = GeminiExtractor::new(config.gemini_config())
        .context("GEMINI_API_KEY must be set")?;

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .context("Invalid HOST/PORT")?;

    let app = create_router(Arc::new(extractor), store, config);

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
fn init_tracing(config: &ApiConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init(),
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
