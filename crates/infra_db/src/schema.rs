//! Schema management
//!
//! Each backend has its own migration set under `migrations/`, embedded at
//! compile time. Both create `claim_history` and `claim_recommendations`
//! with the same columns and indexes.

use sqlx::migrate::Migrator;

pub static POSTGRES_MIGRATOR: Migrator = sqlx::migrate!("../../migrations/postgres");

pub static SQLITE_MIGRATOR: Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Columns selected for every claim record query
pub const CLAIM_COLUMNS: &str = "id, timestamp, claim_text, loss_type, severity, \
affected_assets, estimated_loss, incident_date, location, confidence, extraction_explanation";

/// Columns selected for every recommendation query
pub const RECOMMENDATION_COLUMNS: &str = "action, priority, category, icon, reasoning";

/// Priority rank expression used to order recommendations
pub const PRIORITY_RANK: &str = "CASE priority WHEN 'Critical' THEN 1 WHEN 'High' THEN 2 \
WHEN 'Medium' THEN 3 WHEN 'Low' THEN 4 ELSE 5 END";
