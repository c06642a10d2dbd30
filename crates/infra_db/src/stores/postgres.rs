//! PostgreSQL History Store
//!
//! Implements [`HistoryStore`] on a PostgreSQL pool. Every connection runs
//! with `statement_timeout` set (see [`crate::create_pg_pool`]).
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::stores::PostgresHistoryStore;
//!
//! let store = PostgresHistoryStore::new(pool);
//! store.init_schema().await?;
//! let store: Arc<dyn HistoryStore> = Arc::new(store);
//! ```

use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use tracing::{debug, instrument};

use core_kernel::{AdapterHealth, ClaimId, DomainPort, HealthCheckResult, HealthCheckable, PortError};
use domain_claims::analytics::{AnalyticsSnapshot, CategoryCount, HistoryStats, RawAnalytics};
use domain_claims::claim::{ClaimRecord, ExtractedFields};
use domain_claims::ports::{HistoryQuery, HistoryStore};
use domain_claims::recommendation::Recommendation;

use crate::error::DatabaseError;
use crate::rows::{like_pattern, ClaimRow, DayCountRow, LabelCountRow, PairCountRow, RecommendationRow};
use crate::schema::{CLAIM_COLUMNS, POSTGRES_MIGRATOR, PRIORITY_RANK, RECOMMENDATION_COLUMNS};

const ADAPTER_ID: &str = "postgres-history-store";

/// PostgreSQL-backed implementation of the HistoryStore trait
#[derive(Debug, Clone)]
pub struct PostgresHistoryStore {
    pool: PgPool,
}

impl PostgresHistoryStore {
    /// Creates a new store over an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates tables and indexes if they do not exist
    pub async fn init_schema(&self) -> Result<(), DatabaseError> {
        POSTGRES_MIGRATOR.run(&self.pool).await?;
        debug!("PostgreSQL schema up to date");
        Ok(())
    }

    async fn insert_recommendations(
        tx: &mut Transaction<'_, Postgres>,
        claim_id: ClaimId,
        recommendations: &[Recommendation],
    ) -> Result<u64, DatabaseError> {
        let mut inserted = 0;
        for recommendation in recommendations {
            inserted += sqlx::query(
                r#"
                INSERT INTO claim_recommendations (claim_id, action, priority, category, icon, reasoning)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(claim_id.value())
            .bind(&recommendation.action)
            .bind(recommendation.priority.as_str())
            .bind(&recommendation.category)
            .bind(&recommendation.icon)
            .bind(&recommendation.reasoning)
            .execute(&mut **tx)
            .await?
            .rows_affected();
        }
        Ok(inserted)
    }

    async fn count_by(&self, column: &'static str) -> Result<Vec<CategoryCount>, DatabaseError> {
        let sql = format!(
            "SELECT {column} AS label, COUNT(*) AS count FROM claim_history GROUP BY {column}"
        );
        let rows = sqlx::query_as::<_, LabelCountRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(CategoryCount::from).collect())
    }

    async fn edge_timestamp(&self, newest: bool) -> Result<Option<DateTime<Utc>>, DatabaseError> {
        let sql = if newest {
            "SELECT timestamp FROM claim_history ORDER BY timestamp DESC, id DESC LIMIT 1"
        } else {
            "SELECT timestamp FROM claim_history ORDER BY timestamp ASC, id ASC LIMIT 1"
        };
        Ok(sqlx::query_scalar::<_, DateTime<Utc>>(sql)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn total(&self) -> Result<u64, DatabaseError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM claim_history")
            .fetch_one(&self.pool)
            .await?;
        Ok(total.max(0) as u64)
    }

    async fn load_analytics(&self) -> Result<RawAnalytics, DatabaseError> {
        let daily = sqlx::query_as::<_, DayCountRow>(
            r#"
            SELECT to_char(claim_history.timestamp AT TIME ZONE 'UTC', 'YYYY-MM-DD') AS day,
                   COUNT(*) AS count
            FROM claim_history
            GROUP BY day
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let pairs = sqlx::query_as::<_, PairCountRow>(
            r#"
            SELECT loss_type, severity, COUNT(*) AS count
            FROM claim_history
            GROUP BY loss_type, severity
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let estimated_losses = sqlx::query_scalar::<_, String>(
            r#"
            SELECT estimated_loss
            FROM claim_history
            WHERE estimated_loss IS NOT NULL
              AND estimated_loss NOT IN ('Not specified', 'Unknown', '')
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(RawAnalytics {
            total_claims: self.total().await?,
            loss_types: self.count_by("loss_type").await?,
            severities: self.count_by("severity").await?,
            confidences: self.count_by("confidence").await?,
            daily: daily.into_iter().filter_map(DayCountRow::into_daily).collect(),
            first_claim_at: self.edge_timestamp(false).await?,
            last_claim_at: self.edge_timestamp(true).await?,
            severity_by_loss_type: pairs.into_iter().map(Into::into).collect(),
            estimated_losses,
        })
    }
}

fn to_port_error(error: sqlx::Error) -> PortError {
    DatabaseError::from(error).into()
}

// Mark as a domain port
impl DomainPort for PostgresHistoryStore {}

#[async_trait]
impl HealthCheckable for PostgresHistoryStore {
    /// Performs a `SELECT 1` round trip
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthCheckResult {
                adapter_id: ADAPTER_ID.to_string(),
                status: AdapterHealth::Healthy,
                latency_ms,
                message: None,
                checked_at: Utc::now(),
            },
            Err(e) => HealthCheckResult {
                adapter_id: ADAPTER_ID.to_string(),
                status: AdapterHealth::Unhealthy,
                latency_ms,
                message: Some(format!("Database error: {}", e)),
                checked_at: Utc::now(),
            },
        }
    }
}

#[async_trait]
impl HistoryStore for PostgresHistoryStore {
    #[instrument(skip(self, claim_text, fields))]
    async fn save(&self, claim_text: &str, fields: &ExtractedFields) -> Result<ClaimId, PortError> {
        let resolved = fields.resolve();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO claim_history (
                timestamp, claim_text, loss_type, severity, affected_assets,
                estimated_loss, incident_date, location, confidence, extraction_explanation
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(Utc::now())
        .bind(claim_text)
        .bind(&resolved.loss_type)
        .bind(resolved.severity.as_str())
        .bind(&resolved.affected_assets)
        .bind(&resolved.estimated_loss)
        .bind(&resolved.incident_date)
        .bind(&resolved.location)
        .bind(resolved.confidence.as_str())
        .bind(&resolved.extraction_explanation)
        .fetch_one(&self.pool)
        .await
        .map_err(to_port_error)?;

        debug!(claim_id = id, "Claim saved");
        Ok(ClaimId::new(id))
    }

    #[instrument(skip(self), fields(claim_id = %id))]
    async fn get_by_id(&self, id: ClaimId) -> Result<Option<ClaimRecord>, PortError> {
        let sql = format!("SELECT {CLAIM_COLUMNS} FROM claim_history WHERE id = $1");
        let row = sqlx::query_as::<_, ClaimRow>(&sql)
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(to_port_error)?;
        Ok(row.map(ClaimRecord::from))
    }

    async fn list(&self, limit: u32) -> Result<Vec<ClaimRecord>, PortError> {
        self.search(&HistoryQuery::new().limit(limit)).await
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &HistoryQuery) -> Result<Vec<ClaimRecord>, PortError> {
        let mut builder =
            QueryBuilder::<Postgres>::new(format!("SELECT {CLAIM_COLUMNS} FROM claim_history WHERE TRUE"));

        if let Some(ref keyword) = query.keyword {
            builder
                .push(" AND claim_text ILIKE ")
                .push_bind(like_pattern(keyword))
                .push(" ESCAPE '\\'");
        }
        if let Some(ref severity) = query.severity {
            builder.push(" AND severity = ").push_bind(severity.clone());
        }
        builder
            .push(" ORDER BY timestamp DESC, id DESC LIMIT ")
            .push_bind(i64::from(query.limit));

        let rows = builder
            .build_query_as::<ClaimRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(to_port_error)?;

        debug!(count = rows.len(), "History search complete");
        Ok(rows.into_iter().map(ClaimRecord::from).collect())
    }

    #[instrument(skip(self), fields(claim_id = %id))]
    async fn delete(&self, id: ClaimId) -> Result<bool, PortError> {
        let result = sqlx::query("DELETE FROM claim_history WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(to_port_error)?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn clear_all(&self) -> Result<u64, PortError> {
        let result = sqlx::query("DELETE FROM claim_history")
            .execute(&self.pool)
            .await
            .map_err(to_port_error)?;
        Ok(result.rows_affected())
    }

    #[instrument(skip(self, recommendations), fields(claim_id = %claim_id, count = recommendations.len()))]
    async fn save_recommendations(
        &self,
        claim_id: ClaimId,
        recommendations: &[Recommendation],
    ) -> Result<u64, PortError> {
        let mut tx = self.pool.begin().await.map_err(to_port_error)?;
        let inserted = Self::insert_recommendations(&mut tx, claim_id, recommendations).await?;
        tx.commit().await.map_err(to_port_error)?;
        Ok(inserted)
    }

    async fn get_recommendations(&self, claim_id: ClaimId) -> Result<Vec<Recommendation>, PortError> {
        let sql = format!(
            "SELECT {RECOMMENDATION_COLUMNS} FROM claim_recommendations \
             WHERE claim_id = $1 ORDER BY {PRIORITY_RANK}, id"
        );
        let rows = sqlx::query_as::<_, RecommendationRow>(&sql)
            .bind(claim_id.value())
            .fetch_all(&self.pool)
            .await
            .map_err(to_port_error)?;
        Ok(rows.into_iter().map(Recommendation::from).collect())
    }

    async fn has_recommendations(&self, claim_id: ClaimId) -> Result<bool, PortError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM claim_recommendations WHERE claim_id = $1)",
        )
        .bind(claim_id.value())
        .fetch_one(&self.pool)
        .await
        .map_err(to_port_error)
    }

    async fn delete_recommendations(&self, claim_id: ClaimId) -> Result<u64, PortError> {
        let result = sqlx::query("DELETE FROM claim_recommendations WHERE claim_id = $1")
            .bind(claim_id.value())
            .execute(&self.pool)
            .await
            .map_err(to_port_error)?;
        Ok(result.rows_affected())
    }

    #[instrument(skip(self, recommendations), fields(claim_id = %claim_id, count = recommendations.len()))]
    async fn replace_recommendations(
        &self,
        claim_id: ClaimId,
        recommendations: &[Recommendation],
    ) -> Result<u64, PortError> {
        let mut tx = self.pool.begin().await.map_err(to_port_error)?;
        sqlx::query("DELETE FROM claim_recommendations WHERE claim_id = $1")
            .bind(claim_id.value())
            .execute(&mut *tx)
            .await
            .map_err(to_port_error)?;
        let inserted = Self::insert_recommendations(&mut tx, claim_id, recommendations).await?;
        tx.commit().await.map_err(to_port_error)?;
        Ok(inserted)
    }

    async fn stats(&self) -> Result<HistoryStats, PortError> {
        let total_claims = self.total().await?;
        let severity_breakdown = self
            .count_by("severity")
            .await?
            .into_iter()
            .map(|c| (c.label, c.count))
            .collect();
        let last_claim_at = self.edge_timestamp(true).await?;

        Ok(HistoryStats {
            total_claims,
            severity_breakdown,
            last_claim_at,
        })
    }

    #[instrument(skip(self))]
    async fn analytics(&self) -> Result<AnalyticsSnapshot, PortError> {
        Ok(self.load_analytics().await?.into())
    }
}
