//! Claims Domain Ports
//!
//! The claims domain needs two things from the outside world: a model that
//! turns claim text into a JSON reply, and a place to keep processed claims.
//!
//! - [`ClaimExtractor`]: implemented by the Gemini REST adapter
//!   ([`crate::adapters::gemini`]) and by a static mock for tests
//! - [`HistoryStore`]: implemented by the PostgreSQL and SQLite stores in
//!   `infra_db`, and by an in-memory mock for tests
//!
//! # Usage
//!
//! ```rust,ignore
//! let store: Arc<dyn HistoryStore> = infra_db::connect_store(&db_config).await?;
//! let extractor: Arc<dyn ClaimExtractor> = Arc::new(GeminiExtractor::new(gemini_config)?);
//! let orchestrator = ExtractionOrchestrator::new(extractor).with_store(store);
//! ```

use async_trait::async_trait;

use core_kernel::{ClaimId, DomainPort, HealthCheckable, PortError};

use crate::analytics::{AnalyticsSnapshot, HistoryStats};
use crate::claim::{ClaimRecord, ExtractedFields};
use crate::recommendation::Recommendation;

/// Default number of records returned by list and search
pub const DEFAULT_HISTORY_LIMIT: u32 = 100;

/// Filter for searching the claim history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    /// Case-insensitive substring of the claim text
    pub keyword: Option<String>,
    /// Exact stored severity label
    pub severity: Option<String>,
    pub limit: u32,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            keyword: None,
            severity: None,
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl HistoryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blank keywords are treated as no filter
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        self.keyword = (!keyword.trim().is_empty()).then_some(keyword);
        self
    }

    pub fn severity(mut self, severity: impl Into<String>) -> Self {
        let severity = severity.into();
        self.severity = (!severity.trim().is_empty()).then_some(severity);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

/// Port for the language model that performs the extraction
#[async_trait]
pub trait ClaimExtractor: DomainPort {
    /// Sends the claim to the model and returns its raw text reply
    ///
    /// Failures are returned as-is; the caller decides whether to retry.
    async fn extract(&self, claim_text: &str) -> Result<String, PortError>;
}

/// Port for persisted claim history
///
/// Records are immutable once saved. Recommendations belong to exactly one
/// record and are removed with it.
#[async_trait]
pub trait HistoryStore: DomainPort + HealthCheckable {
    // ========================================================================
    // Claims
    // ========================================================================

    /// Persists a processed claim, applying sentinel defaults to absent fields
    async fn save(&self, claim_text: &str, fields: &ExtractedFields) -> Result<ClaimId, PortError>;

    async fn get_by_id(&self, id: ClaimId) -> Result<Option<ClaimRecord>, PortError>;

    /// Newest first (timestamp, then id, descending)
    async fn list(&self, limit: u32) -> Result<Vec<ClaimRecord>, PortError>;

    /// Newest first, filtered by keyword and severity
    async fn search(&self, query: &HistoryQuery) -> Result<Vec<ClaimRecord>, PortError>;

    /// Returns false when no record had this id
    async fn delete(&self, id: ClaimId) -> Result<bool, PortError>;

    /// Removes every record, returning how many were removed
    async fn clear_all(&self) -> Result<u64, PortError>;

    // ========================================================================
    // Recommendations
    // ========================================================================

    async fn save_recommendations(
        &self,
        claim_id: ClaimId,
        recommendations: &[Recommendation],
    ) -> Result<u64, PortError>;

    /// Ordered by priority rank, then insertion order
    async fn get_recommendations(&self, claim_id: ClaimId) -> Result<Vec<Recommendation>, PortError>;

    async fn has_recommendations(&self, claim_id: ClaimId) -> Result<bool, PortError>;

    async fn delete_recommendations(&self, claim_id: ClaimId) -> Result<u64, PortError>;

    /// Deletes the current set and inserts the new one atomically
    async fn replace_recommendations(
        &self,
        claim_id: ClaimId,
        recommendations: &[Recommendation],
    ) -> Result<u64, PortError>;

    // ========================================================================
    // Reporting
    // ========================================================================

    async fn stats(&self) -> Result<HistoryStats, PortError>;

    async fn analytics(&self) -> Result<AnalyticsSnapshot, PortError>;
}

/// Mock implementations for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::{BTreeMap, HashMap};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    use chrono::Utc;
    use tokio::sync::RwLock;

    use core_kernel::{AdapterHealth, HealthCheckResult};

    use crate::analytics::{CategoryCount, DailyCount, RawAnalytics, SeverityByLossType};
    use crate::claim::{NOT_SPECIFIED, UNKNOWN};

    #[derive(Debug, Default)]
    struct MockState {
        next_claim_id: i64,
        records: Vec<ClaimRecord>,
        /// (insertion sequence, claim, recommendation)
        recommendations: Vec<(u64, ClaimId, Recommendation)>,
        next_sequence: u64,
    }

    /// In-memory mock implementation of HistoryStore
    #[derive(Debug, Default)]
    pub struct InMemoryHistoryStore {
        state: Arc<RwLock<MockState>>,
        unavailable: AtomicBool,
    }

    impl InMemoryHistoryStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// A store whose every operation fails with a connection error
        pub fn unavailable() -> Self {
            let store = Self::default();
            store.unavailable.store(true, Ordering::SeqCst);
            store
        }

        pub fn set_unavailable(&self, unavailable: bool) {
            self.unavailable.store(unavailable, Ordering::SeqCst);
        }

        pub async fn len(&self) -> usize {
            self.state.read().await.records.len()
        }

        pub async fn is_empty(&self) -> bool {
            self.len().await == 0
        }

        fn check(&self) -> Result<(), PortError> {
            if self.unavailable.load(Ordering::SeqCst) {
                Err(PortError::connection("in-memory store marked unavailable"))
            } else {
                Ok(())
            }
        }

        fn newest_first(records: &mut [ClaimRecord]) {
            records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        }
    }

    impl DomainPort for InMemoryHistoryStore {}

    #[async_trait]
    impl HealthCheckable for InMemoryHistoryStore {
        async fn health_check(&self) -> HealthCheckResult {
            let (status, message) = match self.check() {
                Ok(()) => (AdapterHealth::Healthy, "Mock store always healthy".to_string()),
                Err(e) => (AdapterHealth::Unhealthy, e.to_string()),
            };
            HealthCheckResult {
                adapter_id: "mock-history-store".to_string(),
                status,
                latency_ms: 0,
                message: Some(message),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl HistoryStore for InMemoryHistoryStore {
        async fn save(&self, claim_text: &str, fields: &ExtractedFields) -> Result<ClaimId, PortError> {
            self.check()?;
            let mut state = self.state.write().await;
            state.next_claim_id += 1;
            let id = ClaimId::new(state.next_claim_id);
            state.records.push(ClaimRecord {
                id,
                timestamp: Utc::now(),
                claim_text: claim_text.to_string(),
                fields: fields.resolve(),
            });
            Ok(id)
        }

        async fn get_by_id(&self, id: ClaimId) -> Result<Option<ClaimRecord>, PortError> {
            self.check()?;
            let state = self.state.read().await;
            Ok(state.records.iter().find(|r| r.id == id).cloned())
        }

        async fn list(&self, limit: u32) -> Result<Vec<ClaimRecord>, PortError> {
            self.search(&HistoryQuery::new().limit(limit)).await
        }

        async fn search(&self, query: &HistoryQuery) -> Result<Vec<ClaimRecord>, PortError> {
            self.check()?;
            let state = self.state.read().await;
            let keyword = query.keyword.as_ref().map(|k| k.to_lowercase());

            let mut results: Vec<ClaimRecord> = state
                .records
                .iter()
                .filter(|r| {
                    if let Some(ref keyword) = keyword {
                        if !r.claim_text.to_lowercase().contains(keyword.as_str()) {
                            return false;
                        }
                    }
                    if let Some(ref severity) = query.severity {
                        if r.fields.severity.as_str() != severity {
                            return false;
                        }
                    }
                    true
                })
                .cloned()
                .collect();

            Self::newest_first(&mut results);
            results.truncate(query.limit as usize);
            Ok(results)
        }

        async fn delete(&self, id: ClaimId) -> Result<bool, PortError> {
            self.check()?;
            let mut state = self.state.write().await;
            let before = state.records.len();
            state.records.retain(|r| r.id != id);
            state.recommendations.retain(|(_, claim_id, _)| *claim_id != id);
            Ok(state.records.len() < before)
        }

        async fn clear_all(&self) -> Result<u64, PortError> {
            self.check()?;
            let mut state = self.state.write().await;
            let removed = state.records.len() as u64;
            state.records.clear();
            state.recommendations.clear();
            Ok(removed)
        }

        async fn save_recommendations(
            &self,
            claim_id: ClaimId,
            recommendations: &[Recommendation],
        ) -> Result<u64, PortError> {
            self.check()?;
            let mut state = self.state.write().await;
            if !state.records.iter().any(|r| r.id == claim_id) {
                return Err(PortError::validation(format!("claim {claim_id} does not exist")));
            }
            for recommendation in recommendations {
                state.next_sequence += 1;
                let sequence = state.next_sequence;
                state
                    .recommendations
                    .push((sequence, claim_id, recommendation.clone()));
            }
            Ok(recommendations.len() as u64)
        }

        async fn get_recommendations(&self, claim_id: ClaimId) -> Result<Vec<Recommendation>, PortError> {
            self.check()?;
            let state = self.state.read().await;
            let mut rows: Vec<&(u64, ClaimId, Recommendation)> = state
                .recommendations
                .iter()
                .filter(|(_, id, _)| *id == claim_id)
                .collect();
            rows.sort_by_key(|(sequence, _, r)| (r.priority.rank(), *sequence));
            Ok(rows.into_iter().map(|(_, _, r)| r.clone()).collect())
        }

        async fn has_recommendations(&self, claim_id: ClaimId) -> Result<bool, PortError> {
            self.check()?;
            let state = self.state.read().await;
            Ok(state.recommendations.iter().any(|(_, id, _)| *id == claim_id))
        }

        async fn delete_recommendations(&self, claim_id: ClaimId) -> Result<u64, PortError> {
            self.check()?;
            let mut state = self.state.write().await;
            let before = state.recommendations.len();
            state.recommendations.retain(|(_, id, _)| *id != claim_id);
            Ok((before - state.recommendations.len()) as u64)
        }

        async fn replace_recommendations(
            &self,
            claim_id: ClaimId,
            recommendations: &[Recommendation],
        ) -> Result<u64, PortError> {
            self.delete_recommendations(claim_id).await?;
            self.save_recommendations(claim_id, recommendations).await
        }

        async fn stats(&self) -> Result<HistoryStats, PortError> {
            self.check()?;
            let state = self.state.read().await;
            let mut severity_breakdown = BTreeMap::new();
            for record in &state.records {
                *severity_breakdown
                    .entry(record.fields.severity.to_string())
                    .or_insert(0u64) += 1;
            }
            Ok(HistoryStats {
                total_claims: state.records.len() as u64,
                severity_breakdown,
                last_claim_at: state.records.iter().map(|r| r.timestamp).max(),
            })
        }

        async fn analytics(&self) -> Result<AnalyticsSnapshot, PortError> {
            self.check()?;
            let state = self.state.read().await;
            let records = &state.records;

            let count_by = |label: fn(&ClaimRecord) -> String| -> Vec<CategoryCount> {
                let mut counts: HashMap<String, u64> = HashMap::new();
                for record in records {
                    *counts.entry(label(record)).or_insert(0) += 1;
                }
                counts
                    .into_iter()
                    .map(|(label, count)| CategoryCount::new(label, count))
                    .collect()
            };

            let mut daily: BTreeMap<chrono::NaiveDate, u64> = BTreeMap::new();
            let mut pairs: BTreeMap<(String, String), u64> = BTreeMap::new();
            for record in records {
                *daily.entry(record.timestamp.date_naive()).or_insert(0) += 1;
                *pairs
                    .entry((
                        record.fields.loss_type.clone(),
                        record.fields.severity.to_string(),
                    ))
                    .or_insert(0) += 1;
            }

            Ok(AnalyticsSnapshot::from(RawAnalytics {
                total_claims: records.len() as u64,
                loss_types: count_by(|r| r.fields.loss_type.clone()),
                severities: count_by(|r| r.fields.severity.to_string()),
                confidences: count_by(|r| r.fields.confidence.to_string()),
                daily: daily
                    .into_iter()
                    .map(|(date, count)| DailyCount { date, count })
                    .collect(),
                first_claim_at: records.iter().map(|r| r.timestamp).min(),
                last_claim_at: records.iter().map(|r| r.timestamp).max(),
                severity_by_loss_type: pairs
                    .into_iter()
                    .map(|((loss_type, severity), count)| SeverityByLossType {
                        loss_type,
                        severity,
                        count,
                    })
                    .collect(),
                estimated_losses: records
                    .iter()
                    .map(|r| r.fields.estimated_loss.clone())
                    .filter(|loss| loss != NOT_SPECIFIED && loss != UNKNOWN)
                    .collect(),
            }))
        }
    }

    /// Extractor returning a fixed reply, or a fixed failure
    #[derive(Debug)]
    pub struct StaticExtractor {
        reply: Result<String, String>,
        calls: AtomicUsize,
    }

    impl StaticExtractor {
        pub fn replying(reply: impl Into<String>) -> Self {
            Self {
                reply: Ok(reply.into()),
                calls: AtomicUsize::new(0),
            }
        }

        /// Every call fails with a service-unavailable error naming `service`
        pub fn failing(service: impl Into<String>) -> Self {
            Self {
                reply: Err(service.into()),
                calls: AtomicUsize::new(0),
            }
        }

        /// Number of extraction calls received
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl DomainPort for StaticExtractor {}

    #[async_trait]
    impl ClaimExtractor for StaticExtractor {
        async fn extract(&self, _claim_text: &str) -> Result<String, PortError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(reply) => Ok(reply.clone()),
                Err(service) => Err(PortError::ServiceUnavailable {
                    service: service.clone(),
                }),
            }
        }
    }
}
