//! Row types shared by both stores

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use core_kernel::ClaimId;
use domain_claims::analytics::{CategoryCount, DailyCount, SeverityByLossType};
use domain_claims::claim::{ClaimRecord, ExtractedFields, UNKNOWN};
use domain_claims::recommendation::{Priority, Recommendation};

/// Database row for `claim_history`
#[derive(Debug, Clone, FromRow)]
pub struct ClaimRow {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub claim_text: String,
    pub loss_type: Option<String>,
    pub severity: Option<String>,
    pub affected_assets: Option<String>,
    pub estimated_loss: Option<String>,
    pub incident_date: Option<String>,
    pub location: Option<String>,
    pub confidence: Option<String>,
    pub extraction_explanation: Option<String>,
}

impl From<ClaimRow> for ClaimRecord {
    /// NULL columns resolve to the same sentinels used on save
    fn from(row: ClaimRow) -> Self {
        let fields = ExtractedFields {
            loss_type: row.loss_type,
            severity: row.severity,
            affected_assets: row.affected_assets,
            estimated_loss: row.estimated_loss,
            incident_date: row.incident_date,
            location: row.location,
            confidence: row.confidence,
            extraction_explanation: row.extraction_explanation,
        };

        ClaimRecord {
            id: ClaimId::new(row.id),
            timestamp: row.timestamp,
            claim_text: row.claim_text,
            fields: fields.resolve(),
        }
    }
}

/// Database row for `claim_recommendations`
#[derive(Debug, Clone, FromRow)]
pub struct RecommendationRow {
    pub action: String,
    pub priority: String,
    pub category: Option<String>,
    pub icon: Option<String>,
    pub reasoning: Option<String>,
}

impl From<RecommendationRow> for Recommendation {
    fn from(row: RecommendationRow) -> Self {
        Recommendation {
            action: row.action,
            priority: Priority::parse(&row.priority).unwrap_or(Priority::Medium),
            category: row.category.unwrap_or_default(),
            icon: row.icon.unwrap_or_default(),
            reasoning: row.reasoning.unwrap_or_default(),
        }
    }
}

/// `label, count` aggregate row
#[derive(Debug, Clone, FromRow)]
pub struct LabelCountRow {
    pub label: Option<String>,
    pub count: i64,
}

impl From<LabelCountRow> for CategoryCount {
    fn from(row: LabelCountRow) -> Self {
        CategoryCount::new(row.label.unwrap_or_else(|| UNKNOWN.to_string()), row.count.max(0) as u64)
    }
}

/// `loss_type, severity, count` aggregate row
#[derive(Debug, Clone, FromRow)]
pub struct PairCountRow {
    pub loss_type: Option<String>,
    pub severity: Option<String>,
    pub count: i64,
}

impl From<PairCountRow> for SeverityByLossType {
    fn from(row: PairCountRow) -> Self {
        SeverityByLossType {
            loss_type: row.loss_type.unwrap_or_else(|| UNKNOWN.to_string()),
            severity: row.severity.unwrap_or_else(|| UNKNOWN.to_string()),
            count: row.count.max(0) as u64,
        }
    }
}

/// `day, count` aggregate row, `day` formatted as `YYYY-MM-DD`
#[derive(Debug, Clone, FromRow)]
pub struct DayCountRow {
    pub day: Option<String>,
    pub count: i64,
}

impl DayCountRow {
    /// None when the day label is missing or malformed
    pub fn into_daily(self) -> Option<DailyCount> {
        let date = NaiveDate::parse_from_str(self.day.as_deref()?, "%Y-%m-%d").ok()?;
        Some(DailyCount {
            date,
            count: self.count.max(0) as u64,
        })
    }
}

/// Wraps a keyword for a `LIKE ... ESCAPE '\'` substring match
pub fn like_pattern(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len() + 2);
    escaped.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
