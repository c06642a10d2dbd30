//! History statistics and analytics
//!
//! Stores return raw group counts; the orderings and derived figures are
//! computed here so both database backends report identically.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::claim::{Confidence, Severity};
use crate::rules::parse_estimated_loss;

/// Short summary of the stored history
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStats {
    pub total_claims: u64,
    /// Stored severity label to number of claims
    pub severity_breakdown: BTreeMap<String, u64>,
    pub last_claim_at: Option<DateTime<Utc>>,
}

/// Number of claims carrying a label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: u64,
}

impl CategoryCount {
    pub fn new(label: impl Into<String>, count: u64) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// Number of claims recorded on a calendar day (UTC)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u64,
}

/// Claims per (loss type, severity) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityByLossType {
    pub loss_type: String,
    pub severity: String,
    pub count: u64,
}

/// Unordered aggregates as read from a store
#[derive(Debug, Clone, Default)]
pub struct RawAnalytics {
    pub total_claims: u64,
    pub loss_types: Vec<CategoryCount>,
    pub severities: Vec<CategoryCount>,
    pub confidences: Vec<CategoryCount>,
    pub daily: Vec<DailyCount>,
    pub first_claim_at: Option<DateTime<Utc>>,
    pub last_claim_at: Option<DateTime<Utc>>,
    pub severity_by_loss_type: Vec<SeverityByLossType>,
    pub estimated_losses: Vec<String>,
}

/// Aggregate view over the whole history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub total_claims: u64,
    /// Most frequent first
    pub loss_type_distribution: Vec<CategoryCount>,
    /// Critical, High, Medium, Low, then anything else
    pub severity_distribution: Vec<CategoryCount>,
    /// High, Medium, Low, then anything else
    pub confidence_distribution: Vec<CategoryCount>,
    /// Oldest day first
    pub claims_over_time: Vec<DailyCount>,
    pub first_claim_at: Option<DateTime<Utc>>,
    pub last_claim_at: Option<DateTime<Utc>>,
    pub severity_by_loss_type: Vec<SeverityByLossType>,
    /// Raw estimate strings, sentinels excluded
    pub estimated_losses: Vec<String>,
}

impl From<RawAnalytics> for AnalyticsSnapshot {
    fn from(raw: RawAnalytics) -> Self {
        let mut loss_types = raw.loss_types;
        loss_types.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));

        let mut daily = raw.daily;
        daily.sort_by_key(|d| d.date);

        let mut severity_by_loss_type = raw.severity_by_loss_type;
        severity_by_loss_type.sort_by(|a, b| {
            a.loss_type
                .cmp(&b.loss_type)
                .then_with(|| severity_rank(&a.severity).cmp(&severity_rank(&b.severity)))
        });

        Self {
            total_claims: raw.total_claims,
            loss_type_distribution: loss_types,
            severity_distribution: order_by_severity(raw.severities),
            confidence_distribution: order_by_confidence(raw.confidences),
            claims_over_time: daily,
            first_claim_at: raw.first_claim_at,
            last_claim_at: raw.last_claim_at,
            severity_by_loss_type,
            estimated_losses: raw.estimated_losses,
        }
    }
}

impl AnalyticsSnapshot {
    pub fn is_empty(&self) -> bool {
        self.total_claims == 0
    }

    /// Label with the highest count; ties go to the more severe label
    pub fn most_common_severity(&self) -> Option<&str> {
        most_common(&self.severity_distribution)
    }

    /// Label with the highest count
    pub fn most_common_loss_type(&self) -> Option<&str> {
        most_common(&self.loss_type_distribution)
    }

    /// Percentage of claims extracted with high confidence
    pub fn high_confidence_share(&self) -> f64 {
        if self.total_claims == 0 {
            return 0.0;
        }
        let high: u64 = self
            .confidence_distribution
            .iter()
            .filter(|c| Confidence::parse(&c.label) == Confidence::High)
            .map(|c| c.count)
            .sum();
        high as f64 / self.total_claims as f64 * 100.0
    }

    /// Mean of the parseable, non-zero loss estimates
    pub fn average_estimated_loss(&self) -> Option<f64> {
        let amounts: Vec<f64> = self
            .estimated_losses
            .iter()
            .map(|raw| parse_estimated_loss(raw))
            .filter(|amount| *amount > 0.0)
            .collect();

        if amounts.is_empty() {
            None
        } else {
            Some(amounts.iter().sum::<f64>() / amounts.len() as f64)
        }
    }
}

fn most_common(counts: &[CategoryCount]) -> Option<&str> {
    // First maximum wins, so the existing order breaks ties
    counts
        .iter()
        .fold(None::<&CategoryCount>, |best, c| match best {
            Some(b) if b.count >= c.count => Some(b),
            _ => Some(c),
        })
        .map(|c| c.label.as_str())
}

fn severity_rank(label: &str) -> u8 {
    match label {
        "Critical" | "High" | "Medium" | "Low" => Severity::parse(label).rank(),
        _ => Severity::Unknown.rank(),
    }
}

fn confidence_rank(label: &str) -> u8 {
    match label {
        "High" | "Medium" | "Low" => Confidence::parse(label).rank(),
        _ => Confidence::Unknown.rank(),
    }
}

/// Orders severity counts Critical, High, Medium, Low, then the rest
pub fn order_by_severity(mut counts: Vec<CategoryCount>) -> Vec<CategoryCount> {
    counts.sort_by(|a, b| {
        severity_rank(&a.label)
            .cmp(&severity_rank(&b.label))
            .then_with(|| a.label.cmp(&b.label))
    });
    counts
}

/// Orders confidence counts High, Medium, Low, then the rest
pub fn order_by_confidence(mut counts: Vec<CategoryCount>) -> Vec<CategoryCount> {
    counts.sort_by(|a, b| {
        confidence_rank(&a.label)
            .cmp(&confidence_rank(&b.label))
            .then_with(|| a.label.cmp(&b.label))
    });
    counts
}
