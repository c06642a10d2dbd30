//! Analytics DTOs

use serde::Serialize;

use domain_claims::AnalyticsSnapshot;

/// Snapshot plus the figures derived from it
#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub most_common_severity: Option<String>,
    pub most_common_loss_type: Option<String>,
    /// Percent of claims with high confidence
    pub high_confidence_share: f64,
    pub average_estimated_loss: Option<f64>,
    #[serde(flatten)]
    pub snapshot: AnalyticsSnapshot,
}

impl From<AnalyticsSnapshot> for AnalyticsResponse {
    fn from(snapshot: AnalyticsSnapshot) -> Self {
        Self {
            most_common_severity: snapshot.most_common_severity().map(str::to_string),
            most_common_loss_type: snapshot.most_common_loss_type().map(str::to_string),
            high_confidence_share: snapshot.high_confidence_share(),
            average_estimated_loss: snapshot.average_estimated_loss(),
            snapshot,
        }
    }
}
