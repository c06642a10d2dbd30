//! Claims DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::ClaimId;
use domain_claims::{ClaimRecord, Completeness, HistoryQuery, Highlights, Recommendation};

#[derive(Debug, Deserialize, Validate)]
pub struct ExtractClaimRequest {
    #[validate(length(max = 50000, message = "claim text is too long"))]
    pub claim_text: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct ListClaimsParams {
    pub keyword: Option<String>,
    pub severity: Option<String>,
    #[validate(range(min = 1, max = 10000))]
    pub limit: Option<u32>,
}

impl ListClaimsParams {
    pub fn to_query(&self) -> HistoryQuery {
        let mut query = HistoryQuery::new();
        if let Some(ref keyword) = self.keyword {
            query = query.keyword(keyword.as_str());
        }
        if let Some(ref severity) = self.severity {
            query = query.severity(severity.as_str());
        }
        if let Some(limit) = self.limit {
            query = query.limit(limit);
        }
        query
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct HighlightRequest {
    #[validate(length(max = 50000))]
    pub text: String,
    #[serde(default)]
    #[validate(length(max = 50000))]
    pub explanation: String,
}

/// A stored claim with its derived views
#[derive(Debug, Serialize)]
pub struct ClaimDetailResponse {
    #[serde(flatten)]
    pub record: ClaimRecord,
    pub completeness: Completeness,
    pub highlights: Highlights,
    pub has_recommendations: bool,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub claim_id: ClaimId,
    /// Critical first
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Serialize)]
pub struct DeleteClaimResponse {
    pub deleted: bool,
}

#[derive(Debug, Serialize)]
pub struct ClearHistoryResponse {
    pub deleted: u64,
}
