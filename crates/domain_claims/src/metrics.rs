//! Side-by-side metrics for a claim and its extraction

use serde::Serialize;

use crate::claim::{ClaimFields, Confidence};

/// Coarse rating of how well the extraction filled the fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StructureQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl StructureQuality {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 90.0 {
            StructureQuality::Excellent
        } else if percentage >= 70.0 {
            StructureQuality::Good
        } else if percentage >= 50.0 {
            StructureQuality::Fair
        } else {
            StructureQuality::Poor
        }
    }
}

/// Metrics comparing the raw claim text to the structured result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonMetrics {
    pub word_count: usize,
    pub char_count: usize,
    pub fields_filled: usize,
    pub total_fields: usize,
    pub completeness_percentage: f64,
    pub structure_quality: StructureQuality,
    pub confidence: Confidence,
    pub confidence_percentage: u8,
}

impl ComparisonMetrics {
    pub fn compute(claim_text: &str, fields: &ClaimFields) -> Self {
        let completeness = fields.completeness();
        let confidence = fields.confidence;

        Self {
            word_count: claim_text.split_whitespace().count(),
            char_count: claim_text.chars().count(),
            fields_filled: completeness.filled,
            total_fields: completeness.total,
            completeness_percentage: completeness.percentage,
            structure_quality: StructureQuality::from_percentage(completeness.percentage),
            confidence,
            confidence_percentage: confidence.percentage(),
        }
    }
}
