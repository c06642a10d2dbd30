//! Claim records and extracted fields
//!
//! The model reply is decoded into a loose JSON mapping first. [`ExtractedFields`]
//! lifts the eight known keys out of that mapping without inventing values, and
//! [`ExtractedFields::resolve`] is the single place where sentinel defaults are
//! applied.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use core_kernel::ClaimId;

use crate::validation::{completeness_score, Completeness};

/// Sentinel for categorical fields with no usable value
pub const UNKNOWN: &str = "Unknown";

/// Sentinel for descriptive fields with no usable value
pub const NOT_SPECIFIED: &str = "Not specified";

/// Damage-impact level of a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
    Unknown,
}

impl Severity {
    /// Case-insensitive match; anything outside the known set is `Unknown`
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "low" => Severity::Low,
            "medium" => Severity::Medium,
            "high" => Severity::High,
            "critical" => Severity::Critical,
            _ => Severity::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
            Severity::Unknown => UNKNOWN,
        }
    }

    /// Ordering used by reports, most severe first
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Critical => 1,
            Severity::High => 2,
            Severity::Medium => 3,
            Severity::Low => 4,
            Severity::Unknown => 5,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trust level the model reports for its own extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    Medium,
    High,
    Unknown,
}

impl Confidence {
    /// Case-insensitive match; anything outside the known set is `Unknown`
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "low" => Confidence::Low,
            "medium" => Confidence::Medium,
            "high" => Confidence::High,
            _ => Confidence::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "Low",
            Confidence::Medium => "Medium",
            Confidence::High => "High",
            Confidence::Unknown => UNKNOWN,
        }
    }

    /// Percentage shown next to the confidence level
    pub fn percentage(&self) -> u8 {
        match self {
            Confidence::Low => 40,
            Confidence::Medium => 70,
            Confidence::High => 95,
            Confidence::Unknown => 50,
        }
    }

    /// Ordering used by reports, most confident first
    pub fn rank(&self) -> u8 {
        match self {
            Confidence::High => 1,
            Confidence::Medium => 2,
            Confidence::Low => 3,
            Confidence::Unknown => 4,
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields lifted from a decoded model reply, absent values kept absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub loss_type: Option<String>,
    pub severity: Option<String>,
    pub affected_assets: Option<String>,
    pub estimated_loss: Option<String>,
    pub incident_date: Option<String>,
    pub location: Option<String>,
    pub confidence: Option<String>,
    pub extraction_explanation: Option<String>,
}

impl ExtractedFields {
    /// Builds the typed view of a decoded mapping
    ///
    /// Strings are kept verbatim, numbers and booleans are rendered as text,
    /// and `null` counts as absent. Unknown keys are ignored.
    pub fn from_mapping(mapping: &Map<String, Value>) -> Self {
        let text = |key: &str| mapping.get(key).and_then(value_text);

        Self {
            loss_type: text("loss_type"),
            severity: text("severity"),
            affected_assets: text("affected_assets"),
            estimated_loss: text("estimated_loss"),
            incident_date: text("incident_date"),
            location: text("location"),
            confidence: text("confidence"),
            extraction_explanation: text("extraction_explanation"),
        }
    }

    /// Mapping of the fields that are present
    pub fn to_mapping(&self) -> Map<String, Value> {
        let mut mapping = Map::new();
        for (key, value) in self.entries() {
            if let Some(value) = value {
                mapping.insert(key.to_string(), Value::String(value.clone()));
            }
        }
        mapping
    }

    /// Applies sentinel defaults and normalizes the categorical fields
    pub fn resolve(&self) -> ClaimFields {
        let or = |value: &Option<String>, default: &str| {
            value.clone().unwrap_or_else(|| default.to_string())
        };

        ClaimFields {
            loss_type: or(&self.loss_type, UNKNOWN),
            severity: self
                .severity
                .as_deref()
                .map(Severity::parse)
                .unwrap_or(Severity::Unknown),
            affected_assets: or(&self.affected_assets, NOT_SPECIFIED),
            estimated_loss: or(&self.estimated_loss, NOT_SPECIFIED),
            incident_date: or(&self.incident_date, NOT_SPECIFIED),
            location: or(&self.location, NOT_SPECIFIED),
            confidence: self
                .confidence
                .as_deref()
                .map(Confidence::parse)
                .unwrap_or(Confidence::Unknown),
            extraction_explanation: or(&self.extraction_explanation, ""),
        }
    }

    fn entries(&self) -> [(&'static str, &Option<String>); 8] {
        [
            ("loss_type", &self.loss_type),
            ("severity", &self.severity),
            ("affected_assets", &self.affected_assets),
            ("estimated_loss", &self.estimated_loss),
            ("incident_date", &self.incident_date),
            ("location", &self.location),
            ("confidence", &self.confidence),
            ("extraction_explanation", &self.extraction_explanation),
        ]
    }
}

impl From<&ClaimFields> for ExtractedFields {
    fn from(fields: &ClaimFields) -> Self {
        Self {
            loss_type: Some(fields.loss_type.clone()),
            severity: Some(fields.severity.to_string()),
            affected_assets: Some(fields.affected_assets.clone()),
            estimated_loss: Some(fields.estimated_loss.clone()),
            incident_date: Some(fields.incident_date.clone()),
            location: Some(fields.location.clone()),
            confidence: Some(fields.confidence.to_string()),
            extraction_explanation: Some(fields.extraction_explanation.clone()),
        }
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Fully resolved claim fields, every sentinel applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimFields {
    pub loss_type: String,
    pub severity: Severity,
    pub affected_assets: String,
    pub estimated_loss: String,
    pub incident_date: String,
    pub location: String,
    pub confidence: Confidence,
    pub extraction_explanation: String,
}

impl Default for ClaimFields {
    fn default() -> Self {
        ExtractedFields::default().resolve()
    }
}

impl ClaimFields {
    /// The eight fields as a JSON mapping
    pub fn to_mapping(&self) -> Map<String, Value> {
        ExtractedFields::from(self).to_mapping()
    }

    /// Completeness as stored: a label outside the scale counts as unfilled
    pub fn completeness(&self) -> Completeness {
        completeness_score(&self.to_mapping())
    }
}

/// A processed claim as persisted by the history store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    /// Store-assigned identifier
    pub id: ClaimId,
    /// Creation time, assigned by the store
    pub timestamp: DateTime<Utc>,
    /// Original free-text description
    pub claim_text: String,
    #[serde(flatten)]
    pub fields: ClaimFields,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mapping(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_severity_parse_is_case_insensitive() {
        assert_eq!(Severity::parse("CRITICAL"), Severity::Critical);
        assert_eq!(Severity::parse(" medium "), Severity::Medium);
        assert_eq!(Severity::parse("severe"), Severity::Unknown);
    }

    #[test]
    fn test_confidence_percentage() {
        assert_eq!(Confidence::parse("high").percentage(), 95);
        assert_eq!(Confidence::parse("Low").percentage(), 40);
        assert_eq!(Confidence::parse("").percentage(), 50);
    }

    #[test]
    fn test_from_mapping_renders_scalars() {
        let fields = ExtractedFields::from_mapping(&mapping(json!({
            "loss_type": "Fire",
            "estimated_loss": 5000,
            "location": null,
            "confidence": true,
            "extra": "ignored"
        })));

        assert_eq!(fields.loss_type.as_deref(), Some("Fire"));
        assert_eq!(fields.estimated_loss.as_deref(), Some("5000"));
        assert_eq!(fields.location, None);
        assert_eq!(fields.confidence.as_deref(), Some("true"));
    }

    #[test]
    fn test_resolve_applies_sentinels() {
        let resolved = ExtractedFields::default().resolve();

        assert_eq!(resolved.loss_type, "Unknown");
        assert_eq!(resolved.severity, Severity::Unknown);
        assert_eq!(resolved.affected_assets, "Not specified");
        assert_eq!(resolved.estimated_loss, "Not specified");
        assert_eq!(resolved.incident_date, "Not specified");
        assert_eq!(resolved.location, "Not specified");
        assert_eq!(resolved.confidence, Confidence::Unknown);
        assert_eq!(resolved.extraction_explanation, "");
    }

    #[test]
    fn test_to_mapping_skips_absent() {
        let fields = ExtractedFields {
            severity: Some("High".to_string()),
            ..Default::default()
        };
        let map = fields.to_mapping();
        assert_eq!(map.len(), 1);
        assert_eq!(map["severity"], json!("High"));
    }

    #[test]
    fn test_record_serializes_flat() {
        let record = ClaimRecord {
            id: ClaimId::new(3),
            timestamp: Utc::now(),
            claim_text: "Hail damage".to_string(),
            fields: ClaimFields::default(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], json!(3));
        assert_eq!(value["severity"], json!("Unknown"));
        assert_eq!(value["claim_text"], json!("Hail damage"));
    }

    #[test]
    fn test_off_scale_severity_is_unfilled() {
        let fields = ExtractedFields {
            loss_type: Some("Storm".to_string()),
            severity: Some("Severe".to_string()),
            ..Default::default()
        }
        .resolve();
        assert_eq!(fields.completeness().filled, 1);
    }
}
