//! Required-field validation and completeness scoring

use serde::Serialize;
use serde_json::{Map, Value};

/// Fields every extraction must carry, in reporting order
pub const REQUIRED_FIELDS: [&str; 8] = [
    "loss_type",
    "severity",
    "affected_assets",
    "estimated_loss",
    "incident_date",
    "location",
    "confidence",
    "extraction_explanation",
];

/// Placeholder values that count as "no data"
pub const SENTINEL_VALUES: [&str; 4] = ["Unknown", "Not specified", "N/A", ""];

/// Outcome of the required-field check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub is_complete: bool,
    pub missing: Vec<&'static str>,
}

impl ValidationReport {
    /// Warning text for an incomplete mapping
    pub fn warning(&self) -> Option<String> {
        if self.is_complete {
            None
        } else {
            Some(format!("Some fields are missing: {}", self.missing.join(", ")))
        }
    }
}

/// Checks that every required key is present
///
/// Sentinel values still count as present.
pub fn validate_fields(mapping: &Map<String, Value>) -> ValidationReport {
    let missing: Vec<&'static str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| !mapping.contains_key(*field))
        .collect();

    ValidationReport {
        is_complete: missing.is_empty(),
        missing,
    }
}

/// How many required fields carry real data
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Completeness {
    pub filled: usize,
    pub total: usize,
    pub percentage: f64,
}

/// Scores the mapping by the share of meaningfully filled fields
pub fn completeness_score(mapping: &Map<String, Value>) -> Completeness {
    let filled = REQUIRED_FIELDS
        .iter()
        .filter(|field| mapping.get(**field).is_some_and(is_meaningful))
        .count();
    let total = REQUIRED_FIELDS.len();

    Completeness {
        filled,
        total,
        percentage: filled as f64 / total as f64 * 100.0,
    }
}

/// Whether a value carries data beyond a sentinel placeholder
pub fn is_meaningful(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !SENTINEL_VALUES.contains(&s.as_str()),
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mapping(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_empty_mapping_misses_everything() {
        let report = validate_fields(&Map::new());
        assert!(!report.is_complete);
        assert_eq!(report.missing, REQUIRED_FIELDS.to_vec());
    }

    #[test]
    fn test_sentinels_count_as_present() {
        let mut map = Map::new();
        for field in REQUIRED_FIELDS {
            map.insert(field.to_string(), json!("Unknown"));
        }
        let report = validate_fields(&map);
        assert!(report.is_complete);
        assert!(report.warning().is_none());
    }

    #[test]
    fn test_warning_lists_missing() {
        let report = validate_fields(&mapping(json!({
            "loss_type": "Fire",
            "severity": "High",
            "affected_assets": "House",
            "estimated_loss": "$1",
            "incident_date": "today",
            "location": "Pune"
        })));
        assert_eq!(
            report.warning().as_deref(),
            Some("Some fields are missing: confidence, extraction_explanation")
        );
    }

    #[test]
    fn test_half_filled_scores_fifty() {
        let score = completeness_score(&mapping(json!({
            "loss_type": "Theft",
            "severity": "High",
            "affected_assets": "Laptop",
            "estimated_loss": "$2,000",
            "incident_date": "Not specified",
            "location": "Unknown",
            "confidence": "N/A",
            "extraction_explanation": ""
        })));
        assert_eq!(score.filled, 4);
        assert_eq!(score.percentage, 50.0);
    }

    #[test]
    fn test_sentinels_are_case_sensitive() {
        assert!(is_meaningful(&json!("unknown")));
        assert!(!is_meaningful(&json!("Unknown")));
    }

    #[test]
    fn test_non_string_truthiness() {
        assert!(is_meaningful(&json!(1500)));
        assert!(!is_meaningful(&json!(0)));
        assert!(!is_meaningful(&json!(false)));
        assert!(!is_meaningful(&Value::Null));
        assert!(is_meaningful(&json!(["car"])));
        assert!(!is_meaningful(&json!({})));
    }
}
