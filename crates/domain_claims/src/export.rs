//! JSON export
//!
//! Exports are pretty-printed UTF-8; non-ASCII text such as currency symbols
//! is written as-is rather than escaped.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::claim::{ClaimFields, ClaimRecord};
use crate::error::ClaimError;

/// Upper bound on records in a whole-history export
pub const HISTORY_EXPORT_LIMIT: u32 = 10_000;

pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ClaimError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// A decoded extraction mapping, as returned by the model
pub fn export_mapping(mapping: &Map<String, Value>) -> Result<String, ClaimError> {
    to_pretty_json(mapping)
}

/// The eight resolved fields of a stored claim
pub fn export_fields(fields: &ClaimFields) -> Result<String, ClaimError> {
    to_pretty_json(&fields.to_mapping())
}

/// Whole-history document, records in the order given
pub fn export_history(records: &[ClaimRecord]) -> Result<String, ClaimError> {
    to_pretty_json(records)
}

/// Download file name, e.g. `claim_extraction_20261018_093000.json`
pub fn export_file_name(prefix: &str, at: DateTime<Utc>) -> String {
    format!("{prefix}_{}.json", at.format("%Y%m%d_%H%M%S"))
}
