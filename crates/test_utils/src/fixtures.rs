//! Pre-built Test Fixtures
//!
//! Claim descriptions and matching model replies. The worked examples from
//! the extraction prompt double as known-good input/output pairs.

use domain_claims::prompt::FEW_SHOT_EXAMPLES;
use domain_claims::validation::REQUIRED_FIELDS;
use domain_claims::ExtractedFields;
use serde_json::{Map, Value};

/// Fixture for claim descriptions
pub struct ClaimTextFixtures;

impl ClaimTextFixtures {
    /// Minor bumper scrape with a rupee estimate
    pub fn minor_accident() -> &'static str {
        FEW_SHOT_EXAMPLES[0].input
    }

    /// Flooded vehicle, no cost given
    pub fn flooded_vehicle() -> &'static str {
        FEW_SHOT_EXAMPLES[1].input
    }

    /// Kitchen fire with a dollar estimate
    pub fn kitchen_fire() -> &'static str {
        FEW_SHOT_EXAMPLES[2].input
    }

    /// Ceiling leak, vague date
    pub fn water_leak() -> &'static str {
        FEW_SHOT_EXAMPLES[3].input
    }

    /// Large loss that needs supervisor sign-off
    pub fn warehouse_fire() -> &'static str {
        "Warehouse fire destroyed inventory worth $250,000 on March 3rd at the Riverside depot."
    }
}

/// Fixture for raw model replies
pub struct ReplyFixtures;

impl ReplyFixtures {
    /// The worked example's expected output as a bare JSON object
    pub fn example(index: usize) -> String {
        FEW_SHOT_EXAMPLES[index % FEW_SHOT_EXAMPLES.len()].output_json()
    }

    /// The worked example's output wrapped in a ```json fence
    pub fn fenced_example(index: usize) -> String {
        format!("```json\n{}\n```", Self::example(index))
    }

    /// Reply for [`ClaimTextFixtures::warehouse_fire`]
    pub fn warehouse_fire() -> String {
        crate::builders::FieldsBuilder::new()
            .loss_type("Fire")
            .severity("Critical")
            .affected_assets("Inventory")
            .estimated_loss("$250,000")
            .incident_date("March 3rd")
            .location("Riverside depot")
            .confidence("High")
            .explanation("Classified as 'Fire' since the 'Warehouse fire destroyed inventory'")
            .to_reply()
    }

    /// Valid JSON carrying only two of the eight fields
    pub fn partial() -> &'static str {
        r#"{"loss_type": "Theft", "severity": "Low"}"#
    }

    /// Prose instead of JSON
    pub fn not_json() -> &'static str {
        "I'm sorry, I cannot help with that request."
    }
}

/// Fixture for decoded field sets
pub struct FieldFixtures;

impl FieldFixtures {
    /// The worked example's expected output as typed fields
    pub fn example(index: usize) -> ExtractedFields {
        let example = &FEW_SHOT_EXAMPLES[index % FEW_SHOT_EXAMPLES.len()];
        let mapping: Map<String, Value> = REQUIRED_FIELDS
            .iter()
            .zip(example.output.iter())
            .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
            .collect();
        ExtractedFields::from_mapping(&mapping)
    }
}
