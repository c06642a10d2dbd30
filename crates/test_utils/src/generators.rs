//! Property-Based Test Generators
//!
//! Provides proptest strategies for claim fields as a model might return
//! them: mixed casing, sentinels and loosely formatted amounts.

use proptest::prelude::*;

use domain_claims::ExtractedFields;

/// Severity labels in any casing, plus labels outside the scale
pub fn severity_label_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Low".to_string()),
        Just("medium".to_string()),
        Just("HIGH".to_string()),
        Just("Critical".to_string()),
        Just("Unknown".to_string()),
        "[a-z]{1,8}",
    ]
}

/// Confidence labels in any casing, plus labels outside the scale
pub fn confidence_label_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("low".to_string()),
        Just("Medium".to_string()),
        Just("High".to_string()),
        "[a-z]{1,8}",
    ]
}

/// Whole amounts with an optional currency symbol and thousands separators
///
/// Yields the rendered text and the amount it encodes.
pub fn estimated_loss_strategy() -> impl Strategy<Value = (String, u64)> {
    (
        prop_oneof![Just(""), Just("$"), Just("₹"), Just("€"), Just("£"), Just("Over $")],
        0u64..10_000_000u64,
        any::<bool>(),
    )
        .prop_map(|(prefix, amount, grouped)| {
            let digits = if grouped {
                group_thousands(amount)
            } else {
                amount.to_string()
            };
            (format!("{prefix}{digits}"), amount)
        })
}

fn group_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Free text fields, sometimes a sentinel, sometimes absent
pub fn optional_text_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("Not specified".to_string())),
        Just(Some("Unknown".to_string())),
        "[A-Za-z ]{1,24}".prop_map(Some),
    ]
}

/// Extracted field sets of any completeness
pub fn extracted_fields_strategy() -> impl Strategy<Value = ExtractedFields> {
    (
        optional_text_strategy(),
        proptest::option::of(severity_label_strategy()),
        optional_text_strategy(),
        proptest::option::of(estimated_loss_strategy().prop_map(|(text, _)| text)),
        optional_text_strategy(),
        optional_text_strategy(),
        proptest::option::of(confidence_label_strategy()),
        optional_text_strategy(),
    )
        .prop_map(
            |(loss_type, severity, affected_assets, estimated_loss, incident_date, location, confidence, extraction_explanation)| {
                ExtractedFields {
                    loss_type,
                    severity,
                    affected_assets,
                    estimated_loss,
                    incident_date,
                    location,
                    confidence,
                    extraction_explanation,
                }
            },
        )
}
