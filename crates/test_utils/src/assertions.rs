//! Custom Test Assertions
//!
//! Assertion helpers that name the offending recommendation or field in
//! their failure message.

use domain_claims::highlight::MARK_CLOSE;
use domain_claims::{ExtractionReport, Recommendation};

fn actions(recommendations: &[Recommendation]) -> Vec<&str> {
    recommendations.iter().map(|r| r.action.as_str()).collect()
}

/// Asserts that a recommendation with this action is present
pub fn assert_has_action(recommendations: &[Recommendation], action: &str) {
    assert!(
        recommendations.iter().any(|r| r.action == action),
        "Expected action '{}', got {:?}",
        action,
        actions(recommendations)
    );
}

/// Asserts that no recommendation with this action is present
pub fn assert_lacks_action(recommendations: &[Recommendation], action: &str) {
    assert!(
        recommendations.iter().all(|r| r.action != action),
        "Did not expect action '{}' in {:?}",
        action,
        actions(recommendations)
    );
}

/// Asserts the completeness percentage of a report
pub fn assert_completeness(report: &ExtractionReport, expected: f64) {
    assert!(
        (report.completeness.percentage - expected).abs() < 1e-9,
        "Expected completeness {}%, got {}%",
        expected,
        report.completeness.percentage
    );
}

/// Asserts that `phrase` appears wrapped in highlight markup
pub fn assert_marked(html: &str, phrase: &str) {
    let closing = format!("{phrase}{MARK_CLOSE}");
    assert!(
        html.contains(&closing),
        "Expected '{}' to be highlighted in: {}",
        phrase,
        html
    );
}
