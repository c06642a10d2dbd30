//! Recommendation rules
//!
//! Rules are an ordered table of `(predicate, builder)` entries evaluated
//! against a lowercased view of the claim fields. Every rule fires
//! independently except the members of [`RuleGroup::SeverityBranch`], where
//! only the first matching member contributes. Output keeps table order;
//! sorting for display is [`crate::recommendation::sort_for_display`].

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::claim::{ExtractedFields, NOT_SPECIFIED, UNKNOWN};
use crate::recommendation::{category, Priority, Recommendation};

static LOSS_NOISE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[$₹€£¥]|\b(?:over|around|approximately)\b")
        .expect("loss noise pattern is valid")
});

static DECIMAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+(?:\.[0-9]+)?").expect("decimal pattern is valid"));

/// Loss above which a supervisor has to sign off
pub const SUPERVISOR_THRESHOLD: f64 = 50_000.0;

/// Loss below which a low-severity, high-confidence claim is fast-tracked
pub const FAST_TRACK_LIMIT: f64 = 10_000.0;

/// Parses a free-text loss estimate such as "Over $200,000"
///
/// Returns 0 for sentinels, blank text or text without a number.
pub fn parse_estimated_loss(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty()
        || matches!(
            trimmed.to_lowercase().as_str(),
            "not specified" | "unknown" | "n/a"
        )
    {
        return 0.0;
    }

    let cleaned = LOSS_NOISE.replace_all(trimmed, "").replace(',', "");
    DECIMAL
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Formats an amount with thousands separators and two decimals
pub fn format_amount(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}

/// Lowercased facts the rules are evaluated against
#[derive(Debug, Clone, PartialEq)]
pub struct RuleContext {
    pub loss_type: String,
    pub severity: String,
    pub confidence: String,
    pub incident_date: String,
    pub location: String,
    pub estimated_loss: f64,
}

impl RuleContext {
    /// Missing fields resolve to their sentinels before lowercasing
    pub fn from_fields(fields: &ExtractedFields) -> Self {
        let text = |value: &Option<String>, default: &str| {
            value.as_deref().unwrap_or(default).trim().to_lowercase()
        };

        Self {
            loss_type: text(&fields.loss_type, UNKNOWN),
            severity: text(&fields.severity, UNKNOWN),
            confidence: text(&fields.confidence, UNKNOWN),
            incident_date: text(&fields.incident_date, NOT_SPECIFIED),
            location: text(&fields.location, NOT_SPECIFIED),
            estimated_loss: parse_estimated_loss(
                fields.estimated_loss.as_deref().unwrap_or(NOT_SPECIFIED),
            ),
        }
    }

    fn date_missing(&self) -> bool {
        is_sentinel(&self.incident_date)
    }

    fn location_missing(&self) -> bool {
        is_sentinel(&self.location)
    }

    fn loss_missing(&self) -> bool {
        self.estimated_loss == 0.0
    }
}

fn is_sentinel(value: &str) -> bool {
    matches!(value, "not specified" | "unknown")
}

/// How a rule interacts with the rest of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleGroup {
    /// Fires whenever its predicate holds
    Independent,
    /// Only the first matching member of the branch fires
    SeverityBranch,
}

/// One entry of the rule table
pub struct Rule {
    pub name: &'static str,
    pub group: RuleGroup,
    applies: fn(&RuleContext) -> bool,
    build: fn(&RuleContext) -> Vec<Recommendation>,
}

impl Rule {
    pub fn applies(&self, context: &RuleContext) -> bool {
        (self.applies)(context)
    }

    pub fn build(&self, context: &RuleContext) -> Vec<Recommendation> {
        (self.build)(context)
    }
}

/// Built-in rules in evaluation order
pub static RULES: &[Rule] = &[
    Rule {
        name: "low_confidence",
        group: RuleGroup::Independent,
        applies: |c| c.confidence == "low",
        build: |_| {
            vec![
                Recommendation::new(
                    "Request Additional Documentation",
                    Priority::High,
                    category::VERIFICATION,
                    "📄",
                    "Extraction confidence is low; supporting documents are needed to confirm the details",
                ),
                Recommendation::new(
                    "Contact Customer for Details",
                    Priority::High,
                    category::COMMUNICATION,
                    "📞",
                    "The description is ambiguous; a call can clarify what happened",
                ),
            ]
        },
    },
    Rule {
        name: "fast_track",
        group: RuleGroup::SeverityBranch,
        applies: |c| {
            c.severity == "low" && c.confidence == "high" && c.estimated_loss < FAST_TRACK_LIMIT
        },
        build: |_| {
            vec![
                Recommendation::new(
                    "Fast-track Approval",
                    Priority::High,
                    category::PROCESSING,
                    "⚡",
                    "Low severity, high confidence and a small loss qualify for expedited handling",
                ),
                Recommendation::new(
                    "Simple Phone Verification",
                    Priority::Medium,
                    category::VERIFICATION,
                    "☎️",
                    "A short confirmation call is enough for a claim of this size",
                ),
            ]
        },
    },
    Rule {
        name: "medium_severity",
        group: RuleGroup::SeverityBranch,
        applies: |c| c.severity == "medium",
        build: |_| {
            vec![
                Recommendation::new(
                    "Standard Review Process",
                    Priority::Medium,
                    category::PROCESSING,
                    "📋",
                    "Medium severity claims follow the standard review workflow",
                ),
                Recommendation::new(
                    "Request Photos/Documentation",
                    Priority::Medium,
                    category::DOCUMENTATION,
                    "📸",
                    "Photos of the damage support the loss assessment",
                ),
                Recommendation::new(
                    "Schedule Assessment Within 5 Days",
                    Priority::Medium,
                    category::ADMINISTRATIVE,
                    "📅",
                    "A timely assessment keeps the claim within service targets",
                ),
            ]
        },
    },
    Rule {
        name: "high_severity",
        group: RuleGroup::SeverityBranch,
        applies: |c| matches!(c.severity.as_str(), "high" | "critical"),
        build: |_| {
            vec![
                Recommendation::new(
                    "Detailed Investigation Required",
                    Priority::Critical,
                    category::PROCESSING,
                    "🔍",
                    "High severity losses need a full investigation before settlement",
                ),
                Recommendation::new(
                    "Assign Senior Adjuster",
                    Priority::High,
                    category::ADMINISTRATIVE,
                    "👤",
                    "Complex claims should be handled by an experienced adjuster",
                ),
                Recommendation::new(
                    "Schedule On-site Inspection",
                    Priority::Critical,
                    category::VERIFICATION,
                    "🏠",
                    "The extent of the damage has to be verified in person",
                ),
            ]
        },
    },
    Rule {
        name: "large_loss",
        group: RuleGroup::Independent,
        applies: |c| c.estimated_loss > SUPERVISOR_THRESHOLD,
        build: |c| {
            vec![
                Recommendation::new(
                    "Supervisor Approval Required",
                    Priority::Critical,
                    category::ADMINISTRATIVE,
                    "✍️",
                    format!(
                        "Estimated loss of {} exceeds the {} approval threshold",
                        format_amount(c.estimated_loss),
                        format_amount(SUPERVISOR_THRESHOLD),
                    ),
                ),
                Recommendation::new(
                    "Request Independent Assessment",
                    Priority::High,
                    category::VERIFICATION,
                    "⚖️",
                    "Large losses warrant a second, independent valuation",
                ),
            ]
        },
    },
    Rule {
        name: "theft",
        group: RuleGroup::Independent,
        applies: |c| c.loss_type.contains("theft"),
        build: |_| {
            vec![Recommendation::new(
                "Verify Police Report",
                Priority::Critical,
                category::VERIFICATION,
                "🚔",
                "Theft claims require a filed police report",
            )]
        },
    },
    Rule {
        name: "fire",
        group: RuleGroup::Independent,
        applies: |c| c.loss_type.contains("fire"),
        build: |_| {
            vec![Recommendation::new(
                "Request Fire Department Report",
                Priority::High,
                category::DOCUMENTATION,
                "🚒",
                "The fire department report establishes cause and extent of the fire",
            )]
        },
    },
    Rule {
        name: "water",
        group: RuleGroup::Independent,
        applies: |c| c.loss_type.contains("flood") || c.loss_type.contains("water"),
        build: |_| {
            vec![Recommendation::new(
                "Verify Weather Records",
                Priority::Medium,
                category::VERIFICATION,
                "🌧️",
                "Weather data confirms whether flooding or storms occurred on the reported date",
            )]
        },
    },
    Rule {
        name: "accident",
        group: RuleGroup::Independent,
        applies: |c| c.loss_type.contains("accident") || c.loss_type.contains("collision"),
        build: |_| {
            vec![Recommendation::new(
                "Request Accident Report",
                Priority::High,
                category::DOCUMENTATION,
                "🚗",
                "An official accident report documents fault and the parties involved",
            )]
        },
    },
    Rule {
        name: "missing_information",
        group: RuleGroup::Independent,
        applies: |c| c.date_missing() || c.location_missing() || c.loss_missing(),
        build: |c| {
            let mut missing = Vec::new();
            if c.date_missing() {
                missing.push("incident date");
            }
            if c.location_missing() {
                missing.push("location");
            }
            if c.loss_missing() {
                missing.push("cost estimate");
            }
            vec![Recommendation::new(
                "Collect Missing Information",
                Priority::High,
                category::DOCUMENTATION,
                "❓",
                format!("Missing: {}", missing.join(", ")),
            )]
        },
    },
    Rule {
        name: "recent_incident",
        group: RuleGroup::Independent,
        applies: |c| c.incident_date.contains("today") || c.incident_date.contains("yesterday"),
        build: |_| {
            vec![Recommendation::new(
                "Priority Processing",
                Priority::High,
                category::PROCESSING,
                "⏰",
                "The incident is recent; early action preserves evidence",
            )]
        },
    },
];

fn standard_processing() -> Recommendation {
    Recommendation::new(
        "Standard Claim Processing",
        Priority::Medium,
        category::PROCESSING,
        "✅",
        "No special handling indicated; process through the normal workflow",
    )
}

/// Evaluates the rule table against claim fields
#[derive(Clone, Copy)]
pub struct RecommendationEngine {
    rules: &'static [Rule],
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RecommendationEngine {
    pub fn new() -> Self {
        Self { rules: RULES }
    }

    pub fn rules(&self) -> &'static [Rule] {
        self.rules
    }

    /// Recommendations in rule order; never empty
    pub fn generate(&self, fields: &ExtractedFields) -> Vec<Recommendation> {
        let context = RuleContext::from_fields(fields);
        let mut recommendations = Vec::new();
        let mut branch_taken = false;

        for rule in self.rules {
            if rule.group == RuleGroup::SeverityBranch && branch_taken {
                continue;
            }
            if !rule.applies(&context) {
                continue;
            }
            if rule.group == RuleGroup::SeverityBranch {
                branch_taken = true;
            }
            debug!(rule = rule.name, "Recommendation rule fired");
            recommendations.extend(rule.build(&context));
        }

        if recommendations.is_empty() {
            recommendations.push(standard_processing());
        }
        recommendations
    }
}
