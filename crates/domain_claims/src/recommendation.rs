//! Recommended next actions for a claim

use std::fmt;

use serde::{Deserialize, Serialize};

/// Urgency of a recommended action
///
/// Variants are declared in display order, so the derived `Ord` sorts the
/// most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Numeric rank, 1 being the most urgent
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Critical => 1,
            Priority::High => 2,
            Priority::Medium => 3,
            Priority::Low => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "Critical",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// Case-insensitive parse of a stored priority
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "critical" => Some(Priority::Critical),
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category tags used by the built-in rules
pub mod category {
    pub const VERIFICATION: &str = "Verification";
    pub const COMMUNICATION: &str = "Communication";
    pub const PROCESSING: &str = "Processing";
    pub const DOCUMENTATION: &str = "Documentation";
    pub const ADMINISTRATIVE: &str = "Administrative";
}

/// A suggested action for claims-processing staff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: String,
    pub priority: Priority,
    pub category: String,
    /// Display glyph, ignored by all logic
    pub icon: String,
    pub reasoning: String,
}

impl Recommendation {
    pub fn new(
        action: impl Into<String>,
        priority: Priority,
        category: impl Into<String>,
        icon: impl Into<String>,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            action: action.into(),
            priority,
            category: category.into(),
            icon: icon.into(),
            reasoning: reasoning.into(),
        }
    }
}

/// Recommendations ordered by priority, ties kept in generation order
pub fn sort_for_display(recommendations: &[Recommendation]) -> Vec<Recommendation> {
    let mut sorted = recommendations.to_vec();
    sorted.sort_by_key(|r| r.priority);
    sorted
}
