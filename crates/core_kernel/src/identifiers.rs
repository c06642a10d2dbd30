//! Strongly-typed identifiers for stored entities
//!
//! Identifiers are assigned by the history store on insert (an auto-increment
//! key in both supported databases). Wrapping the raw integer in a newtype
//! keeps claim ids and recommendation ids from being mixed up.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when an identifier cannot be parsed from text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {kind} identifier: '{input}'")]
pub struct IdParseError {
    pub kind: &'static str,
    pub input: String,
}

macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a store-assigned key
            pub fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw key
            pub fn value(&self) -> i64 {
                self.0
            }

            /// Returns the identifier prefix for display
            pub fn prefix() -> &'static str {
                $prefix
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                // Strip prefix if present
                let raw = s.strip_prefix(concat!($prefix, "-")).unwrap_or(s);
                raw.trim()
                    .parse::<i64>()
                    .map(Self)
                    .map_err(|_| IdParseError {
                        kind: $prefix,
                        input: s.to_string(),
                    })
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> i64 {
                id.0
            }
        }
    };
}

define_id!(ClaimId, "CLM");
define_id!(RecommendationId, "REC");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_id_display() {
        let id = ClaimId::new(42);
        assert_eq!(id.to_string(), "CLM-42");
    }

    #[test]
    fn test_id_parsing() {
        let original = ClaimId::new(7);
        let parsed: ClaimId = original.to_string().parse().unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_raw_conversion() {
        let id = RecommendationId::from(99);
        let back: i64 = id.into();
        assert_eq!(back, 99);
    }
}
