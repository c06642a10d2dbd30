//! Unit tests for the identifiers module
//!
//! Tests cover creation, parsing, conversion, and display formatting.

use core_kernel::{ClaimId, RecommendationId, IdParseError};

mod claim_id_tests {
    use super::*;

    #[test]
    fn test_value_round_trip() {
        let id = ClaimId::new(17);
        assert_eq!(id.value(), 17);
    }

    #[test]
    fn test_prefix() {
        assert_eq!(ClaimId::prefix(), "CLM");
    }

    #[test]
    fn test_display_format() {
        assert_eq!(ClaimId::new(5).to_string(), "CLM-5");
    }

    #[test]
    fn test_from_str_with_prefix() {
        let parsed: ClaimId = "CLM-123".parse().unwrap();
        assert_eq!(parsed, ClaimId::new(123));
    }

    #[test]
    fn test_from_str_without_prefix() {
        let parsed: ClaimId = "88".parse().unwrap();
        assert_eq!(parsed.value(), 88);
    }

    #[test]
    fn test_from_str_rejects_garbage() {
        let result: Result<ClaimId, IdParseError> = "CLM-abc".parse();
        let err = result.unwrap_err();
        assert_eq!(err.kind, "CLM");
        assert_eq!(err.input, "CLM-abc");
    }

    #[test]
    fn test_from_str_rejects_foreign_prefix() {
        assert!("REC-1".parse::<ClaimId>().is_err());
    }

    #[test]
    fn test_ordering_follows_key() {
        assert!(ClaimId::new(1) < ClaimId::new(2));
    }

    #[test]
    fn test_serde_is_transparent() {
        let json = serde_json::to_string(&ClaimId::new(9)).unwrap();
        assert_eq!(json, "9");
        let back: ClaimId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ClaimId::new(9));
    }
}

mod recommendation_id_tests {
    use super::*;

    #[test]
    fn test_display_format() {
        assert_eq!(RecommendationId::new(3).to_string(), "REC-3");
    }

    #[test]
    fn test_conversion() {
        let id: RecommendationId = 41.into();
        let raw: i64 = id.into();
        assert_eq!(raw, 41);
    }
}

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn display_then_parse_is_identity(raw in any::<i64>()) {
            let id = ClaimId::new(raw);
            let parsed: ClaimId = id.to_string().parse().unwrap();
            prop_assert_eq!(parsed, id);
        }
    }
}
