//! Tests for core_kernel error types

use core_kernel::error::CoreError;
use core_kernel::{ClaimId, IdParseError};

#[test]
fn test_core_error_validation() {
    let error = CoreError::validation("Claim text must not be blank");

    match error {
        CoreError::Validation(msg) => assert_eq!(msg, "Claim text must not be blank"),
        _ => panic!("Expected Validation error"),
    }
}

#[test]
fn test_core_error_not_found() {
    let error = CoreError::not_found("Claim not found");

    match error {
        CoreError::NotFound(msg) => assert_eq!(msg, "Claim not found"),
        _ => panic!("Expected NotFound error"),
    }
}

#[test]
fn test_core_error_from_id_parse_error() {
    let parse_error: IdParseError = "CLM-x".parse::<ClaimId>().unwrap_err();
    let core_error: CoreError = parse_error.into();

    assert!(matches!(core_error, CoreError::Identifier(_)));
    assert!(core_error.to_string().contains("CLM-x"));
}

#[test]
fn test_core_error_configuration() {
    let error = CoreError::configuration("DATABASE_URL must be set");

    match error {
        CoreError::Configuration(msg) => assert_eq!(msg, "DATABASE_URL must be set"),
        _ => panic!("Expected Configuration error"),
    }
}
