//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! claims normalizer test suite.
//!
//! # Modules
//!
//! - `fixtures`: Claim texts and model replies
//! - `builders`: Builders for extracted fields and model replies
//! - `database`: In-memory SQLite and containerised PostgreSQL stores
//! - `assertions`: Assertion helpers for reports and recommendations
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
