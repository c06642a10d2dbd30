//! Core Kernel - Foundational types for the claims normalizer
//!
//! This crate provides the building blocks used by every other crate:
//! - Strongly-typed identifiers for stored claims and recommendations
//! - The shared error type for kernel-level failures
//! - Port abstractions (errors, health checks) implemented by adapters

pub mod identifiers;
pub mod ports;
pub mod error;

pub use identifiers::{ClaimId, RecommendationId, IdParseError};
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
};
pub use error::CoreError;
