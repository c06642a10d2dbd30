//! Request handlers

pub mod claims;
pub mod highlight;
pub mod analytics;
pub mod health;
