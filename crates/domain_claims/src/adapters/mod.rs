//! External Adapters for the Claims Domain
//!
//! # Available Adapters
//!
//! - **GeminiExtractor**: calls the Gemini `generateContent` REST endpoint
//! - **StaticExtractor** / **InMemoryHistoryStore**: test doubles, re-exported
//!   from the ports module behind the `mock` feature
//!
//! ```rust,ignore
//! use domain_claims::adapters::{GeminiConfig, GeminiExtractor};
//!
//! let config = GeminiConfig::new(api_key).model("gemini-2.0-flash-exp");
//! let extractor: Arc<dyn ClaimExtractor> = Arc::new(GeminiExtractor::new(config)?);
//! ```

pub mod gemini;

pub use gemini::{GeminiConfig, GeminiExtractor};

#[cfg(any(test, feature = "mock"))]
pub use crate::ports::mock::{InMemoryHistoryStore, StaticExtractor};
