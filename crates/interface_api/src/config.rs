//! API configuration
//!
//! Read once at startup from environment variables. A `.env` file is loaded
//! by the server binary before [`ApiConfig::from_env`] runs.

use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use domain_claims::adapters::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use domain_claims::adapters::GeminiConfig;
use infra_db::{DatabaseBackend, DatabaseConfig, DatabaseError};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log filter directive, overridden by `RUST_LOG`
    pub log_level: String,
    pub log_format: LogFormat,
    /// `sqlite` or `postgresql`
    pub database_type: String,
    pub database_url: String,
    pub database_max_connections: u32,
    pub database_statement_timeout_secs: u64,
    /// Required for extraction
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub gemini_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            database_type: "sqlite".to_string(),
            database_url: "sqlite://claims_history.db".to_string(),
            database_max_connections: 10,
            database_statement_timeout_secs: 5,
            gemini_api_key: String::new(),
            gemini_model: DEFAULT_MODEL.to_string(),
            gemini_base_url: DEFAULT_BASE_URL.to_string(),
            gemini_timeout_secs: 60,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_source(config::Environment::default().try_parsing(true))
    }

    /// Loads configuration from an explicit environment source
    pub fn from_source(source: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Builds the persistence configuration
    pub fn database_config(&self) -> Result<DatabaseConfig, DatabaseError> {
        let backend = DatabaseBackend::from_str(&self.database_type)?;
        Ok(DatabaseConfig::new(backend, self.database_url.clone())
            .max_connections(self.database_max_connections)
            .statement_timeout(Duration::from_secs(self.database_statement_timeout_secs)))
    }

    /// Builds the extraction model configuration
    pub fn gemini_config(&self) -> GeminiConfig {
        GeminiConfig::new(self.gemini_api_key.clone())
            .model(self.gemini_model.clone())
            .base_url(self.gemini_base_url.clone())
            .timeout_secs(self.gemini_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> ApiConfig {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_source(config::Environment::default().try_parsing(true).source(Some(source)))
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]);
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.database_statement_timeout_secs, 5);
        assert_eq!(config.gemini_model, "gemini-2.0-flash-exp");
    }

    #[test]
    fn test_environment_overrides() {
        let config = load(&[
            ("PORT", "9090"),
            ("LOG_FORMAT", "json"),
            ("DATABASE_TYPE", "postgresql"),
            ("DATABASE_URL", "postgres://claims@localhost/claims"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
        ]);
        assert_eq!(config.port, 9090);
        assert_eq!(config.log_format, LogFormat::Json);

        let db = config.database_config().unwrap();
        assert_eq!(db.backend, DatabaseBackend::Postgres);
        assert_eq!(db.max_connections, 4);
    }

    #[test]
    fn test_unknown_database_type_rejected() {
        let config = load(&[("DATABASE_TYPE", "oracle")]);
        assert!(config.database_config().is_err());
    }

    #[test]
    fn test_gemini_config() {
        let config = load(&[("GEMINI_API_KEY", "secret"), ("GEMINI_TIMEOUT_SECS", "15")]);
        let gemini = config.gemini_config();
        assert_eq!(gemini.api_key, "secret");
        assert_eq!(gemini.timeout_secs, 15);
    }
}
