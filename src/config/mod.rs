//! Application configuration module
//!
//! Configuration is read from environment variables (and a `.env` file when
//! present) with the `CHORAL_MARKET` prefix. Nested values use a double
//! underscore: `CHORAL_MARKET__DATABASE__URL`, `CHORAL_MARKET__RECOMMENDATION__DEFAULT_LIMIT`.
//!
//! # Example
//!
//! ```no_run
//! use choral_marketplace::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod database;
mod error;
mod recommendation;
mod server;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use recommendation::RecommendationConfig;
pub use server::{Environment, LogFormat, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Recommendation limits and scoring weights
    #[serde(default)]
    pub recommendation: RecommendationConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// - `CHORAL_MARKET__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `CHORAL_MARKET__RECOMMENDATION__WEIGHTS__VIEW=0.2` -> `recommendation.weights.view = 0.2`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or a value
    /// cannot be parsed into its expected type.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CHORAL_MARKET")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.recommendation.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
