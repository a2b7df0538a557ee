//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `cache` - Redis connection used by the Redis customer store
//! - `database` - MySQL connection pool configuration
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server and CORS configuration
//! - `sms` - SMS provider selection and credentials
//! - `storage` - Which customer store backs the service

pub mod cache;
pub mod database;
pub mod environment;
pub mod server;
pub mod sms;
pub mod storage;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export commonly used types
pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::{CorsConfig, ServerConfig};
pub use sms::{SmsConfig, SmsProvider};
pub use storage::{StorageBackend, StorageConfig};

/// Configuration errors detected while validating an [`AppConfig`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("{setting} is not allowed in {environment}")]
    NotAllowed { setting: String, environment: Environment },
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Redis configuration
    pub cache: CacheConfig,

    /// SMS provider configuration
    pub sms: SmsConfig,

    /// Customer store selection
    pub storage: StorageConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            cache: CacheConfig::default(),
            sms: SmsConfig::default(),
            storage: StorageConfig::default(),
            cors: CorsConfig::development(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        let cors = if environment.is_production() {
            CorsConfig::from_env()
        } else {
            CorsConfig::development()
        };

        Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            cache: CacheConfig::from_env(),
            sms: SmsConfig::from_env(),
            storage: StorageConfig::from_env(),
            cors,
            logging: LoggingConfig::from_env(environment),
        }
    }

    /// Reject settings that only make sense outside production
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "port must be non-zero".to_string(),
            });
        }

        if !self.sms.message_template.contains(sms::CODE_PLACEHOLDER) {
            return Err(ConfigError::InvalidValue {
                field: "sms.message_template".to_string(),
                reason: format!("template must contain {}", sms::CODE_PLACEHOLDER),
            });
        }

        if self.environment.is_production() {
            if self.storage.backend == StorageBackend::Memory {
                return Err(ConfigError::NotAllowed {
                    setting: "In-memory customer store".to_string(),
                    environment: self.environment,
                });
            }
            if self.sms.provider == SmsProvider::Mock {
                return Err(ConfigError::NotAllowed {
                    setting: "Mock SMS provider".to_string(),
                    environment: self.environment,
                });
            }
        }

        Ok(())
    }
}
