//! Shared utilities and common types for the customer service
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Error response structures
//! - Response envelopes
//! - Phone number utilities

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, ConfigError, CorsConfig, DatabaseConfig, Environment,
    LoggingConfig, ServerConfig, SmsConfig, SmsProvider, StorageBackend, StorageConfig,
};
pub use errors::{error_codes, ErrorResponse, IntoErrorResponse};
pub use types::{ApiResponse, HealthResponse};
pub use utils::phone;
