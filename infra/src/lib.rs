//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the customer service,
//! following Clean Architecture principles. It provides concrete implementations
//! of the core `CustomerRepository` and `SmsNotifier` traits.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Database**: MySQL customer store using SQLx
//! - **Cache**: Redis client and Redis-backed customer store
//! - **SMS**: Twilio REST client and a mock notifier for development
//! - **Factory**: Wiring of the configured store and notifier
//!
//! ## Features
//!
//! - `mysql`: Enable the MySQL customer store (default)
//! - `redis-store`: Enable the Redis customer store (default)

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Cache module - Redis client and customer store
#[cfg(feature = "redis-store")]
pub mod cache;

/// SMS service module - External SMS providers
pub mod sms;

/// Construction of the configured store and notifier
pub mod factory;

pub use factory::{create_customer_repository, create_sms_notifier};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Redis error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// SMS service error
    #[error("SMS service error: {0}")]
    Sms(String),
}
