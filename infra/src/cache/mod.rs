//! Redis module
//!
//! Provides the shared Redis client and the Redis-backed customer store.

pub mod customer_store;
pub mod redis_client;

pub use customer_store::RedisCustomerRepository;
pub use redis_client::RedisClient;

// Re-export commonly used types
pub use cv_shared::CacheConfig;
