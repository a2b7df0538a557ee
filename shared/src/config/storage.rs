//! Customer store selection

use serde::{Deserialize, Serialize};

/// Backing store for customer records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local map, lost on restart
    #[default]
    Memory,
    /// MySQL `customers` table
    #[serde(rename = "mysql")]
    MySql,
    /// One Redis key per customer
    Redis,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            "mysql" => Ok(StorageBackend::MySql),
            "redis" => Ok(StorageBackend::Redis),
            _ => Err(format!("Unknown customer store: {}", s)),
        }
    }
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Memory => write!(f, "memory"),
            StorageBackend::MySql => write!(f, "mysql"),
            StorageBackend::Redis => write!(f, "redis"),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Selected backend
    pub backend: StorageBackend,
}

impl StorageConfig {
    /// Create from `CUSTOMER_STORE`
    pub fn from_env() -> Self {
        let backend = std::env::var("CUSTOMER_STORE")
            .ok()
            .and_then(|b| b.parse().ok())
            .unwrap_or_default();
        Self { backend }
    }
}
