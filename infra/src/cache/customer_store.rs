//! Redis implementation of the CustomerRepository trait.
//!
//! Each customer is a JSON document under `customer:{phone}` (namespaced by
//! the configured key prefix). `SET NX` gives atomic create-if-absent.
//! Updates and deletes run as Lua scripts that compare the stored document's
//! `version` with the caller's before touching the key, so the check and the
//! write happen in one step on the server.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use redis::Script;
use tracing::debug;

use cv_core::domain::entities::customer::Customer;
use cv_core::errors::DomainError;
use cv_core::repositories::CustomerRepository;
use cv_shared::utils::phone::mask_phone_number;

use super::redis_client::RedisClient;
use crate::InfrastructureError;

// Replies: -1 missing, 0 version mismatch, 1 written
static UPDATE_SCRIPT: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r#"
        local current = redis.call('GET', KEYS[1])
        if not current then return -1 end
        if (cjson.decode(current).version or 0) ~= tonumber(ARGV[1]) then return 0 end
        redis.call('SET', KEYS[1], ARGV[2])
        return 1
        "#,
    )
});

static DELETE_SCRIPT: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r#"
        local current = redis.call('GET', KEYS[1])
        if not current then return -1 end
        if (cjson.decode(current).version or 0) ~= tonumber(ARGV[1]) then return 0 end
        redis.call('DEL', KEYS[1])
        return 1
        "#,
    )
});

/// Redis-backed customer store
#[derive(Clone)]
pub struct RedisCustomerRepository {
    client: RedisClient,
}

impl RedisCustomerRepository {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    fn customer_key(&self, phone_number: &str) -> String {
        self.client.key(&format!("customer:{}", phone_number))
    }

    fn encode(customer: &Customer) -> Result<String, DomainError> {
        serde_json::to_string(customer).map_err(|e| DomainError::Serialization(e.to_string()))
    }

    fn store_error(err: InfrastructureError) -> DomainError {
        DomainError::Database(err.to_string())
    }

    fn stale() -> DomainError {
        DomainError::StaleRecord {
            resource: "Customer".to_string(),
        }
    }
}

#[async_trait]
impl CustomerRepository for RedisCustomerRepository {
    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<Customer>, DomainError> {
        let value = self
            .client
            .get(&self.customer_key(phone_number))
            .await
            .map_err(Self::store_error)?;

        match value {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| DomainError::Serialization(e.to_string())),
            None => Ok(None),
        }
    }

    async fn create(&self, customer: Customer) -> Result<Customer, DomainError> {
        let json = Self::encode(&customer)?;
        let written = self
            .client
            .set_if_absent(&self.customer_key(&customer.phone_number), &json)
            .await
            .map_err(Self::store_error)?;

        if !written {
            debug!(
                phone = %mask_phone_number(&customer.phone_number),
                "Customer key already present"
            );
            return Err(DomainError::Conflict {
                resource: "Customer".to_string(),
            });
        }

        Ok(customer)
    }

    async fn update(&self, mut customer: Customer) -> Result<Customer, DomainError> {
        let expected = customer.version.to_string();
        customer.version += 1;
        let json = Self::encode(&customer)?;

        let reply = self
            .client
            .run_script(
                &UPDATE_SCRIPT,
                &self.customer_key(&customer.phone_number),
                &[expected.as_str(), json.as_str()],
            )
            .await
            .map_err(Self::store_error)?;

        match reply {
            1 => Ok(customer),
            0 => Err(Self::stale()),
            _ => Err(DomainError::NotFound {
                resource: "Customer".to_string(),
            }),
        }
    }

    async fn delete(&self, customer: &Customer) -> Result<bool, DomainError> {
        let expected = customer.version.to_string();

        let reply = self
            .client
            .run_script(
                &DELETE_SCRIPT,
                &self.customer_key(&customer.phone_number),
                &[expected.as_str()],
            )
            .await
            .map_err(Self::store_error)?;

        match reply {
            1 => Ok(true),
            0 => Err(Self::stale()),
            _ => Ok(false),
        }
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        match self.client.health_check().await.map_err(Self::store_error)? {
            true => Ok(()),
            false => Err(DomainError::Database("Unexpected PING reply".to_string())),
        }
    }
}
