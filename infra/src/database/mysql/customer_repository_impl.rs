//! MySQL implementation of the CustomerRepository trait.
//!
//! Customers live in the `customers` table with the phone number as primary
//! key, so duplicate registrations are rejected by the database itself.
//! Updates and deletes match on the `version` column as well, and only a
//! successful update increments it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use cv_core::domain::entities::customer::{Address, Customer, CustomerProfile};
use cv_core::domain::entities::verification_code::VerificationCode;
use cv_core::errors::DomainError;
use cv_core::repositories::CustomerRepository;

const SELECT_COLUMNS: &str = r#"
    SELECT phone_number, id, first_name, last_name, email,
           address_line1, address_line2, address_city, address_state, address_zip,
           verification_code, created_at, verified_at, updated_at, version
    FROM customers
"#;

/// MySQL implementation of CustomerRepository
pub struct MySqlCustomerRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlCustomerRepository {
    /// Create a new MySQL customer repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to Customer entity
    fn row_to_customer(row: &sqlx::mysql::MySqlRow) -> Result<Customer, DomainError> {
        let column = |name: &str, e: sqlx::Error| {
            DomainError::Database(format!("Failed to get {}: {}", name, e))
        };

        let id: String = row.try_get("id").map_err(|e| column("id", e))?;
        let code: u16 = row
            .try_get("verification_code")
            .map_err(|e| column("verification_code", e))?;

        Ok(Customer {
            id: Uuid::parse_str(&id)
                .map_err(|e| DomainError::Database(format!("Invalid UUID: {}", e)))?,
            phone_number: row
                .try_get("phone_number")
                .map_err(|e| column("phone_number", e))?,
            profile: CustomerProfile {
                first_name: row.try_get("first_name").map_err(|e| column("first_name", e))?,
                last_name: row.try_get("last_name").map_err(|e| column("last_name", e))?,
                email: row.try_get("email").map_err(|e| column("email", e))?,
                address: Address {
                    line1: row
                        .try_get("address_line1")
                        .map_err(|e| column("address_line1", e))?,
                    line2: row
                        .try_get("address_line2")
                        .map_err(|e| column("address_line2", e))?,
                    city: row
                        .try_get("address_city")
                        .map_err(|e| column("address_city", e))?,
                    state: row
                        .try_get("address_state")
                        .map_err(|e| column("address_state", e))?,
                    zip: row
                        .try_get("address_zip")
                        .map_err(|e| column("address_zip", e))?,
                },
            },
            verification_code: VerificationCode::try_from(code)
                .map_err(DomainError::Serialization)?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| column("created_at", e))?,
            verified_at: row
                .try_get::<Option<DateTime<Utc>>, _>("verified_at")
                .map_err(|e| column("verified_at", e))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| column("updated_at", e))?,
            version: row.try_get::<u64, _>("version").map_err(|e| column("version", e))?,
        })
    }

    /// Tell a missing record apart from one whose version moved on
    async fn stored_version(&self, phone_number: &str) -> Result<Option<u64>, DomainError> {
        sqlx::query_scalar("SELECT version FROM customers WHERE phone_number = ?")
            .bind(phone_number)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Database query failed: {}", e)))
    }
}

#[async_trait]
impl CustomerRepository for MySqlCustomerRepository {
    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<Customer>, DomainError> {
        let query = format!("{} WHERE phone_number = ? LIMIT 1", SELECT_COLUMNS);

        let result = sqlx::query(&query)
            .bind(phone_number)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Database query failed: {}", e)))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_customer(&row)?)),
            None => Ok(None),
        }
    }

    async fn create(&self, customer: Customer) -> Result<Customer, DomainError> {
        let query = r#"
            INSERT INTO customers (
                phone_number, id, first_name, last_name, email,
                address_line1, address_line2, address_city, address_state, address_zip,
                verification_code, created_at, verified_at, updated_at, version
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        let profile = &customer.profile;
        sqlx::query(query)
            .bind(&customer.phone_number)
            .bind(customer.id.to_string())
            .bind(&profile.first_name)
            .bind(&profile.last_name)
            .bind(&profile.email)
            .bind(&profile.address.line1)
            .bind(&profile.address.line2)
            .bind(&profile.address.city)
            .bind(&profile.address.state)
            .bind(&profile.address.zip)
            .bind(customer.verification_code.value())
            .bind(customer.created_at)
            .bind(customer.verified_at)
            .bind(customer.updated_at)
            .bind(customer.version)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => DomainError::Conflict {
                    resource: "Customer".to_string(),
                },
                other => DomainError::Database(format!("Failed to create customer: {}", other)),
            })?;

        Ok(customer)
    }

    async fn update(&self, mut customer: Customer) -> Result<Customer, DomainError> {
        let query = r#"
            UPDATE customers SET
                first_name = ?,
                last_name = ?,
                email = ?,
                address_line1 = ?,
                address_line2 = ?,
                address_city = ?,
                address_state = ?,
                address_zip = ?,
                verification_code = ?,
                verified_at = ?,
                updated_at = ?,
                version = version + 1
            WHERE phone_number = ? AND version = ?
        "#;

        let profile = &customer.profile;
        let result = sqlx::query(query)
            .bind(&profile.first_name)
            .bind(&profile.last_name)
            .bind(&profile.email)
            .bind(&profile.address.line1)
            .bind(&profile.address.line2)
            .bind(&profile.address.city)
            .bind(&profile.address.state)
            .bind(&profile.address.zip)
            .bind(customer.verification_code.value())
            .bind(customer.verified_at)
            .bind(customer.updated_at)
            .bind(&customer.phone_number)
            .bind(customer.version)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Failed to update customer: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(match self.stored_version(&customer.phone_number).await? {
                Some(_) => DomainError::StaleRecord {
                    resource: "Customer".to_string(),
                },
                None => DomainError::NotFound {
                    resource: "Customer".to_string(),
                },
            });
        }

        customer.version += 1;
        Ok(customer)
    }

    async fn delete(&self, customer: &Customer) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM customers WHERE phone_number = ? AND version = ?")
            .bind(&customer.phone_number)
            .bind(customer.version)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Failed to delete customer: {}", e)))?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        match self.stored_version(&customer.phone_number).await? {
            Some(_) => Err(DomainError::StaleRecord {
                resource: "Customer".to_string(),
            }),
            None => Ok(false),
        }
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Health check failed: {}", e)))?;
        Ok(())
    }
}
