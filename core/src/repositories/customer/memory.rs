//! In-memory implementation of CustomerRepository for development and testing

use async_trait::async_trait;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::customer::Customer;
use crate::errors::DomainError;

use super::trait_::CustomerRepository;

/// Process-local customer store keyed by phone number
#[derive(Clone, Default)]
pub struct InMemoryCustomerRepository {
    customers: Arc<RwLock<HashMap<String, Customer>>>,
}

impl InMemoryCustomerRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored customers
    pub async fn len(&self) -> usize {
        self.customers.read().await.len()
    }

    /// Whether the store holds no customers
    pub async fn is_empty(&self) -> bool {
        self.customers.read().await.is_empty()
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<Customer>, DomainError> {
        let customers = self.customers.read().await;
        Ok(customers.get(phone_number).cloned())
    }

    async fn create(&self, customer: Customer) -> Result<Customer, DomainError> {
        let mut customers = self.customers.write().await;

        match customers.entry(customer.phone_number.clone()) {
            Entry::Occupied(_) => Err(DomainError::Conflict {
                resource: "Customer".to_string(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(customer.clone());
                Ok(customer)
            }
        }
    }

    async fn update(&self, mut customer: Customer) -> Result<Customer, DomainError> {
        let mut customers = self.customers.write().await;

        match customers.get_mut(&customer.phone_number) {
            Some(existing) if existing.version != customer.version => {
                Err(DomainError::StaleRecord {
                    resource: "Customer".to_string(),
                })
            }
            Some(existing) => {
                customer.version += 1;
                *existing = customer.clone();
                Ok(customer)
            }
            None => Err(DomainError::NotFound {
                resource: "Customer".to_string(),
            }),
        }
    }

    async fn delete(&self, customer: &Customer) -> Result<bool, DomainError> {
        let mut customers = self.customers.write().await;

        match customers.entry(customer.phone_number.clone()) {
            Entry::Occupied(existing) if existing.get().version != customer.version => {
                Err(DomainError::StaleRecord {
                    resource: "Customer".to_string(),
                })
            }
            Entry::Occupied(existing) => {
                existing.remove();
                Ok(true)
            }
            Entry::Vacant(_) => Ok(false),
        }
    }
}
