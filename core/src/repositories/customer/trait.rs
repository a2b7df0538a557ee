//! Customer repository trait defining the interface for customer persistence.
//!
//! Customers are stored in a key-value fashion keyed by phone number.
//! Uniqueness of the phone number is the store's responsibility: `create`
//! must be an atomic create-if-absent, never a read followed by a write.
//! Writes to an existing record are conditional on the `version` the caller
//! read, so a snapshot taken before a concurrent write can never replace it.

use async_trait::async_trait;

use crate::domain::entities::customer::Customer;
use crate::errors::DomainError;

/// Repository trait for Customer persistence operations
///
/// # Example Implementation
/// ```no_run
/// use async_trait::async_trait;
/// use cv_core::domain::entities::customer::Customer;
/// use cv_core::errors::DomainError;
/// use cv_core::repositories::CustomerRepository;
///
/// struct DatastoreCustomerRepository;
///
/// #[async_trait]
/// impl CustomerRepository for DatastoreCustomerRepository {
///     async fn find_by_phone(&self, _phone: &str) -> Result<Option<Customer>, DomainError> {
///         Ok(None)
///     }
///     async fn create(&self, customer: Customer) -> Result<Customer, DomainError> {
///         Ok(customer)
///     }
///     async fn update(&self, customer: Customer) -> Result<Customer, DomainError> {
///         Ok(customer)
///     }
///     async fn delete(&self, _customer: &Customer) -> Result<bool, DomainError> {
///         Ok(false)
///     }
/// }
/// ```
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Find a customer by phone number
    ///
    /// # Returns
    /// * `Ok(Some(Customer))` - Customer found
    /// * `Ok(None)` - No customer with this phone number
    /// * `Err(DomainError)` - Store failure
    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<Customer>, DomainError>;

    /// Insert a customer if no record exists for its phone number
    ///
    /// # Returns
    /// * `Ok(Customer)` - The stored customer
    /// * `Err(DomainError::Conflict)` - A record already exists for the phone number
    /// * `Err(DomainError)` - Store failure
    async fn create(&self, customer: Customer) -> Result<Customer, DomainError>;

    /// Overwrite an existing customer record if its stored version still
    /// equals `customer.version`
    ///
    /// # Returns
    /// * `Ok(Customer)` - The stored customer, with `version` incremented
    /// * `Err(DomainError::NotFound)` - No record exists for the phone number
    /// * `Err(DomainError::StaleRecord)` - The record changed since it was read
    /// * `Err(DomainError)` - Store failure
    async fn update(&self, customer: Customer) -> Result<Customer, DomainError>;

    /// Remove a customer record if its stored version still equals
    /// `customer.version`
    ///
    /// # Returns
    /// * `Ok(true)` - Customer was deleted
    /// * `Ok(false)` - Customer not found
    /// * `Err(DomainError::StaleRecord)` - The record changed since it was read
    /// * `Err(DomainError)` - Store failure
    async fn delete(&self, customer: &Customer) -> Result<bool, DomainError>;

    /// Check that the backing store is reachable
    async fn health_check(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
