//! Mock implementations for testing the customer service

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::domain::entities::customer::Customer;
use crate::errors::DomainError;
use crate::repositories::{CustomerRepository, InMemoryCustomerRepository};
use crate::services::customer::SmsNotifier;

// Mock SMS notifier recording every message it is asked to send
#[derive(Default)]
pub struct MockSmsNotifier {
    pub sent_messages: Arc<Mutex<Vec<(String, String)>>>,
    should_fail: AtomicBool,
}

impl MockSmsNotifier {
    pub fn new(should_fail: bool) -> Self {
        Self {
            sent_messages: Arc::new(Mutex::new(Vec::new())),
            should_fail: AtomicBool::new(should_fail),
        }
    }

    pub fn set_failing(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    pub fn sent_count(&self) -> usize {
        self.sent_messages.lock().unwrap().len()
    }

    pub fn last_message_for(&self, phone: &str) -> Option<String> {
        self.sent_messages
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == phone)
            .map(|(_, body)| body.clone())
    }
}

#[async_trait]
impl SmsNotifier for MockSmsNotifier {
    async fn send_sms(&self, phone_number: &str, message: &str) -> Result<String, String> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err("SMS service error".to_string());
        }
        self.sent_messages
            .lock()
            .unwrap()
            .push((phone_number.to_string(), message.to_string()));
        Ok(format!("mock-msg-{}", uuid::Uuid::new_v4()))
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}

// Repository wrapper that can be told to fail individual operations
#[derive(Default)]
pub struct FlakyCustomerRepository {
    pub inner: InMemoryCustomerRepository,
    pub fail_find: AtomicBool,
    pub fail_create: AtomicBool,
    pub fail_update: AtomicBool,
    pub fail_delete: AtomicBool,
    pub fail_health: AtomicBool,
    pub update_calls: AtomicUsize,
}

impl FlakyCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn check(flag: &AtomicBool) -> Result<(), DomainError> {
        if flag.load(Ordering::SeqCst) {
            Err(DomainError::Database("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CustomerRepository for FlakyCustomerRepository {
    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<Customer>, DomainError> {
        Self::check(&self.fail_find)?;
        self.inner.find_by_phone(phone_number).await
    }

    async fn create(&self, customer: Customer) -> Result<Customer, DomainError> {
        Self::check(&self.fail_create)?;
        self.inner.create(customer).await
    }

    async fn update(&self, customer: Customer) -> Result<Customer, DomainError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        Self::check(&self.fail_update)?;
        self.inner.update(customer).await
    }

    async fn delete(&self, customer: &Customer) -> Result<bool, DomainError> {
        Self::check(&self.fail_delete)?;
        self.inner.delete(customer).await
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        Self::check(&self.fail_health)
    }
}

// Repository wrapper that holds the next write until the test releases it,
// letting other requests run between a read and its write
#[derive(Default)]
pub struct PausingCustomerRepository {
    pub inner: InMemoryCustomerRepository,
    armed: AtomicBool,
    paused: Notify,
    resume: Notify,
}

impl PausingCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold the next `update` or `delete`
    pub fn pause_next_write(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    /// Wait until a write is being held
    pub async fn write_paused(&self) {
        self.paused.notified().await;
    }

    pub fn resume_write(&self) {
        self.resume.notify_one();
    }

    async fn hold_if_armed(&self) {
        if self.armed.swap(false, Ordering::SeqCst) {
            self.paused.notify_one();
            self.resume.notified().await;
        }
    }
}

#[async_trait]
impl CustomerRepository for PausingCustomerRepository {
    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<Customer>, DomainError> {
        self.inner.find_by_phone(phone_number).await
    }

    async fn create(&self, customer: Customer) -> Result<Customer, DomainError> {
        self.inner.create(customer).await
    }

    async fn update(&self, customer: Customer) -> Result<Customer, DomainError> {
        self.hold_if_armed().await;
        self.inner.update(customer).await
    }

    async fn delete(&self, customer: &Customer) -> Result<bool, DomainError> {
        self.hold_if_armed().await;
        self.inner.delete(customer).await
    }
}
