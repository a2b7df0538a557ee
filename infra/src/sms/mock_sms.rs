//! Mock SMS Service Implementation
//!
//! A mock notifier for development and testing. Messages are logged with a
//! masked recipient and kept in memory instead of being sent.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use uuid::Uuid;

use cv_core::services::SmsNotifier;
use cv_shared::utils::phone::mask_phone_number;

/// Mock SMS service for development and testing
///
/// This implementation:
/// - Logs each send with the recipient masked
/// - Generates mock message IDs
/// - Counts messages and keeps the last one per recipient
/// - Can simulate provider failures
#[derive(Clone, Default)]
pub struct MockSmsService {
    /// Counter for tracking number of messages sent
    message_count: Arc<AtomicU64>,
    /// Whether to simulate failures
    simulate_failure: Arc<AtomicBool>,
    /// Last message body per recipient
    last_messages: Arc<Mutex<HashMap<String, String>>>,
}

impl MockSmsService {
    /// Create a new mock SMS service
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock service that fails every send
    pub fn failing() -> Self {
        let service = Self::new();
        service.set_simulate_failure(true);
        service
    }

    /// Get the total number of messages sent
    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Reset the message counter
    pub fn reset_counter(&self) {
        self.message_count.store(0, Ordering::SeqCst);
    }

    /// Enable or disable failure simulation
    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }

    /// Last message body sent to a phone number
    pub fn last_message_for(&self, phone_number: &str) -> Option<String> {
        self.last_messages
            .lock()
            .ok()
            .and_then(|messages| messages.get(phone_number).cloned())
    }
}

#[async_trait]
impl SmsNotifier for MockSmsService {
    async fn send_sms(&self, phone_number: &str, message: &str) -> Result<String, String> {
        let masked_phone = mask_phone_number(phone_number);

        if self.simulate_failure.load(Ordering::SeqCst) {
            warn!(
                target: "sms_service",
                provider = "mock",
                phone = %masked_phone,
                "Mock SMS service simulating failure"
            );
            return Err("Simulated SMS sending failure".to_string());
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        if let Ok(mut messages) = self.last_messages.lock() {
            messages.insert(phone_number.to_string(), message.to_string());
        }

        info!(
            target: "sms_service",
            provider = "mock",
            phone = %masked_phone,
            message_id = %message_id,
            count,
            "Mock SMS recorded"
        );

        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}
