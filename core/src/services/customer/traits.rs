//! Traits for SMS provider integration

use async_trait::async_trait;

/// Outbound SMS channel used to deliver verification codes
#[async_trait]
pub trait SmsNotifier: Send + Sync {
    /// Send a text message, returning the provider's message id
    async fn send_sms(&self, phone_number: &str, message: &str) -> Result<String, String>;

    /// Name of the provider, used in logs and health output
    fn provider_name(&self) -> &str;
}
