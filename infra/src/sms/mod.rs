//! SMS Service Module
//!
//! Implementations of the core `SmsNotifier` trait used to deliver
//! verification codes.
//!
//! ## Providers
//!
//! - **Mock**: Logs and records messages for development and tests
//! - **Twilio**: Production SMS via the Twilio Messages REST API

pub mod mock_sms;
pub mod twilio;

pub use mock_sms::MockSmsService;
pub use twilio::{TwilioConfig, TwilioSmsService};

#[cfg(test)]
mod tests;
