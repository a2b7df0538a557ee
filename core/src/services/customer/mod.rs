//! Customer lifecycle service
//!
//! This module drives the customer verification state machine:
//! - Registration with an SMS-delivered verification code
//! - Authentication of later requests by phone number and code
//! - Confirmation and re-issue of verification codes
//! - Profile updates and account deletion

mod config;
mod service;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use config::CustomerServiceConfig;
pub use service::CustomerService;
pub use traits::SmsNotifier;
pub use types::{ConfirmationOutcome, RegistrationOutcome, ReissueOutcome};
