//! Types for customer service results

use chrono::{DateTime, Utc};

use crate::domain::entities::customer::Customer;
use crate::domain::entities::verification_code::VerificationCode;

/// Result of a successful registration
#[derive(Debug, Clone)]
pub struct RegistrationOutcome {
    /// The stored customer, pending verification
    pub customer: Customer,
    /// The SMS message ID from the provider
    pub message_id: String,
}

/// Result of confirming a verification code
#[derive(Debug, Clone)]
pub struct ConfirmationOutcome {
    /// The code that was confirmed, echoed back to the caller
    pub verification_code: VerificationCode,
    pub verified_at: DateTime<Utc>,
}

/// Result of re-issuing a verification code
#[derive(Debug, Clone)]
pub struct ReissueOutcome {
    /// The SMS message ID from the provider
    pub message_id: String,
}
