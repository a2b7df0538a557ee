//! Customer entity and its verification lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::verification_code::VerificationCode;

/// Postal address attached to a customer profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub line1: String,
    pub line2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// Profile fields owned by the customer
///
/// These are opaque to the verification state machine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: Address,
}

/// Where a stored customer sits in the verification lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationState {
    /// A code has been issued but not confirmed
    PendingVerification,
    /// The current code has been confirmed
    Verified,
}

/// Customer entity keyed by phone number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Internal identifier, not used for lookups
    pub id: Uuid,

    /// Natural key (E.164)
    pub phone_number: String,

    /// Customer-managed profile data
    pub profile: CustomerProfile,

    /// The currently active verification code
    pub verification_code: VerificationCode,

    /// Timestamp when the customer registered
    pub created_at: DateTime<Utc>,

    /// Set when the active code was confirmed, cleared on reissue
    pub verified_at: Option<DateTime<Utc>>,

    /// Timestamp of the last persisted change
    pub updated_at: DateTime<Utc>,

    /// Write counter, bumped by the store on every successful update
    #[serde(default)]
    pub version: u64,
}

impl Customer {
    /// Creates a freshly registered, unverified customer with a new code
    pub fn register(phone_number: String, profile: CustomerProfile) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            phone_number,
            profile,
            verification_code: VerificationCode::generate(),
            created_at: now,
            verified_at: None,
            updated_at: now,
            version: 0,
        }
    }

    /// Current verification state
    pub fn state(&self) -> VerificationState {
        if self.verified_at.is_some() {
            VerificationState::Verified
        } else {
            VerificationState::PendingVerification
        }
    }

    /// Checks if the active code has been confirmed
    pub fn is_verified(&self) -> bool {
        self.verified_at.is_some()
    }

    /// Checks a presented code against the active one
    pub fn code_matches(&self, presented: &str) -> bool {
        self.verification_code.matches(presented)
    }

    /// Marks the active code as confirmed
    pub fn confirm(&mut self) {
        let now = Utc::now();
        self.verified_at = Some(now);
        self.updated_at = now;
    }

    /// Replaces the code with a new one and returns to pending verification
    pub fn reissue_code(&mut self) -> VerificationCode {
        self.verification_code = VerificationCode::generate_distinct_from(self.verification_code);
        self.verified_at = None;
        self.updated_at = Utc::now();
        self.verification_code
    }

    /// Overwrites profile fields, leaving verification state alone
    pub fn update_profile(&mut self, profile: CustomerProfile) {
        self.profile = profile;
        self.updated_at = Utc::now();
    }
}
