//! Request and response bodies for the customer endpoints.
//!
//! Verification codes are accepted in requests but never serialized into a
//! response body.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use cv_core::{Address, Customer, CustomerProfile, VerificationState};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AddressDto {
    #[validate(length(max = 200))]
    pub line1: String,
    #[validate(length(max = 200))]
    pub line2: String,
    #[validate(length(max = 100))]
    pub city: String,
    #[validate(length(max = 100))]
    pub state: String,
    /// Accepts `"02134"` or `2134`
    #[serde(deserialize_with = "string_or_number")]
    #[validate(length(max = 20))]
    pub zip: String,
}

impl From<AddressDto> for Address {
    fn from(dto: AddressDto) -> Self {
        Address {
            line1: dto.line1,
            line2: dto.line2,
            city: dto.city,
            state: dto.state,
            zip: dto.zip,
        }
    }
}

impl From<&Address> for AddressDto {
    fn from(address: &Address) -> Self {
        Self {
            line1: address.line1.clone(),
            line2: address.line2.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            zip: address.zip.clone(),
        }
    }
}

/// Profile fields shared by registration and update
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ProfileDto {
    #[validate(length(max = 100))]
    pub first_name: String,
    #[validate(length(max = 100))]
    pub last_name: String,
    #[validate(length(max = 254))]
    pub email: String,
    #[validate]
    pub address: AddressDto,
}

impl From<ProfileDto> for CustomerProfile {
    fn from(dto: ProfileDto) -> Self {
        CustomerProfile {
            first_name: dto.first_name,
            last_name: dto.last_name,
            email: dto.email,
            address: dto.address.into(),
        }
    }
}

/// Body of `POST /api/v1/customers`
///
/// A missing phone number is left empty so the service can report it.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterCustomerRequest {
    #[serde(default)]
    pub phone_number: String,

    #[serde(flatten)]
    #[validate]
    pub profile: ProfileDto,
}

/// Body of `PUT /api/v1/customers`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCustomerRequest {
    #[serde(default)]
    pub phone_number: String,

    #[serde(default, deserialize_with = "string_or_number")]
    pub verification_code: String,

    #[serde(flatten)]
    #[validate]
    pub profile: ProfileDto,
}

/// Phone number and code carried in a request body
#[derive(Debug, Clone, Deserialize)]
pub struct VerificationRequest {
    #[serde(default)]
    pub phone_number: String,

    #[serde(default, deserialize_with = "string_or_number")]
    pub verification_code: String,
}

/// Customer as returned to callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerResponse {
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: AddressDto,
    pub state: VerificationState,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Customer> for CustomerResponse {
    fn from(customer: &Customer) -> Self {
        Self {
            phone_number: customer.phone_number.clone(),
            first_name: customer.profile.first_name.clone(),
            last_name: customer.profile.last_name.clone(),
            email: customer.profile.email.clone(),
            address: AddressDto::from(&customer.profile.address),
            state: customer.state(),
            created_at: customer.created_at,
            verified_at: customer.verified_at,
            updated_at: customer.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmationResponse {
    pub state: VerificationState,
    pub verified_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(u64),
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
    })
}
