//! Domain-specific error types.

use thiserror::Error;

use cv_shared::{error_codes, ErrorResponse, IntoErrorResponse};

/// Repository-level errors returned by customer stores
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Resource already exists: {resource}")]
    Conflict { resource: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Resource was modified concurrently: {resource}")]
    StaleRecord { resource: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Caller-visible outcomes of customer operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CustomerError {
    #[error("Customer already exists with this phone number")]
    AlreadyExists,

    #[error("Customer not found")]
    NotFound,

    #[error("Verification code does not match")]
    CodeMismatch,

    #[error("Phone number is mandatory")]
    MissingPhoneNumber,

    #[error("Invalid phone number format")]
    InvalidPhoneNumber,

    #[error("Failed to send verification SMS: {reason}")]
    NotificationFailed { reason: String },

    #[error("Failed to persist customer: {reason}")]
    PersistenceFailed { reason: String },
}

impl CustomerError {
    /// Errors that indicate someone probing for accounts or codes
    pub fn is_suspicious(&self) -> bool {
        matches!(self, CustomerError::NotFound | CustomerError::CodeMismatch)
    }

    /// Errors caused by a downstream system rather than the request
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            CustomerError::NotificationFailed { .. } | CustomerError::PersistenceFailed { .. }
        )
    }
}

impl From<DomainError> for CustomerError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Conflict { .. } => CustomerError::AlreadyExists,
            DomainError::NotFound { .. } => CustomerError::NotFound,
            other => CustomerError::PersistenceFailed {
                reason: other.to_string(),
            },
        }
    }
}

impl IntoErrorResponse for CustomerError {
    fn to_error_response(&self) -> ErrorResponse {
        let code = match self {
            CustomerError::AlreadyExists => error_codes::CUSTOMER_ALREADY_EXISTS,
            CustomerError::NotFound => error_codes::CUSTOMER_NOT_FOUND,
            CustomerError::CodeMismatch => error_codes::VERIFICATION_CODE_MISMATCH,
            CustomerError::MissingPhoneNumber => error_codes::PHONE_MISSING,
            CustomerError::InvalidPhoneNumber => error_codes::PHONE_INVALID,
            CustomerError::NotificationFailed { .. } => error_codes::SMS_ERROR,
            CustomerError::PersistenceFailed { .. } => error_codes::PERSISTENCE_ERROR,
        };

        // Provider and store details stay in the logs
        let message = match self {
            CustomerError::NotificationFailed { .. } => {
                "Failed to send verification SMS".to_string()
            }
            CustomerError::PersistenceFailed { .. } => "Failed to persist customer".to_string(),
            other => other.to_string(),
        };

        ErrorResponse::new(code, message)
    }
}

pub type CustomerResult<T> = Result<T, CustomerError>;
