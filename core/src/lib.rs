//! # Customer Core
//!
//! Core business logic and domain layer for the customer service.
//! This crate contains the customer entity, the verification state machine,
//! repository and notifier interfaces, and the error types that the API layer
//! maps onto HTTP responses.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{
    Address, Customer, CustomerProfile, VerificationCode, VerificationState, CODE_LENGTH,
};
pub use errors::{CustomerError, CustomerResult, DomainError};
pub use repositories::{CustomerRepository, InMemoryCustomerRepository};
pub use services::{
    ConfirmationOutcome, CustomerService, CustomerServiceConfig, RegistrationOutcome,
    ReissueOutcome, SmsNotifier,
};
