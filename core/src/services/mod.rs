//! Business services containing domain logic and use cases.

pub mod customer;

// Re-export commonly used types
pub use customer::{
    ConfirmationOutcome, CustomerService, CustomerServiceConfig, RegistrationOutcome,
    ReissueOutcome, SmsNotifier,
};
