//! Domain entities representing core business objects.

pub mod customer;
pub mod verification_code;

pub use customer::{Address, Customer, CustomerProfile, VerificationState};
pub use verification_code::{VerificationCode, CODE_LENGTH};
