pub mod customer;
pub mod error;

pub use customer::*;
pub use error::{ErrorResponse, ErrorResponseExt};
