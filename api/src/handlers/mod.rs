pub mod error;

pub use error::{customer_error_response, json_error_handler, path_error_handler, validation_error_response};
