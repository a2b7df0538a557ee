//! Mapping of service and extractor failures onto HTTP responses.
//!
//! Every error body uses the shared [`ErrorResponse`] envelope.

use actix_web::error::{InternalError, JsonPayloadError, PathError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse};
use tracing::{error, warn};
use validator::ValidationErrors;

use cv_core::CustomerError;
use cv_shared::{error_codes, IntoErrorResponse};

use crate::dto::{ErrorResponse, ErrorResponseExt};

/// HTTP status for a customer operation failure
pub fn status_for(err: &CustomerError) -> StatusCode {
    match err {
        CustomerError::NotFound => StatusCode::NOT_FOUND,
        CustomerError::AlreadyExists
        | CustomerError::CodeMismatch
        | CustomerError::MissingPhoneNumber
        | CustomerError::InvalidPhoneNumber => StatusCode::BAD_REQUEST,
        CustomerError::NotificationFailed { .. } | CustomerError::PersistenceFailed { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub fn customer_error_response(err: &CustomerError) -> HttpResponse {
    if err.is_internal() {
        error!(error = %err, "Customer operation failed");
    }
    err.to_error_response().to_response(status_for(err))
}

pub fn validation_error_response(errors: &ValidationErrors) -> HttpResponse {
    let mut response = ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid request fields");
    for (field, _) in errors.errors() {
        response = response.add_detail(*field, "invalid");
    }
    response.to_response(StatusCode::BAD_REQUEST)
}

/// Error handler for `web::JsonConfig`
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    warn!(error = %err, "Rejected malformed JSON body");

    let status = match err {
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            StatusCode::PAYLOAD_TOO_LARGE
        }
        _ => StatusCode::BAD_REQUEST,
    };
    let response =
        ErrorResponse::new(error_codes::BAD_REQUEST, err.to_string()).to_response(status);
    InternalError::from_response(err, response).into()
}

/// Error handler for `web::PathConfig`
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    let response = ErrorResponse::new(error_codes::BAD_REQUEST, err.to_string())
        .to_response(StatusCode::BAD_REQUEST);
    InternalError::from_response(err, response).into()
}
