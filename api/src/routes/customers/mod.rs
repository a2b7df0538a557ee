//! Customer route handlers
//!
//! Each operation after registration identifies the customer by phone number
//! and verification code. Both can be given as path segments or, for clients
//! that cannot put them in a URL, in a JSON body:
//! - Registration and profile update
//! - Confirming a code
//! - Re-issuing a code
//! - Deleting the customer

pub mod confirm;
pub mod delete;
pub mod reconfirm;
pub mod register;
pub mod update;

use actix_web::{web, HttpRequest};
use std::sync::Arc;
use uuid::Uuid;

use cv_core::{CustomerRepository, CustomerService, SmsNotifier};

/// Response header carrying the confirmed verification code
pub const VERIFICATION_CODE_HEADER: &str = "vc";

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Application state that holds shared services
pub struct AppState<R, N>
where
    R: CustomerRepository + ?Sized,
    N: SmsNotifier + ?Sized,
{
    pub customer_service: Arc<CustomerService<R, N>>,
    /// Name of the configured customer store, reported by `/health`
    pub store: String,
}

impl<R, N> AppState<R, N>
where
    R: CustomerRepository + ?Sized,
    N: SmsNotifier + ?Sized,
{
    pub fn new(customer_service: Arc<CustomerService<R, N>>, store: impl Into<String>) -> Self {
        Self {
            customer_service,
            store: store.into(),
        }
    }
}

/// Register the customer endpoints under `/customers`
pub fn configure<R, N>(cfg: &mut web::ServiceConfig)
where
    R: CustomerRepository + ?Sized + 'static,
    N: SmsNotifier + ?Sized + 'static,
{
    cfg.service(
        web::scope("/customers")
            .route("", web::post().to(register::register::<R, N>))
            .route("", web::put().to(update::update::<R, N>))
            .route("/confirm", web::post().to(confirm::confirm_from_body::<R, N>))
            .route("/reconfirm", web::post().to(reconfirm::reconfirm_from_body::<R, N>))
            .route("/delete", web::post().to(delete::delete_from_body::<R, N>))
            .route(
                "/{phone_number}/{verification_code}/confirm",
                web::put().to(confirm::confirm::<R, N>),
            )
            .route(
                "/{phone_number}/{verification_code}/reconfirm",
                web::put().to(reconfirm::reconfirm::<R, N>),
            )
            .route(
                "/{phone_number}/{verification_code}",
                web::delete().to(delete::delete::<R, N>),
            ),
    );
}

/// Use the caller's request ID if present, otherwise generate one
pub(crate) fn request_id(req: &HttpRequest) -> String {
    req.headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}
