use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use cv_core::{CustomerRepository, SmsNotifier};
use cv_shared::ApiResponse;

use super::{request_id, AppState};
use crate::dto::{CustomerResponse, RegisterCustomerRequest};
use crate::handlers::{customer_error_response, validation_error_response};

/// Handler for POST /api/v1/customers
///
/// Creates the customer and texts them a verification code. The code is not
/// part of the response.
///
/// # Request Body
///
/// ```json
/// {
///     "phone_number": "+15551234567",
///     "first_name": "Ada",
///     "last_name": "Lovelace",
///     "email": "ada@example.com",
///     "address": { "line1": "1 Main St", "city": "Boston", "state": "MA", "zip": "02134" }
/// }
/// ```
///
/// # Responses
/// - 201 with the stored customer, pending verification
/// - 400 when the phone number is missing, invalid or already registered
/// - 500 when the SMS could not be sent; nothing is stored in that case
pub async fn register<R, N>(
    req: HttpRequest,
    state: web::Data<AppState<R, N>>,
    request: web::Json<RegisterCustomerRequest>,
) -> HttpResponse
where
    R: CustomerRepository + ?Sized + 'static,
    N: SmsNotifier + ?Sized + 'static,
{
    let request = request.into_inner();
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    match state
        .customer_service
        .register(&request.phone_number, request.profile.into())
        .await
    {
        Ok(outcome) => HttpResponse::Created().json(
            ApiResponse::success(CustomerResponse::from(&outcome.customer))
                .with_request_id(request_id(&req)),
        ),
        Err(err) => customer_error_response(&err),
    }
}
