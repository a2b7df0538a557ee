use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use cv_core::{CustomerRepository, SmsNotifier};
use cv_shared::ApiResponse;

use super::{request_id, AppState};
use crate::dto::{CustomerResponse, UpdateCustomerRequest};
use crate::handlers::{customer_error_response, validation_error_response};

/// Handler for PUT /api/v1/customers
///
/// Replaces the profile fields of the customer identified by phone number
/// and verification code. Omitted fields are cleared.
pub async fn update<R, N>(
    req: HttpRequest,
    state: web::Data<AppState<R, N>>,
    request: web::Json<UpdateCustomerRequest>,
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
        .update(
            &request.phone_number,
            &request.verification_code,
            request.profile.into(),
        )
        .await
    {
        Ok(customer) => HttpResponse::Ok().json(
            ApiResponse::success(CustomerResponse::from(&customer))
                .with_request_id(request_id(&req)),
        ),
        Err(err) => customer_error_response(&err),
    }
}
