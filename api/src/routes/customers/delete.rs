use actix_web::{web, HttpRequest, HttpResponse};

use cv_core::{CustomerRepository, SmsNotifier};
use cv_shared::ApiResponse;

use super::{request_id, AppState};
use crate::dto::{MessageResponse, VerificationRequest};
use crate::handlers::customer_error_response;

/// Handler for DELETE /api/v1/customers/{phone_number}/{verification_code}
pub async fn delete<R, N>(
    req: HttpRequest,
    state: web::Data<AppState<R, N>>,
    path: web::Path<(String, String)>,
) -> HttpResponse
where
    R: CustomerRepository + ?Sized + 'static,
    N: SmsNotifier + ?Sized + 'static,
{
    let (phone_number, verification_code) = path.into_inner();
    delete_customer(&req, &state, &phone_number, &verification_code).await
}

/// Handler for POST /api/v1/customers/delete
pub async fn delete_from_body<R, N>(
    req: HttpRequest,
    state: web::Data<AppState<R, N>>,
    request: web::Json<VerificationRequest>,
) -> HttpResponse
where
    R: CustomerRepository + ?Sized + 'static,
    N: SmsNotifier + ?Sized + 'static,
{
    delete_customer(
        &req,
        &state,
        &request.phone_number,
        &request.verification_code,
    )
    .await
}

async fn delete_customer<R, N>(
    req: &HttpRequest,
    state: &AppState<R, N>,
    phone_number: &str,
    verification_code: &str,
) -> HttpResponse
where
    R: CustomerRepository + ?Sized,
    N: SmsNotifier + ?Sized,
{
    match state
        .customer_service
        .delete(phone_number, verification_code)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(
            ApiResponse::success(MessageResponse::new("Customer deleted"))
                .with_request_id(request_id(req)),
        ),
        Err(err) => customer_error_response(&err),
    }
}
