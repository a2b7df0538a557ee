use actix_web::{web, HttpRequest, HttpResponse};

use cv_core::{CustomerRepository, SmsNotifier, VerificationState};
use cv_shared::ApiResponse;

use super::{request_id, AppState, VERIFICATION_CODE_HEADER};
use crate::dto::{ConfirmationResponse, VerificationRequest};
use crate::handlers::customer_error_response;

/// Handler for PUT /api/v1/customers/{phone_number}/{verification_code}/confirm
///
/// On success the confirmed code is echoed in the `vc` response header.
pub async fn confirm<R, N>(
    req: HttpRequest,
    state: web::Data<AppState<R, N>>,
    path: web::Path<(String, String)>,
) -> HttpResponse
where
    R: CustomerRepository + ?Sized + 'static,
    N: SmsNotifier + ?Sized + 'static,
{
    let (phone_number, verification_code) = path.into_inner();
    confirm_customer(&req, &state, &phone_number, &verification_code).await
}

/// Handler for POST /api/v1/customers/confirm
pub async fn confirm_from_body<R, N>(
    req: HttpRequest,
    state: web::Data<AppState<R, N>>,
    request: web::Json<VerificationRequest>,
) -> HttpResponse
where
    R: CustomerRepository + ?Sized + 'static,
    N: SmsNotifier + ?Sized + 'static,
{
    confirm_customer(
        &req,
        &state,
        &request.phone_number,
        &request.verification_code,
    )
    .await
}

async fn confirm_customer<R, N>(
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
        .confirm(phone_number, verification_code)
        .await
    {
        Ok(outcome) => HttpResponse::Ok()
            .insert_header((
                VERIFICATION_CODE_HEADER,
                outcome.verification_code.to_string(),
            ))
            .json(
                ApiResponse::success(ConfirmationResponse {
                    state: VerificationState::Verified,
                    verified_at: outcome.verified_at,
                })
                .with_request_id(request_id(req)),
            ),
        Err(err) => customer_error_response(&err),
    }
}
