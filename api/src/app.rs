//! Application factory
//!
//! Builds the Actix-web application around an already constructed
//! [`AppState`], so the binary and the tests share one routing table.

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{web, App, HttpResponse};
use tracing_actix_web::TracingLogger;

use cv_core::{CustomerRepository, SmsNotifier};
use cv_shared::{error_codes, ApiResponse, AppConfig, HealthResponse};

use crate::dto::{ErrorResponse, ErrorResponseExt};
use crate::handlers::{json_error_handler, path_error_handler};
use crate::middleware::create_cors;
use crate::routes::customers::{self, AppState};

/// Service name reported by `/health`
pub const SERVICE_NAME: &str = "customer-verify-api";

/// Create and configure the application with all dependencies
pub fn create_app<R, N>(
    app_state: web::Data<AppState<R, N>>,
    config: &AppConfig,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    R: CustomerRepository + ?Sized + 'static,
    N: SmsNotifier + ?Sized + 'static,
{
    let max_payload_size = config.server.max_payload_size;

    App::new()
        .app_data(app_state)
        // Request logging is outermost so CORS rejections are logged too
        .wrap(create_cors(&config.cors))
        .wrap(TracingLogger::default())
        .configure(move |cfg| configure_routes::<R, N>(cfg, max_payload_size))
        .default_service(web::route().to(not_found))
}

/// Register extractor settings, `/health` and the versioned API
///
/// Exposed separately from [`create_app`] so tests can mount the routes
/// without middleware.
pub fn configure_routes<R, N>(cfg: &mut web::ServiceConfig, max_payload_size: usize)
where
    R: CustomerRepository + ?Sized + 'static,
    N: SmsNotifier + ?Sized + 'static,
{
    cfg.app_data(
        web::JsonConfig::default()
            .limit(max_payload_size)
            .error_handler(json_error_handler),
    )
    .app_data(web::PathConfig::default().error_handler(path_error_handler))
    .route("/health", web::get().to(health_check::<R, N>))
    .service(web::scope("/api/v1").configure(customers::configure::<R, N>));
}

/// Health check endpoint handler
///
/// Answers 503 when the customer store cannot be reached.
async fn health_check<R, N>(state: web::Data<AppState<R, N>>) -> HttpResponse
where
    R: CustomerRepository + ?Sized + 'static,
    N: SmsNotifier + ?Sized + 'static,
{
    let health = HealthResponse::healthy(
        SERVICE_NAME,
        env!("CARGO_PKG_VERSION"),
        &state.store,
        state.customer_service.notifier_name(),
    );

    match state.customer_service.store_health().await {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::success(health)),
        Err(_) => HttpResponse::ServiceUnavailable().json(ApiResponse {
            success: false,
            ..ApiResponse::success(health.unhealthy())
        }),
    }
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    )
    .to_response(StatusCode::NOT_FOUND)
}
