//! CORS middleware configuration for cross-origin requests.
//!
//! Browser clients need to read the `vc` header returned by the confirm
//! endpoint, so it is always exposed. Origins come from [`CorsConfig`]: a
//! wildcard entry (the development default) allows any origin, otherwise only
//! the listed origins are accepted.

use actix_cors::Cors;
use actix_web::http::{header, Method};
use tracing::info;

use cv_shared::CorsConfig;

use crate::routes::customers::VERIFICATION_CODE_HEADER;

/// Creates a CORS middleware instance from configuration.
pub fn create_cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allowed_headers(vec![
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::HeaderName::from_static("x-request-id"),
        ])
        .expose_headers(vec![
            header::HeaderName::from_static(VERIFICATION_CODE_HEADER),
            header::HeaderName::from_static("x-request-id"),
        ])
        .max_age(config.max_age);

    if config.allows_any_origin() {
        info!("Configuring CORS to allow any origin");
        return cors.allow_any_origin();
    }

    for origin in config.allowed_origins.iter().map(|s| s.trim()) {
        if !origin.is_empty() {
            info!(origin, "Adding allowed origin");
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpResponse};

    #[actix_web::test]
    async fn test_listed_origin_sees_code_header() {
        let config = CorsConfig {
            allowed_origins: vec!["https://app.example.com".to_string()],
            max_age: 600,
        };
        let app = test::init_service(
            App::new().wrap(create_cors(&config)).route(
                "/",
                web::get().to(|| async { HttpResponse::Ok().finish() }),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((header::ORIGIN, "https://app.example.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        let exposed = resp
            .headers()
            .get(header::ACCESS_CONTROL_EXPOSE_HEADERS)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_lowercase();
        assert!(exposed.contains(VERIFICATION_CODE_HEADER));
    }

    #[actix_web::test]
    async fn test_unlisted_origin_is_rejected() {
        let config = CorsConfig {
            allowed_origins: vec!["https://app.example.com".to_string()],
            max_age: 600,
        };
        let app = test::init_service(
            App::new().wrap(create_cors(&config)).route(
                "/",
                web::get().to(|| async { HttpResponse::Ok().finish() }),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((header::ORIGIN, "https://evil.example.net"))
            .to_request();
        let resp = test::try_call_service(&app, req).await;

        match resp {
            Ok(resp) => assert!(!resp.status().is_success()),
            Err(_) => {}
        }
    }
}
