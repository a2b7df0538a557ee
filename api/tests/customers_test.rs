use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

use cv_api::app::{configure_routes, create_app};
use cv_api::routes::customers::AppState;
use cv_core::{
    Customer, CustomerRepository, CustomerService, CustomerServiceConfig, DomainError,
    InMemoryCustomerRepository,
};
use cv_infra::sms::MockSmsService;
use cv_shared::AppConfig;

const PHONE: &str = "+15551234567";
const MAX_PAYLOAD: usize = 262_144;

type TestState = AppState<InMemoryCustomerRepository, MockSmsService>;

struct Harness {
    state: web::Data<TestState>,
    repository: InMemoryCustomerRepository,
    sms: MockSmsService,
}

impl Harness {
    fn new() -> Self {
        let repository = InMemoryCustomerRepository::new();
        let sms = MockSmsService::new();
        let service = CustomerService::new(
            Arc::new(repository.clone()),
            Arc::new(sms.clone()),
            CustomerServiceConfig::default(),
        );

        Self {
            state: web::Data::new(AppState::new(Arc::new(service), "memory")),
            repository,
            sms,
        }
    }

    async fn code_for(&self, phone_number: &str) -> String {
        self.repository
            .find_by_phone(phone_number)
            .await
            .unwrap()
            .expect("customer should exist")
            .verification_code
            .to_string()
    }
}

macro_rules! init_app {
    ($harness:expr) => {
        test::init_service(App::new().app_data($harness.state.clone()).configure(|cfg| {
            configure_routes::<InMemoryCustomerRepository, MockSmsService>(cfg, MAX_PAYLOAD)
        }))
        .await
    };
}

fn registration_body() -> Value {
    json!({
        "phone_number": PHONE,
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": "ada@example.com",
        "address": {
            "line1": "1 Main St",
            "city": "Boston",
            "state": "MA",
            "zip": "02134"
        }
    })
}

fn wrong_code(code: &str) -> &'static str {
    if code == "1234" {
        "4321"
    } else {
        "1234"
    }
}

#[actix_web::test]
async fn test_register_returns_created_without_code() {
    let harness = Harness::new();
    let app = init_app!(harness);

    let req = test::TestRequest::post()
        .uri("/api/v1/customers")
        .set_json(registration_body())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["phone_number"], PHONE);
    assert_eq!(body["data"]["state"], "pending_verification");
    assert_eq!(body["data"]["address"]["zip"], "02134");
    assert!(body["data"].get("verification_code").is_none());

    assert_eq!(harness.sms.get_message_count(), 1);
    let code = harness.code_for(PHONE).await;
    assert!(harness.sms.last_message_for(PHONE).unwrap().contains(&code));
}

#[actix_web::test]
async fn test_register_duplicate_is_rejected() {
    let harness = Harness::new();
    let app = init_app!(harness);

    for expected in [StatusCode::CREATED, StatusCode::BAD_REQUEST] {
        let req = test::TestRequest::post()
            .uri("/api/v1/customers")
            .set_json(registration_body())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected);

        if expected == StatusCode::BAD_REQUEST {
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], "CUSTOMER_ALREADY_EXISTS");
        }
    }

    assert_eq!(harness.sms.get_message_count(), 1);
}

#[actix_web::test]
async fn test_register_without_phone_number() {
    let harness = Harness::new();
    let app = init_app!(harness);

    let req = test::TestRequest::post()
        .uri("/api/v1/customers")
        .set_json(json!({ "first_name": "Ada" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "PHONE_MISSING");
    assert_eq!(harness.sms.get_message_count(), 0);
}

#[actix_web::test]
async fn test_register_rejects_letters_in_phone_number() {
    let harness = Harness::new();
    let app = init_app!(harness);

    let mut body = registration_body();
    body["phone_number"] = json!("+1555abc1234567");
    let req = test::TestRequest::post()
        .uri("/api/v1/customers")
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "PHONE_INVALID");
    assert!(harness.repository.is_empty().await);
    assert_eq!(harness.sms.get_message_count(), 0);
}

#[actix_web::test]
async fn test_register_sms_failure_leaves_no_record() {
    let harness = Harness::new();
    harness.sms.set_simulate_failure(true);
    let app = init_app!(harness);

    let req = test::TestRequest::post()
        .uri("/api/v1/customers")
        .set_json(registration_body())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "SMS_ERROR");
    assert!(harness.repository.is_empty().await);
}

#[actix_web::test]
async fn test_malformed_json_is_bad_request() {
    let harness = Harness::new();
    let app = init_app!(harness);

    let req = test::TestRequest::post()
        .uri("/api/v1/customers")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"phone_number\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "BAD_REQUEST");
}

#[actix_web::test]
async fn test_overlong_profile_field_fails_validation() {
    let harness = Harness::new();
    let app = init_app!(harness);

    let mut body = registration_body();
    body["email"] = json!("x".repeat(300));
    let req = test::TestRequest::post()
        .uri("/api/v1/customers")
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(harness.repository.is_empty().await);
}

#[actix_web::test]
async fn test_confirm_echoes_code_in_header() {
    let harness = Harness::new();
    let app = init_app!(harness);

    let req = test::TestRequest::post()
        .uri("/api/v1/customers")
        .set_json(registration_body())
        .to_request();
    test::call_service(&app, req).await;
    let code = harness.code_for(PHONE).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/customers/{}/{}/confirm", PHONE, code))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let header = resp
        .headers()
        .get("vc")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    assert_eq!(header.as_deref(), Some(code.as_str()));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["state"], "verified");
    assert!(body["data"].get("verification_code").is_none());

    let stored = harness.repository.find_by_phone(PHONE).await.unwrap().unwrap();
    assert!(stored.is_verified());
}

#[actix_web::test]
async fn test_confirm_from_body_accepts_numeric_code() {
    let harness = Harness::new();
    let app = init_app!(harness);

    let req = test::TestRequest::post()
        .uri("/api/v1/customers")
        .set_json(registration_body())
        .to_request();
    test::call_service(&app, req).await;
    let code: u16 = harness.code_for(PHONE).await.parse().unwrap();

    let req = test::TestRequest::post()
        .uri("/api/v1/customers/confirm")
        .set_json(json!({ "phone_number": PHONE, "verification_code": code }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("vc"));
}

#[actix_web::test]
async fn test_confirm_with_wrong_code() {
    let harness = Harness::new();
    let app = init_app!(harness);

    let req = test::TestRequest::post()
        .uri("/api/v1/customers")
        .set_json(registration_body())
        .to_request();
    test::call_service(&app, req).await;
    let code = harness.code_for(PHONE).await;

    let req = test::TestRequest::put()
        .uri(&format!(
            "/api/v1/customers/{}/{}/confirm",
            PHONE,
            wrong_code(&code)
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(!resp.headers().contains_key("vc"));
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VERIFICATION_CODE_MISMATCH");

    let stored = harness.repository.find_by_phone(PHONE).await.unwrap().unwrap();
    assert!(!stored.is_verified());
}

#[actix_web::test]
async fn test_confirm_unknown_customer_is_not_found() {
    let harness = Harness::new();
    let app = init_app!(harness);

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/customers/{}/1234/confirm", PHONE))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "CUSTOMER_NOT_FOUND");
}

#[actix_web::test]
async fn test_reconfirm_issues_new_code() {
    let harness = Harness::new();
    let app = init_app!(harness);

    let req = test::TestRequest::post()
        .uri("/api/v1/customers")
        .set_json(registration_body())
        .to_request();
    test::call_service(&app, req).await;
    let first_code = harness.code_for(PHONE).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/customers/{}/{}/confirm", PHONE, first_code))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/customers/{}/{}/reconfirm", PHONE, first_code))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let second_code = harness.code_for(PHONE).await;
    assert_ne!(first_code, second_code);
    assert_eq!(harness.sms.get_message_count(), 2);
    assert!(harness
        .sms
        .last_message_for(PHONE)
        .unwrap()
        .contains(&second_code));

    let stored = harness.repository.find_by_phone(PHONE).await.unwrap().unwrap();
    assert!(!stored.is_verified());

    // The replaced code no longer authorizes anything
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/customers/{}/{}/confirm", PHONE, first_code))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_reconfirm_sms_failure_keeps_new_code() {
    let harness = Harness::new();
    let app = init_app!(harness);

    let req = test::TestRequest::post()
        .uri("/api/v1/customers")
        .set_json(registration_body())
        .to_request();
    test::call_service(&app, req).await;
    let first_code = harness.code_for(PHONE).await;

    harness.sms.set_simulate_failure(true);
    let req = test::TestRequest::post()
        .uri("/api/v1/customers/reconfirm")
        .set_json(json!({ "phone_number": PHONE, "verification_code": first_code }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "SMS_ERROR");
    assert_ne!(harness.code_for(PHONE).await, first_code);
}

#[actix_web::test]
async fn test_update_replaces_profile() {
    let harness = Harness::new();
    let app = init_app!(harness);

    let req = test::TestRequest::post()
        .uri("/api/v1/customers")
        .set_json(registration_body())
        .to_request();
    test::call_service(&app, req).await;
    let code = harness.code_for(PHONE).await;

    let req = test::TestRequest::put()
        .uri("/api/v1/customers")
        .set_json(json!({
            "phone_number": PHONE,
            "verification_code": code,
            "first_name": "Augusta",
            "last_name": "King",
            "address": { "city": "London", "zip": 10001 }
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["first_name"], "Augusta");
    assert_eq!(body["data"]["email"], "");
    assert_eq!(body["data"]["address"]["zip"], "10001");

    // Profile changes do not touch the code
    assert_eq!(harness.code_for(PHONE).await, code);
}

#[actix_web::test]
async fn test_update_with_wrong_code_changes_nothing() {
    let harness = Harness::new();
    let app = init_app!(harness);

    let req = test::TestRequest::post()
        .uri("/api/v1/customers")
        .set_json(registration_body())
        .to_request();
    test::call_service(&app, req).await;
    let code = harness.code_for(PHONE).await;

    let req = test::TestRequest::put()
        .uri("/api/v1/customers")
        .set_json(json!({
            "phone_number": PHONE,
            "verification_code": wrong_code(&code),
            "first_name": "Mallory"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let stored = harness.repository.find_by_phone(PHONE).await.unwrap().unwrap();
    assert_eq!(stored.profile.first_name, "Ada");
}

#[actix_web::test]
async fn test_delete_removes_customer() {
    let harness = Harness::new();
    let app = init_app!(harness);

    let req = test::TestRequest::post()
        .uri("/api/v1/customers")
        .set_json(registration_body())
        .to_request();
    test::call_service(&app, req).await;
    let code = harness.code_for(PHONE).await;

    let uri = format!("/api/v1/customers/{}/{}", PHONE, code);
    let req = test::TestRequest::delete().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(harness.repository.find_by_phone(PHONE).await.unwrap().is_none());

    let req = test::TestRequest::delete().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_delete_from_body() {
    let harness = Harness::new();
    let app = init_app!(harness);

    let req = test::TestRequest::post()
        .uri("/api/v1/customers")
        .set_json(registration_body())
        .to_request();
    test::call_service(&app, req).await;
    let code = harness.code_for(PHONE).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/customers/delete")
        .set_json(json!({ "phone_number": PHONE, "verification_code": code }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["message"], "Customer deleted");
    assert!(harness.repository.is_empty().await);
}

#[actix_web::test]
async fn test_request_id_is_echoed() {
    let harness = Harness::new();
    let app = init_app!(harness);

    let req = test::TestRequest::post()
        .uri("/api/v1/customers")
        .insert_header(("x-request-id", "req-42"))
        .set_json(registration_body())
        .to_request();
    let resp = test::call_service(&app, req).await;

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["request_id"], "req-42");
}

#[actix_web::test]
async fn test_health_reports_store_and_provider() {
    let harness = Harness::new();
    let app = init_app!(harness);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["store"], "memory");
    assert_eq!(body["data"]["sms_provider"], "mock");
}

// Store whose backend is down
struct UnreachableCustomerRepository;

#[async_trait]
impl CustomerRepository for UnreachableCustomerRepository {
    async fn find_by_phone(&self, _phone_number: &str) -> Result<Option<Customer>, DomainError> {
        Err(DomainError::Database("connection refused".to_string()))
    }
    async fn create(&self, _customer: Customer) -> Result<Customer, DomainError> {
        Err(DomainError::Database("connection refused".to_string()))
    }
    async fn update(&self, _customer: Customer) -> Result<Customer, DomainError> {
        Err(DomainError::Database("connection refused".to_string()))
    }
    async fn delete(&self, _customer: &Customer) -> Result<bool, DomainError> {
        Err(DomainError::Database("connection refused".to_string()))
    }
    async fn health_check(&self) -> Result<(), DomainError> {
        Err(DomainError::Database("connection refused".to_string()))
    }
}

#[actix_web::test]
async fn test_health_reports_unreachable_store() {
    let service = CustomerService::new(
        Arc::new(UnreachableCustomerRepository),
        Arc::new(MockSmsService::new()),
        CustomerServiceConfig::default(),
    );
    let state = web::Data::new(AppState::new(Arc::new(service), "mysql"));
    let app = test::init_service(App::new().app_data(state).configure(|cfg| {
        configure_routes::<UnreachableCustomerRepository, MockSmsService>(cfg, MAX_PAYLOAD)
    }))
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["data"]["status"], "unhealthy");
    assert_eq!(body["data"]["store"], "mysql");
}

#[actix_web::test]
async fn test_unknown_route_returns_json_404() {
    let harness = Harness::new();
    let app = test::init_service(create_app(harness.state.clone(), &AppConfig::default())).await;

    let req = test::TestRequest::get().uri("/api/v1/nothing-here").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "NOT_FOUND");
}

#[actix_web::test]
async fn test_full_app_serves_customer_routes() {
    let harness = Harness::new();
    let app = test::init_service(create_app(harness.state.clone(), &AppConfig::default())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/customers")
        .set_json(registration_body())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(harness.repository.len().await, 1);
}
