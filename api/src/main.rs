use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing::{info, warn};

use cv_api::app::create_app;
use cv_api::routes::customers::AppState;
use cv_api::telemetry::init_tracing;
use cv_core::{CustomerRepository, CustomerService, CustomerServiceConfig, SmsNotifier};
use cv_infra::{create_customer_repository, create_sms_notifier};
use cv_shared::{AppConfig, Environment, SmsProvider};

type DynAppState = AppState<dyn CustomerRepository, dyn SmsNotifier>;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Environment-specific file first, values already set are not overridden
    dotenvy::from_filename(Environment::from_env().env_file()).ok();
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    init_tracing(&config.logging);

    if let Ok(provider) = std::env::var("SMS_PROVIDER") {
        if provider.parse::<SmsProvider>().is_err() {
            warn!(provider = %provider, "Unknown SMS_PROVIDER, using the mock provider");
        }
    }

    config.validate().context("invalid configuration")?;

    info!(
        environment = ?config.environment,
        store = %config.storage.backend,
        "Starting customer verification API"
    );

    let repository = create_customer_repository(&config)
        .await
        .context("failed to create customer store")?;
    let notifier = create_sms_notifier(&config.sms).context("failed to create SMS notifier")?;

    let customer_service = Arc::new(CustomerService::new(
        repository,
        notifier,
        CustomerServiceConfig::from_sms_config(&config.sms),
    ));
    let state: web::Data<DynAppState> = web::Data::new(AppState::new(
        customer_service,
        config.storage.backend.to_string(),
    ));

    let bind_address = config.server.bind_address();
    info!(address = %bind_address, "Server will bind");

    let app_config = config.clone();
    let mut server = HttpServer::new(move || create_app(state.clone(), &app_config))
        .keep_alive(Duration::from_secs(config.server.keep_alive));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await?;

    info!("Server stopped");
    Ok(())
}
