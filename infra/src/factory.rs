//! Construction of the customer store and SMS notifier selected by configuration

use std::sync::Arc;

use tracing::info;

use cv_core::repositories::{CustomerRepository, InMemoryCustomerRepository};
use cv_core::services::SmsNotifier;
use cv_shared::{AppConfig, SmsConfig, SmsProvider, StorageBackend};

use crate::sms::{MockSmsService, TwilioConfig, TwilioSmsService};
use crate::InfrastructureError;

/// Create the SMS notifier for the configured provider
pub fn create_sms_notifier(config: &SmsConfig) -> Result<Arc<dyn SmsNotifier>, InfrastructureError> {
    let notifier: Arc<dyn SmsNotifier> = match config.provider {
        SmsProvider::Mock => Arc::new(MockSmsService::new()),
        SmsProvider::Twilio => {
            let twilio_config = TwilioConfig::from_sms_config(config)?;
            Arc::new(TwilioSmsService::new(twilio_config)?)
        }
    };

    info!(provider = notifier.provider_name(), "SMS notifier created");
    Ok(notifier)
}

/// Create the customer store for the configured backend
///
/// The MySQL backend runs pending schema migrations before returning.
pub async fn create_customer_repository(
    config: &AppConfig,
) -> Result<Arc<dyn CustomerRepository>, InfrastructureError> {
    info!(backend = %config.storage.backend, "Creating customer store");

    match config.storage.backend {
        StorageBackend::Memory => Ok(Arc::new(InMemoryCustomerRepository::new())),
        StorageBackend::MySql => mysql_repository(config).await,
        StorageBackend::Redis => redis_repository(config).await,
    }
}

#[cfg(feature = "mysql")]
async fn mysql_repository(
    config: &AppConfig,
) -> Result<Arc<dyn CustomerRepository>, InfrastructureError> {
    use crate::database::{DatabasePool, MySqlCustomerRepository};

    let pool = DatabasePool::new(config.database.clone()).await?;
    pool.run_migrations().await?;
    Ok(Arc::new(MySqlCustomerRepository::new(pool.get_pool().clone())))
}

#[cfg(not(feature = "mysql"))]
async fn mysql_repository(
    _config: &AppConfig,
) -> Result<Arc<dyn CustomerRepository>, InfrastructureError> {
    Err(InfrastructureError::Config(
        "MySQL customer store requires the `mysql` feature".to_string(),
    ))
}

#[cfg(feature = "redis-store")]
async fn redis_repository(
    config: &AppConfig,
) -> Result<Arc<dyn CustomerRepository>, InfrastructureError> {
    use crate::cache::{RedisClient, RedisCustomerRepository};

    let client = RedisClient::new(config.cache.clone()).await?;
    Ok(Arc::new(RedisCustomerRepository::new(client)))
}

#[cfg(not(feature = "redis-store"))]
async fn redis_repository(
    _config: &AppConfig,
) -> Result<Arc<dyn CustomerRepository>, InfrastructureError> {
    Err(InfrastructureError::Config(
        "Redis customer store requires the `redis-store` feature".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_mock_notifier() {
        let notifier = create_sms_notifier(&SmsConfig::default()).unwrap();
        assert_eq!(notifier.provider_name(), "mock");
    }

    #[test]
    fn test_create_twilio_notifier() {
        let config = SmsConfig {
            provider: SmsProvider::Twilio,
            account_sid: "AC123".to_string(),
            auth_token: "token".to_string(),
            from_number: "+15550001111".to_string(),
            ..Default::default()
        };

        let notifier = create_sms_notifier(&config).unwrap();
        assert_eq!(notifier.provider_name(), "twilio");
    }

    #[test]
    fn test_create_twilio_notifier_without_credentials_fails() {
        let config = SmsConfig {
            provider: SmsProvider::Twilio,
            ..Default::default()
        };

        let result = create_sms_notifier(&config);
        assert!(matches!(result, Err(InfrastructureError::Config(_))));
    }

    #[tokio::test]
    async fn test_create_memory_repository() {
        let config = AppConfig::default();
        let repository = create_customer_repository(&config).await.unwrap();

        assert!(repository.find_by_phone("+15551234567").await.unwrap().is_none());
    }
}
