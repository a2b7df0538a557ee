//! Twilio SMS Service Implementation
//!
//! Sends messages through the Twilio Messages REST API with a single
//! form-encoded POST per message. Every request is bounded by the configured
//! timeout and failures are returned to the caller without retrying.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info};

use cv_core::services::SmsNotifier;
use cv_shared::utils::phone::mask_phone_number;
use cv_shared::SmsConfig;

use crate::InfrastructureError;

/// Default Twilio API host
pub const TWILIO_API_BASE_URL: &str = "https://api.twilio.com";

/// Twilio SMS service configuration
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    /// Twilio Account SID
    pub account_sid: String,
    /// Twilio Auth Token
    pub auth_token: String,
    /// From phone number (must be a Twilio phone number)
    pub from_number: String,
    /// Timeout for API requests in seconds
    pub request_timeout_secs: u64,
    /// API host, overridable for testing
    pub api_base_url: String,
}

impl TwilioConfig {
    /// Build and validate Twilio settings from the SMS configuration
    pub fn from_sms_config(config: &SmsConfig) -> Result<Self, InfrastructureError> {
        if config.account_sid.is_empty() {
            return Err(InfrastructureError::Config("TWILIO_ACCOUNT_SID not set".to_string()));
        }
        if config.auth_token.is_empty() {
            return Err(InfrastructureError::Config("TWILIO_AUTH_TOKEN not set".to_string()));
        }
        if !config.from_number.starts_with('+') {
            return Err(InfrastructureError::Config(
                "TWILIO_FROM_NUMBER must be in E.164 format (starting with '+')".to_string(),
            ));
        }

        Ok(Self {
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            from_number: config.from_number.clone(),
            request_timeout_secs: config.request_timeout_secs,
            api_base_url: TWILIO_API_BASE_URL.to_string(),
        })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base_url.trim_end_matches('/'),
            self.account_sid
        )
    }
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    code: Option<i64>,
    message: String,
}

/// Twilio SMS service implementation
pub struct TwilioSmsService {
    client: reqwest::Client,
    config: TwilioConfig,
}

impl TwilioSmsService {
    /// Create a new Twilio SMS service
    pub fn new(config: TwilioConfig) -> Result<Self, InfrastructureError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        info!(
            from = %mask_phone_number(&config.from_number),
            timeout_secs = config.request_timeout_secs,
            "Twilio SMS service initialized"
        );

        Ok(Self { client, config })
    }

    /// Send a message and return its SID
    pub async fn send(&self, to: &str, body: &str) -> Result<String, InfrastructureError> {
        debug!(phone = %mask_phone_number(to), "Sending SMS via Twilio");

        let response = self
            .client
            .post(self.config.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[
                ("To", to),
                ("From", self.config.from_number.as_str()),
                ("Body", body),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let reason = match serde_json::from_str::<ErrorResponse>(&text) {
                Ok(err) => match err.code {
                    Some(code) => format!("{} (code {})", err.message, code),
                    None => err.message,
                },
                Err(_) => text,
            };
            return Err(InfrastructureError::Sms(format!(
                "Twilio returned {}: {}",
                status, reason
            )));
        }

        let message: MessageResponse = response.json().await?;
        Ok(message.sid)
    }
}

#[async_trait]
impl SmsNotifier for TwilioSmsService {
    async fn send_sms(&self, phone_number: &str, message: &str) -> Result<String, String> {
        self.send(phone_number, message).await.map_err(|e| {
            error!(
                target: "sms_service",
                provider = "twilio",
                phone = %mask_phone_number(phone_number),
                error = %e,
                "Twilio SMS request failed"
            );
            e.to_string()
        })
    }

    fn provider_name(&self) -> &str {
        "twilio"
    }
}
