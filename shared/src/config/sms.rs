//! SMS provider configuration

use serde::{Deserialize, Serialize};

/// Placeholder replaced by the verification code in SMS templates
pub const CODE_PLACEHOLDER: &str = "{code}";

/// Default verification message
pub const DEFAULT_MESSAGE_TEMPLATE: &str = "Your verification code is {code}";

/// Supported SMS providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SmsProvider {
    /// Logs messages instead of sending them
    #[default]
    Mock,
    /// Twilio Messages REST API
    Twilio,
}

impl std::str::FromStr for SmsProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" => Ok(SmsProvider::Mock),
            "twilio" => Ok(SmsProvider::Twilio),
            _ => Err(format!("Unknown SMS provider: {}", s)),
        }
    }
}

/// SMS service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmsConfig {
    /// SMS service provider
    pub provider: SmsProvider,

    /// Twilio account SID
    #[serde(default)]
    pub account_sid: String,

    /// Twilio auth token
    #[serde(default, skip_serializing)]
    pub auth_token: String,

    /// Sender phone number (E.164)
    #[serde(default)]
    pub from_number: String,

    /// Timeout for a single provider request in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Message body; must contain `{code}`
    #[serde(default = "default_message_template")]
    pub message_template: String,

    /// Restore the previous code when a re-issued code cannot be delivered
    #[serde(default)]
    pub restore_code_on_failure: bool,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            provider: SmsProvider::Mock,
            account_sid: String::new(),
            auth_token: String::new(),
            from_number: String::new(),
            request_timeout_secs: default_request_timeout_secs(),
            message_template: default_message_template(),
            restore_code_on_failure: false,
        }
    }
}

impl SmsConfig {
    /// Create from environment variables
    ///
    /// An unrecognised `SMS_PROVIDER` falls back to the mock provider.
    pub fn from_env() -> Self {
        let provider = std::env::var("SMS_PROVIDER")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or_default();

        Self {
            provider,
            account_sid: std::env::var("TWILIO_ACCOUNT_SID").unwrap_or_default(),
            auth_token: std::env::var("TWILIO_AUTH_TOKEN").unwrap_or_default(),
            from_number: std::env::var("TWILIO_FROM_NUMBER").unwrap_or_default(),
            request_timeout_secs: std::env::var("SMS_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_request_timeout_secs),
            message_template: std::env::var("SMS_MESSAGE_TEMPLATE")
                .unwrap_or_else(|_| default_message_template()),
            restore_code_on_failure: std::env::var("SMS_RESTORE_CODE_ON_FAILURE")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_message_template() -> String {
    DEFAULT_MESSAGE_TEMPLATE.to_string()
}
