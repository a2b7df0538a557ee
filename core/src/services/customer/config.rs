//! Configuration for the customer service

use cv_shared::config::sms::{CODE_PLACEHOLDER, DEFAULT_MESSAGE_TEMPLATE};
use cv_shared::SmsConfig;

use crate::domain::entities::verification_code::VerificationCode;

/// Configuration for the customer service
#[derive(Debug, Clone)]
pub struct CustomerServiceConfig {
    /// SMS body; `{code}` is replaced with the verification code
    pub message_template: String,
    /// Put the previous code back when a re-issue SMS cannot be delivered
    pub restore_code_on_reissue_failure: bool,
}

impl Default for CustomerServiceConfig {
    fn default() -> Self {
        Self {
            message_template: DEFAULT_MESSAGE_TEMPLATE.to_string(),
            restore_code_on_reissue_failure: false,
        }
    }
}

impl CustomerServiceConfig {
    /// Build service settings from the SMS configuration
    pub fn from_sms_config(sms: &SmsConfig) -> Self {
        Self {
            message_template: sms.message_template.clone(),
            restore_code_on_reissue_failure: sms.restore_code_on_failure,
        }
    }

    pub fn with_restore_code_on_reissue_failure(mut self, enabled: bool) -> Self {
        self.restore_code_on_reissue_failure = enabled;
        self
    }

    /// Render the SMS body for a code
    pub fn render_message(&self, code: VerificationCode) -> String {
        self.message_template
            .replace(CODE_PLACEHOLDER, &code.to_string())
    }
}
