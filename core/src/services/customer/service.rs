//! Customer lifecycle service implementation

use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use cv_shared::utils::phone::{is_valid_international_phone, mask_phone_number, normalize_phone_number};

use crate::domain::entities::customer::{Customer, CustomerProfile};
use crate::domain::entities::verification_code::VerificationCode;
use crate::errors::{CustomerError, CustomerResult, DomainError};
use crate::repositories::CustomerRepository;

use super::config::CustomerServiceConfig;
use super::traits::SmsNotifier;
use super::types::{ConfirmationOutcome, RegistrationOutcome, ReissueOutcome};

/// Attempts at a read-modify-write before giving up on a contended record
const MAX_WRITE_ATTEMPTS: u32 = 3;

/// Customer service driving registration and phone verification
///
/// Every operation after registration is gated on the caller presenting the
/// customer's active verification code.
pub struct CustomerService<R, N>
where
    R: CustomerRepository + ?Sized,
    N: SmsNotifier + ?Sized,
{
    /// Customer record store
    repository: Arc<R>,
    /// SMS channel for verification codes
    notifier: Arc<N>,
    /// Service configuration
    config: CustomerServiceConfig,
}

impl<R, N> CustomerService<R, N>
where
    R: CustomerRepository + ?Sized,
    N: SmsNotifier + ?Sized,
{
    /// Create a new customer service
    ///
    /// # Arguments
    ///
    /// * `repository` - Customer store implementation
    /// * `notifier` - SMS notifier implementation
    /// * `config` - Service configuration
    pub fn new(repository: Arc<R>, notifier: Arc<N>, config: CustomerServiceConfig) -> Self {
        Self {
            repository,
            notifier,
            config,
        }
    }

    pub fn config(&self) -> &CustomerServiceConfig {
        &self.config
    }

    /// Name of the SMS provider in use
    pub fn notifier_name(&self) -> &str {
        self.notifier.provider_name()
    }

    /// Register a new customer and send them a verification code
    ///
    /// This method:
    /// 1. Validates the phone number
    /// 2. Atomically creates the record with a fresh code
    /// 3. Sends the code via SMS
    /// 4. Deletes the record again if the SMS could not be sent
    ///
    /// # Returns
    ///
    /// * `Ok(RegistrationOutcome)` - The stored, unverified customer
    /// * `Err(CustomerError::AlreadyExists)` - The phone number is already registered
    /// * `Err(CustomerError::NotificationFailed)` - The SMS failed; no record remains
    #[instrument(name = "customer.register", skip_all, fields(phone = %mask_phone_number(phone_number)))]
    pub async fn register(
        &self,
        phone_number: &str,
        profile: CustomerProfile,
    ) -> CustomerResult<RegistrationOutcome> {
        let phone_number = resolve_phone_number(phone_number)?;
        let customer = Customer::register(phone_number, profile);

        let customer = self.repository.create(customer).await.map_err(|e| match e {
            DomainError::Conflict { .. } => {
                warn!(
                    event = "customer_already_exists",
                    "Registration rejected, phone number is already registered"
                );
                CustomerError::AlreadyExists
            }
            other => store_failure("create", other),
        })?;

        info!(
            event = "customer_registered",
            customer_id = %customer.id,
            "Customer record created, sending verification code"
        );

        match self
            .send_code(&customer.phone_number, customer.verification_code)
            .await
        {
            Ok(message_id) => Ok(RegistrationOutcome {
                customer,
                message_id,
            }),
            Err(err) => {
                self.roll_back_registration(&customer).await;
                Err(err)
            }
        }
    }

    /// Look up a customer and check the presented verification code
    ///
    /// # Returns
    ///
    /// * `Ok(Customer)` - The code matches the active one
    /// * `Err(CustomerError::NotFound)` - No customer with this phone number
    /// * `Err(CustomerError::CodeMismatch)` - The code does not match
    #[instrument(name = "customer.authenticate", skip_all, fields(phone = %mask_phone_number(phone_number)))]
    pub async fn authenticate(
        &self,
        phone_number: &str,
        presented_code: &str,
    ) -> CustomerResult<Customer> {
        self.authorize(phone_number, presented_code).await
    }

    /// Mark the customer's phone number as verified
    ///
    /// Confirming an already verified customer succeeds again and refreshes
    /// the verification time.
    #[instrument(name = "customer.confirm", skip_all, fields(phone = %mask_phone_number(phone_number)))]
    pub async fn confirm(
        &self,
        phone_number: &str,
        presented_code: &str,
    ) -> CustomerResult<ConfirmationOutcome> {
        let (_, customer) = self
            .modify("confirm", phone_number, presented_code, Customer::confirm)
            .await?;

        info!(event = "customer_verified", "Customer phone number verified");

        Ok(ConfirmationOutcome {
            verification_code: customer.verification_code,
            verified_at: customer.verified_at.unwrap_or(customer.updated_at),
        })
    }

    /// Replace the verification code and send the new one by SMS
    ///
    /// The customer returns to pending verification. When the SMS fails the
    /// new code stays in place unless `restore_code_on_reissue_failure` is set.
    #[instrument(name = "customer.reconfirm", skip_all, fields(phone = %mask_phone_number(phone_number)))]
    pub async fn reconfirm(
        &self,
        phone_number: &str,
        presented_code: &str,
    ) -> CustomerResult<ReissueOutcome> {
        let (previous, customer) = self
            .modify("reissue", phone_number, presented_code, |customer| {
                customer.reissue_code();
            })
            .await?;

        info!(
            event = "verification_code_reissued",
            "Verification code replaced, sending new code"
        );

        match self
            .send_code(&customer.phone_number, customer.verification_code)
            .await
        {
            Ok(message_id) => Ok(ReissueOutcome { message_id }),
            Err(err) => {
                if self.config.restore_code_on_reissue_failure {
                    self.restore_previous_code(previous, &customer).await;
                }
                Err(err)
            }
        }
    }

    /// Overwrite the customer's profile fields
    #[instrument(name = "customer.update", skip_all, fields(phone = %mask_phone_number(phone_number)))]
    pub async fn update(
        &self,
        phone_number: &str,
        presented_code: &str,
        profile: CustomerProfile,
    ) -> CustomerResult<Customer> {
        let (_, customer) = self
            .modify("update", phone_number, presented_code, |customer| {
                customer.update_profile(profile.clone())
            })
            .await?;

        info!(event = "customer_updated", "Customer profile updated");
        Ok(customer)
    }

    /// Remove the customer record
    #[instrument(name = "customer.delete", skip_all, fields(phone = %mask_phone_number(phone_number)))]
    pub async fn delete(&self, phone_number: &str, presented_code: &str) -> CustomerResult<()> {
        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            let customer = self.authorize(phone_number, presented_code).await?;

            match self.repository.delete(&customer).await {
                Ok(true) => {
                    info!(event = "customer_deleted", "Customer deleted");
                    return Ok(());
                }
                // Removed by a concurrent request after authentication
                Ok(false) => return Err(CustomerError::NotFound),
                Err(DomainError::StaleRecord { .. }) => write_conflict("delete", attempt),
                Err(e) => return Err(store_failure("delete", e)),
            }
        }

        Err(contention_failure("delete"))
    }

    /// Check that the customer store is reachable
    pub async fn store_health(&self) -> CustomerResult<()> {
        self.repository
            .health_check()
            .await
            .map_err(|e| store_failure("health_check", e))
    }

    /// Authorize the request, apply `change` to the record and write it back.
    ///
    /// The write only lands if nobody else wrote the record since it was read.
    /// Otherwise the record is read and authorized again, so a code replaced
    /// in the meantime turns the request into a `CodeMismatch`.
    ///
    /// Returns the record as read and as stored.
    async fn modify<F>(
        &self,
        operation: &'static str,
        phone_number: &str,
        presented_code: &str,
        mut change: F,
    ) -> CustomerResult<(Customer, Customer)>
    where
        F: FnMut(&mut Customer) + Send,
    {
        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            let current = self.authorize(phone_number, presented_code).await?;
            let mut customer = current.clone();
            change(&mut customer);

            match self.repository.update(customer).await {
                Ok(stored) => return Ok((current, stored)),
                Err(DomainError::StaleRecord { .. }) => write_conflict(operation, attempt),
                Err(e) => return Err(store_failure(operation, e)),
            }
        }

        Err(contention_failure(operation))
    }

    async fn authorize(&self, phone_number: &str, presented_code: &str) -> CustomerResult<Customer> {
        let phone_number = resolve_phone_number(phone_number)?;

        let customer = self
            .repository
            .find_by_phone(&phone_number)
            .await
            .map_err(|e| store_failure("find", e))?
            .ok_or_else(|| {
                warn!(
                    event = "suspicious_access",
                    reason = "unknown_phone_number",
                    "Request for a customer that does not exist"
                );
                CustomerError::NotFound
            })?;

        if !customer.code_matches(presented_code) {
            warn!(
                event = "suspicious_access",
                reason = "code_mismatch",
                "Request presented an invalid verification code"
            );
            return Err(CustomerError::CodeMismatch);
        }

        Ok(customer)
    }

    async fn send_code(&self, phone_number: &str, code: VerificationCode) -> CustomerResult<String> {
        let message = self.config.render_message(code);

        match self.notifier.send_sms(phone_number, &message).await {
            Ok(message_id) => {
                info!(
                    event = "sms_sent",
                    provider = self.notifier.provider_name(),
                    message_id = %message_id,
                    "Verification code sent"
                );
                Ok(message_id)
            }
            Err(reason) => {
                error!(
                    event = "sms_send_failed",
                    provider = self.notifier.provider_name(),
                    error = %reason,
                    "Failed to send verification code"
                );
                Err(CustomerError::NotificationFailed { reason })
            }
        }
    }

    async fn roll_back_registration(&self, customer: &Customer) {
        match self.repository.delete(customer).await {
            Ok(_) => warn!(
                event = "registration_rolled_back",
                "Customer record removed after verification SMS failed"
            ),
            Err(e) => error!(
                event = "registration_rollback_failed",
                error = %e,
                "Failed to remove customer record after verification SMS failed"
            ),
        }
    }

    /// Put the pre-reissue record back unless it changed after the reissue
    async fn restore_previous_code(&self, previous: Customer, reissued: &Customer) {
        let restored = Customer {
            version: reissued.version,
            ..previous
        };

        match self.repository.update(restored).await {
            Ok(_) => warn!(
                event = "reissue_rolled_back",
                "Previous verification code restored after SMS failed"
            ),
            Err(DomainError::StaleRecord { .. }) => warn!(
                event = "reissue_rollback_skipped",
                "Customer changed after the reissue, keeping the new code"
            ),
            Err(e) => error!(
                event = "reissue_rollback_failed",
                error = %e,
                "Failed to restore previous verification code"
            ),
        }
    }
}

/// Normalize and validate an incoming phone number
fn resolve_phone_number(raw: &str) -> CustomerResult<String> {
    if raw.trim().is_empty() {
        return Err(CustomerError::MissingPhoneNumber);
    }

    let phone_number = normalize_phone_number(raw);
    if !is_valid_international_phone(&phone_number) {
        return Err(CustomerError::InvalidPhoneNumber);
    }

    Ok(phone_number)
}

fn write_conflict(operation: &'static str, attempt: u32) {
    warn!(
        event = "customer_write_conflict",
        operation,
        attempt,
        "Customer changed during the request, retrying"
    );
}

fn contention_failure(operation: &'static str) -> CustomerError {
    store_failure(
        operation,
        DomainError::StaleRecord {
            resource: "Customer".to_string(),
        },
    )
}

fn store_failure(operation: &'static str, err: DomainError) -> CustomerError {
    if !matches!(err, DomainError::NotFound { .. } | DomainError::Conflict { .. }) {
        error!(
            event = "customer_store_failed",
            operation,
            error = %err,
            "Customer store operation failed"
        );
    }
    CustomerError::from(err)
}
