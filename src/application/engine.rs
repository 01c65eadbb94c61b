use crate::domain::attempt::{TransactionAttempt, TransactionType};
use crate::domain::config::GatewayConfig;
use crate::domain::gateway::{PaymentData, PspResult, UserData};
use crate::domain::plugin_info::PluginTransactionInfo;
use crate::domain::ports::{AccountData, AccountProviderBox, GatewayClientBox, RecordStoreBox};
use crate::domain::properties::{
    PROPERTY_CAPTURE_DELAY_HOURS, PROPERTY_COUNTRY, PROPERTY_CUSTOMER_ID, PROPERTY_EMAIL,
    PROPERTY_FIRST_NAME, PROPERTY_IP, PROPERTY_LAST_NAME, PROPERTY_MERCHANT_REFERENCE, Properties,
};
use crate::domain::record::{PaymentMethodRecord, ResponseRecord};
use crate::domain::routing::{RouteMode, route};
use crate::error::{PluginError, Result};
use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Gateway operations available on the follow-up path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModificationOperation {
    Capture,
    Cancel,
    Refund,
}

/// The main entry point for gateway-mediated payment transactions.
///
/// Per call the engine resolves the routing mode, makes at most one gateway
/// call, persists exactly one response row, and returns the reconciled
/// [`PluginTransactionInfo`]. It owns no state beyond its collaborators and
/// may serve concurrent calls for different billing transactions.
pub struct PaymentOrchestrator {
    gateway: GatewayClientBox,
    records: RecordStoreBox,
    accounts: AccountProviderBox,
    config: GatewayConfig,
}

impl PaymentOrchestrator {
    pub fn new(
        gateway: GatewayClientBox,
        records: RecordStoreBox,
        accounts: AccountProviderBox,
        config: GatewayConfig,
    ) -> Self {
        Self {
            gateway,
            records,
            accounts,
            config,
        }
    }

    pub async fn authorize(&self, attempt: TransactionAttempt) -> Result<PluginTransactionInfo> {
        self.check_type(&attempt, TransactionType::Authorize)?;
        self.execute_initial(attempt).await
    }

    pub async fn credit(&self, attempt: TransactionAttempt) -> Result<PluginTransactionInfo> {
        self.check_type(&attempt, TransactionType::Credit)?;
        self.execute_initial(attempt).await
    }

    /// Purchases first look for an existing row for the transaction: after a
    /// hosted-page redirect the row already exists and only needs the extra
    /// properties (such as the PSP reference) merged in. Only when no row
    /// exists does this trigger an actual auto-capture call.
    pub async fn purchase(&self, attempt: TransactionAttempt) -> Result<PluginTransactionInfo> {
        self.check_type(&attempt, TransactionType::Purchase)?;

        if let Some(record) = self
            .records
            .update_response(attempt.transaction_id, &attempt.properties)
            .await?
        {
            return Ok(PluginTransactionInfo::from_record(&record));
        }

        let mut attempt = attempt;
        if !attempt.properties.contains(PROPERTY_CAPTURE_DELAY_HOURS) {
            attempt.properties.set(PROPERTY_CAPTURE_DELAY_HOURS, "0");
        }
        self.execute_initial(attempt).await
    }

    pub async fn capture(&self, attempt: TransactionAttempt) -> Result<PluginTransactionInfo> {
        self.check_type(&attempt, TransactionType::Capture)?;
        self.execute_follow_up(attempt, ModificationOperation::Capture)
            .await
    }

    pub async fn void(&self, attempt: TransactionAttempt) -> Result<PluginTransactionInfo> {
        self.check_type(&attempt, TransactionType::Void)?;
        self.execute_follow_up(attempt, ModificationOperation::Cancel)
            .await
    }

    pub async fn refund(&self, attempt: TransactionAttempt) -> Result<PluginTransactionInfo> {
        self.check_type(&attempt, TransactionType::Refund)?;
        self.execute_follow_up(attempt, ModificationOperation::Refund)
            .await
    }

    /// Replay path: rebuild the plugin infos for every persisted row of a
    /// payment.
    pub async fn payment_info(&self, payment_id: Uuid) -> Result<Vec<PluginTransactionInfo>> {
        let records = self.records.get_responses(payment_id).await?;
        Ok(records.iter().map(PluginTransactionInfo::from_record).collect())
    }

    async fn execute_initial(&self, attempt: TransactionAttempt) -> Result<PluginTransactionInfo> {
        let from_hosted_page = attempt.from_hosted_page();
        let has_matching_authorization =
            !from_hosted_page && self.has_matching_authorization(&attempt).await;
        let mode = route(
            attempt.transaction_type,
            from_hosted_page,
            has_matching_authorization,
        );
        debug!(
            transaction_id = %attempt.transaction_id,
            transaction_type = ?attempt.transaction_type,
            mode = ?mode,
            "routed initial transaction"
        );

        if mode == RouteMode::RecordOnly {
            return self.record_only(&attempt).await;
        }
        attempt.validate()?;

        let account = self.accounts.get_account(attempt.account_id).await?;
        let method = self.payment_method(&attempt).await;
        // Extra hints stored with the payment method (such as the customer
        // id) back the attempt's own properties.
        let properties = method.additional_data.merge(&attempt.properties);
        let payment_data = build_payment_data(&attempt, &account, &properties);
        let user_data = build_user_data(&account, &properties);
        let merchant_account = self.merchant_account(&attempt, &payment_data)?;
        let now = Utc::now();

        let result = match mode {
            RouteMode::SecureContinuation => {
                self.gateway
                    .authorize_3d_secure(&merchant_account, &payment_data, &user_data, None)
                    .await?
            }
            RouteMode::CreditCall => {
                self.gateway
                    .credit(&merchant_account, &payment_data, &user_data, None)
                    .await?
            }
            RouteMode::AuthorizeOrPurchaseCall => {
                self.gateway
                    .authorize(&merchant_account, &payment_data, &user_data, None)
                    .await?
            }
            // route() never yields these for a non-hosted-page initial type.
            RouteMode::RecordOnly | RouteMode::ModificationCall => unreachable!(),
        };

        let record = ResponseRecord::from_purchase(&attempt, &result, now);
        match self.records.add_record(record).await {
            Ok(_) => Ok(PluginTransactionInfo::from_purchase(&attempt, &result, now)),
            Err(e) => Err(PluginError::ResultNotRecorded {
                transaction_id: attempt.transaction_id,
                reason: e.to_string(),
            }),
        }
    }

    async fn execute_follow_up(
        &self,
        attempt: TransactionAttempt,
        operation: ModificationOperation,
    ) -> Result<PluginTransactionInfo> {
        let mode = route(attempt.transaction_type, attempt.from_hosted_page(), false);
        debug!(
            transaction_id = %attempt.transaction_id,
            transaction_type = ?attempt.transaction_type,
            mode = ?mode,
            "routed follow-up transaction"
        );

        if mode == RouteMode::RecordOnly {
            return self.record_only(&attempt).await;
        }
        attempt.validate()?;

        let previous = self
            .records
            .get_successful_authorization(attempt.payment_id)
            .await?
            .ok_or(PluginError::MissingAuthorization(attempt.payment_id))?;
        let psp_reference = previous
            .psp_reference
            .ok_or(PluginError::MissingAuthorization(attempt.payment_id))?;

        let account = self.accounts.get_account(attempt.account_id).await?;
        let payment_data = build_payment_data(&attempt, &account, &attempt.properties);
        let merchant_account = self.merchant_account(&attempt, &payment_data)?;
        let now = Utc::now();

        let response = match operation {
            ModificationOperation::Capture => {
                self.gateway
                    .capture(&merchant_account, &payment_data, &psp_reference, None)
                    .await?
            }
            ModificationOperation::Cancel => {
                self.gateway
                    .cancel(&merchant_account, &payment_data, &psp_reference, None)
                    .await?
            }
            ModificationOperation::Refund => {
                self.gateway
                    .refund(&merchant_account, &payment_data, &psp_reference, None)
                    .await?
            }
        };

        // The modification acknowledgement carries no business vocabulary;
        // technically-successful maps to Received (asynchronously confirmed
        // later), anything else goes through the unknown-failure branch.
        let psp_result = response
            .technically_successful
            .then_some(PspResult::Received);

        let record = ResponseRecord::from_modification(&attempt, psp_result, &response, now);
        match self.records.add_record(record).await {
            Ok(_) => Ok(PluginTransactionInfo::from_modification(
                &attempt, psp_result, &response, now,
            )),
            Err(e) => Err(PluginError::ResultNotRecorded {
                transaction_id: attempt.transaction_id,
                reason: e.to_string(),
            }),
        }
    }

    /// Persists the attempt's property bag as the response row, without any
    /// gateway interaction.
    pub(crate) async fn record_only(
        &self,
        attempt: &TransactionAttempt,
    ) -> Result<PluginTransactionInfo> {
        let record = ResponseRecord::from_properties(attempt, &attempt.properties, Utc::now());
        let stored = self.records.add_record(record).await?;
        Ok(PluginTransactionInfo::from_record(&stored))
    }

    async fn has_matching_authorization(&self, attempt: &TransactionAttempt) -> bool {
        match self
            .records
            .get_successful_authorization(attempt.payment_id)
            .await
        {
            Ok(Some(previous)) => previous.transaction_id == attempt.transaction_id,
            Ok(None) => false,
            Err(e) => {
                warn!(
                    payment_id = %attempt.payment_id,
                    error = %e,
                    "failed to look up previous authorization"
                );
                false
            }
        }
    }

    async fn payment_method(&self, attempt: &TransactionAttempt) -> PaymentMethodRecord {
        let Some(payment_method_id) = attempt.payment_method_id else {
            return PaymentMethodRecord::empty(None);
        };
        match self.records.get_payment_method(payment_method_id).await {
            Ok(Some(record)) => record,
            Ok(None) => PaymentMethodRecord::empty(Some(payment_method_id)),
            Err(e) => {
                warn!(
                    payment_method_id = %payment_method_id,
                    error = %e,
                    "failed to retrieve payment method"
                );
                PaymentMethodRecord::empty(Some(payment_method_id))
            }
        }
    }

    fn merchant_account(
        &self,
        attempt: &TransactionAttempt,
        payment_data: &PaymentData,
    ) -> Result<String> {
        if let Some(account) = attempt.merchant_account_override() {
            return Ok(account.to_string());
        }
        self.config
            .merchant_account(payment_data.country.as_deref())
            .map(str::to_string)
            .ok_or_else(|| {
                PluginError::Validation(format!(
                    "no merchant account configured for country {:?}",
                    payment_data.country
                ))
            })
    }

    fn check_type(&self, attempt: &TransactionAttempt, expected: TransactionType) -> Result<()> {
        if attempt.transaction_type == expected {
            Ok(())
        } else {
            Err(PluginError::Validation(format!(
                "expected a {:?} attempt, got {:?}",
                expected, attempt.transaction_type
            )))
        }
    }
}

fn build_payment_data(
    attempt: &TransactionAttempt,
    account: &AccountData,
    properties: &Properties,
) -> PaymentData {
    let country = properties
        .get(PROPERTY_COUNTRY)
        .map(str::to_string)
        .or_else(|| account.country.clone());
    let transaction_external_key = properties
        .get(PROPERTY_MERCHANT_REFERENCE)
        .map(str::to_string)
        .unwrap_or_else(|| attempt.transaction_id.to_string());
    PaymentData {
        amount: attempt.amount,
        currency: attempt
            .currency
            .clone()
            .or_else(|| account.currency.clone()),
        transaction_external_key,
        country,
    }
}

fn build_user_data(account: &AccountData, properties: &Properties) -> UserData {
    UserData {
        customer_id: properties
            .get(PROPERTY_CUSTOMER_ID)
            .map(str::to_string)
            .or_else(|| account.external_key.clone()),
        email: properties.get(PROPERTY_EMAIL).map(str::to_string),
        first_name: properties.get(PROPERTY_FIRST_NAME).map(str::to_string),
        last_name: properties.get(PROPERTY_LAST_NAME).map(str::to_string),
        ip: properties.get(PROPERTY_IP).map(str::to_string),
    }
}
