#![allow(dead_code)]

use async_trait::async_trait;
use cardgate::domain::attempt::{TransactionAttempt, TransactionType};
use cardgate::domain::config::GatewayConfig;
use cardgate::domain::gateway::{
    ModificationResult, PaymentData, PspResult, PurchaseOutcome, PurchaseResult,
    SplitSettlementData, UserData,
};
use cardgate::domain::ports::{GatewayClient, RecordStore};
use cardgate::domain::properties::Properties;
use cardgate::domain::record::{PaymentMethodRecord, ResponseRecord};
use cardgate::error::{PluginError, Result};
use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Gateway double whose next responses can be scripted per test. Every call
/// is logged by name so tests can assert on exactly which wire operations
/// ran.
#[derive(Clone, Default)]
pub struct ScriptedGateway {
    calls: Arc<Mutex<Vec<String>>>,
    next_purchase: Arc<Mutex<Option<PurchaseResult>>>,
    next_modification: Arc<Mutex<Option<ModificationResult>>>,
    fail_next: Arc<Mutex<bool>>,
    last_user: Arc<Mutex<Option<UserData>>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_purchase(&self, result: PurchaseResult) {
        *self.next_purchase.lock().unwrap() = Some(result);
    }

    pub fn script_modification(&self, result: ModificationResult) {
        *self.next_modification.lock().unwrap() = Some(result);
    }

    pub fn fail_next_call(&self) {
        *self.fail_next.lock().unwrap() = true;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Shopper data the most recent initial call was made with.
    pub fn last_user_data(&self) -> Option<UserData> {
        self.last_user.lock().unwrap().clone()
    }

    fn check_scripted_failure(&self, name: &str) -> Result<()> {
        self.calls.lock().unwrap().push(name.to_string());
        if std::mem::take(&mut *self.fail_next.lock().unwrap()) {
            return Err(PluginError::GatewayCall(format!(
                "scripted failure in {name}"
            )));
        }
        Ok(())
    }

    fn purchase_response(&self) -> PurchaseResult {
        self.next_purchase
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(authorised_result)
    }

    fn modification_response(&self) -> ModificationResult {
        self.next_modification
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| acknowledged_result("[capture-received]"))
    }
}

#[async_trait]
impl GatewayClient for ScriptedGateway {
    async fn authorize(
        &self,
        _merchant_account: &str,
        _payment: &PaymentData,
        user: &UserData,
        _split_settlement: Option<&SplitSettlementData>,
    ) -> Result<PurchaseResult> {
        self.check_scripted_failure("authorize")?;
        *self.last_user.lock().unwrap() = Some(user.clone());
        Ok(self.purchase_response())
    }

    async fn authorize_3d_secure(
        &self,
        _merchant_account: &str,
        _payment: &PaymentData,
        user: &UserData,
        _split_settlement: Option<&SplitSettlementData>,
    ) -> Result<PurchaseResult> {
        self.check_scripted_failure("authorize_3d_secure")?;
        *self.last_user.lock().unwrap() = Some(user.clone());
        Ok(self.purchase_response())
    }

    async fn credit(
        &self,
        _merchant_account: &str,
        _payment: &PaymentData,
        user: &UserData,
        _split_settlement: Option<&SplitSettlementData>,
    ) -> Result<PurchaseResult> {
        self.check_scripted_failure("credit")?;
        *self.last_user.lock().unwrap() = Some(user.clone());
        Ok(self.purchase_response())
    }

    async fn capture(
        &self,
        _merchant_account: &str,
        _payment: &PaymentData,
        _psp_reference: &str,
        _split_settlement: Option<&SplitSettlementData>,
    ) -> Result<ModificationResult> {
        self.check_scripted_failure("capture")?;
        Ok(self.modification_response())
    }

    async fn cancel(
        &self,
        _merchant_account: &str,
        _payment: &PaymentData,
        _psp_reference: &str,
        _split_settlement: Option<&SplitSettlementData>,
    ) -> Result<ModificationResult> {
        self.check_scripted_failure("cancel")?;
        Ok(self.modification_response())
    }

    async fn refund(
        &self,
        _merchant_account: &str,
        _payment: &PaymentData,
        _psp_reference: &str,
        _split_settlement: Option<&SplitSettlementData>,
    ) -> Result<ModificationResult> {
        self.check_scripted_failure("refund")?;
        Ok(self.modification_response())
    }
}

/// Record store whose writes always fail, for exercising the
/// gateway-succeeded-but-not-recorded path.
pub struct FailingRecordStore;

#[async_trait]
impl RecordStore for FailingRecordStore {
    async fn get_payment_method(
        &self,
        _payment_method_id: Uuid,
    ) -> Result<Option<PaymentMethodRecord>> {
        Ok(None)
    }

    async fn get_successful_authorization(
        &self,
        _payment_id: Uuid,
    ) -> Result<Option<ResponseRecord>> {
        Ok(None)
    }

    async fn get_response(&self, _psp_reference: &str) -> Result<Option<ResponseRecord>> {
        Ok(None)
    }

    async fn get_responses(&self, _payment_id: Uuid) -> Result<Vec<ResponseRecord>> {
        Ok(Vec::new())
    }

    async fn add_record(&self, _record: ResponseRecord) -> Result<ResponseRecord> {
        Err(PluginError::Store("disk full".to_string()))
    }

    async fn update_response(
        &self,
        _transaction_id: Uuid,
        _properties: &Properties,
    ) -> Result<Option<ResponseRecord>> {
        Ok(None)
    }
}

pub fn attempt(transaction_type: TransactionType) -> TransactionAttempt {
    TransactionAttempt {
        account_id: Uuid::new_v4(),
        payment_id: Uuid::new_v4(),
        transaction_id: Uuid::new_v4(),
        payment_method_id: None,
        transaction_type,
        amount: Some(dec!(25.00)),
        currency: Some("EUR".to_string()),
        properties: Properties::new(),
    }
}

pub fn authorised_result() -> PurchaseResult {
    PurchaseResult {
        outcome: PurchaseOutcome::Business {
            result: PspResult::Authorised,
            refusal_reason: None,
        },
        psp_reference: Some("8814450000000001".to_string()),
        auth_code: Some("123456".to_string()),
        form_parameters: Properties::new(),
        additional_data: Properties::new(),
    }
}

pub fn acknowledged_result(response: &str) -> ModificationResult {
    ModificationResult {
        technically_successful: true,
        psp_reference: Some("8814450000000002".to_string()),
        response: Some(response.to_string()),
        additional_data: Properties::new(),
    }
}

pub fn config() -> GatewayConfig {
    GatewayConfig {
        merchant_accounts: [("DE".to_string(), "MerchantDE".to_string())]
            .into_iter()
            .collect(),
        default_merchant_account: Some("MerchantDefault".to_string()),
    }
}
