use crate::domain::gateway::{
    ModificationResult, PaymentData, PurchaseResult, SplitSettlementData, UserData,
};
use crate::domain::properties::Properties;
use crate::domain::record::{PaymentMethodRecord, ResponseRecord};
use crate::error::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Account metadata resolved from the host billing platform.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AccountData {
    pub country: Option<String>,
    pub currency: Option<String>,
    pub external_key: Option<String>,
}

/// Wire-level client to the payment gateway. Transport and protocol errors
/// surface as `Err`; classified technical failures come back inside the
/// result's outcome.
#[async_trait]
pub trait GatewayClient: Send + Sync {
    async fn authorize(
        &self,
        merchant_account: &str,
        payment: &PaymentData,
        user: &UserData,
        split_settlement: Option<&SplitSettlementData>,
    ) -> Result<PurchaseResult>;

    async fn authorize_3d_secure(
        &self,
        merchant_account: &str,
        payment: &PaymentData,
        user: &UserData,
        split_settlement: Option<&SplitSettlementData>,
    ) -> Result<PurchaseResult>;

    async fn credit(
        &self,
        merchant_account: &str,
        payment: &PaymentData,
        user: &UserData,
        split_settlement: Option<&SplitSettlementData>,
    ) -> Result<PurchaseResult>;

    async fn capture(
        &self,
        merchant_account: &str,
        payment: &PaymentData,
        psp_reference: &str,
        split_settlement: Option<&SplitSettlementData>,
    ) -> Result<ModificationResult>;

    async fn cancel(
        &self,
        merchant_account: &str,
        payment: &PaymentData,
        psp_reference: &str,
        split_settlement: Option<&SplitSettlementData>,
    ) -> Result<ModificationResult>;

    async fn refund(
        &self,
        merchant_account: &str,
        payment: &PaymentData,
        psp_reference: &str,
        split_settlement: Option<&SplitSettlementData>,
    ) -> Result<ModificationResult>;
}

/// Persistence of attempt+response rows and payment-method metadata.
///
/// The store owns the idempotency contract: `add_record` has
/// insert-or-fetch-existing semantics keyed by billing transaction id, so a
/// retried call neither double-inserts nor double-charges.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get_payment_method(
        &self,
        payment_method_id: Uuid,
    ) -> Result<Option<PaymentMethodRecord>>;

    /// Latest row for the payment that qualifies as a successful
    /// authorization (see [`ResponseRecord::is_successful_authorization`]).
    async fn get_successful_authorization(
        &self,
        payment_id: Uuid,
    ) -> Result<Option<ResponseRecord>>;

    async fn get_response(&self, psp_reference: &str) -> Result<Option<ResponseRecord>>;

    /// All rows for a payment, oldest first; the replay path rebuilds
    /// plugin infos from these.
    async fn get_responses(&self, payment_id: Uuid) -> Result<Vec<ResponseRecord>>;

    async fn add_record(&self, record: ResponseRecord) -> Result<ResponseRecord>;

    /// Merges additional properties into an existing row, e.g. to attach the
    /// PSP reference after the shopper returns from the hosted page. Returns
    /// the updated row, or `None` when no row exists for the transaction.
    async fn update_response(
        &self,
        transaction_id: Uuid,
        properties: &Properties,
    ) -> Result<Option<ResponseRecord>>;
}

/// Read-only account lookup on the host platform.
#[async_trait]
pub trait AccountProvider: Send + Sync {
    async fn get_account(&self, account_id: Uuid) -> Result<AccountData>;
}

pub type GatewayClientBox = Box<dyn GatewayClient>;
pub type RecordStoreBox = Box<dyn RecordStore>;
pub type AccountProviderBox = Box<dyn AccountProvider>;
