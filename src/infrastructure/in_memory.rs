use crate::domain::ports::{AccountData, AccountProvider, RecordStore};
use crate::domain::properties::{
    PROPERTY_AUTH_CODE, PROPERTY_PSP_REFERENCE, PROPERTY_PSP_RESULT, PROPERTY_REASON,
    PROPERTY_RESULT_CODE, Properties,
};
use crate::domain::record::{PaymentMethodRecord, ResponseRecord};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory record store. Append-only vector of response rows plus a
/// payment-method map, both behind async locks so the orchestrator can be
/// shared across tasks.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordStore {
    responses: Arc<RwLock<Vec<ResponseRecord>>>,
    payment_methods: Arc<RwLock<HashMap<Uuid, PaymentMethodRecord>>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_payment_method(&self, record: PaymentMethodRecord) {
        if let Some(payment_method_id) = record.payment_method_id {
            self.payment_methods
                .write()
                .await
                .insert(payment_method_id, record);
        }
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn get_payment_method(
        &self,
        payment_method_id: Uuid,
    ) -> Result<Option<PaymentMethodRecord>> {
        Ok(self
            .payment_methods
            .read()
            .await
            .get(&payment_method_id)
            .cloned())
    }

    async fn get_successful_authorization(
        &self,
        payment_id: Uuid,
    ) -> Result<Option<ResponseRecord>> {
        Ok(self
            .responses
            .read()
            .await
            .iter()
            .rev()
            .find(|record| {
                record.payment_id == payment_id && record.is_successful_authorization()
            })
            .cloned())
    }

    async fn get_response(&self, psp_reference: &str) -> Result<Option<ResponseRecord>> {
        Ok(self
            .responses
            .read()
            .await
            .iter()
            .rev()
            .find(|record| record.psp_reference.as_deref() == Some(psp_reference))
            .cloned())
    }

    async fn get_responses(&self, payment_id: Uuid) -> Result<Vec<ResponseRecord>> {
        Ok(self
            .responses
            .read()
            .await
            .iter()
            .filter(|record| record.payment_id == payment_id)
            .cloned()
            .collect())
    }

    async fn add_record(&self, record: ResponseRecord) -> Result<ResponseRecord> {
        let mut responses = self.responses.write().await;
        // Insert-or-fetch: a retried call for the same billing transaction
        // returns the first stored row untouched.
        if let Some(existing) = responses
            .iter()
            .find(|existing| existing.transaction_id == record.transaction_id)
        {
            return Ok(existing.clone());
        }
        responses.push(record.clone());
        Ok(record)
    }

    async fn update_response(
        &self,
        transaction_id: Uuid,
        properties: &Properties,
    ) -> Result<Option<ResponseRecord>> {
        let mut responses = self.responses.write().await;
        let Some(record) = responses
            .iter_mut()
            .rev()
            .find(|record| record.transaction_id == transaction_id)
        else {
            return Ok(None);
        };

        record.additional_data = record.additional_data.merge(properties);
        if let Some(value) = properties.get(PROPERTY_PSP_REFERENCE) {
            record.psp_reference = Some(value.to_string());
        }
        if let Some(value) = properties.get(PROPERTY_PSP_RESULT) {
            record.psp_result = Some(value.to_string());
        }
        if let Some(value) = properties.get(PROPERTY_RESULT_CODE) {
            record.result_code = Some(value.to_string());
        }
        if let Some(value) = properties.get(PROPERTY_AUTH_CODE) {
            record.auth_code = Some(value.to_string());
        }
        if let Some(value) = properties.get(PROPERTY_REASON) {
            record.refusal_reason = Some(value.to_string());
        }
        Ok(Some(record.clone()))
    }
}

/// Account provider backed by a fixed map, mainly for tests and demos.
/// Unknown accounts resolve to empty account data rather than an error.
#[derive(Debug, Clone, Default)]
pub struct StaticAccountProvider {
    accounts: HashMap<Uuid, AccountData>,
}

impl StaticAccountProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, account_id: Uuid, account: AccountData) -> Self {
        self.accounts.insert(account_id, account);
        self
    }
}

#[async_trait]
impl AccountProvider for StaticAccountProvider {
    async fn get_account(&self, account_id: Uuid) -> Result<AccountData> {
        Ok(self.accounts.get(&account_id).cloned().unwrap_or_default())
    }
}
