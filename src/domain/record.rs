use crate::domain::attempt::{TransactionAttempt, TransactionType};
use crate::domain::gateway::{
    CallErrorStatus, ModificationResult, PspResult, PurchaseOutcome, PurchaseResult,
};
use crate::domain::properties::{
    PROPERTY_AUTH_CODE, PROPERTY_CALL_ERROR_STATUS, PROPERTY_PSP_REFERENCE, PROPERTY_PSP_RESULT,
    PROPERTY_REASON, PROPERTY_RESULT_CODE, PROPERTY_SUCCESS, Properties,
};
use crate::domain::status::PaymentPluginStatus;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored payment-method row. A missing row degrades to
/// [`PaymentMethodRecord::empty`] so that callers supplying all payment data
/// through properties keep working.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethodRecord {
    pub payment_method_id: Option<Uuid>,
    pub additional_data: Properties,
}

impl PaymentMethodRecord {
    pub fn empty(payment_method_id: Option<Uuid>) -> Self {
        Self {
            payment_method_id,
            additional_data: Properties::new(),
        }
    }
}

/// One persisted attempt+response row, the unit of the replay path.
///
/// Everything needed to re-derive the plugin status and error descriptor is
/// captured at write time; in particular a technical failure stores its
/// classification and exception details inside `additional_data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub account_id: Uuid,
    pub payment_id: Uuid,
    pub transaction_id: Uuid,
    pub transaction_type: TransactionType,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub psp_result: Option<String>,
    pub result_code: Option<String>,
    pub refusal_reason: Option<String>,
    pub psp_reference: Option<String>,
    pub auth_code: Option<String>,
    pub success: Option<bool>,
    pub additional_data: Properties,
    pub created_at: DateTime<Utc>,
}

impl ResponseRecord {
    pub fn from_purchase(
        attempt: &TransactionAttempt,
        result: &PurchaseResult,
        now: DateTime<Utc>,
    ) -> Self {
        // Form parameters ride along so a hosted-page or 3-D Secure
        // continuation can be replayed from the row alone.
        let mut additional_data = result.additional_data.merge(&result.form_parameters);

        let (psp_result, result_code, refusal_reason) = match &result.outcome {
            PurchaseOutcome::Business {
                result,
                refusal_reason,
            } => (
                Some(result.as_code().to_string()),
                Some(result.as_code().to_string()),
                refusal_reason.clone(),
            ),
            PurchaseOutcome::TechnicalFailure(status) => {
                additional_data.set(PROPERTY_CALL_ERROR_STATUS, status.as_code());
                (None, None, None)
            }
        };

        Self {
            account_id: attempt.account_id,
            payment_id: attempt.payment_id,
            transaction_id: attempt.transaction_id,
            transaction_type: attempt.transaction_type,
            amount: attempt.amount,
            currency: attempt.currency.clone(),
            psp_result,
            result_code,
            refusal_reason,
            psp_reference: result.psp_reference.clone(),
            auth_code: result.auth_code.clone(),
            success: None,
            additional_data,
            created_at: now,
        }
    }

    pub fn from_modification(
        attempt: &TransactionAttempt,
        psp_result: Option<PspResult>,
        response: &ModificationResult,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            account_id: attempt.account_id,
            payment_id: attempt.payment_id,
            transaction_id: attempt.transaction_id,
            transaction_type: attempt.transaction_type,
            amount: attempt.amount,
            currency: attempt.currency.clone(),
            psp_result: psp_result.map(|r| r.as_code().to_string()),
            result_code: response.response.clone(),
            refusal_reason: None,
            psp_reference: response.psp_reference.clone(),
            auth_code: None,
            success: Some(response.technically_successful),
            additional_data: response.additional_data.clone(),
            created_at: now,
        }
    }

    /// Record-only path: hosted-page bootstrap rows and notification
    /// ingestion persist the property bag as the result, with the indexed
    /// columns lifted out by convention key.
    pub fn from_properties(
        attempt: &TransactionAttempt,
        properties: &Properties,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            account_id: attempt.account_id,
            payment_id: attempt.payment_id,
            transaction_id: attempt.transaction_id,
            transaction_type: attempt.transaction_type,
            amount: attempt.amount,
            currency: attempt.currency.clone(),
            psp_result: properties.get(PROPERTY_PSP_RESULT).map(str::to_string),
            result_code: properties.get(PROPERTY_RESULT_CODE).map(str::to_string),
            refusal_reason: properties.get(PROPERTY_REASON).map(str::to_string),
            psp_reference: properties.get(PROPERTY_PSP_REFERENCE).map(str::to_string),
            auth_code: properties.get(PROPERTY_AUTH_CODE).map(str::to_string),
            success: properties
                .get(PROPERTY_SUCCESS)
                .map(|v| v.eq_ignore_ascii_case("true")),
            additional_data: properties.clone(),
            created_at: now,
        }
    }

    /// Replay-path status derivation. A row without a PSP result was a
    /// technical failure; its classification lives in the additional-data
    /// map and defaults to unknown-failure when absent.
    pub fn derived_status(&self) -> PaymentPluginStatus {
        match self.psp_result.as_deref() {
            None | Some("") => {
                let status = self
                    .additional_data
                    .get(PROPERTY_CALL_ERROR_STATUS)
                    .and_then(CallErrorStatus::from_code)
                    .unwrap_or(CallErrorStatus::UnknownFailure);
                PaymentPluginStatus::from_call_error(status)
            }
            Some(psp_result) => {
                let code = self.result_code.as_deref().unwrap_or(psp_result);
                match PspResult::from_code(code) {
                    Some(result) => PaymentPluginStatus::from_psp_result(result),
                    None => PaymentPluginStatus::Undefined,
                }
            }
        }
    }

    /// Whether this row qualifies as the prior authorization a follow-up or
    /// 3-D Secure continuation can build on.
    pub fn is_successful_authorization(&self) -> bool {
        matches!(
            self.transaction_type,
            TransactionType::Authorize | TransactionType::Purchase
        ) && matches!(
            self.derived_status(),
            PaymentPluginStatus::Processed | PaymentPluginStatus::Pending
        )
    }
}
