use crate::domain::attempt::{TransactionAttempt, TransactionType};
use crate::domain::error_descriptor::{
    modification_error, modification_error_code, purchase_error, purchase_error_code,
    record_error, record_error_code, truncate_error_code,
};
use crate::domain::gateway::{
    GatewayResponse, ModificationResult, NotificationPayload, PspResult, PurchaseResult,
};
use crate::domain::properties::{PROPERTY_FROM_HPP_TRANSACTION_STATUS, Properties};
use crate::domain::record::ResponseRecord;
use crate::domain::status::PaymentPluginStatus;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// The normalized outcome handed back to the billing platform.
///
/// Built either fresh from a gateway response (write path) or from a
/// previously persisted row (replay path); both paths derive the same
/// status, error message, and bounded error code from equivalent data.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginTransactionInfo {
    pub payment_id: Uuid,
    pub transaction_id: Uuid,
    pub transaction_type: TransactionType,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub status: PaymentPluginStatus,
    pub gateway_error: Option<String>,
    pub gateway_error_code: Option<String>,
    pub psp_reference: Option<String>,
    pub auth_code: Option<String>,
    pub created_date: DateTime<Utc>,
    pub effective_date: DateTime<Utc>,
    pub properties: Properties,
}

impl PluginTransactionInfo {
    /// Reconciles any of the three gateway response shapes. This is the
    /// exhaustive seam over the tagged union; the specialized constructors
    /// below exist for callers that already know the shape.
    pub fn from_response(
        attempt: &TransactionAttempt,
        response: &GatewayResponse,
        now: DateTime<Utc>,
    ) -> Self {
        match response {
            GatewayResponse::Purchase(result) => Self::from_purchase(attempt, result, now),
            GatewayResponse::Modification(result) => Self::from_modification(
                attempt,
                result.technically_successful.then_some(PspResult::Received),
                result,
                now,
            ),
            GatewayResponse::Notification(payload) => Self::from_notification(attempt, payload, now),
        }
    }

    pub fn from_purchase(
        attempt: &TransactionAttempt,
        result: &PurchaseResult,
        now: DateTime<Utc>,
    ) -> Self {
        let properties = result.form_parameters.clone();
        let status = status_override(&properties)
            .unwrap_or_else(|| PaymentPluginStatus::from_outcome(&result.outcome));
        Self {
            payment_id: attempt.payment_id,
            transaction_id: attempt.transaction_id,
            transaction_type: attempt.transaction_type,
            amount: attempt.amount,
            currency: attempt.currency.clone(),
            status,
            gateway_error: purchase_error(result),
            gateway_error_code: truncate_error_code(purchase_error_code(result)),
            psp_reference: result.psp_reference.clone(),
            auth_code: result.auth_code.clone(),
            created_date: now,
            effective_date: now,
            properties,
        }
    }

    pub fn from_modification(
        attempt: &TransactionAttempt,
        psp_result: Option<PspResult>,
        response: &ModificationResult,
        now: DateTime<Utc>,
    ) -> Self {
        let properties = response.additional_data.clone();
        let status = status_override(&properties)
            .unwrap_or_else(|| PaymentPluginStatus::from_optional_psp_result(psp_result));
        Self {
            payment_id: attempt.payment_id,
            transaction_id: attempt.transaction_id,
            transaction_type: attempt.transaction_type,
            amount: attempt.amount,
            currency: attempt.currency.clone(),
            status,
            gateway_error: modification_error(response),
            gateway_error_code: truncate_error_code(modification_error_code(response)),
            psp_reference: response.psp_reference.clone(),
            auth_code: None,
            created_date: now,
            effective_date: now,
            properties,
        }
    }

    /// Replay path: rebuild the outcome from a persisted row. Timestamps come
    /// from the row, so re-deriving twice yields identical values.
    pub fn from_record(record: &ResponseRecord) -> Self {
        let properties = record.additional_data.clone();
        let status = status_override(&properties).unwrap_or_else(|| record.derived_status());
        Self {
            payment_id: record.payment_id,
            transaction_id: record.transaction_id,
            transaction_type: record.transaction_type,
            amount: record.amount,
            currency: record.currency.clone(),
            status,
            gateway_error: record_error(record),
            gateway_error_code: truncate_error_code(record_error_code(record)),
            psp_reference: record.psp_reference.clone(),
            auth_code: record.auth_code.clone(),
            created_date: record.created_at,
            effective_date: record.created_at,
            properties,
        }
    }

    fn from_notification(
        attempt: &TransactionAttempt,
        payload: &NotificationPayload,
        now: DateTime<Utc>,
    ) -> Self {
        Self::from_record(&ResponseRecord::from_properties(
            attempt,
            &payload.properties,
            now,
        ))
    }
}

/// Pending payments fabricated before any gateway call carry an explicit
/// status in the property bag; it wins over derivation.
fn status_override(properties: &Properties) -> Option<PaymentPluginStatus> {
    properties
        .get(PROPERTY_FROM_HPP_TRANSACTION_STATUS)
        .and_then(PaymentPluginStatus::from_str_code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::gateway::{CallErrorStatus, PurchaseOutcome};
    use crate::domain::properties::{
        PROPERTY_EXCEPTION_CLASS, PROPERTY_EXCEPTION_MESSAGE, PROPERTY_FROM_HPP,
    };
    use rust_decimal_macros::dec;

    fn attempt() -> TransactionAttempt {
        TransactionAttempt {
            account_id: Uuid::new_v4(),
            payment_id: Uuid::new_v4(),
            transaction_id: Uuid::new_v4(),
            payment_method_id: None,
            transaction_type: TransactionType::Authorize,
            amount: Some(dec!(20.00)),
            currency: Some("GBP".to_string()),
            properties: Properties::new(),
        }
    }

    fn authorised_result() -> PurchaseResult {
        PurchaseResult {
            outcome: PurchaseOutcome::Business {
                result: PspResult::Authorised,
                refusal_reason: None,
            },
            psp_reference: Some("8814450".to_string()),
            auth_code: Some("5678".to_string()),
            form_parameters: Properties::new(),
            additional_data: Properties::new(),
        }
    }

    #[test]
    fn test_fresh_and_replayed_infos_agree() {
        let attempt = attempt();
        let result = authorised_result();
        let now = Utc::now();

        let fresh = PluginTransactionInfo::from_purchase(&attempt, &result, now);
        let record = ResponseRecord::from_purchase(&attempt, &result, now);
        let replayed = PluginTransactionInfo::from_record(&record);

        assert_eq!(fresh.status, replayed.status);
        assert_eq!(fresh.gateway_error, replayed.gateway_error);
        assert_eq!(fresh.gateway_error_code, replayed.gateway_error_code);
        assert_eq!(fresh.psp_reference, replayed.psp_reference);
        assert_eq!(fresh.auth_code, replayed.auth_code);

        // Idempotence: deriving from the same row twice is identical.
        assert_eq!(replayed, PluginTransactionInfo::from_record(&record));
    }

    #[test]
    fn test_technical_failure_replay_equivalence() {
        let attempt = attempt();
        let result = PurchaseResult {
            outcome: PurchaseOutcome::TechnicalFailure(CallErrorStatus::ResponseNotReceived),
            psp_reference: None,
            auth_code: None,
            form_parameters: Properties::new(),
            additional_data: Properties::new()
                .with(PROPERTY_EXCEPTION_MESSAGE, "Read timed out")
                .with(
                    PROPERTY_EXCEPTION_CLASS,
                    "com.example.very.long.package.name.SomeExceptionClass",
                ),
        };
        let now = Utc::now();

        let fresh = PluginTransactionInfo::from_purchase(&attempt, &result, now);
        let record = ResponseRecord::from_purchase(&attempt, &result, now);
        let replayed = PluginTransactionInfo::from_record(&record);

        assert_eq!(fresh.status, PaymentPluginStatus::Undefined);
        assert_eq!(fresh.status, replayed.status);
        assert_eq!(fresh.gateway_error.as_deref(), Some("Read timed out"));
        assert_eq!(fresh.gateway_error, replayed.gateway_error);
        assert_eq!(
            fresh.gateway_error_code.as_deref(),
            Some("c.e.v.l.p.n.SomeExceptionClass")
        );
        assert_eq!(fresh.gateway_error_code, replayed.gateway_error_code);
    }

    #[test]
    fn test_error_code_never_exceeds_budget() {
        let attempt = attempt();
        let result = PurchaseResult {
            outcome: PurchaseOutcome::TechnicalFailure(CallErrorStatus::UnknownFailure),
            psp_reference: None,
            auth_code: None,
            form_parameters: Properties::new(),
            additional_data: Properties::new().with(
                PROPERTY_EXCEPTION_CLASS,
                "SingleSegmentExceptionNameThatIsFarTooLongForTheColumn",
            ),
        };
        let info = PluginTransactionInfo::from_purchase(&attempt, &result, Utc::now());
        assert!(info.gateway_error_code.as_ref().unwrap().len() <= 32);
    }

    #[test]
    fn test_status_override_wins() {
        let attempt = attempt();
        let properties = Properties::new()
            .with(PROPERTY_FROM_HPP, "true")
            .with(PROPERTY_FROM_HPP_TRANSACTION_STATUS, "PENDING");
        let record = ResponseRecord::from_properties(&attempt, &properties, Utc::now());

        // Without the override this row would be UNDEFINED (no PSP result).
        let info = PluginTransactionInfo::from_record(&record);
        assert_eq!(info.status, PaymentPluginStatus::Pending);
    }

    #[test]
    fn test_modification_statuses() {
        let mut capture = attempt();
        capture.transaction_type = TransactionType::Capture;
        let now = Utc::now();

        let accepted = ModificationResult {
            technically_successful: true,
            psp_reference: Some("8814451".to_string()),
            response: Some("[capture-received]".to_string()),
            additional_data: Properties::new(),
        };
        let info = PluginTransactionInfo::from_modification(
            &capture,
            Some(PspResult::Received),
            &accepted,
            now,
        );
        assert_eq!(info.status, PaymentPluginStatus::Pending);
        assert_eq!(info.auth_code, None);

        let failed = ModificationResult {
            technically_successful: false,
            psp_reference: None,
            response: None,
            additional_data: Properties::new().with(PROPERTY_EXCEPTION_MESSAGE, "boom"),
        };
        let info = PluginTransactionInfo::from_modification(&capture, None, &failed, now);
        assert_eq!(info.status, PaymentPluginStatus::Undefined);
        assert_eq!(info.gateway_error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_from_response_is_exhaustive_over_shapes() {
        let attempt = attempt();
        let now = Utc::now();

        let purchase =
            GatewayResponse::Purchase(authorised_result());
        assert_eq!(
            PluginTransactionInfo::from_response(&attempt, &purchase, now).status,
            PaymentPluginStatus::Processed
        );

        let modification = GatewayResponse::Modification(ModificationResult {
            technically_successful: true,
            psp_reference: Some("8814451".to_string()),
            response: Some("[cancel-received]".to_string()),
            additional_data: Properties::new(),
        });
        assert_eq!(
            PluginTransactionInfo::from_response(&attempt, &modification, now).status,
            PaymentPluginStatus::Pending
        );

        let notification = GatewayResponse::Notification(NotificationPayload {
            properties: Properties::new()
                .with("pspResult", "Authorised")
                .with("pspReference", "8814455"),
        });
        let info = PluginTransactionInfo::from_response(&attempt, &notification, now);
        assert_eq!(info.status, PaymentPluginStatus::Processed);
        assert_eq!(info.psp_reference.as_deref(), Some("8814455"));
    }
}
