use crate::domain::properties::{
    PROPERTY_FROM_HPP, PROPERTY_PAYMENT_PROCESSOR_ACCOUNT_ID, Properties,
};
use crate::error::{PluginError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Authorize,
    Capture,
    Purchase,
    Void,
    Refund,
    Credit,
}

impl TransactionType {
    /// Initial types create a new gateway-side transaction.
    pub fn is_initial(self) -> bool {
        matches!(self, Self::Authorize | Self::Purchase | Self::Credit)
    }

    /// Follow-up types modify a previously authorized transaction.
    pub fn is_follow_up(self) -> bool {
        !self.is_initial()
    }
}

/// One billing-side transaction handed to the orchestrator.
///
/// Constructed fresh per billing-platform operation and treated as immutable
/// for the duration of the call. The property bag carries gateway-specific
/// hints such as the hosted-page origin flag or a merchant account override.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionAttempt {
    pub account_id: Uuid,
    pub payment_id: Uuid,
    pub transaction_id: Uuid,
    pub payment_method_id: Option<Uuid>,
    pub transaction_type: TransactionType,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub properties: Properties,
}

impl TransactionAttempt {
    /// True for pending-payment bootstrap rows and notification ingestion;
    /// such attempts never trigger a gateway call.
    pub fn from_hosted_page(&self) -> bool {
        self.properties.get_bool(PROPERTY_FROM_HPP)
    }

    pub fn merchant_account_override(&self) -> Option<&str> {
        self.properties.get(PROPERTY_PAYMENT_PROCESSOR_ACCOUNT_ID)
    }

    /// Amount and currency are required for everything but VOID.
    pub fn validate(&self) -> Result<()> {
        if self.transaction_type == TransactionType::Void {
            return Ok(());
        }
        if self.amount.is_none() {
            return Err(PluginError::Validation(format!(
                "amount is required for {:?} transaction {}",
                self.transaction_type, self.transaction_id
            )));
        }
        if self.currency.as_deref().is_none_or(str::is_empty) {
            return Err(PluginError::Validation(format!(
                "currency is required for {:?} transaction {}",
                self.transaction_type, self.transaction_id
            )));
        }
        Ok(())
    }
}
