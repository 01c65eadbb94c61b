use crate::application::engine::PaymentOrchestrator;
use crate::domain::attempt::TransactionAttempt;
use crate::domain::gateway::NotificationPayload;
use crate::domain::plugin_info::PluginTransactionInfo;
use crate::domain::properties::PROPERTY_FROM_HPP;
use crate::error::Result;
use tracing::debug;

/// Acknowledgement body the gateway expects on successful ingestion.
pub const NOTIFICATION_ACCEPTED: &str = "[accepted]";

/// Decodes a raw asynchronous notification body into per-transaction items.
///
/// The wire format is gateway-specific; the orchestrator only needs each
/// item resolved to the billing transaction it concerns plus the property
/// bag carried in the event.
pub trait NotificationDecoder: Send + Sync {
    fn decode(&self, raw: &str) -> Result<Vec<NotificationItem>>;
}

/// One decoded notification event, already matched to its transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationItem {
    pub attempt: TransactionAttempt,
    pub payload: NotificationPayload,
}

/// The result of ingesting one notification body.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationOutcome {
    pub acknowledgement: String,
    pub transactions: Vec<PluginTransactionInfo>,
}

impl PaymentOrchestrator {
    /// Ingests an asynchronous gateway notification: each decoded item is
    /// persisted through the record-only path, as if it had arrived from the
    /// hosted page. Decode failures abort the whole body so the gateway
    /// retries it.
    pub async fn process_notification(
        &self,
        decoder: &dyn NotificationDecoder,
        raw: &str,
    ) -> Result<NotificationOutcome> {
        let items = decoder.decode(raw)?;
        debug!(items = items.len(), "decoded gateway notification");

        let mut transactions = Vec::with_capacity(items.len());
        for item in items {
            let mut attempt = item.attempt;
            attempt.properties = attempt.properties.merge(&item.payload.properties);
            attempt.properties.set(PROPERTY_FROM_HPP, "true");
            transactions.push(self.record_only(&attempt).await?);
        }

        Ok(NotificationOutcome {
            acknowledgement: NOTIFICATION_ACCEPTED.to_string(),
            transactions,
        })
    }
}
