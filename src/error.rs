use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, PluginError>;

/// Errors surfaced to the billing platform.
///
/// The split between `GatewayCall` and `ResultNotRecorded` is load-bearing:
/// a failed gateway call never moved money and may be retried by the caller,
/// while a persistence failure *after* a successful gateway call must not be,
/// since the gateway already applied the result.
#[derive(Error, Debug)]
pub enum PluginError {
    #[error("gateway call failed: {0}")]
    GatewayCall(String),
    #[error("gateway result for transaction {transaction_id} was applied but could not be recorded: {reason}")]
    ResultNotRecorded { transaction_id: Uuid, reason: String },
    #[error("no successful authorization found for payment {0}")]
    MissingAuthorization(Uuid),
    #[error("invalid transaction attempt: {0}")]
    Validation(String),
    #[error("record store error: {0}")]
    Store(String),
}
