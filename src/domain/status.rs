use crate::domain::gateway::{CallErrorStatus, PspResult, PurchaseOutcome};
use serde::{Deserialize, Serialize};

/// The closed set of statuses the billing platform understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentPluginStatus {
    Pending,
    Processed,
    Error,
    Canceled,
    Undefined,
}

impl PaymentPluginStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Processed => "PROCESSED",
            Self::Error => "ERROR",
            Self::Canceled => "CANCELED",
            Self::Undefined => "UNDEFINED",
        }
    }

    pub fn from_str_code(code: &str) -> Option<Self> {
        match code {
            "PENDING" => Some(Self::Pending),
            "PROCESSED" => Some(Self::Processed),
            "ERROR" => Some(Self::Error),
            "CANCELED" => Some(Self::Canceled),
            "UNDEFINED" => Some(Self::Undefined),
            _ => None,
        }
    }

    /// A technical call failure never reaches a business outcome. Failures
    /// that provably never hit the gateway map to `Canceled` (safe to retry);
    /// everything where the gateway state is unknown maps to `Undefined`.
    pub fn from_call_error(status: CallErrorStatus) -> Self {
        match status {
            CallErrorStatus::RequestNotSent => Self::Canceled,
            CallErrorStatus::ResponseAboutInvalidRequest => Self::Canceled,
            CallErrorStatus::ResponseNotReceived => Self::Undefined,
            CallErrorStatus::ResponseInvalid => Self::Undefined,
            CallErrorStatus::UnknownFailure => Self::Undefined,
        }
    }

    pub fn from_psp_result(result: PspResult) -> Self {
        match result {
            PspResult::Initialised
            | PspResult::RedirectShopper
            | PspResult::Received
            | PspResult::Pending => Self::Pending,
            PspResult::Authorised => Self::Processed,
            PspResult::Refused | PspResult::Error | PspResult::Cancelled => Self::Error,
        }
    }

    pub fn from_outcome(outcome: &PurchaseOutcome) -> Self {
        match outcome {
            PurchaseOutcome::Business { result, .. } => Self::from_psp_result(*result),
            PurchaseOutcome::TechnicalFailure(status) => Self::from_call_error(*status),
        }
    }

    /// Modification calls carry no business result vocabulary beyond a
    /// "technically successful" boolean; the caller translates it into
    /// `Some(Received)` or `None` before deriving the status.
    pub fn from_optional_psp_result(result: Option<PspResult>) -> Self {
        match result {
            Some(result) => Self::from_psp_result(result),
            None => Self::from_call_error(CallErrorStatus::UnknownFailure),
        }
    }
}
