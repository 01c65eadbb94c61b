use crate::domain::properties::Properties;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Business result codes returned by the payment service provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PspResult {
    Initialised,
    RedirectShopper,
    Received,
    Pending,
    Authorised,
    Refused,
    Error,
    Cancelled,
}

impl PspResult {
    /// Maps a wire result code back to the enum. Modification acknowledgements
    /// ("[capture-received]" and friends) count as `Received`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "Initialised" => Some(Self::Initialised),
            "RedirectShopper" => Some(Self::RedirectShopper),
            "Received" | "[capture-received]" | "[cancel-received]" | "[refund-received]" => {
                Some(Self::Received)
            }
            "Pending" => Some(Self::Pending),
            "Authorised" => Some(Self::Authorised),
            "Refused" => Some(Self::Refused),
            "Error" => Some(Self::Error),
            "Cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn as_code(self) -> &'static str {
        match self {
            Self::Initialised => "Initialised",
            Self::RedirectShopper => "RedirectShopper",
            Self::Received => "Received",
            Self::Pending => "Pending",
            Self::Authorised => "Authorised",
            Self::Refused => "Refused",
            Self::Error => "Error",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// Technical failure classification for a gateway call that never produced a
/// business result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CallErrorStatus {
    RequestNotSent,
    ResponseAboutInvalidRequest,
    ResponseNotReceived,
    ResponseInvalid,
    UnknownFailure,
}

impl CallErrorStatus {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "REQUEST_NOT_SENT" => Some(Self::RequestNotSent),
            "RESPONSE_ABOUT_INVALID_REQUEST" => Some(Self::ResponseAboutInvalidRequest),
            "RESPONSE_NOT_RECEIVED" => Some(Self::ResponseNotReceived),
            "RESPONSE_INVALID" => Some(Self::ResponseInvalid),
            "UNKNOWN_FAILURE" => Some(Self::UnknownFailure),
            _ => None,
        }
    }

    pub fn as_code(self) -> &'static str {
        match self {
            Self::RequestNotSent => "REQUEST_NOT_SENT",
            Self::ResponseAboutInvalidRequest => "RESPONSE_ABOUT_INVALID_REQUEST",
            Self::ResponseNotReceived => "RESPONSE_NOT_RECEIVED",
            Self::ResponseInvalid => "RESPONSE_INVALID",
            Self::UnknownFailure => "UNKNOWN_FAILURE",
        }
    }
}

/// Outcome of a synchronous purchase/authorize call.
///
/// Exactly one of a business result or a technical failure exists per call,
/// so the pair is a sum type rather than two nullable fields.
#[derive(Debug, Clone, PartialEq)]
pub enum PurchaseOutcome {
    Business {
        result: PspResult,
        refusal_reason: Option<String>,
    },
    TechnicalFailure(CallErrorStatus),
}

/// Synchronous result of an initial gateway call (authorize, 3-D Secure
/// continuation, credit).
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseResult {
    pub outcome: PurchaseOutcome,
    pub psp_reference: Option<String>,
    pub auth_code: Option<String>,
    /// Redirect form parameters for a 3-D Secure or hosted-page continuation.
    pub form_parameters: Properties,
    pub additional_data: Properties,
}

/// Synchronous result of a follow-up modification call (capture, cancel,
/// refund). The gateway only acknowledges receipt here; the business outcome
/// arrives later as a notification.
#[derive(Debug, Clone, PartialEq)]
pub struct ModificationResult {
    pub technically_successful: bool,
    pub psp_reference: Option<String>,
    pub response: Option<String>,
    pub additional_data: Properties,
}

/// Asynchronous notification payload, decoded by an external collaborator
/// into convention-keyed properties.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NotificationPayload {
    pub properties: Properties,
}

/// The three response shapes the gateway can produce, reconciled by
/// [`crate::domain::plugin_info::PluginTransactionInfo`].
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayResponse {
    Purchase(PurchaseResult),
    Modification(ModificationResult),
    Notification(NotificationPayload),
}

/// Normalized payment data assembled by the engine for a gateway call.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentData {
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub transaction_external_key: String,
    pub country: Option<String>,
}

/// Shopper data forwarded on initial calls.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserData {
    pub customer_id: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub ip: Option<String>,
}

/// Split-settlement passthrough; the engine forwards it untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SplitSettlementData {
    pub api_version: u32,
    pub items: Vec<SplitSettlementItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SplitSettlementItem {
    pub amount: Decimal,
    pub group: String,
    pub reference: String,
    pub item_type: String,
}
