use crate::domain::attempt::TransactionType;

/// The call mode selected for one transaction attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMode {
    /// No gateway call; persist the property bag as the result. Used for
    /// pending-payment bootstrap and notification ingestion.
    RecordOnly,
    /// Resume an interrupted 3-D Secure flow instead of opening a new
    /// authorization.
    SecureContinuation,
    CreditCall,
    AuthorizeOrPurchaseCall,
    /// Follow-up modification of a previously authorized transaction.
    ModificationCall,
}

/// Pure routing decision, testable without network or storage.
///
/// `has_matching_authorization` is true when a prior successful AUTHORIZE
/// row exists for the same billing payment with the same transaction id.
/// The hosted-page flag wins over the continuation check: pending-payment
/// bootstrap calls are also flagged from-hosted-page and must never be
/// mistaken for 3-D Secure resumption.
pub fn route(
    transaction_type: TransactionType,
    from_hosted_page: bool,
    has_matching_authorization: bool,
) -> RouteMode {
    if from_hosted_page {
        return RouteMode::RecordOnly;
    }
    if transaction_type.is_initial() {
        if has_matching_authorization {
            return RouteMode::SecureContinuation;
        }
        if transaction_type == TransactionType::Credit {
            return RouteMode::CreditCall;
        }
        return RouteMode::AuthorizeOrPurchaseCall;
    }
    RouteMode::ModificationCall
}
