use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Gateway configuration owned by the host platform and handed to the
/// orchestrator at construction.
///
/// Merchant accounts are keyed by ISO country code, with an optional
/// default for countries without a dedicated account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub merchant_accounts: BTreeMap<String, String>,
    #[serde(default)]
    pub default_merchant_account: Option<String>,
}

impl GatewayConfig {
    pub fn merchant_account(&self, country: Option<&str>) -> Option<&str> {
        country
            .and_then(|country| self.merchant_accounts.get(&country.to_uppercase()))
            .or(self.default_merchant_account.as_ref())
            .map(String::as_str)
    }
}
