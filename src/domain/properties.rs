use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// Shared properties
pub const PROPERTY_PAYMENT_PROCESSOR_ACCOUNT_ID: &str = "paymentProcessorAccountId";
pub const PROPERTY_CAPTURE_DELAY_HOURS: &str = "captureDelayHours";

// Hosted payment page
pub const PROPERTY_FROM_HPP: &str = "fromHPP";
pub const PROPERTY_FROM_HPP_TRANSACTION_STATUS: &str = "fromHPPTransactionStatus";

// User data
pub const PROPERTY_CUSTOMER_ID: &str = "customerId";
pub const PROPERTY_EMAIL: &str = "email";
pub const PROPERTY_FIRST_NAME: &str = "firstName";
pub const PROPERTY_LAST_NAME: &str = "lastName";
pub const PROPERTY_IP: &str = "ip";
pub const PROPERTY_COUNTRY: &str = "country";

// Internals: convention keys shared with the notification decoder and the
// persisted additional-data map.
pub const PROPERTY_MERCHANT_REFERENCE: &str = "merchantReference";
pub const PROPERTY_PSP_REFERENCE: &str = "pspReference";
pub const PROPERTY_AUTH_CODE: &str = "authCode";
pub const PROPERTY_RESULT_CODE: &str = "resultCode";
pub const PROPERTY_PSP_RESULT: &str = "pspResult";
pub const PROPERTY_REASON: &str = "reason";
pub const PROPERTY_SUCCESS: &str = "success";
pub const PROPERTY_EXCEPTION_MESSAGE: &str = "exceptionMessage";
pub const PROPERTY_EXCEPTION_CLASS: &str = "exceptionClass";
pub const PROPERTY_CALL_ERROR_STATUS: &str = "callErrorStatus";

/// An ordered string-to-string property bag.
///
/// Carries gateway-specific hints on a [`crate::domain::attempt::TransactionAttempt`],
/// hosted-page form parameters, and the additional-data map persisted with
/// every response row.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(BTreeMap<String, String>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Reads a boolean flag; anything but a (case-insensitive) "true" is false.
    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style `set`, for fixtures and defaults.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Merges `overrides` on top of `self`; keys in `overrides` win.
    pub fn merge(&self, overrides: &Properties) -> Properties {
        let mut merged = self.0.clone();
        for (key, value) in &overrides.0 {
            merged.insert(key.clone(), value.clone());
        }
        Properties(merged)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<BTreeMap<String, String>> for Properties {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, String)> for Properties {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
