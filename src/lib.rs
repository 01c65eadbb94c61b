//! Mediation layer between a billing platform's transaction model and a
//! third-party card-payment gateway.
//!
//! The crate decides which gateway operation to invoke for a logical billing
//! transaction (authorize, capture, purchase, void, refund, credit), executes
//! it through the [`domain::ports::GatewayClient`] seam, and reconciles the
//! gateway's heterogeneous response shapes into one normalized
//! [`domain::plugin_info::PluginTransactionInfo`].

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
