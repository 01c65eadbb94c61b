//! Domain model: transaction attempts, gateway response shapes, the status
//! taxonomy, routing, and the collaborator port contracts.

pub mod attempt;
pub mod config;
pub mod error_descriptor;
pub mod gateway;
pub mod plugin_info;
pub mod ports;
pub mod properties;
pub mod record;
pub mod routing;
pub mod status;
