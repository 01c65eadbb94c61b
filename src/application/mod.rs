//! Application layer: the orchestration engine driving routing, the gateway
//! call, and result persistence, plus the notification ingestion glue.

pub mod engine;
pub mod notification;
