//! MainsDesk Core Library
//!
//! This crate provides the domain models, error types, configuration, and the
//! ledger store traits shared by the payments service crates.

pub mod config;
pub mod error;
pub mod ledger;
pub mod models;

// Re-export commonly used types
pub use config::{BaseConfig, Config, GatewayConfig, PaymentsConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use ledger::{
    CreditStore, HealthProbe, LedgerStore, OrderStore, PlanStore, PurchaseOutcome, PurchasePlan,
    RenewalOutcome, SubscriptionProvision, SubscriptionRenewal,
};
