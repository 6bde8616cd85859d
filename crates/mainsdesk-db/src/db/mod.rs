//! Database repositories for data access layer
//!
//! Plans and balances are read directly. Orders, subscriptions, and credit
//! grants are written only through the ledger procedures called by
//! [`LedgerRepository`].

mod credits;
mod health;
mod ledger;
mod order;
mod plan;
mod subscription;

pub use credits::CreditRepository;
pub use health::PgHealthProbe;
pub use ledger::LedgerRepository;
pub use order::OrderRepository;
pub use plan::PlanRepository;
pub use subscription::SubscriptionRepository;
