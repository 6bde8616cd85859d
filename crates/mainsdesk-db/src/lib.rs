//! Postgres persistence for the payments service.

pub mod db;

pub use db::{
    CreditRepository, LedgerRepository, OrderRepository, PgHealthProbe, PlanRepository,
    SubscriptionRepository,
};
