//! Data models for the payments service
//!
//! Persistent records (plans, orders, subscriptions, credit balances) and the
//! transient gateway webhook payloads.

mod credits;
mod order;
mod plan;
mod subscription;
pub mod webhook;

pub use credits::*;
pub use order::*;
pub use plan::*;
pub use subscription::*;
