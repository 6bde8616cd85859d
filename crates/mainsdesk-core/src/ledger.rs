//! Store seams for the credit ledger.
//!
//! The webhook and payment handlers only talk to these traits. The Postgres
//! implementations live in `mainsdesk-db`; all balance changes go through the
//! two ledger procedures behind `LedgerStore`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{CreditBalance, Order, OrderStatus, Plan, Subscription};

/// Subscription fields created together with the first order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionProvision {
    pub gateway_subscription_id: String,
    pub period_start: Option<DateTime<Utc>>,
    pub period_end: Option<DateTime<Utc>>,
}

/// Arguments of the `purchase_plan` ledger mutation.
///
/// `payment_charge_id` is the idempotency key: a second call with the same id
/// grants nothing and reports `duplicate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchasePlan {
    pub user_id: Uuid,
    pub plan_id: Uuid,
    pub order_status: OrderStatus,
    pub payment_charge_id: String,
    pub payment_method: Option<String>,
    pub subscription: Option<SubscriptionProvision>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseOutcome {
    pub order_id: Uuid,
    pub duplicate: bool,
}

/// Arguments of the `handle_subscription_renewal` ledger mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionRenewal {
    pub gateway_subscription_id: String,
    pub gateway_payment_id: String,
    pub payment_method: Option<String>,
    pub new_period_start: DateTime<Utc>,
    pub new_period_end: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenewalOutcome {
    pub order_id: Uuid,
    pub subscription_id: Uuid,
    pub duplicate: bool,
}

#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// `Ok(None)` when no local row exists for this gateway subscription id.
    async fn find_subscription_by_gateway_id(
        &self,
        gateway_subscription_id: &str,
    ) -> Result<Option<Subscription>, AppError>;

    async fn purchase_plan(&self, purchase: PurchasePlan) -> Result<PurchaseOutcome, AppError>;

    async fn handle_subscription_renewal(
        &self,
        renewal: SubscriptionRenewal,
    ) -> Result<RenewalOutcome, AppError>;
}

#[async_trait]
pub trait PlanStore: Send + Sync {
    async fn get_plan(&self, plan_id: Uuid) -> Result<Option<Plan>, AppError>;

    async fn list_active_plans(&self) -> Result<Vec<Plan>, AppError>;

    /// Stores the gateway plan id only if none is set yet. Returns `false` when
    /// another writer got there first.
    async fn set_gateway_plan_id(
        &self,
        plan_id: Uuid,
        gateway_plan_id: &str,
    ) -> Result<bool, AppError>;
}

#[async_trait]
pub trait CreditStore: Send + Sync {
    async fn get_balance(&self, user_id: Uuid) -> Result<Option<CreditBalance>, AppError>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Most recent first
    async fn list_orders_for_user(&self, user_id: Uuid, limit: i64)
        -> Result<Vec<Order>, AppError>;
}

/// Readiness check for the backing database
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn ping(&self) -> Result<(), AppError>;
}
