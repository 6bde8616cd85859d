//! Application state shared by every handler.
//!
//! Stores and the gateway are held behind their traits so the router can be
//! built over the Postgres and Razorpay implementations or over test fakes.

use crate::services::WebhookProcessor;
use mainsdesk_core::{Config, CreditStore, HealthProbe, LedgerStore, OrderStore, PlanStore};
use mainsdesk_infra::PaymentGateway;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub plans: Arc<dyn PlanStore>,
    pub credits: Arc<dyn CreditStore>,
    pub orders: Arc<dyn OrderStore>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub health: Arc<dyn HealthProbe>,
    pub webhooks: WebhookProcessor,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        plans: Arc<dyn PlanStore>,
        ledger: Arc<dyn LedgerStore>,
        credits: Arc<dyn CreditStore>,
        orders: Arc<dyn OrderStore>,
        gateway: Arc<dyn PaymentGateway>,
        health: Arc<dyn HealthProbe>,
    ) -> Self {
        let webhooks = WebhookProcessor::new(ledger, config.webhook_secret().to_string());
        Self {
            config,
            plans,
            credits,
            orders,
            gateway,
            health,
            webhooks,
        }
    }
}
