//! Wires the Postgres stores and the gateway client into `AppState`.

use crate::state::AppState;
use anyhow::{Context, Result};
use mainsdesk_core::Config;
use mainsdesk_db::{
    CreditRepository, LedgerRepository, OrderRepository, PgHealthProbe, PlanRepository,
};
use mainsdesk_infra::{RazorpayClient, RazorpayClientConfig};
use sqlx::PgPool;
use std::sync::Arc;

pub fn initialize_services(config: &Config, pool: PgPool) -> Result<Arc<AppState>> {
    let gateway = RazorpayClient::new(RazorpayClientConfig::from(config.gateway()))
        .context("Failed to create payment gateway client")?;

    tracing::info!(
        api_base = %config.gateway().api_base,
        signature_header = %config.signature_header(),
        "Payment gateway client initialized"
    );

    let state = AppState::new(
        Arc::new(config.clone()),
        Arc::new(PlanRepository::new(pool.clone())),
        Arc::new(LedgerRepository::new(pool.clone())),
        Arc::new(CreditRepository::new(pool.clone())),
        Arc::new(OrderRepository::new(pool.clone())),
        Arc::new(gateway),
        Arc::new(PgHealthProbe::new(pool)),
    );

    Ok(Arc::new(state))
}
