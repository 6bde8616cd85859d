#![allow(dead_code)]

//! Test helpers: build AppState and router over in-memory fakes.
//!
//! Run from workspace root: `cargo test -p mainsdesk-api`.

pub mod auth;
pub mod fakes;

use axum_test::TestServer;
use fakes::{FakeCredits, FakeGateway, FakeHealth, FakeLedger, FakeOrders, FakePlans};
use mainsdesk_api::constants;
use mainsdesk_api::setup::routes;
use mainsdesk_api::state::AppState;
use mainsdesk_core::{BaseConfig, Config, GatewayConfig, PaymentsConfig};
use mainsdesk_infra::compute_signature;
use std::sync::Arc;

pub const TEST_JWT_SECRET: &str = "test-secret-key-min-32-characters-long-for-testing";
pub const TEST_WEBHOOK_SECRET: &str = "whsec_integration_test";
pub const TEST_KEY_ID: &str = "rzp_test_key";
pub const SIGNATURE_HEADER: &str = "x-razorpay-signature";

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server plus handles on every fake for assertions.
pub struct TestApp {
    pub server: TestServer,
    pub plans: Arc<FakePlans>,
    pub ledger: Arc<FakeLedger>,
    pub credits: Arc<FakeCredits>,
    pub orders: Arc<FakeOrders>,
    pub gateway: Arc<FakeGateway>,
    pub health: Arc<FakeHealth>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn setup_test_app() -> TestApp {
    let config = create_test_config();

    let plans = Arc::new(FakePlans::default());
    let ledger = Arc::new(FakeLedger::default());
    let credits = Arc::new(FakeCredits::default());
    let orders = Arc::new(FakeOrders::default());
    let gateway = Arc::new(FakeGateway::default());
    let health = Arc::new(FakeHealth::default());

    let state = Arc::new(AppState::new(
        Arc::new(config.clone()),
        plans.clone(),
        ledger.clone(),
        credits.clone(),
        orders.clone(),
        gateway.clone(),
        health.clone(),
    ));

    let app = routes::setup_routes(&config, state).expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        plans,
        ledger,
        credits,
        orders,
        gateway,
        health,
    }
}

pub fn create_test_config() -> Config {
    Config(Box::new(PaymentsConfig {
        base: BaseConfig {
            server_port: 4000,
            cors_origins: vec!["*".to_string()],
            db_max_connections: 5,
            db_timeout_seconds: 30,
            jwt_secret: TEST_JWT_SECRET.to_string(),
            environment: "test".to_string(),
        },
        database_url: "postgres://localhost/mainsdesk_test".to_string(),
        gateway: GatewayConfig {
            key_id: TEST_KEY_ID.to_string(),
            key_secret: "rzp_test_secret".to_string(),
            webhook_secret: TEST_WEBHOOK_SECRET.to_string(),
            api_base: "http://127.0.0.1:9".to_string(),
            signature_header: SIGNATURE_HEADER.to_string(),
            timeout_seconds: 5,
            subscription_total_count: 12,
        },
    }))
}

/// Hex HMAC of the exact body bytes, as the gateway computes it.
pub fn sign(body: &[u8]) -> String {
    compute_signature(TEST_WEBHOOK_SECRET, body).expect("sign webhook body")
}
