//! Route configuration and setup.
//!
//! Public routes (health, docs, plan catalogue, gateway webhook) need no
//! session. Everything under [`protected_routes`] sits behind the session
//! auth middleware.

mod health;

use crate::auth::{auth_middleware, AuthState, SessionVerifier};
use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use mainsdesk_core::Config;
use mainsdesk_infra::request_id_middleware;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Gateway webhooks and checkout bodies are small JSON documents.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let auth_state = AuthState {
        verifier: SessionVerifier::new(config.jwt_secret()),
    };

    let protected = protected_routes().layer(axum::middleware::from_fn_with_state(
        Arc::new(auth_state),
        auth_middleware,
    ));

    let app = public_routes()
        .merge(protected)
        .nest(
            "/docs",
            utoipa_rapidoc::RapiDoc::new("/api/openapi.json")
                .path("/docs")
                .into(),
        )
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}

fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/live", get(health::liveness_check))
        .route("/ready", get(health::readiness_check))
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
        .route(
            &format!("{}/plans", API_PREFIX),
            get(handlers::plans::list_plans),
        )
        .route(
            &format!("{}/webhooks/razorpay", API_PREFIX),
            post(handlers::webhooks::razorpay_webhook),
        )
}

fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/payments/create-order", API_PREFIX),
            post(handlers::payments::create_order),
        )
        .route(
            &format!("{}/payments/create-subscription", API_PREFIX),
            post(handlers::payments::create_subscription),
        )
        .route(
            &format!("{}/credits", API_PREFIX),
            get(handlers::credits::get_credits),
        )
        .route(
            &format!("{}/orders", API_PREFIX),
            get(handlers::credits::list_orders),
        )
        .route(
            &format!("{}/admin/plans/{{plan_id}}/sync", API_PREFIX),
            post(handlers::plans::sync_plan),
        )
}
