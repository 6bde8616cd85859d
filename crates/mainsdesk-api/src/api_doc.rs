//! OpenAPI documentation.
//! API version is in `crate::constants::API_VERSION`.
//! Paths in handler annotations use placeholder /api/v0; they are transformed at runtime to the actual version.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::auth::UserRole;
use crate::constants::API_VERSION;
use crate::error;
use crate::handlers;
use mainsdesk_core::models;

/// Placeholder version used in handler path annotations (utoipa requires compile-time literals).
const OPENAPI_PATH_PLACEHOLDER: &str = "/api/v0";

fn transform_openapi_paths(spec: &mut utoipa::openapi::OpenApi, version: &str) {
    let replacement = format!("/api/{}", version);
    if OPENAPI_PATH_PLACEHOLDER == replacement {
        return;
    }
    let path_map = std::mem::take(&mut spec.paths.paths);
    for (key, item) in path_map {
        let new_key = key.replacen(OPENAPI_PATH_PLACEHOLDER, &replacement, 1);
        spec.paths.paths.insert(new_key, item);
    }
}

/// Returns the OpenAPI spec with path placeholders replaced by the current API version.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    let mut spec = ApiDoc::openapi();
    transform_openapi_paths(&mut spec, API_VERSION);
    spec
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "MainsDesk Payments API",
        version = "0.1.0",
        description = "Checkout, plan sync, and payment webhook reconciliation for the MainsDesk evaluation credits. All endpoints are versioned under /api/v0/."
    ),
    paths(
        handlers::payments::create_order,
        handlers::payments::create_subscription,
        handlers::plans::list_plans,
        handlers::plans::sync_plan,
        handlers::credits::get_credits,
        handlers::credits::list_orders,
        handlers::webhooks::razorpay_webhook,
    ),
    components(
        schemas(
            models::Plan,
            models::PlanType,
            models::PlanInterval,
            models::CreditBalance,
            models::Order,
            models::OrderStatus,
            models::OrderKind,
            handlers::payments::CheckoutRequest,
            handlers::payments::CreateOrderResponse,
            handlers::payments::CreateSubscriptionResponse,
            handlers::plans::PlanSyncResponse,
            handlers::webhooks::WebhookAck,
            UserRole,
            error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "payments", description = "Checkout order and subscription creation"),
        (name = "plans", description = "Plan catalogue and gateway plan sync"),
        (name = "credits", description = "Evaluation credit balance and order history"),
        (name = "webhooks", description = "Payment gateway webhook receiver")
    )
)]
pub struct ApiDoc;
