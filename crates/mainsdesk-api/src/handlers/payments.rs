//! Checkout endpoints.
//!
//! Both create the gateway-side object the browser checkout opens, and attach
//! notes (`user_id`, `supabase_plan_id`, `type`) that come back on the webhook
//! and drive reconciliation.

use crate::auth::UserContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::plans::load_plan;
use crate::state::AppState;
use axum::{extract::State, Json};
use mainsdesk_core::models::webhook::{NOTE_TYPE_ONE_TIME, NOTE_TYPE_RECURRING};
use mainsdesk_core::models::Plan;
use mainsdesk_core::AppError;
use mainsdesk_infra::gateway::CheckoutNotes;
use mainsdesk_infra::{to_minor_units, CreateOrderRequest, CreateSubscriptionRequest};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub plan_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub order_id: String,
    /// Minor currency units
    pub amount: i64,
    pub currency: String,
    pub key_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionResponse {
    pub subscription_id: String,
    pub key_id: String,
}

fn checkout_notes(user: &UserContext, plan: &Plan, kind: &str) -> CheckoutNotes {
    CheckoutNotes {
        user_id: user.user_id.to_string(),
        supabase_plan_id: plan.id.to_string(),
        kind: kind.to_string(),
    }
}

/// Gateway receipts are capped at 40 characters.
fn receipt() -> String {
    format!("rcpt_{}", Uuid::new_v4().simple())
}

#[utoipa::path(
    post,
    path = "/api/v0/payments/create-order",
    tag = "payments",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Gateway order created", body = CreateOrderResponse),
        (status = 400, description = "Plan cannot be bought with a one-time order", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 404, description = "Plan not found", body = ErrorResponse),
        (status = 500, description = "Gateway error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, user, request), fields(user_id = %user.user_id, plan_id = %request.plan_id))]
pub async fn create_order(
    user: UserContext,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CheckoutRequest>,
) -> Result<Json<CreateOrderResponse>, HttpAppError> {
    let plan = load_plan(&state, request.plan_id).await?;

    if !plan.is_active {
        return Err(AppError::BadRequest("Plan is not available".to_string()).into());
    }
    if plan.is_recurring() {
        return Err(AppError::BadRequest(
            "Plan is recurring; use create-subscription".to_string(),
        )
        .into());
    }

    let amount = to_minor_units(plan.price)?;
    let order = state
        .gateway
        .create_order(CreateOrderRequest {
            amount,
            currency: plan.currency.clone(),
            receipt: receipt(),
            notes: checkout_notes(&user, &plan, NOTE_TYPE_ONE_TIME),
        })
        .await?;

    Ok(Json(CreateOrderResponse {
        order_id: order.id,
        amount: order.amount,
        currency: order.currency,
        key_id: state.config.gateway().key_id.clone(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/v0/payments/create-subscription",
    tag = "payments",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Gateway subscription created", body = CreateSubscriptionResponse),
        (status = 400, description = "Plan is not recurring or not synced with the gateway", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 404, description = "Plan not found", body = ErrorResponse),
        (status = 500, description = "Gateway error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, user, request), fields(user_id = %user.user_id, plan_id = %request.plan_id))]
pub async fn create_subscription(
    user: UserContext,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CheckoutRequest>,
) -> Result<Json<CreateSubscriptionResponse>, HttpAppError> {
    let plan = load_plan(&state, request.plan_id).await?;

    if !plan.is_active {
        return Err(AppError::BadRequest("Plan is not available".to_string()).into());
    }
    if !plan.is_recurring() {
        return Err(AppError::BadRequest("Plan is not recurring".to_string()).into());
    }
    let gateway_plan_id = plan
        .synced_gateway_plan_id()
        .map(str::to_string)
        .ok_or_else(|| {
            AppError::BadRequest("Plan is not synced with the payment gateway".to_string())
        })?;

    let subscription = state
        .gateway
        .create_subscription(CreateSubscriptionRequest {
            plan_id: gateway_plan_id,
            total_count: state.config.gateway().subscription_total_count,
            customer_notify: true,
            notes: checkout_notes(&user, &plan, NOTE_TYPE_RECURRING),
        })
        .await?;

    Ok(Json(CreateSubscriptionResponse {
        subscription_id: subscription.id,
        key_id: state.config.gateway().key_id.clone(),
    }))
}
