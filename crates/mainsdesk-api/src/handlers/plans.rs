use crate::auth::UserContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use mainsdesk_core::models::Plan;
use mainsdesk_core::AppError;
use mainsdesk_infra::gateway::PlanNotes;
use mainsdesk_infra::{to_minor_units, CreatePlanRequest, PlanItem};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

pub const PLAN_ALREADY_SYNCED: &str = "Plan already synced";
pub const PLAN_SYNCED: &str = "Plan synced";

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanSyncResponse {
    pub message: String,
    pub payment_gateway_plan_id: String,
}

pub(crate) async fn load_plan(state: &AppState, plan_id: Uuid) -> Result<Plan, AppError> {
    state
        .plans
        .get_plan(plan_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Plan not found".to_string()))
}

/// Active plans, as shown on the pricing page.
#[utoipa::path(
    get,
    path = "/api/v0/plans",
    tag = "plans",
    responses(
        (status = 200, description = "Active plans", body = Vec<Plan>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_plans(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Plan>>, HttpAppError> {
    let plans = state.plans.list_active_plans().await?;
    Ok(Json(plans))
}

/// Creates the gateway-side plan for a recurring plan and stores its id.
///
/// Safe to call repeatedly: an already synced plan is reported as such and
/// the gateway is not called.
#[utoipa::path(
    post,
    path = "/api/v0/admin/plans/{plan_id}/sync",
    tag = "plans",
    params(
        ("plan_id" = Uuid, Path, description = "Plan ID")
    ),
    responses(
        (status = 200, description = "Plan synced or already synced", body = PlanSyncResponse),
        (status = 400, description = "Plan is not recurring", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 403, description = "Not an administrator", body = ErrorResponse),
        (status = 404, description = "Plan not found", body = ErrorResponse),
        (status = 500, description = "Gateway error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, user, plan_id), fields(user_id = %user.user_id, plan_id = %plan_id))]
pub async fn sync_plan(
    user: UserContext,
    State(state): State<Arc<AppState>>,
    Path(plan_id): Path<Uuid>,
) -> Result<Json<PlanSyncResponse>, HttpAppError> {
    user.require_admin()?;

    let plan = load_plan(&state, plan_id).await?;

    if !plan.is_recurring() {
        return Err(AppError::BadRequest(format!(
            "Only recurring plans can be synced (plan type is {})",
            plan.plan_type
        ))
        .into());
    }

    if let Some(existing) = plan.synced_gateway_plan_id() {
        tracing::info!(gateway_plan_id = %existing, "Plan already synced");
        return Ok(Json(PlanSyncResponse {
            message: PLAN_ALREADY_SYNCED.to_string(),
            payment_gateway_plan_id: existing.to_string(),
        }));
    }

    let interval = plan.interval.ok_or_else(|| {
        AppError::BadRequest("Recurring plan has no billing interval".to_string())
    })?;

    let gateway_plan = state
        .gateway
        .create_plan(CreatePlanRequest {
            period: interval.gateway_period().to_string(),
            interval: 1,
            item: PlanItem {
                name: plan.name.clone(),
                amount: to_minor_units(plan.price)?,
                currency: plan.currency.clone(),
                description: plan.description.clone(),
            },
            notes: PlanNotes {
                supabase_plan_id: plan.id.to_string(),
            },
        })
        .await?;

    let stored = state
        .plans
        .set_gateway_plan_id(plan.id, &gateway_plan.id)
        .await?;
    if !stored {
        tracing::warn!(
            gateway_plan_id = %gateway_plan.id,
            "Concurrent sync stored a different gateway plan id"
        );
        return Err(AppError::BadRequest(PLAN_ALREADY_SYNCED.to_string()).into());
    }

    tracing::info!(gateway_plan_id = %gateway_plan.id, "Plan synced with gateway");
    Ok(Json(PlanSyncResponse {
        message: PLAN_SYNCED.to_string(),
        payment_gateway_plan_id: gateway_plan.id,
    }))
}
