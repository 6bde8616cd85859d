use crate::auth::UserContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use mainsdesk_core::models::{CreditBalance, Order};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

const DEFAULT_ORDER_LIMIT: i64 = 20;
const MAX_ORDER_LIMIT: i64 = 100;

#[derive(Debug, Deserialize, IntoParams)]
pub struct OrderListQuery {
    /// Number of orders to return (1-100, default 20)
    pub limit: Option<i64>,
}

/// Credit balance of the signed-in user. Users who never bought anything get zeros.
#[utoipa::path(
    get,
    path = "/api/v0/credits",
    tag = "credits",
    responses(
        (status = 200, description = "Current balance", body = CreditBalance),
        (status = 401, description = "Not signed in", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn get_credits(
    user: UserContext,
    State(state): State<Arc<AppState>>,
) -> Result<Json<CreditBalance>, HttpAppError> {
    let balance = state
        .credits
        .get_balance(user.user_id)
        .await?
        .unwrap_or_else(|| CreditBalance::empty(user.user_id));
    Ok(Json(balance))
}

/// Reconciled orders of the signed-in user, newest first.
#[utoipa::path(
    get,
    path = "/api/v0/orders",
    tag = "credits",
    params(OrderListQuery),
    responses(
        (status = 200, description = "Orders", body = Vec<Order>),
        (status = 401, description = "Not signed in", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, user, query), fields(user_id = %user.user_id))]
pub async fn list_orders(
    user: UserContext,
    State(state): State<Arc<AppState>>,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<Vec<Order>>, HttpAppError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_ORDER_LIMIT)
        .clamp(1, MAX_ORDER_LIMIT);
    let orders = state
        .orders
        .list_orders_for_user(user.user_id, limit)
        .await?;
    Ok(Json(orders))
}
