//! Payment gateway client.
//!
//! Handlers depend on the [`PaymentGateway`] trait; [`RazorpayClient`] is the
//! production implementation.

mod amount;
mod razorpay;

use async_trait::async_trait;
use mainsdesk_core::AppError;
use serde::{Deserialize, Serialize};

pub use amount::to_minor_units;
pub use razorpay::{RazorpayClient, RazorpayClientConfig};

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("gateway returned {status}: {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("gateway client misconfigured: {0}")]
    Config(String),
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::InvalidAmount(msg) => AppError::InvalidInput(msg),
            GatewayError::Config(msg) => AppError::Internal(msg),
            other => AppError::PaymentGateway(other.to_string()),
        }
    }
}

/// Metadata attached to orders and subscriptions and echoed back on webhooks
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CheckoutNotes {
    pub user_id: String,
    pub supabase_plan_id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PlanNotes {
    pub supabase_plan_id: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CreateOrderRequest {
    /// Minor currency units (paise for INR)
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    pub notes: CheckoutNotes,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CreateSubscriptionRequest {
    pub plan_id: String,
    pub total_count: u32,
    pub customer_notify: bool,
    pub notes: CheckoutNotes,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PlanItem {
    pub name: String,
    /// Minor currency units
    pub amount: i64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CreatePlanRequest {
    pub period: String,
    pub interval: u32,
    pub item: PlanItem,
    pub notes: PlanNotes,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GatewaySubscription {
    pub id: String,
    #[serde(default)]
    pub plan_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub short_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GatewayPlan {
    pub id: String,
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub interval: Option<u32>,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(&self, request: CreateOrderRequest)
        -> Result<GatewayOrder, GatewayError>;

    async fn create_subscription(
        &self,
        request: CreateSubscriptionRequest,
    ) -> Result<GatewaySubscription, GatewayError>;

    async fn create_plan(&self, request: CreatePlanRequest) -> Result<GatewayPlan, GatewayError>;
}
