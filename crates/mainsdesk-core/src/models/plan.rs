use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

/// How a plan is billed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "plan_type", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum PlanType {
    OneTime,
    Recurring,
}

impl Display for PlanType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            PlanType::OneTime => write!(f, "one_time"),
            PlanType::Recurring => write!(f, "recurring"),
        }
    }
}

/// Billing interval of a recurring plan
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "plan_interval", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum PlanInterval {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl PlanInterval {
    /// Period name understood by the gateway's plan API
    pub fn gateway_period(&self) -> &'static str {
        match self {
            PlanInterval::Daily => "daily",
            PlanInterval::Weekly => "weekly",
            PlanInterval::Monthly => "monthly",
            PlanInterval::Yearly => "yearly",
        }
    }
}

/// A purchasable offering. Credits are granted per category when a charge is reconciled.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct Plan {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub plan_type: PlanType,
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub currency: String,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "billing_interval"))]
    pub interval: Option<PlanInterval>,
    pub general_credits: i32,
    pub specialized_credits: i32,
    pub mentorship_credits: i32,
    pub payment_gateway_plan_id: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Plan {
    pub fn is_recurring(&self) -> bool {
        self.plan_type == PlanType::Recurring
    }

    /// The gateway plan id, if the plan has been synced. Empty ids count as unsynced.
    pub fn synced_gateway_plan_id(&self) -> Option<&str> {
        self.payment_gateway_plan_id
            .as_deref()
            .filter(|id| !id.is_empty())
    }
}
