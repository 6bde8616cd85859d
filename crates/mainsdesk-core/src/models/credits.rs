use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

/// Per-user credit counters. Only the ledger procedures write these.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct CreditBalance {
    pub user_id: Uuid,
    pub general_credits: i32,
    pub specialized_credits: i32,
    pub mentorship_credits: i32,
    pub updated_at: Option<DateTime<Utc>>,
}

impl CreditBalance {
    /// Balance of a user that has never been granted anything
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            general_credits: 0,
            specialized_credits: 0,
            mentorship_credits: 0,
            updated_at: None,
        }
    }
}
