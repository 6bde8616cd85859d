use mainsdesk_core::{models::Subscription, AppError};
use sqlx::{PgPool, Postgres};

/// Read access to subscriptions. Rows are only ever written by the ledger procedures.
#[derive(Clone)]
pub struct SubscriptionRepository {
    pool: PgPool,
}

impl SubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Look up a subscription by the gateway's id.
    ///
    /// "No rows" is the normal answer for a first charge and comes back as
    /// `Ok(None)`. Every other driver error is returned as is.
    #[tracing::instrument(skip(self), fields(db.table = "subscriptions", db.operation = "select"))]
    pub async fn find_by_gateway_id(
        &self,
        gateway_subscription_id: &str,
    ) -> Result<Option<Subscription>, AppError> {
        let result = sqlx::query_as::<Postgres, Subscription>(
            r#"
            SELECT id, user_id, plan_id, payment_gateway_subscription_id, status,
                   current_period_start, current_period_end, created_at, updated_at
            FROM subscriptions
            WHERE payment_gateway_subscription_id = $1
            "#,
        )
        .bind(gateway_subscription_id)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(subscription) => Ok(Some(subscription)),
            Err(sqlx::Error::RowNotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
