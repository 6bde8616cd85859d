use async_trait::async_trait;
use mainsdesk_core::{
    models::Subscription, AppError, LedgerStore, PurchaseOutcome, PurchasePlan, RenewalOutcome,
    SubscriptionRenewal,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use super::subscription::SubscriptionRepository;

#[derive(sqlx::FromRow)]
struct PurchaseRow {
    order_id: Uuid,
    duplicate: bool,
}

#[derive(sqlx::FromRow)]
struct RenewalRow {
    order_id: Uuid,
    subscription_id: Uuid,
    duplicate: bool,
}

/// Calls the ledger procedures. Each call is a single statement, so each runs
/// in its own transaction inside Postgres.
#[derive(Clone)]
pub struct LedgerRepository {
    pool: PgPool,
    subscriptions: SubscriptionRepository,
}

impl LedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            subscriptions: SubscriptionRepository::new(pool.clone()),
            pool,
        }
    }
}

/// Exceptions raised inside a procedure are ledger failures; everything else
/// (pool, network, decoding) stays a database error.
fn ledger_error(err: sqlx::Error) -> AppError {
    match err {
        sqlx::Error::Database(db_err) => AppError::Ledger(db_err.message().to_string()),
        other => AppError::Database(other),
    }
}

#[async_trait]
impl LedgerStore for LedgerRepository {
    async fn find_subscription_by_gateway_id(
        &self,
        gateway_subscription_id: &str,
    ) -> Result<Option<Subscription>, AppError> {
        self.subscriptions
            .find_by_gateway_id(gateway_subscription_id)
            .await
    }

    #[tracing::instrument(
        skip(self, purchase),
        fields(
            db.operation = "fn_purchase_plan",
            plan_id = %purchase.plan_id,
            charge_id = %purchase.payment_charge_id
        )
    )]
    async fn purchase_plan(&self, purchase: PurchasePlan) -> Result<PurchaseOutcome, AppError> {
        let (gateway_subscription_id, period_start, period_end) = match &purchase.subscription {
            Some(sub) => (
                Some(sub.gateway_subscription_id.as_str()),
                sub.period_start,
                sub.period_end,
            ),
            None => (None, None, None),
        };

        let row = sqlx::query_as::<Postgres, PurchaseRow>(
            r#"
            SELECT order_id, duplicate
            FROM fn_purchase_plan($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(purchase.user_id)
        .bind(purchase.plan_id)
        .bind(purchase.order_status)
        .bind(&purchase.payment_charge_id)
        .bind(purchase.payment_method.as_deref())
        .bind(gateway_subscription_id)
        .bind(period_start)
        .bind(period_end)
        .fetch_one(&self.pool)
        .await
        .map_err(ledger_error)?;

        Ok(PurchaseOutcome {
            order_id: row.order_id,
            duplicate: row.duplicate,
        })
    }

    #[tracing::instrument(
        skip(self, renewal),
        fields(
            db.operation = "fn_handle_subscription_renewal",
            subscription_id = %renewal.gateway_subscription_id,
            payment_id = %renewal.gateway_payment_id
        )
    )]
    async fn handle_subscription_renewal(
        &self,
        renewal: SubscriptionRenewal,
    ) -> Result<RenewalOutcome, AppError> {
        let row = sqlx::query_as::<Postgres, RenewalRow>(
            r#"
            SELECT order_id, subscription_id, duplicate
            FROM fn_handle_subscription_renewal($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&renewal.gateway_subscription_id)
        .bind(&renewal.gateway_payment_id)
        .bind(renewal.payment_method.as_deref())
        .bind(renewal.new_period_start)
        .bind(renewal.new_period_end)
        .fetch_one(&self.pool)
        .await
        .map_err(ledger_error)?;

        Ok(RenewalOutcome {
            order_id: row.order_id,
            subscription_id: row.subscription_id,
            duplicate: row.duplicate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_stay_database_errors() {
        let err = ledger_error(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, AppError::Database(sqlx::Error::PoolTimedOut)));
    }
}
