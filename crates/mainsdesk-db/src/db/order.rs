use async_trait::async_trait;
use mainsdesk_core::{models::Order, AppError, OrderStore};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Read access to orders. Rows are only ever written by the ledger procedures.
#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for OrderRepository {
    #[tracing::instrument(skip(self), fields(db.table = "orders", db.operation = "select"))]
    async fn list_orders_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Order>, AppError> {
        let orders = sqlx::query_as::<Postgres, Order>(
            r#"
            SELECT id, user_id, plan_id, status, kind, payment_charge_id, payment_method,
                   subscription_id, created_at
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }
}
