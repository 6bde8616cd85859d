use async_trait::async_trait;
use mainsdesk_core::{models::CreditBalance, AppError, CreditStore};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Repository for per-user credit balances
#[derive(Clone)]
pub struct CreditRepository {
    pool: PgPool,
}

impl CreditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CreditStore for CreditRepository {
    #[tracing::instrument(skip(self), fields(db.table = "credit_balances", db.operation = "select"))]
    async fn get_balance(&self, user_id: Uuid) -> Result<Option<CreditBalance>, AppError> {
        let balance = sqlx::query_as::<Postgres, CreditBalance>(
            r#"
            SELECT user_id, general_credits, specialized_credits, mentorship_credits, updated_at
            FROM credit_balances
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(balance)
    }
}
