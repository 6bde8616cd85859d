use async_trait::async_trait;
use mainsdesk_core::{models::Plan, AppError, PlanStore};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

const PLAN_COLUMNS: &str = "id, name, description, plan_type, price, currency, billing_interval, \
     general_credits, specialized_credits, mentorship_credits, payment_gateway_plan_id, \
     is_active, created_at, updated_at";

/// Repository for plans
#[derive(Clone)]
pub struct PlanRepository {
    pool: PgPool,
}

impl PlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlanStore for PlanRepository {
    #[tracing::instrument(skip(self), fields(db.table = "plans", db.operation = "select", db.record_id = %plan_id))]
    async fn get_plan(&self, plan_id: Uuid) -> Result<Option<Plan>, AppError> {
        let plan = sqlx::query_as::<Postgres, Plan>(&format!(
            "SELECT {} FROM plans WHERE id = $1",
            PLAN_COLUMNS
        ))
        .bind(plan_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(plan)
    }

    #[tracing::instrument(skip(self), fields(db.table = "plans", db.operation = "select"))]
    async fn list_active_plans(&self) -> Result<Vec<Plan>, AppError> {
        let plans = sqlx::query_as::<Postgres, Plan>(&format!(
            "SELECT {} FROM plans WHERE is_active = TRUE ORDER BY plan_type ASC, price ASC",
            PLAN_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(plans)
    }

    #[tracing::instrument(skip(self), fields(db.table = "plans", db.operation = "update", db.record_id = %plan_id))]
    async fn set_gateway_plan_id(
        &self,
        plan_id: Uuid,
        gateway_plan_id: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE plans
            SET payment_gateway_plan_id = $2, updated_at = NOW()
            WHERE id = $1 AND payment_gateway_plan_id IS NULL
            "#,
        )
        .bind(plan_id)
        .bind(gateway_plan_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
