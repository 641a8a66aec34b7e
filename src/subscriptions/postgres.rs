use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{NewSubscription, SubscriptionChanges, SubscriptionRecord};
use super::store::{StoreError, StoreResult, SubscriptionStore};

/// key: subscription-store-postgres -> `subscriptions` table
#[derive(Clone)]
pub struct PgSubscriptionStore {
    pool: PgPool,
}

impl PgSubscriptionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionStore for PgSubscriptionStore {
    async fn create(&self, subscription: NewSubscription) -> StoreResult<SubscriptionRecord> {
        let record = sqlx::query_as::<_, SubscriptionRecord>(
            r#"
            INSERT INTO subscriptions (
                id,
                user_id,
                service_name,
                price,
                start_date,
                end_date,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(subscription.user_id)
        .bind(&subscription.service_name)
        .bind(subscription.price)
        .bind(subscription.start_date)
        .bind(subscription.end_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn get(&self, id: Uuid) -> StoreResult<SubscriptionRecord> {
        sqlx::query_as::<_, SubscriptionRecord>("SELECT * FROM subscriptions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: SubscriptionChanges,
    ) -> StoreResult<SubscriptionRecord> {
        sqlx::query_as::<_, SubscriptionRecord>(
            r#"
            UPDATE subscriptions
            SET
                service_name = $1,
                price = $2,
                start_date = $3,
                end_date = $4,
                updated_at = NOW()
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(&changes.service_name)
        .bind(changes.price)
        .bind(changes.start_date)
        .bind(changes.end_date)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        service_name: Option<&str>,
    ) -> StoreResult<Vec<SubscriptionRecord>> {
        let records = sqlx::query_as::<_, SubscriptionRecord>(
            r#"
            SELECT * FROM subscriptions
            WHERE user_id = $1
              AND ($2::TEXT IS NULL OR service_name = $2)
            ORDER BY start_date DESC
            "#,
        )
        .bind(user_id)
        .bind(service_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
