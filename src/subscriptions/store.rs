use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::models::{NewSubscription, SubscriptionChanges, SubscriptionRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("subscription not found")]
    NotFound,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// key: subscription-store -> durable subscription records
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    async fn create(&self, subscription: NewSubscription) -> StoreResult<SubscriptionRecord>;

    async fn get(&self, id: Uuid) -> StoreResult<SubscriptionRecord>;

    async fn update(
        &self,
        id: Uuid,
        changes: SubscriptionChanges,
    ) -> StoreResult<SubscriptionRecord>;

    async fn delete(&self, id: Uuid) -> StoreResult<()>;

    /// Records owned by `user_id`, optionally restricted to an exact
    /// `service_name`, newest `start_date` first.
    async fn list_by_user(
        &self,
        user_id: Uuid,
        service_name: Option<&str>,
    ) -> StoreResult<Vec<SubscriptionRecord>>;
}
