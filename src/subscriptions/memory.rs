use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{NewSubscription, SubscriptionChanges, SubscriptionRecord};
use super::store::{StoreError, StoreResult, SubscriptionStore};

/// Process-local store. Backs the HTTP tests and `STORE=memory` runs.
#[derive(Default)]
pub struct InMemorySubscriptionStore {
    records: RwLock<HashMap<Uuid, SubscriptionRecord>>,
}

impl InMemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriptionStore for InMemorySubscriptionStore {
    async fn create(&self, subscription: NewSubscription) -> StoreResult<SubscriptionRecord> {
        let now = Utc::now();
        let record = SubscriptionRecord {
            id: Uuid::new_v4(),
            user_id: subscription.user_id,
            service_name: subscription.service_name,
            price: subscription.price,
            start_date: subscription.start_date,
            end_date: subscription.end_date,
            created_at: now,
            updated_at: now,
        };
        self.records
            .write()
            .await
            .insert(record.id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> StoreResult<SubscriptionRecord> {
        self.records
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: SubscriptionChanges,
    ) -> StoreResult<SubscriptionRecord> {
        let mut records = self.records.write().await;
        let record = records.get_mut(&id).ok_or(StoreError::NotFound)?;
        record.service_name = changes.service_name;
        record.price = changes.price;
        record.start_date = changes.start_date;
        record.end_date = changes.end_date;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        self.records
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        service_name: Option<&str>,
    ) -> StoreResult<Vec<SubscriptionRecord>> {
        let mut records: Vec<_> = self
            .records
            .read()
            .await
            .values()
            .filter(|record| record.user_id == user_id)
            .filter(|record| service_name.map_or(true, |name| record.service_name == name))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(records)
    }
}
