use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use super::cost;
use super::models::{NewSubscription, QueryWindow, SubscriptionChanges, SubscriptionRecord};
use super::store::{StoreError, StoreResult, SubscriptionStore};

/// Single log site for store failures; the HTTP layer only renders them.
fn log_failure(op: &'static str, err: StoreError) -> StoreError {
    match &err {
        StoreError::NotFound => warn!(op, "subscription not found"),
        StoreError::Database(source) => error!(op, error = ?source, "store operation failed"),
    }
    err
}

/// key: subscription-service -> crud + cost aggregation
#[derive(Clone)]
pub struct SubscriptionService {
    store: Arc<dyn SubscriptionStore>,
}

impl SubscriptionService {
    pub fn new(store: Arc<dyn SubscriptionStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, subscription: NewSubscription) -> StoreResult<SubscriptionRecord> {
        let user_id = subscription.user_id;
        info!(op = "service.create", %user_id, "creating subscription");
        let record = self
            .store
            .create(subscription)
            .await
            .map_err(|err| log_failure("service.create", err))?;
        info!(
            op = "service.create",
            %user_id,
            subscription_id = %record.id,
            "subscription created"
        );
        Ok(record)
    }

    pub async fn get(&self, id: Uuid) -> StoreResult<SubscriptionRecord> {
        info!(op = "service.get", subscription_id = %id, "fetching subscription");
        self.store
            .get(id)
            .await
            .map_err(|err| log_failure("service.get", err))
    }

    pub async fn update(
        &self,
        id: Uuid,
        changes: SubscriptionChanges,
    ) -> StoreResult<SubscriptionRecord> {
        info!(op = "service.update", subscription_id = %id, "updating subscription");
        let record = self
            .store
            .update(id, changes)
            .await
            .map_err(|err| log_failure("service.update", err))?;
        info!(op = "service.update", subscription_id = %id, "subscription updated");
        Ok(record)
    }

    pub async fn delete(&self, id: Uuid) -> StoreResult<()> {
        info!(op = "service.delete", subscription_id = %id, "deleting subscription");
        self.store
            .delete(id)
            .await
            .map_err(|err| log_failure("service.delete", err))?;
        info!(op = "service.delete", subscription_id = %id, "subscription deleted");
        Ok(())
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        service_name: Option<&str>,
    ) -> StoreResult<Vec<SubscriptionRecord>> {
        self.store
            .list_by_user(user_id, service_name)
            .await
            .map_err(|err| log_failure("service.list", err))
    }

    /// Total billed cost for the window's user (and service, when given).
    pub async fn total_cost(&self, window: &QueryWindow) -> StoreResult<i64> {
        let user_id = window.user_id;
        info!(
            op = "service.total_cost",
            %user_id,
            service_name = window.service_name.as_deref(),
            period_start = %window.period_start,
            period_end = %window.period_end,
            "calculating total cost"
        );

        let records = self
            .store
            .list_by_user(user_id, window.service_name.as_deref())
            .await
            .map_err(|err| log_failure("service.total_cost", err))?;

        let total = cost::total_cost(&records, window);
        info!(
            op = "service.total_cost",
            %user_id,
            records = records.len(),
            total_cost = total,
            "total cost calculated"
        );
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscriptions::memory::InMemorySubscriptionStore;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn total_cost_only_counts_the_requested_user_and_service() {
        let service = SubscriptionService::new(Arc::new(InMemorySubscriptionStore::new()));
        let user = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        for (owner, name, price) in [
            (user, "Netflix", 1000),
            (user, "Spotify", 300),
            (stranger, "Netflix", 5000),
        ] {
            service
                .create(NewSubscription {
                    user_id: owner,
                    service_name: name.to_string(),
                    price,
                    start_date: date(2024, 1, 15),
                    end_date: None,
                })
                .await
                .unwrap();
        }

        let mut window = QueryWindow {
            user_id: user,
            service_name: None,
            period_start: date(2024, 1, 1),
            period_end: date(2024, 3, 31),
        };
        assert_eq!(service.total_cost(&window).await.unwrap(), 3900);

        window.service_name = Some("Netflix".to_string());
        assert_eq!(service.total_cost(&window).await.unwrap(), 3000);

        window.service_name = Some("Kinopoisk".to_string());
        assert_eq!(service.total_cost(&window).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_subscription_surfaces_not_found() {
        let service = SubscriptionService::new(Arc::new(InMemorySubscriptionStore::new()));
        let err = service.get(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }
}
