use chrono::NaiveDate;
use sqlx::PgPool;
use subscription_service::subscriptions::{
    NewSubscription, PgSubscriptionStore, QueryWindow, StoreError, SubscriptionChanges,
    SubscriptionService, SubscriptionStore,
};
use std::sync::Arc;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn subscription(user_id: Uuid, name: &str, price: i32, start: NaiveDate) -> NewSubscription {
    NewSubscription {
        user_id,
        service_name: name.to_string(),
        price,
        start_date: start,
        end_date: None,
    }
}

// key: subscription-store-tests -> postgres crud,listing
#[sqlx::test]
#[ignore = "requires DATABASE_URL with Postgres server"]
async fn postgres_store_crud(pool: PgPool) {
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();

    let store = PgSubscriptionStore::new(pool.clone());
    let user_id = Uuid::new_v4();
    let created = store
        .create(subscription(user_id, "Yandex Plus", 400, date(2025, 7, 1)))
        .await
        .unwrap();
    assert_eq!(created.user_id, user_id);
    assert_eq!(created.end_date, None);

    let fetched = store.get(created.id).await.unwrap();
    assert_eq!(fetched.service_name, "Yandex Plus");

    let updated = store
        .update(
            created.id,
            SubscriptionChanges {
                service_name: "Yandex Plus Multi".to_string(),
                price: 650,
                start_date: date(2025, 7, 1),
                end_date: Some(date(2025, 12, 31)),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.price, 650);
    assert_eq!(updated.end_date, Some(date(2025, 12, 31)));
    assert!(updated.updated_at >= created.updated_at);

    store.delete(created.id).await.unwrap();
    assert!(matches!(store.get(created.id).await, Err(StoreError::NotFound)));
    assert!(matches!(store.delete(created.id).await, Err(StoreError::NotFound)));
    assert!(matches!(
        store
            .update(
                created.id,
                SubscriptionChanges {
                    service_name: "gone".to_string(),
                    price: 1,
                    start_date: date(2025, 1, 1),
                    end_date: None,
                },
            )
            .await,
        Err(StoreError::NotFound)
    ));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL with Postgres server"]
async fn postgres_listing_and_total_cost(pool: PgPool) {
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();

    let store = Arc::new(PgSubscriptionStore::new(pool.clone()));
    let user_id = Uuid::new_v4();
    store
        .create(subscription(user_id, "Netflix", 1000, date(2024, 1, 15)))
        .await
        .unwrap();
    store
        .create(subscription(user_id, "Spotify", 300, date(2024, 2, 1)))
        .await
        .unwrap();
    store
        .create(subscription(Uuid::new_v4(), "Netflix", 9999, date(2024, 1, 1)))
        .await
        .unwrap();

    let listed = store.list_by_user(user_id, None).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].service_name, "Spotify");

    let netflix = store.list_by_user(user_id, Some("Netflix")).await.unwrap();
    assert_eq!(netflix.len(), 1);

    let service = SubscriptionService::new(store);
    let total = service
        .total_cost(&QueryWindow {
            user_id,
            service_name: None,
            period_start: date(2024, 1, 1),
            period_end: date(2024, 3, 31),
        })
        .await
        .unwrap();
    assert_eq!(total, 3000 + 600);
}
