use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// One subscription a user holds to a service.
///
/// `price` is charged per calendar month in the smallest currency unit.
/// `end_date` is inclusive; `None` means the subscription is still running.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub service_name: String,
    pub price: i32,
    pub start_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when a subscription is created. The store assigns the
/// id and audit timestamps.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewSubscription {
    #[schema(example = "60601fee-2bf1-4721-ae6f-7636e79a0cba")]
    pub user_id: Uuid,
    #[schema(example = "Yandex Plus")]
    pub service_name: String,
    #[schema(example = 400)]
    pub price: i32,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

/// Mutable fields of a subscription. `user_id` is fixed at creation.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SubscriptionChanges {
    pub service_name: String,
    pub price: i32,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

/// Aggregation request: whose subscriptions, which service, and the
/// inclusive date bounds to bill.
///
/// `period_start` is the first day of the first billed month and
/// `period_end` the last day of the last billed month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryWindow {
    pub user_id: Uuid,
    pub service_name: Option<String>,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
}
