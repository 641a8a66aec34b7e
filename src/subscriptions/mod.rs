//! Per-user subscription records and monthly cost aggregation.

pub mod api;
pub mod cost;
pub mod dates;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod service;
pub mod store;


pub use api::{routes, ApiDoc, CreatedResponse, StatusResponse, TotalCostResponse};
pub use cost::total_cost;
pub use memory::InMemorySubscriptionStore;
pub use models::{NewSubscription, QueryWindow, SubscriptionChanges, SubscriptionRecord};
pub use postgres::PgSubscriptionStore;
pub use service::SubscriptionService;
pub use store::{StoreError, StoreResult, SubscriptionStore};
