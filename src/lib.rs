pub mod config;
pub mod error;
pub mod routes;
pub mod subscriptions;

pub use routes::app;
