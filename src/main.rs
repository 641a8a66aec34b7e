use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum_prometheus::PrometheusMetricLayer;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use subscription_service::config::{self, StoreBackend};
use subscription_service::subscriptions::{
    InMemorySubscriptionStore, PgSubscriptionStore, SubscriptionService, SubscriptionStore,
};
use tracing_subscriber::{fmt, EnvFilter};

async fn connect_postgres() -> Result<PgPool, Box<dyn std::error::Error>> {
    let pool = PgPoolOptions::new()
        .max_connections(*config::DATABASE_MAX_CONNECTIONS)
        .connect(config::DATABASE_URL.as_str())
        .await?;

    if let Err(error) = sqlx::migrate!().run(&pool).await {
        if *config::ALLOW_MIGRATION_FAILURE {
            tracing::warn!(
                ?error,
                "Database migrations failed but continuing due to ALLOW_MIGRATION_FAILURE"
            );
        } else {
            return Err(Box::new(error) as Box<dyn std::error::Error>);
        }
    }

    Ok(pool)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let store: Arc<dyn SubscriptionStore> = match *config::STORE {
        StoreBackend::Postgres => Arc::new(PgSubscriptionStore::new(connect_postgres().await?)),
        StoreBackend::Memory => {
            tracing::warn!("STORE=memory: subscriptions are kept in memory only");
            Arc::new(InMemorySubscriptionStore::new())
        }
    };

    let service = SubscriptionService::new(store);
    let (prometheus_layer, metrics_handle) = PrometheusMetricLayer::pair();
    let app = subscription_service::app(service)
        .route(
            "/metrics",
            get(move || async move { metrics_handle.render() }),
        )
        .layer(prometheus_layer);

    let addr: SocketAddr = format!("{}:{}", config::BIND_ADDRESS.as_str(), *config::BIND_PORT)
        .parse()
        .map_err(|error| Box::new(error) as Box<dyn std::error::Error>)?;
    tracing::info!(%addr, "Listening for incoming connections");
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
