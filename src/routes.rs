use axum::{routing::get, Extension, Router};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::subscriptions::{self, ApiDoc, SubscriptionService};

async fn root() -> &'static str {
    "Subscription Service API"
}

pub fn api_routes() -> Router {
    Router::new()
        .route("/", get(root))
        .merge(subscriptions::routes())
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

/// Full application router with the service handed to every handler.
pub fn app(service: SubscriptionService) -> Router {
    api_routes().layer(Extension(service))
}
