use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::{IntoParams, OpenApi, ToSchema};
use uuid::Uuid;

use crate::error::{AppError, AppResult, ErrorBody};

use super::dates::last_of_month;
use super::models::{NewSubscription, QueryWindow, SubscriptionChanges, SubscriptionRecord};
use super::service::SubscriptionService;

/// key: subscriptions-api -> rest endpoints under /api/v1
pub fn routes() -> Router {
    Router::new()
        .route(
            "/api/v1/subscriptions",
            get(list_subscriptions).post(create_subscription),
        )
        .route("/api/v1/subscriptions/total_cost", get(total_cost))
        .route(
            "/api/v1/subscriptions/:id",
            get(get_subscription)
                .put(update_subscription)
                .delete(delete_subscription),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create_subscription,
        get_subscription,
        update_subscription,
        delete_subscription,
        list_subscriptions,
        total_cost
    ),
    components(schemas(
        SubscriptionRecord,
        NewSubscription,
        SubscriptionChanges,
        CreatedResponse,
        StatusResponse,
        TotalCostResponse,
        ErrorBody
    )),
    tags((name = "subscriptions", description = "Subscription records and monthly cost totals"))
)]
pub struct ApiDoc;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    #[schema(example = "ok")]
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TotalCostResponse {
    #[schema(example = 3500)]
    pub total_cost: i64,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Owner of the subscriptions (UUID). Required.
    pub user_id: Option<String>,
    /// Exact service name to narrow the list to.
    pub service_name: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TotalCostParams {
    /// Owner of the subscriptions (UUID). Required.
    pub user_id: Option<String>,
    /// First billed month, `YYYY-MM`. Required.
    pub start_period: Option<String>,
    /// Last billed month, `YYYY-MM`, inclusive. Required.
    pub end_period: Option<String>,
    /// Exact service name to narrow the total to.
    pub service_name: Option<String>,
}

/// Logs a rejected request before it is rendered as a 400.
fn rejected(op: &'static str, err: AppError) -> AppError {
    warn!(op, error = %err, "rejecting request");
    err
}

#[utoipa::path(
    post,
    path = "/api/v1/subscriptions",
    tag = "subscriptions",
    request_body = NewSubscription,
    responses(
        (status = 201, description = "Subscription created", body = CreatedResponse),
        (status = 400, description = "Invalid body", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn create_subscription(
    Extension(service): Extension<SubscriptionService>,
    payload: Result<Json<NewSubscription>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    const OP: &str = "handler.create";
    let Json(mut payload) =
        payload.map_err(|err| rejected(OP, AppError::BadRequest(err.to_string())))?;
    info!(
        op = OP,
        user_id = %payload.user_id,
        service_name = %payload.service_name,
        "create requested"
    );
    payload.service_name = validate_fields(
        &payload.service_name,
        payload.price,
        payload.start_date,
        payload.end_date,
    )
    .map_err(|err| rejected(OP, err))?;

    let record = service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: record.id })))
}

#[utoipa::path(
    get,
    path = "/api/v1/subscriptions/{id}",
    tag = "subscriptions",
    params(("id" = Uuid, Path, description = "Subscription id")),
    responses(
        (status = 200, description = "Subscription found", body = SubscriptionRecord),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "No such subscription", body = ErrorBody)
    )
)]
pub async fn get_subscription(
    Extension(service): Extension<SubscriptionService>,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<SubscriptionRecord>> {
    const OP: &str = "handler.get";
    let id = subscription_id(id).map_err(|err| rejected(OP, err))?;
    info!(op = OP, subscription_id = %id, "get requested");
    Ok(Json(service.get(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/subscriptions/{id}",
    tag = "subscriptions",
    params(("id" = Uuid, Path, description = "Subscription id")),
    request_body = SubscriptionChanges,
    responses(
        (status = 200, description = "Subscription updated", body = StatusResponse),
        (status = 400, description = "Malformed id or body", body = ErrorBody),
        (status = 404, description = "No such subscription", body = ErrorBody)
    )
)]
pub async fn update_subscription(
    Extension(service): Extension<SubscriptionService>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<SubscriptionChanges>, JsonRejection>,
) -> AppResult<Json<StatusResponse>> {
    const OP: &str = "handler.update";
    let id = subscription_id(id).map_err(|err| rejected(OP, err))?;
    let Json(mut payload) =
        payload.map_err(|err| rejected(OP, AppError::BadRequest(err.to_string())))?;
    info!(
        op = OP,
        subscription_id = %id,
        service_name = %payload.service_name,
        "update requested"
    );
    payload.service_name = validate_fields(
        &payload.service_name,
        payload.price,
        payload.start_date,
        payload.end_date,
    )
    .map_err(|err| rejected(OP, err))?;

    service.update(id, payload).await?;
    Ok(Json(StatusResponse {
        status: "ok".to_string(),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/v1/subscriptions/{id}",
    tag = "subscriptions",
    params(("id" = Uuid, Path, description = "Subscription id")),
    responses(
        (status = 204, description = "Subscription deleted"),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "No such subscription", body = ErrorBody)
    )
)]
pub async fn delete_subscription(
    Extension(service): Extension<SubscriptionService>,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<StatusCode> {
    const OP: &str = "handler.delete";
    let id = subscription_id(id).map_err(|err| rejected(OP, err))?;
    info!(op = OP, subscription_id = %id, "delete requested");
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/subscriptions",
    tag = "subscriptions",
    params(ListParams),
    responses(
        (status = 200, description = "Newest first", body = [SubscriptionRecord]),
        (status = 400, description = "Missing or malformed user_id", body = ErrorBody)
    )
)]
pub async fn list_subscriptions(
    Extension(service): Extension<SubscriptionService>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> AppResult<Json<Vec<SubscriptionRecord>>> {
    const OP: &str = "handler.list";
    let Query(params) =
        params.map_err(|err| rejected(OP, AppError::BadRequest(err.to_string())))?;
    info!(
        op = OP,
        user_id = params.user_id.as_deref(),
        service_name = params.service_name.as_deref(),
        "list requested"
    );
    let user_id = required(params.user_id.as_deref(), "user_id")
        .and_then(parse_user_id)
        .map_err(|err| rejected(OP, err))?;
    let service_name = service_filter(params.service_name);

    let records = service.list(user_id, service_name.as_deref()).await?;
    Ok(Json(records))
}

#[utoipa::path(
    get,
    path = "/api/v1/subscriptions/total_cost",
    tag = "subscriptions",
    params(TotalCostParams),
    responses(
        (status = 200, description = "Total billed cost over the period", body = TotalCostResponse),
        (status = 400, description = "Missing or malformed parameters", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn total_cost(
    Extension(service): Extension<SubscriptionService>,
    params: Result<Query<TotalCostParams>, QueryRejection>,
) -> AppResult<Json<TotalCostResponse>> {
    const OP: &str = "handler.total_cost";
    let Query(params) =
        params.map_err(|err| rejected(OP, AppError::BadRequest(err.to_string())))?;
    info!(
        op = OP,
        user_id = params.user_id.as_deref(),
        start_period = params.start_period.as_deref(),
        end_period = params.end_period.as_deref(),
        service_name = params.service_name.as_deref(),
        "total cost requested"
    );
    let window = query_window(params).map_err(|err| rejected(OP, err))?;
    let total_cost = service.total_cost(&window).await?;
    Ok(Json(TotalCostResponse { total_cost }))
}

/// Resolves raw query parameters into a billing window. `end_period` is
/// widened to the last day of its month here, not in the aggregator.
fn query_window(params: TotalCostParams) -> AppResult<QueryWindow> {
    let user_id = parse_user_id(required(params.user_id.as_deref(), "user_id")?)?;
    let start_raw = required(params.start_period.as_deref(), "start_period")?;
    let end_raw = required(params.end_period.as_deref(), "end_period")?;

    let period_start = parse_period(start_raw, "start_period")?;
    let end_month = parse_period(end_raw, "end_period")?;
    let period_end = last_of_month(end_month).ok_or_else(|| {
        AppError::BadRequest("end_period is outside the supported calendar".to_string())
    })?;

    if period_start > period_end {
        return Err(AppError::BadRequest(
            "start_period must not be after end_period".to_string(),
        ));
    }

    Ok(QueryWindow {
        user_id,
        service_name: service_filter(params.service_name),
        period_start,
        period_end,
    })
}

fn subscription_id(id: Result<Path<Uuid>, PathRejection>) -> AppResult<Uuid> {
    id.map(|Path(id)| id)
        .map_err(|_| AppError::BadRequest("invalid subscription ID".to_string()))
}

fn required<'a>(value: Option<&'a str>, name: &str) -> AppResult<&'a str> {
    value.ok_or_else(|| AppError::BadRequest(format!("{name} is required")))
}

fn parse_user_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::BadRequest("invalid user_id format".to_string()))
}

fn service_filter(raw: Option<String>) -> Option<String> {
    raw.map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
}

/// Parses a `YYYY-MM` period into the first day of that month.
fn parse_period(raw: &str, name: &str) -> AppResult<NaiveDate> {
    let invalid = || AppError::BadRequest(format!("invalid {name} format, use YYYY-MM"));
    let (year, month) = raw.trim().split_once('-').ok_or_else(invalid)?;
    let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if year.len() != 4 || month.len() != 2 || !digits(year) || !digits(month) {
        return Err(invalid());
    }
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)
}

/// Checks the writable fields and returns the trimmed service name.
fn validate_fields(
    service_name: &str,
    price: i32,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> AppResult<String> {
    let service_name = service_name.trim();
    if service_name.is_empty() {
        return Err(AppError::BadRequest("service_name is required".to_string()));
    }
    if price < 0 {
        return Err(AppError::BadRequest(
            "price must not be negative".to_string(),
        ));
    }
    if matches!(end_date, Some(end) if end < start_date) {
        return Err(AppError::BadRequest(
            "end_date must not be before start_date".to_string(),
        ));
    }
    Ok(service_name.to_string())
}
