use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use flow_common::{BacktestRequest, BacktestResult, ComparisonResult};
use flow_core::service::ServiceError;
use serde::Serialize;
use serde_json::json;
use tracing::{error, info, warn};

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub version: &'static str,
}

/// Failure returned to HTTP callers as `{"error": message}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        if err.is_client_error() {
            warn!("Rejected request: {}", err);
            ApiError::BadRequest(err.to_string())
        } else {
            error!("Backtest failed: {}", err);
            ApiError::Internal(err.to_string())
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!("Malformed request body: {}", rejection);
        ApiError::BadRequest(rejection.body_text())
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Runs a single-direction backtest.
///
/// # Errors
/// Returns `400` for malformed bodies, invalid parameters or an unparseable
/// date, and `500` if the simulation task fails.
pub async fn run_backtest(
    State(state): State<AppState>,
    payload: Result<Json<BacktestRequest>, JsonRejection>,
) -> Result<Json<BacktestResult>, ApiError> {
    let Json(request) = payload?;
    info!("Backtest requested: {:?}", request);

    let service = state.service.clone();
    let result = tokio::task::spawn_blocking(move || service.run(&request))
        .await
        .map_err(|e| ServiceError::Task(e.to_string()))??;

    Ok(Json(result))
}

/// Runs the three-strategy comparison.
///
/// # Errors
/// Same contract as [`run_backtest`].
pub async fn compare_strategies(
    State(state): State<AppState>,
    payload: Result<Json<BacktestRequest>, JsonRejection>,
) -> Result<Json<ComparisonResult>, ApiError> {
    let Json(request) = payload?;
    info!("Comparison requested: {:?}", request);

    let service = state.service.clone();
    let result = tokio::task::spawn_blocking(move || service.compare(&request))
        .await
        .map_err(|e| ServiceError::Task(e.to_string()))??;

    Ok(Json(result))
}
