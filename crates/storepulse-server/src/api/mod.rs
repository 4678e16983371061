mod attendance;
mod realtime;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use storepulse_upstream::{ReportService, StaticToken, UpstreamError};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub service: Arc<ReportService<StaticToken>>,
}

/// Inclusive report range, matching the upstream's `dd/MM/yyyy` convention.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub date_start: String,
    pub date_end: String,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "upstream_unavailable" | "upstream_invalid" => StatusCode::BAD_GATEWAY,
            "upstream_token" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

impl From<UpstreamError> for ApiError {
    fn from(error: UpstreamError) -> Self {
        tracing::error!(error = %error, "upstream report call failed");
        match error {
            UpstreamError::Transport(_) | UpstreamError::Status { .. } => {
                ApiError::new("upstream_unavailable", "upstream request failed")
            }
            UpstreamError::Deserialize { .. } | UpstreamError::Format { .. } => {
                ApiError::new("upstream_invalid", "upstream returned an unexpected payload")
            }
            UpstreamError::Token(message) => ApiError::new("upstream_token", message),
        }
    }
}

pub(super) fn map_db_error(error: &storepulse_db::DbError) -> ApiError {
    tracing::error!(error = %error, "database query failed");
    ApiError::new("internal_error", "database query failed")
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/real-time/sales-summary", get(realtime::sales_summary))
        .route(
            "/api/real-time/get-actual-revenue",
            get(realtime::actual_revenue),
        )
        .route(
            "/api/real-time/service-summary",
            get(realtime::service_summary),
        )
        .route("/api/real-time/sales-detail", get(realtime::sales_detail))
        .route("/api/real-time/booking", get(realtime::booking_counters))
        .route(
            "/api/real-time/get-new-customer",
            get(realtime::new_customer_sources),
        )
        .route(
            "/api/real-time/get-old-customer",
            get(realtime::returning_customer_sources),
        )
        .route(
            "/api/real-time/get-booking-by-hour",
            get(realtime::bookings_by_hour),
        )
        .route(
            "/api/real-time/get-sales-by-hour",
            get(realtime::sales_by_hour),
        )
        .route("/api/attendance", get(attendance::list_attendance))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors()),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match storepulse_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthData {
                status: "ok",
                database: "ok",
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthData {
                    status: "degraded",
                    database: "unavailable",
                }),
            )
        }
    }
}
