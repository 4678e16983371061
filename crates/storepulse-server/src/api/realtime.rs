//! Real-time report routes: thin adapters over the upstream report service.
//!
//! Each handler forwards the `dateStart`/`dateEnd` range and serializes the
//! DTO as-is; all shaping lives in `storepulse-upstream`.

use axum::{
    extract::{Query, State},
    Json,
};

use storepulse_core::{
    BookingCounters, CustomerBucket, HourBucket, SalesDetailLine, SalesHourBucket, SalesSummary,
    ServiceSummary,
};

use super::{ApiError, AppState, DateRange};

pub async fn sales_summary(
    State(state): State<AppState>,
    Query(range): Query<DateRange>,
) -> Result<Json<SalesSummary>, ApiError> {
    let summary = state
        .service
        .sales_summary(&range.date_start, &range.date_end)
        .await?;
    Ok(Json(summary))
}

/// Returns the paid-revenue scalar as a plain text body, matching the shape
/// dashboard clients already consume.
pub async fn actual_revenue(
    State(state): State<AppState>,
    Query(range): Query<DateRange>,
) -> Result<String, ApiError> {
    let revenue = state
        .service
        .actual_revenue(&range.date_start, &range.date_end)
        .await?;
    Ok(revenue)
}

pub async fn service_summary(
    State(state): State<AppState>,
    Query(range): Query<DateRange>,
) -> Result<Json<ServiceSummary>, ApiError> {
    let summary = state
        .service
        .service_summary(&range.date_start, &range.date_end)
        .await?;
    Ok(Json(summary))
}

pub async fn sales_detail(
    State(state): State<AppState>,
    Query(range): Query<DateRange>,
) -> Result<Json<Vec<SalesDetailLine>>, ApiError> {
    let lines = state
        .service
        .sales_detail(&range.date_start, &range.date_end)
        .await?;
    Ok(Json(lines))
}

pub async fn booking_counters(
    State(state): State<AppState>,
    Query(range): Query<DateRange>,
) -> Result<Json<BookingCounters>, ApiError> {
    let counters = state
        .service
        .booking_counters(&range.date_start, &range.date_end)
        .await?;
    Ok(Json(counters))
}

pub async fn new_customer_sources(
    State(state): State<AppState>,
    Query(range): Query<DateRange>,
) -> Result<Json<Vec<CustomerBucket>>, ApiError> {
    let buckets = state
        .service
        .new_customer_sources(&range.date_start, &range.date_end)
        .await?;
    Ok(Json(buckets))
}

pub async fn returning_customer_sources(
    State(state): State<AppState>,
    Query(range): Query<DateRange>,
) -> Result<Json<Vec<CustomerBucket>>, ApiError> {
    let buckets = state
        .service
        .returning_customer_sources(&range.date_start, &range.date_end)
        .await?;
    Ok(Json(buckets))
}

pub async fn bookings_by_hour(
    State(state): State<AppState>,
    Query(range): Query<DateRange>,
) -> Result<Json<Vec<HourBucket>>, ApiError> {
    let buckets = state
        .service
        .bookings_by_hour(&range.date_start, &range.date_end)
        .await?;
    Ok(Json(buckets))
}

pub async fn sales_by_hour(
    State(state): State<AppState>,
    Query(range): Query<DateRange>,
) -> Result<Json<Vec<SalesHourBucket>>, ApiError> {
    let buckets = state
        .service
        .sales_by_hour(&range.date_start, &range.date_end)
        .await?;
    Ok(Json(buckets))
}
