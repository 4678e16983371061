//! High-level report operations over the upstream client.
//!
//! [`ReportService`] owns one [`UpstreamClient`] and a [`TokenProvider`] and
//! exposes one method per report. Each method composes a request from the
//! catalogue, sends it with a fresh token, and runs the matching normalizer.
//! The service itself holds no retry loop: the interactive read path returns
//! the first failure, and the scheduler wraps its calls in
//! [`crate::retry::retry_with_backoff`] instead.

use std::future::Future;

use serde_json::Value;

use storepulse_core::{
    AttendanceRecord, BookingCounters, CustomerBucket, HourBucket, SalesDetailLine,
    SalesHourBucket, SalesSummary, ServiceSummary,
};

use crate::buckets;
use crate::classify::{self, GENERIC_APP_SOURCE, UNCLASSIFIED_SOURCE};
use crate::client::UpstreamClient;
use crate::error::UpstreamError;
use crate::normalize;
use crate::requests::{self, ApiRequest, MemberFilter};
use crate::worktrack;

/// Supplies the bearer token attached to every upstream call.
///
/// The seam exists so the service can run against a configured static token
/// in production and a fixture token in tests, and so a future interactive
/// login flow can slot in without touching the report methods.
pub trait TokenProvider: Send + Sync {
    /// Returns a token usable for the next call.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::Token`] when no credential is available.
    fn token(&self) -> impl Future<Output = Result<String, UpstreamError>> + Send;
}

/// [`TokenProvider`] backed by a token loaded once from configuration.
#[derive(Clone)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self(token.filter(|t| !t.trim().is_empty()))
    }
}

impl TokenProvider for StaticToken {
    async fn token(&self) -> Result<String, UpstreamError> {
        self.0
            .clone()
            .ok_or_else(|| UpstreamError::Token("UPSTREAM_TOKEN is not configured".to_owned()))
    }
}

/// The report surface: one method per report operation.
pub struct ReportService<P> {
    client: UpstreamClient,
    tokens: P,
    store_id: String,
}

impl<P: TokenProvider> ReportService<P> {
    pub fn new(client: UpstreamClient, tokens: P, store_id: impl Into<String>) -> Self {
        Self {
            client,
            tokens,
            store_id: store_id.into(),
        }
    }

    async fn fetch(&self, request: &ApiRequest) -> Result<Value, UpstreamError> {
        let token = self.tokens.token().await?;
        self.client.call(&token, request).await
    }

    /// Revenue summary for the range (`dd/MM/yyyy` dates, inclusive).
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] on transport, auth, or payload-shape failure.
    pub async fn sales_summary(
        &self,
        date_start: &str,
        date_end: &str,
    ) -> Result<SalesSummary, UpstreamError> {
        let body = self.fetch(&requests::sales_list(date_start, date_end)).await?;
        normalize::sales_summary(&body)
    }

    /// The paid-revenue scalar alone, as a decimal string.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] on transport, auth, or payload-shape failure.
    pub async fn actual_revenue(
        &self,
        date_start: &str,
        date_end: &str,
    ) -> Result<String, UpstreamError> {
        let body = self.fetch(&requests::sales_list(date_start, date_end)).await?;
        normalize::actual_revenue(&body)
    }

    /// Service-center counters plus per-service usage items.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] on transport, auth, or payload-shape failure.
    pub async fn service_summary(
        &self,
        date_start: &str,
        date_end: &str,
    ) -> Result<ServiceSummary, UpstreamError> {
        let body = self
            .fetch(&requests::service_overview(date_start, date_end))
            .await?;
        normalize::service_summary(&body)
    }

    /// Per-product sales lines, scoped to the configured store.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] on transport, auth, or payload-shape failure.
    pub async fn sales_detail(
        &self,
        date_start: &str,
        date_end: &str,
    ) -> Result<Vec<SalesDetailLine>, UpstreamError> {
        let body = self
            .fetch(&requests::sales_detail(date_start, date_end, &self.store_id))
            .await?;
        normalize::sales_detail(&body)
    }

    /// Booking tallies by status for the range.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] on transport, auth, or payload-shape failure.
    pub async fn booking_counters(
        &self,
        date_start: &str,
        date_end: &str,
    ) -> Result<BookingCounters, UpstreamError> {
        let body = self
            .fetch(&requests::booking_counters(
                date_start,
                date_end,
                &self.store_id,
            ))
            .await?;
        normalize::booking_counters(&body)
    }

    /// Acquisition channels of first-visit customers who showed up.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] on transport, auth, or payload-shape failure.
    pub async fn new_customer_sources(
        &self,
        date_start: &str,
        date_end: &str,
    ) -> Result<Vec<CustomerBucket>, UpstreamError> {
        let items = self.visits(date_start, date_end, MemberFilter::New).await?;
        Ok(classify::classify_sources(&items, UNCLASSIFIED_SOURCE))
    }

    /// Acquisition channels of returning customers who showed up.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] on transport, auth, or payload-shape failure.
    pub async fn returning_customer_sources(
        &self,
        date_start: &str,
        date_end: &str,
    ) -> Result<Vec<CustomerBucket>, UpstreamError> {
        let items = self
            .visits(date_start, date_end, MemberFilter::Returning)
            .await?;
        Ok(classify::classify_sources(&items, GENERIC_APP_SOURCE))
    }

    /// Bookings of customers who showed up, grouped by hour of booking.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] on transport, auth, or payload-shape failure.
    pub async fn bookings_by_hour(
        &self,
        date_start: &str,
        date_end: &str,
    ) -> Result<Vec<HourBucket>, UpstreamError> {
        let items = self.visits(date_start, date_end, MemberFilter::All).await?;
        Ok(buckets::bookings_by_hour(&items))
    }

    /// Sales orders grouped per day into the business-hours ranges.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] on transport, auth, or payload-shape failure.
    pub async fn sales_by_hour(
        &self,
        date_start: &str,
        date_end: &str,
    ) -> Result<Vec<SalesHourBucket>, UpstreamError> {
        let body = self.fetch(&requests::sales_list(date_start, date_end)).await?;
        let items = normalize::sales_order_items(&body)?;
        Ok(buckets::sales_by_hour_range(&items))
    }

    /// Attendance records derived from the work-track feed for the range
    /// (`dd/MM/yyyy` dates).
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] on transport, auth, or payload-shape failure.
    pub async fn work_track(
        &self,
        from: &str,
        to: &str,
    ) -> Result<Vec<AttendanceRecord>, UpstreamError> {
        let body = self.fetch(&requests::work_track_list(from, to)).await?;
        worktrack::derive_attendance(&body)
    }

    async fn visits(
        &self,
        date_start: &str,
        date_end: &str,
        member: MemberFilter,
    ) -> Result<Vec<crate::types::BookingItem>, UpstreamError> {
        let body = self
            .fetch(&requests::customer_visits(
                date_start,
                date_end,
                &self.store_id,
                member,
            ))
            .await?;
        normalize::booking_items(&body)
    }
}
