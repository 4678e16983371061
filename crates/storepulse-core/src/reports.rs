//! Report DTOs returned by the aggregation operations.
//!
//! All financial values are exact-precision decimal strings, never binary
//! floats; they are carried verbatim (after decimal normalization) from the
//! upstream payload to avoid currency rounding drift. Report DTOs are built
//! fresh per request and never persisted.

use serde::{Deserialize, Serialize};

/// Aggregate revenue for a date range.
///
/// The payment-method breakdown need not sum to `actual_revenue`; the
/// upstream may omit methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub total_revenue: String,
    pub to_pay: String,
    pub actual_revenue: String,
    pub cash: String,
    pub transfer: String,
    pub card: String,
    pub wallet: String,
    pub loyalty: String,
    pub debt: String,
}

/// Service-center load for a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummary {
    pub total_services: String,
    pub in_progress: String,
    pub done: String,
    /// Upstream array order is preserved; no local re-sorting.
    pub items: Vec<ServiceItem>,
}

/// One service type's usage within a [`ServiceSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceItem {
    pub name: String,
    pub usage_count: String,
    /// Upstream-computed percentage, not recomputed locally.
    pub usage_percent: String,
}

/// One product line in the sales-detail report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesDetailLine {
    pub product_name: String,
    pub product_code: String,
    pub product_unit: String,
    pub quantity: String,
    pub price: String,
    pub discount: String,
    pub format: String,
    pub cash: String,
    pub transfer: String,
    pub card: String,
    pub wallet: String,
    pub loyalty: String,
}

/// Booking status tally for a date range.
///
/// Each field defaults to `"0"` when the upstream omits the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCounters {
    pub unconfirmed: String,
    pub confirmed: String,
    pub denied: String,
    pub customer_came: String,
    pub customer_no_show: String,
    pub cancelled: String,
    pub auto_confirmed: String,
}

/// One acquisition-source group of deduplicated customers.
///
/// Counts partition the customer set exactly: every counted customer appears
/// in exactly one bucket. Output order is insignificant to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerBucket {
    pub source: String,
    pub count: u64,
}

/// One hour-of-day booking slot, labelled `"HH:00"`.
///
/// Bucket lists are ordered ascending by hour and contain only observed
/// hours; they are not padded to 24 entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourBucket {
    pub label: String,
    pub count: u64,
}

/// Sales tally for one (calendar day, one-hour range) pair.
///
/// Only the 09:00–22:59 business window is represented, and only pairs with
/// at least one event are emitted (sparse, no zero-filled gaps).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesHourBucket {
    pub date: String,
    pub time_range: String,
    pub total_sales: u64,
}
