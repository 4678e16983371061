//! Payload normalizers: pure mappings from raw upstream JSON to report DTOs.
//!
//! Rules applied uniformly (spec'd once here rather than per function):
//!
//! - Financial fields are read as exact-precision decimals; the workspace
//!   builds `serde_json` with `arbitrary_precision`, so numeric literals
//!   survive parsing verbatim, validated through [`rust_decimal::Decimal`],
//!   and re-serialized as plain (non-scientific) decimal strings.
//! - Missing counters resolve to `"0"`; missing text resolves to `""`.
//! - List-shaped results keep the upstream array order; a single malformed
//!   list element is skipped with a log record, not a batch failure.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

use storepulse_core::{
    BookingCounters, SalesDetailLine, SalesSummary, ServiceItem, ServiceSummary,
};

use crate::error::UpstreamError;
use crate::types::{BookingItem, SalesOrderItem};

/// Extracts the `result` envelope field shared by all report endpoints.
fn result_node(body: &Value) -> Result<&Value, UpstreamError> {
    body.get("result").ok_or_else(|| UpstreamError::Format {
        path: "result".to_owned(),
    })
}

/// Reads a field with the upstream's text semantics: strings verbatim,
/// numbers as their literal, anything else (including absence) as `""`.
pub(crate) fn text(node: &Value, field: &str) -> String {
    match node.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Reads a counter field, defaulting to `"0"` when the key is absent, null,
/// or not something countable.
fn count(node: &Value, field: &str) -> String {
    match node.get(field) {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => "0".to_owned(),
    }
}

/// Reads a financial field as an exact decimal and renders it as a plain
/// decimal string. Absent or null fields resolve to `"0"`.
///
/// # Errors
///
/// Returns [`UpstreamError::Format`] carrying `path` if the field holds a
/// value that cannot be interpreted as a decimal.
fn decimal(node: &Value, field: &str, path: &str) -> Result<String, UpstreamError> {
    let raw = match node.get(field) {
        None | Some(Value::Null) => return Ok("0".to_owned()),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.trim().to_owned(),
        Some(_) => {
            return Err(UpstreamError::Format {
                path: path.to_owned(),
            })
        }
    };

    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map(|d| d.to_string())
        .map_err(|_| UpstreamError::Format {
            path: path.to_owned(),
        })
}

/// Normalizes the sales-list response into a [`SalesSummary`].
///
/// # Errors
///
/// Returns [`UpstreamError::Format`] if the `result` envelope is missing or
/// a financial field is not decimal-shaped.
pub fn sales_summary(body: &Value) -> Result<SalesSummary, UpstreamError> {
    let result = result_node(body)?;
    Ok(SalesSummary {
        total_revenue: decimal(result, "TotalValue", "result.TotalValue")?,
        to_pay: decimal(result, "ToPay", "result.ToPay")?,
        actual_revenue: decimal(result, "DaThToan", "result.DaThToan")?,
        cash: decimal(result, "DaThToan_TM", "result.DaThToan_TM")?,
        transfer: decimal(result, "DaThToan_CK", "result.DaThToan_CK")?,
        card: decimal(result, "DaThToan_QT", "result.DaThToan_QT")?,
        wallet: decimal(result, "DaThToan_Vi", "result.DaThToan_Vi")?,
        loyalty: decimal(result, "DaThToan_ThTien", "result.DaThToan_ThTien")?,
        debt: decimal(result, "ConNo", "result.ConNo")?,
    })
}

/// Extracts just the paid-revenue scalar from the sales-list response.
///
/// # Errors
///
/// Same conditions as [`sales_summary`].
pub fn actual_revenue(body: &Value) -> Result<String, UpstreamError> {
    let result = result_node(body)?;
    decimal(result, "DaThToan", "result.DaThToan")
}

/// Normalizes the service-overview response into a [`ServiceSummary`].
///
/// Items keep the upstream order; a malformed item is skipped with a log
/// record rather than failing the whole report.
///
/// # Errors
///
/// Returns [`UpstreamError::Format`] if the `result` envelope is missing.
pub fn service_summary(body: &Value) -> Result<ServiceSummary, UpstreamError> {
    let result = result_node(body)?;

    let items = match result.get("Items") {
        Some(Value::Array(raw)) => raw
            .iter()
            .map(|item| ServiceItem {
                name: text(item, "ProServiceName"),
                usage_count: count(item, "CasesNum"),
                usage_percent: count(item, "CasesPercent"),
            })
            .collect(),
        _ => Vec::new(),
    };

    Ok(ServiceSummary {
        total_services: count(result, "TotalCasesInDay"),
        in_progress: count(result, "DoingCases"),
        done: count(result, "DoneCases"),
        items,
    })
}

/// Normalizes the sales-detail response into product lines.
///
/// The upstream returns `result` as a bare array here (not an object); a
/// non-array `result` yields an empty list. Malformed elements are skipped
/// with a log record (skip-and-continue), preserving the rest of the batch.
///
/// # Errors
///
/// Returns [`UpstreamError::Format`] if the `result` envelope is missing.
pub fn sales_detail(body: &Value) -> Result<Vec<SalesDetailLine>, UpstreamError> {
    let result = result_node(body)?;

    let Value::Array(raw) = result else {
        return Ok(Vec::new());
    };

    let mut lines = Vec::with_capacity(raw.len());
    for (idx, item) in raw.iter().enumerate() {
        match sales_detail_line(item, idx) {
            Ok(line) => lines.push(line),
            Err(e) => {
                tracing::warn!(index = idx, error = %e, "sales_detail: skipping malformed line");
            }
        }
    }
    Ok(lines)
}

fn sales_detail_line(item: &Value, idx: usize) -> Result<SalesDetailLine, UpstreamError> {
    let at = |field: &str| format!("result[{idx}].{field}");
    Ok(SalesDetailLine {
        product_name: text(item, "ProdTitle"),
        product_code: text(item, "DynamicID"),
        product_unit: text(item, "StockUnit"),
        quantity: decimal(item, "SumQTy", &at("SumQTy"))?,
        price: decimal(item, "SumTopay", &at("SumTopay"))?,
        discount: decimal(item, "Giamgia", &at("Giamgia"))?,
        format: text(item, "Format"),
        cash: decimal(item, "TM", &at("TM"))?,
        transfer: decimal(item, "CK", &at("CK"))?,
        card: decimal(item, "QT", &at("QT"))?,
        wallet: decimal(item, "Vi", &at("Vi"))?,
        loyalty: decimal(item, "TT", &at("TT"))?,
    })
}

/// Normalizes the booking-report response into status counters.
///
/// Every counter defaults to `"0"` when the upstream omits the key, an
/// absent `Sum` object yields all-zero counters, not a failure.
///
/// # Errors
///
/// Returns [`UpstreamError::Format`] if the `result` envelope is missing.
pub fn booking_counters(body: &Value) -> Result<BookingCounters, UpstreamError> {
    let result = result_node(body)?;
    let sum = result.get("Sum").unwrap_or(&Value::Null);

    Ok(BookingCounters {
        unconfirmed: count(sum, "CHUA_XAC_NHAN"),
        confirmed: count(sum, "XAC_NHAN"),
        denied: count(sum, "TU_CHOI"),
        customer_came: count(sum, "KHACH_DEN"),
        customer_no_show: count(sum, "KHACH_KHONG_DEN"),
        cancelled: count(sum, "KHACH_HUY"),
        auto_confirmed: count(sum, "XAC_NHAN_TU_DONG"),
    })
}

/// Extracts the booking rows under `result.Items` for classification and
/// bucketing. A malformed row is skipped with a log record.
///
/// # Errors
///
/// Returns [`UpstreamError::Format`] if the `result` envelope is missing.
pub fn booking_items(body: &Value) -> Result<Vec<BookingItem>, UpstreamError> {
    items_from_result(body, "booking_items")
}

/// Extracts the sales orders under `result.Items` for the sales-by-hour pass.
///
/// # Errors
///
/// Returns [`UpstreamError::Format`] if the `result` envelope is missing.
pub fn sales_order_items(body: &Value) -> Result<Vec<SalesOrderItem>, UpstreamError> {
    items_from_result(body, "sales_order_items")
}

fn items_from_result<T: serde::de::DeserializeOwned>(
    body: &Value,
    op: &str,
) -> Result<Vec<T>, UpstreamError> {
    let result = result_node(body)?;

    let Some(Value::Array(raw)) = result.get("Items") else {
        return Ok(Vec::new());
    };

    Ok(raw
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| {
            serde_json::from_value::<T>(item.clone())
                .map_err(|e| {
                    tracing::warn!(index = idx, error = %e, "{op}: skipping malformed item");
                })
                .ok()
        })
        .collect())
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
