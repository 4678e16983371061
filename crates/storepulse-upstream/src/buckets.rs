//! Time-bucketing engine: hour-of-booking and day × hour-range passes.
//!
//! Both passes accumulate into ordered maps and materialize the output once
//! at the end, with no shared mutable state across calls. Records whose
//! timestamp fails to parse are skipped with a log record; they never abort
//! the batch.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use storepulse_core::{HourBucket, SalesHourBucket};

use crate::types::{BookingItem, SalesOrderItem};

/// The upstream's literal timestamp format, `yyyy-MM-dd'T'HH:mm:ss`.
const UPSTREAM_TS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Buckets bookings by hour of day, labelled `"HH:00"`.
///
/// The output is ordered ascending by hour and contains exactly the set of
/// observed hours, with no zero-padded entries. The sum of counts equals the
/// number of successfully parsed records.
#[must_use]
pub fn bookings_by_hour(items: &[BookingItem]) -> Vec<HourBucket> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();

    for item in items {
        let Some(raw) = item.book_date.as_deref().filter(|s| !s.is_empty()) else {
            continue;
        };
        match NaiveDateTime::parse_from_str(raw, UPSTREAM_TS_FORMAT) {
            Ok(ts) => {
                let label = ts.format("%H:00").to_string();
                *counts.entry(label).or_insert(0) += 1;
            }
            Err(e) => {
                tracing::debug!(timestamp = raw, error = %e, "bookings_by_hour: skipping unparseable timestamp");
            }
        }
    }

    // Zero-padded "HH:00" labels sort lexicographically in hour order.
    counts
        .into_iter()
        .map(|(label, count)| HourBucket { label, count })
        .collect()
}

/// Buckets sales orders by (calendar day, one-hour range) within the fixed
/// 09:00–22:59 window.
///
/// Orders outside the window are discarded. Output rows are ordered by day
/// ascending, then range label ascending, and only pairs with at least one
/// event appear (sparse representation).
#[must_use]
pub fn sales_by_hour_range(items: &[SalesOrderItem]) -> Vec<SalesHourBucket> {
    let mut grouped: BTreeMap<String, BTreeMap<&'static str, u64>> = BTreeMap::new();

    for item in items {
        let Some(raw) = item.create_date.as_deref().filter(|s| !s.is_empty()) else {
            continue;
        };
        let ts = match NaiveDateTime::parse_from_str(raw, UPSTREAM_TS_FORMAT) {
            Ok(ts) => ts,
            Err(e) => {
                tracing::debug!(timestamp = raw, error = %e, "sales_by_hour_range: skipping unparseable timestamp");
                continue;
            }
        };

        let Some(range) = hour_range_label(chrono::Timelike::hour(&ts)) else {
            continue;
        };
        let day = ts.format(DAY_FORMAT).to_string();
        *grouped.entry(day).or_default().entry(range).or_insert(0) += 1;
    }

    let mut rows = Vec::new();
    for (day, ranges) in grouped {
        for (range, total) in ranges {
            rows.push(SalesHourBucket {
                date: day.clone(),
                time_range: range.to_owned(),
                total_sales: total,
            });
        }
    }
    rows
}

/// Maps an hour of day to one of the fourteen fixed one-hour range labels,
/// or `None` outside the business window.
fn hour_range_label(hour: u32) -> Option<&'static str> {
    match hour {
        9 => Some("09:00 - 09:59"),
        10 => Some("10:00 - 10:59"),
        11 => Some("11:00 - 11:59"),
        12 => Some("12:00 - 12:59"),
        13 => Some("13:00 - 13:59"),
        14 => Some("14:00 - 14:59"),
        15 => Some("15:00 - 15:59"),
        16 => Some("16:00 - 16:59"),
        17 => Some("17:00 - 17:59"),
        18 => Some("18:00 - 18:59"),
        19 => Some("19:00 - 19:59"),
        20 => Some("20:00 - 20:59"),
        21 => Some("21:00 - 21:59"),
        22 => Some("22:00 - 22:59"),
        _ => None,
    }
}

#[cfg(test)]
#[path = "buckets_test.rs"]
mod tests;
