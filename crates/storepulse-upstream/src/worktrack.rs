//! Work-track derivation: raw attendance feed to [`AttendanceRecord`]s.
//!
//! The upstream's work list nests per-employee entries, each holding per-date
//! entries that may or may not carry a `WorkTrack` payload. Entries without
//! one mean "no shift recorded" and are skipped, not errors. The derivation
//! is pure; the scheduler feeds the records to the persistence adapter, so
//! this logic is testable without a store.

use serde_json::Value;

use storepulse_core::AttendanceRecord;

use crate::error::UpstreamError;
use crate::normalize::text;

/// Derives one [`AttendanceRecord`] per (employee, date) pair with a
/// recorded work-track payload.
///
/// Sign conventions: arrival metrics and early departure are forced
/// non-positive, late departure non-negative; the sign encodes direction
/// regardless of how the upstream reports the magnitude. Late departure
/// lives under the nested `Info.CheckOut` object rather than next to the
/// other metrics; that is the upstream's shape, not ours.
///
/// A missing or non-array `list` field yields an empty batch with a log
/// record: the upstream sends that for days with no staff activity.
///
/// # Errors
///
/// Currently infallible in practice; the `Result` reserves the right to
/// reject wholly unrecognizable payloads.
pub fn derive_attendance(body: &Value) -> Result<Vec<AttendanceRecord>, UpstreamError> {
    let Some(Value::Array(list)) = body.get("list") else {
        tracing::warn!("work-track response has no 'list' array; treating as empty day");
        return Ok(Vec::new());
    };

    let mut records = Vec::new();
    for employee in list {
        let full_name = text(employee, "FullName");
        let username = text(employee, "UserName");
        let store_id = text(employee, "StockID");
        let store_title = text(employee, "StockTitle");

        let Some(Value::Array(dates)) = employee.get("Dates") else {
            continue;
        };

        for date_entry in dates {
            let date = text(date_entry, "Date");
            let Some(work) = date_entry.get("WorkTrack").filter(|w| !w.is_null()) else {
                // No shift recorded for this employee on this date.
                continue;
            };

            let info = work.get("Info").unwrap_or(&Value::Null);
            let work_today = info.get("WorkToday").unwrap_or(&Value::Null);
            let check_out_info = info.get("CheckOut").unwrap_or(&Value::Null);

            records.push(AttendanceRecord {
                full_name: full_name.clone(),
                username: username.clone(),
                store_id: store_id.clone(),
                store_title: store_title.clone(),
                date,
                check_in: text(work, "CheckIn"),
                check_out: text(work, "CheckOut"),
                shift_title: text(work_today, "Title"),
                time_from: text(work_today, "TimeFrom"),
                time_to: text(work_today, "TimeTo"),
                man_days: text(work_today, "Value"),
                check_in_type: text(info, "Type"),
                check_in_reason: text(info, "Desc"),
                check_out_type: text(check_out_info, "Type"),
                check_out_reason: text(check_out_info, "Desc"),
                early_arrival: -minutes(info, "DI_SOM").abs(),
                late_arrival: -minutes(info, "DI_MUON").abs(),
                early_departure: -minutes(info, "VE_SOM").abs(),
                late_departure: minutes(check_out_info, "VE_MUON").abs(),
            });
        }
    }

    Ok(records)
}

/// Reads a `{ "Value": <minutes> }` metric object, defaulting to zero.
fn minutes(node: &Value, key: &str) -> f64 {
    node.get(key)
        .and_then(|m| m.get("Value"))
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
}
