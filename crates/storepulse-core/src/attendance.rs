//! The derived attendance entity produced by the work-track synchronizer.

use serde::{Deserialize, Serialize};

/// One employee's derived shift metrics for one date.
///
/// Keyed by `(username, date)`; the store reconciles new-vs-existing rows on
/// that key, which makes the daily sync idempotent under re-execution.
///
/// Sign conventions on the minute metrics encode direction, not magnitude
/// error: `early_arrival`, `late_arrival`, and `early_departure` are always
/// non-positive; `late_departure` is always non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub full_name: String,
    pub username: String,
    pub store_id: String,
    pub store_title: String,
    /// Calendar date of the shift, as reported upstream.
    pub date: String,
    pub check_in: String,
    pub check_out: String,
    pub shift_title: String,
    pub time_from: String,
    pub time_to: String,
    /// Fractional attendance credit reported by the upstream system.
    pub man_days: String,
    pub check_in_type: String,
    pub check_in_reason: String,
    pub check_out_type: String,
    pub check_out_reason: String,
    pub early_arrival: f64,
    pub late_arrival: f64,
    pub early_departure: f64,
    pub late_departure: f64,
}
