//! Database operations for the `attendance_records` table.
//!
//! One row per (employee username, date). The scheduled synchronizer upserts
//! the whole derived batch every run, so re-running a day is idempotent.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use storepulse_core::AttendanceRecord;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `attendance_records` table.
///
/// Check-in/check-out timestamps and shift times are carried as the upstream's
/// text values; the feed leaves them empty for open shifts and the reporting
/// surface renders them verbatim.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AttendanceRow {
    pub id: i64,
    pub full_name: String,
    pub username: String,
    pub store_id: String,
    pub store_title: String,
    pub date: NaiveDate,
    pub check_in: String,
    pub check_out: String,
    pub shift_title: String,
    pub time_from: String,
    pub time_to: String,
    pub man_days: String,
    pub check_in_type: String,
    pub check_in_reason: String,
    pub check_out_type: String,
    pub check_out_reason: String,
    pub early_arrival: f64,
    pub late_arrival: f64,
    pub early_departure: f64,
    pub late_departure: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of an upsert: the row id and whether the row was newly inserted.
#[derive(Debug, Clone, Copy)]
pub struct AttendanceUpsert {
    pub id: i64,
    pub is_new: bool,
}

const SELECT_COLUMNS: &str = "id, full_name, username, store_id, store_title, date, \
     check_in, check_out, shift_title, time_from, time_to, man_days, \
     check_in_type, check_in_reason, check_out_type, check_out_reason, \
     early_arrival, late_arrival, early_departure, late_departure, \
     created_at, updated_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Upserts one derived attendance record.
///
/// Conflicts on `(username, date)` overwrite every derived column in place;
/// `created_at` keeps its original value. `(xmax = 0)` distinguishes a fresh
/// insert from an overwrite so the synchronizer can report both counts.
///
/// # Errors
///
/// Returns [`DbError::InvalidDate`] if the record's date is not `yyyy-MM-dd`,
/// or [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_attendance(
    pool: &PgPool,
    record: &AttendanceRecord,
) -> Result<AttendanceUpsert, DbError> {
    let date = parse_date(&record.date)?;

    let (id, is_new): (i64, bool) = sqlx::query_as(
        "INSERT INTO attendance_records \
             (full_name, username, store_id, store_title, date, \
              check_in, check_out, shift_title, time_from, time_to, man_days, \
              check_in_type, check_in_reason, check_out_type, check_out_reason, \
              early_arrival, late_arrival, early_departure, late_departure) \
         VALUES ($1, $2, $3, $4, $5, \
                 $6, $7, $8, $9, $10, $11, \
                 $12, $13, $14, $15, \
                 $16, $17, $18, $19) \
         ON CONFLICT (username, date) DO UPDATE SET \
             full_name         = EXCLUDED.full_name, \
             store_id          = EXCLUDED.store_id, \
             store_title       = EXCLUDED.store_title, \
             check_in          = EXCLUDED.check_in, \
             check_out         = EXCLUDED.check_out, \
             shift_title       = EXCLUDED.shift_title, \
             time_from         = EXCLUDED.time_from, \
             time_to           = EXCLUDED.time_to, \
             man_days          = EXCLUDED.man_days, \
             check_in_type     = EXCLUDED.check_in_type, \
             check_in_reason   = EXCLUDED.check_in_reason, \
             check_out_type    = EXCLUDED.check_out_type, \
             check_out_reason  = EXCLUDED.check_out_reason, \
             early_arrival     = EXCLUDED.early_arrival, \
             late_arrival      = EXCLUDED.late_arrival, \
             early_departure   = EXCLUDED.early_departure, \
             late_departure    = EXCLUDED.late_departure, \
             updated_at        = NOW() \
         RETURNING id, (xmax = 0) AS is_new",
    )
    .bind(&record.full_name)
    .bind(&record.username)
    .bind(&record.store_id)
    .bind(&record.store_title)
    .bind(date)
    .bind(&record.check_in)
    .bind(&record.check_out)
    .bind(&record.shift_title)
    .bind(&record.time_from)
    .bind(&record.time_to)
    .bind(&record.man_days)
    .bind(&record.check_in_type)
    .bind(&record.check_in_reason)
    .bind(&record.check_out_type)
    .bind(&record.check_out_reason)
    .bind(record.early_arrival)
    .bind(record.late_arrival)
    .bind(record.early_departure)
    .bind(record.late_departure)
    .fetch_one(pool)
    .await?;

    Ok(AttendanceUpsert { id, is_new })
}

/// Returns one employee's attendance row for a date, or `None`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_by_employee_and_date(
    pool: &PgPool,
    username: &str,
    date: NaiveDate,
) -> Result<Option<AttendanceRow>, DbError> {
    let row = sqlx::query_as::<_, AttendanceRow>(&format!(
        "SELECT {SELECT_COLUMNS} FROM attendance_records WHERE username = $1 AND date = $2"
    ))
    .bind(username)
    .bind(date)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns all attendance rows for a date, ordered by store then name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_for_date(pool: &PgPool, date: NaiveDate) -> Result<Vec<AttendanceRow>, DbError> {
    let rows = sqlx::query_as::<_, AttendanceRow>(&format!(
        "SELECT {SELECT_COLUMNS} FROM attendance_records \
         WHERE date = $1 ORDER BY store_title, full_name"
    ))
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

fn parse_date(raw: &str) -> Result<NaiveDate, DbError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| DbError::InvalidDate(raw.to_owned()))
}
