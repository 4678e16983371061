//! Read surface for synchronized attendance records.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use storepulse_db::AttendanceRow;

use super::{map_db_error, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct AttendanceQuery {
    /// `yyyy-MM-dd`, the storage key format.
    pub date: String,
    /// Narrow to one employee when set.
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceItem {
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
}

impl From<AttendanceRow> for AttendanceItem {
    fn from(row: AttendanceRow) -> Self {
        Self {
            full_name: row.full_name,
            username: row.username,
            store_id: row.store_id,
            store_title: row.store_title,
            date: row.date,
            check_in: row.check_in,
            check_out: row.check_out,
            shift_title: row.shift_title,
            time_from: row.time_from,
            time_to: row.time_to,
            man_days: row.man_days,
            check_in_type: row.check_in_type,
            check_in_reason: row.check_in_reason,
            check_out_type: row.check_out_type,
            check_out_reason: row.check_out_reason,
            early_arrival: row.early_arrival,
            late_arrival: row.late_arrival,
            early_departure: row.early_departure,
            late_departure: row.late_departure,
        }
    }
}

pub async fn list_attendance(
    State(state): State<AppState>,
    Query(query): Query<AttendanceQuery>,
) -> Result<Json<Vec<AttendanceItem>>, ApiError> {
    let date = NaiveDate::parse_from_str(&query.date, "%Y-%m-%d")
        .map_err(|_| ApiError::new("validation_error", "date must be yyyy-MM-dd"))?;

    let rows: Vec<AttendanceRow> = match &query.username {
        Some(username) => {
            storepulse_db::find_by_employee_and_date(&state.pool, username, date)
                .await
                .map_err(|e| map_db_error(&e))?
                .into_iter()
                .collect()
        }
        None => storepulse_db::list_for_date(&state.pool, date)
            .await
            .map_err(|e| map_db_error(&e))?,
    };

    Ok(Json(rows.into_iter().map(AttendanceItem::from).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn attendance_item_serializes_camel_case() {
        let row = AttendanceRow {
            id: 1,
            full_name: "Nguyen Van A".to_string(),
            username: "nguyena".to_string(),
            store_id: "8975".to_string(),
            store_title: "District 1".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 2, 28).unwrap(),
            check_in: "2025-02-28T09:12:00".to_string(),
            check_out: String::new(),
            shift_title: "Morning".to_string(),
            time_from: "09:00".to_string(),
            time_to: "18:00".to_string(),
            man_days: "1".to_string(),
            check_in_type: "LATE".to_string(),
            check_in_reason: String::new(),
            check_out_type: String::new(),
            check_out_reason: String::new(),
            early_arrival: 0.0,
            late_arrival: -12.0,
            early_departure: 0.0,
            late_departure: 0.0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(AttendanceItem::from(row)).expect("serialize");
        assert_eq!(json["fullName"].as_str(), Some("Nguyen Van A"));
        assert_eq!(json["shiftTitle"].as_str(), Some("Morning"));
        assert_eq!(json["lateArrival"].as_f64(), Some(-12.0));
        assert!(json.get("id").is_none(), "internal id is not exposed");
    }
}
