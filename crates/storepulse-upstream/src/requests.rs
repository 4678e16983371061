//! Catalogue of upstream request shapes.
//!
//! Every report operation POSTs to one of a fixed set of endpoint paths with
//! a JSON body whose fields vary per endpoint. The payload shapes below are
//! preserved exactly as the upstream web client sends them: the upstream
//! rejects or silently mis-filters requests with missing filter keys, so
//! even the empty-string fields matter.

use serde_json::{json, Value};

/// Booking statuses requested for the status-counter report.
const ALL_BOOKING_STATUSES: &str =
    "XAC_NHAN,XAC_NHAN_TU_DONG,CHUA_XAC_NHAN,KHACH_KHONG_DEN,KHACH_DEN,TU_CHOI";

/// Status filter for customer-view reports: only customers who showed up.
const STATUS_CUSTOMER_CAME: &str = "KHACH_DEN";

/// One fully-specified upstream request: endpoint path, the referer path the
/// upstream web client would send from, and the JSON body.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub path: &'static str,
    pub referer_path: &'static str,
    pub body: Value,
}

/// Member-status filter on the booking report endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberFilter {
    /// No member filter: new and returning customers together.
    All,
    /// First-visit customers (`KHACH_MOI`).
    New,
    /// Returning customers (`KHACH_CU`).
    Returning,
}

impl MemberFilter {
    fn as_wire(self) -> &'static str {
        match self {
            MemberFilter::All => "",
            MemberFilter::New => "KHACH_MOI",
            MemberFilter::Returning => "KHACH_CU",
        }
    }
}

/// The paginated sales-order listing (used for the revenue summary and the
/// sales-by-hour bucketing).
#[must_use]
pub fn sales_list(date_start: &str, date_end: &str) -> ApiRequest {
    ApiRequest {
        path: "api/v3/r23/ban-hang/doanh-so-danh-sach",
        referer_path: "ban-hang/doanh-so",
        body: json!({
            "StockID": "",
            "DateStart": date_start,
            "DateEnd": date_end,
            "Pi": 1,
            "Ps": 1000,
            "Voucher": "",
            "Payment": "",
            "IsMember": "",
            "MemberID": "",
            "SourceName": "",
            "ShipCode": "",
            "ShowsX": "2",
            "DebtFrom": null,
            "DebtTo": null,
            "no": "",
        }),
    }
}

/// Per-product sales-detail lines, scoped to one store.
#[must_use]
pub fn sales_detail(date_start: &str, date_end: &str, store_id: &str) -> ApiRequest {
    ApiRequest {
        path: "api/v3/r23/ban-hang/doanh-so-chi-tiet",
        referer_path: "ban-hang/doanh-so",
        body: json!({
            "DateStart": date_start,
            "DateEnd": date_end,
            "BrandIds": "",
            "CategoriesIds": "",
            "ProductIds": "",
            "TimeToReal": 1,
            "ShowsType": "1",
            "StockRoles": store_id,
            "Pi": 1,
            "Voucher": "",
            "Payment": "",
            "IsMember": "",
        }),
    }
}

/// Service-center overview (totals plus per-service usage items).
#[must_use]
pub fn service_overview(date_start: &str, date_end: &str) -> ApiRequest {
    ApiRequest {
        path: "api/v3/r23/dich-vu/tong-quan",
        referer_path: "dich-vu/tong-quan",
        body: json!({
            "StockID": "",
            "DateStart": date_start,
            "DateEnd": date_end,
        }),
    }
}

/// Booking report with a member filter and an explicit status list.
///
/// `statuses` is the upstream's comma-separated status vocabulary; use
/// [`booking_counters`] / the customer-view constructors rather than calling
/// this with ad-hoc strings.
fn booking_report(
    date_start: &str,
    date_end: &str,
    store_id: &str,
    member: MemberFilter,
    statuses: &'static str,
) -> ApiRequest {
    ApiRequest {
        path: "api/v3/r23/dich-vu/bao-cao-dat-lich",
        referer_path: "dich-vu/bao-cao-dat-lich",
        body: json!({
            "StockID": "",
            "DateStart": date_start,
            "DateEnd": date_end,
            "Pi": 1,
            "Ps": 1000,
            "StatusMember": member.as_wire(),
            "StatusBook": "",
            "StatusAtHome": "",
            "MemberID": "",
            "UserID": "",
            "UserServiceIDs": "",
            "include": "IsNewMember,OrderInDate",
            "StocksRoles": store_id,
            "Status": statuses,
        }),
    }
}

/// Booking report across all tracked statuses, for the status tally.
#[must_use]
pub fn booking_counters(date_start: &str, date_end: &str, store_id: &str) -> ApiRequest {
    booking_report(
        date_start,
        date_end,
        store_id,
        MemberFilter::All,
        ALL_BOOKING_STATUSES,
    )
}

/// Bookings of customers who showed up, under the given member filter.
///
/// Feeds the customer-source classifier (new/returning views) and the
/// hour-of-booking bucketing.
#[must_use]
pub fn customer_visits(
    date_start: &str,
    date_end: &str,
    store_id: &str,
    member: MemberFilter,
) -> ApiRequest {
    booking_report(date_start, date_end, store_id, member, STATUS_CUSTOMER_CAME)
}

/// Per-employee work-track listing for a date range (`dd/MM/yyyy` dates).
#[must_use]
pub fn work_track_list(from: &str, to: &str) -> ApiRequest {
    ApiRequest {
        path: "api/v3/userwork23@workList",
        referer_path: "",
        body: json!({
            "From": from,
            "To": to,
            "key": "",
        }),
    }
}
