//! Integration tests for `ReportService` over a mock upstream.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no real
//! network traffic is made. Covers the request contract (method, path,
//! headers, body filters), each report's normalization end to end, and the
//! error mapping the client applies to non-success and malformed responses.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, headers, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use storepulse_upstream::retry::retry_with_backoff;
use storepulse_upstream::{ReportService, StaticToken, UpstreamClient, UpstreamError};

const SALES_LIST_PATH: &str = "/api/v3/r23/ban-hang/doanh-so-danh-sach";
const BOOKING_REPORT_PATH: &str = "/api/v3/r23/dich-vu/bao-cao-dat-lich";
const SERVICE_OVERVIEW_PATH: &str = "/api/v3/r23/dich-vu/tong-quan";
const WORK_LIST_PATH: &str = "/api/v3/userwork23@workList";

/// Builds a `ReportService` pointed at the mock server: 5-second timeout,
/// fixture token, store 8975.
fn test_service(server: &MockServer) -> ReportService<StaticToken> {
    let client = UpstreamClient::with_base_url(5, &server.uri())
        .expect("failed to build test UpstreamClient");
    ReportService::new(client, StaticToken::new(Some("test-token".to_owned())), "8975")
}

/// Sales-list body with financial fields whose trailing zeros must survive.
/// Raw text (not `json!`) so `arbitrary_precision` sees the literals.
fn sales_list_raw() -> &'static str {
    r#"{
        "result": {
            "TotalValue": 1000.00,
            "ToPay": 950.50,
            "DaThToan": 900.00,
            "DaThToan_TM": 500.00,
            "DaThToan_CK": 250.00,
            "DaThToan_QT": 100.00,
            "DaThToan_Vi": 50.00,
            "DaThToan_ThTien": 0,
            "ConNo": 50.50,
            "Items": [
                { "CreateDate": "2025-03-01T09:15:00" },
                { "CreateDate": "2025-03-01T09:40:00" },
                { "CreateDate": "2025-03-01T14:05:00" }
            ]
        }
    }"#
}

// ---------------------------------------------------------------------------
// Request contract
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sales_summary_sends_bearer_token_and_filter_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SALES_LIST_PATH))
        .and(header("authorization", "Bearer test-token"))
        .and(headers("accept", vec!["application/json", "text/plain", "*/*"]))
        .and(body_partial_json(json!({
            "DateStart": "01/03/2025",
            "DateEnd": "01/03/2025",
            "Pi": 1,
            "Ps": 1000
        })))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sales_list_raw(), "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let summary = test_service(&server)
        .sales_summary("01/03/2025", "01/03/2025")
        .await
        .expect("sales_summary should succeed");

    assert_eq!(summary.total_revenue, "1000.00");
    assert_eq!(summary.to_pay, "950.50");
    assert_eq!(summary.actual_revenue, "900.00");
    assert_eq!(summary.cash, "500.00");
    assert_eq!(summary.transfer, "250.00");
    assert_eq!(summary.card, "100.00");
    assert_eq!(summary.wallet, "50.00");
    assert_eq!(summary.loyalty, "0");
    assert_eq!(summary.debt, "50.50");
}

#[tokio::test]
async fn sales_detail_scopes_to_the_configured_store() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v3/r23/ban-hang/doanh-so-chi-tiet"))
        .and(body_partial_json(json!({ "StockRoles": "8975" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(
                r#"{
                    "result": [
                        {
                            "ProdTitle": "Facial Deluxe",
                            "DynamicID": "SP-01",
                            "StockUnit": "session",
                            "SumQTy": 2,
                            "SumTopay": 300.00,
                            "Giamgia": 0,
                            "Format": "service",
                            "TM": 300.00,
                            "CK": 0, "QT": 0, "Vi": 0, "TT": 0
                        }
                    ]
                }"#,
                "application/json",
            ),
        )
        .expect(1)
        .mount(&server)
        .await;

    let lines = test_service(&server)
        .sales_detail("01/03/2025", "01/03/2025")
        .await
        .expect("sales_detail should succeed");

    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].product_name, "Facial Deluxe");
    assert_eq!(lines[0].price, "300.00");
}

// ---------------------------------------------------------------------------
// Booking reports
// ---------------------------------------------------------------------------

#[tokio::test]
async fn booking_counters_defaults_missing_statuses_to_zero() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(BOOKING_REPORT_PATH))
        .and(body_partial_json(json!({
            "Status": "XAC_NHAN,XAC_NHAN_TU_DONG,CHUA_XAC_NHAN,KHACH_KHONG_DEN,KHACH_DEN,TU_CHOI"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": { "Sum": { "KHACH_DEN": 12, "XAC_NHAN": 3 } }
        })))
        .mount(&server)
        .await;

    let counters = test_service(&server)
        .booking_counters("01/03/2025", "01/03/2025")
        .await
        .expect("booking_counters should succeed");

    assert_eq!(counters.customer_came, "12");
    assert_eq!(counters.confirmed, "3");
    assert_eq!(counters.unconfirmed, "0");
    assert_eq!(counters.denied, "0");
    assert_eq!(counters.customer_no_show, "0");
    assert_eq!(counters.cancelled, "0");
    assert_eq!(counters.auto_confirmed, "0");
}

#[tokio::test]
async fn new_customer_sources_classifies_and_deduplicates() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(BOOKING_REPORT_PATH))
        .and(body_partial_json(json!({
            "StatusMember": "KHACH_MOI",
            "Status": "KHACH_DEN"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {
                "Items": [
                    { "MemberID": 1, "Member": { "Source": "Facebook" } },
                    { "MemberID": 1, "Member": { "Source": "Facebook" } },
                    { "MemberID": 2, "Member": { "Source": "APP" },
                      "Desc": "walk-in note\nTags: TikTok\nrest" },
                    { "MemberID": 3, "Member": { "Source": "" } }
                ]
            }
        })))
        .mount(&server)
        .await;

    let buckets = test_service(&server)
        .new_customer_sources("01/03/2025", "01/03/2025")
        .await
        .expect("new_customer_sources should succeed");

    let find = |label: &str| {
        buckets
            .iter()
            .find(|b| b.source == label)
            .unwrap_or_else(|| panic!("missing bucket {label}"))
            .count
    };
    assert_eq!(find("Facebook"), 1, "duplicate member counted once");
    assert_eq!(find("TikTok"), 1, "APP source resolves through Tags:");
    assert_eq!(find("unclassified"), 1, "blank source falls back");
    assert_eq!(buckets.iter().map(|b| b.count).sum::<u64>(), 3);
}

#[tokio::test]
async fn bookings_by_hour_groups_by_hour_of_booking() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(BOOKING_REPORT_PATH))
        .and(body_partial_json(json!({ "StatusMember": "", "Status": "KHACH_DEN" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {
                "Items": [
                    { "MemberID": 1, "BookDate": "2025-03-01T09:05:00" },
                    { "MemberID": 2, "BookDate": "2025-03-01T09:55:00" },
                    { "MemberID": 3, "BookDate": "2025-03-01T15:10:00" }
                ]
            }
        })))
        .mount(&server)
        .await;

    let buckets = test_service(&server)
        .bookings_by_hour("01/03/2025", "01/03/2025")
        .await
        .expect("bookings_by_hour should succeed");

    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[0].label, "09:00");
    assert_eq!(buckets[0].count, 2);
    assert_eq!(buckets[1].label, "15:00");
    assert_eq!(buckets[1].count, 1);
}

#[tokio::test]
async fn sales_by_hour_buckets_orders_into_business_ranges() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SALES_LIST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sales_list_raw(), "application/json"))
        .mount(&server)
        .await;

    let buckets = test_service(&server)
        .sales_by_hour("01/03/2025", "01/03/2025")
        .await
        .expect("sales_by_hour should succeed");

    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[0].date, "2025-03-01");
    assert_eq!(buckets[0].time_range, "09:00 - 09:59");
    assert_eq!(buckets[0].total_sales, 2);
    assert_eq!(buckets[1].time_range, "14:00 - 14:59");
    assert_eq!(buckets[1].total_sales, 1);
}

// ---------------------------------------------------------------------------
// Service overview and work track
// ---------------------------------------------------------------------------

#[tokio::test]
async fn service_summary_carries_items_in_upstream_order() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SERVICE_OVERVIEW_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {
                "TotalCasesInDay": 10,
                "DoingCases": 2,
                "DoneCases": 8,
                "Items": [
                    { "ProServiceName": "Facial", "CasesNum": 6, "CasesPercent": 60 },
                    { "ProServiceName": "Massage", "CasesNum": 4, "CasesPercent": 40 }
                ]
            }
        })))
        .mount(&server)
        .await;

    let summary = test_service(&server)
        .service_summary("01/03/2025", "01/03/2025")
        .await
        .expect("service_summary should succeed");

    assert_eq!(summary.total_services, "10");
    assert_eq!(summary.in_progress, "2");
    assert_eq!(summary.done, "8");
    assert_eq!(summary.items.len(), 2);
    assert_eq!(summary.items[0].name, "Facial");
    assert_eq!(summary.items[1].usage_count, "4");
}

#[tokio::test]
async fn work_track_derives_attendance_records() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(WORK_LIST_PATH))
        .and(body_partial_json(json!({ "From": "28/02/2025", "To": "28/02/2025" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "list": [
                {
                    "FullName": "Nguyen Van A",
                    "UserName": "nguyena",
                    "StockID": 8975,
                    "StockTitle": "District 1",
                    "Dates": [
                        {
                            "Date": "2025-02-28",
                            "WorkTrack": {
                                "CheckIn": "2025-02-28T09:12:00",
                                "CheckOut": "2025-02-28T17:40:00",
                                "Info": {
                                    "Type": "LATE",
                                    "DI_MUON": { "Value": 12 },
                                    "WorkToday": { "Title": "Morning", "TimeFrom": "09:00",
                                                   "TimeTo": "18:00", "Value": 1 },
                                    "CheckOut": { "Type": "EARLY", "VE_MUON": { "Value": 0 } }
                                }
                            }
                        }
                    ]
                }
            ]
        })))
        .mount(&server)
        .await;

    let records = test_service(&server)
        .work_track("28/02/2025", "28/02/2025")
        .await
        .expect("work_track should succeed");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].username, "nguyena");
    assert_eq!(records[0].store_id, "8975");
    assert_eq!(records[0].late_arrival, -12.0);
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unauthorized_response_maps_to_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SALES_LIST_PATH))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = test_service(&server)
        .sales_summary("01/03/2025", "01/03/2025")
        .await;

    match result.unwrap_err() {
        UpstreamError::Status { status, endpoint } => {
            assert_eq!(status, 401);
            assert_eq!(endpoint, "api/v3/r23/ban-hang/doanh-so-danh-sach");
        }
        other => panic!("expected UpstreamError::Status, got: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_maps_to_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SALES_LIST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("this is not json"))
        .mount(&server)
        .await;

    let result = test_service(&server)
        .sales_summary("01/03/2025", "01/03/2025")
        .await;

    assert!(
        matches!(result.unwrap_err(), UpstreamError::Deserialize { .. }),
        "expected UpstreamError::Deserialize"
    );
}

#[tokio::test]
async fn missing_result_envelope_maps_to_format_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SALES_LIST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "expired" })))
        .mount(&server)
        .await;

    let result = test_service(&server)
        .sales_summary("01/03/2025", "01/03/2025")
        .await;

    match result.unwrap_err() {
        UpstreamError::Format { path } => assert_eq!(path, "result"),
        other => panic!("expected UpstreamError::Format, got: {other:?}"),
    }
}

#[tokio::test]
async fn missing_token_fails_before_any_request() {
    let server = MockServer::start().await;

    // No mock mounted: a request reaching the server would 404, but the
    // token check fires first.
    let client = UpstreamClient::with_base_url(5, &server.uri()).unwrap();
    let service = ReportService::new(client, StaticToken::new(None), "8975");

    let result = service.sales_summary("01/03/2025", "01/03/2025").await;
    assert!(matches!(result.unwrap_err(), UpstreamError::Token(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Retry wrapper (scheduler path)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn retry_wrapper_recovers_from_transient_503() {
    let server = MockServer::start().await;

    // First request returns 503 (served once), then the real body.
    Mock::given(method("POST"))
        .and(path(WORK_LIST_PATH))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(WORK_LIST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "list": [] })))
        .mount(&server)
        .await;

    let service = test_service(&server);
    let result = retry_with_backoff(1, 0, || service.work_track("28/02/2025", "28/02/2025")).await;

    assert!(result.is_ok(), "expected Ok after retry, got: {result:?}");
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}
