#![allow(clippy::unwrap_used)]
// Integration tests for `TrackingClient` using wiremock.

use chrono::NaiveDate;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use trackdash_api::{
    DeviceConfigUpdate, Error, LocationQuery, TimerSettingsUpdate, TrackingClient,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, TrackingClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/api", server.uri())).unwrap();
    let client = TrackingClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn settings_json() -> serde_json::Value {
    json!({
        "gpsTimer": "5",
        "configTimer": "60",
        "uploadTimer": "10",
        "retryCounter": "10",
        "angleThreshold": "45",
        "overSpeedingThreshold": "60",
        "travelStartTimer": "20",
        "travelStopTimer": "20",
        "movingTimer": "60",
        "stopTimer": "130",
        "distanceThreshold": "1000",
        "heartbeatTimer": "30",
        "liveStatusUpdateTimer": "30"
    })
}

fn update() -> TimerSettingsUpdate {
    TimerSettingsUpdate {
        gps_timer: 5,
        config_timer: 60,
        upload_timer: 10,
        retry_counter: 10,
        angle_threshold: 45,
        over_speeding_threshold: 60,
        travel_start_timer: 20,
        travel_stop_timer: 20,
        moving_timer: 60,
        stop_timer: 130,
        distance_threshold: 1000,
        heartbeat_timer: 30,
        live_status_update_timer: 30,
    }
}

// ── Location tests ──────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_locations_sends_filters() {
    let (server, client) = setup().await;

    let body = json!({
        "success": true,
        "locationsData": [{
            "id": 101,
            "imei": "A123",
            "deviceId": 3,
            "latitude": 31.5204,
            "longitude": 74.3587,
            "altitude": 217.0,
            "accuracy": 4.5,
            "bearing": 90.0,
            "speed": 42.0,
            "igStatus": 1,
            "provider": "gps",
            "reason": "periodic",
            "time": "1718445000000",
            "createdAt": "2024-06-15T10:30:05.000Z",
            "updatedAt": "2024-06-15T10:30:05.000Z"
        }],
        "devices": [{ "id": 3, "imei": "A123", "name": "Van 1", "_count": { "locationData": 1 } }],
        "filters": { "imei": "A123", "startDate": "2024-06-01", "endDate": "2024-06-30" },
        "pagination": {
            "currentPage": 2, "totalPages": 4, "limit": 25, "offset": 25, "total": 90,
            "hasNextPage": true, "hasPreviousPage": true, "resultCount": 1
        }
    });

    Mock::given(method("GET"))
        .and(path("/api/location"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "25"))
        .and(query_param("imei", "A123"))
        .and(query_param("startDate", "2024-06-01"))
        .and(query_param("endDate", "2024-06-30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let query = LocationQuery {
        page: 2,
        limit: 25,
        imei: Some("A123".into()),
        start_date: NaiveDate::from_ymd_opt(2024, 6, 1),
        end_date: NaiveDate::from_ymd_opt(2024, 6, 30),
    };
    let page = client.fetch_locations(&query).await.unwrap();

    assert_eq!(page.locations_data.len(), 1);
    assert_eq!(page.locations_data[0].imei, "A123");
    assert_eq!(page.locations_data[0].ig_status, 1);
    assert_eq!(page.devices[0].count.as_ref().unwrap().location_data, 1);
    assert_eq!(page.pagination.current_page, 2);
    assert_eq!(page.pagination.total, 90);
}

#[tokio::test]
async fn test_fetch_locations_without_filters_omits_params() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/location"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "10"))
        .and(query_param_is_missing("imei"))
        .and(query_param_is_missing("startDate"))
        .and(query_param_is_missing("endDate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "locationsData": [],
            "devices": [],
            "pagination": { "currentPage": 1, "totalPages": 0, "limit": 10, "total": 0 }
        })))
        .mount(&server)
        .await;

    let page = client
        .fetch_locations(&LocationQuery::default())
        .await
        .unwrap();
    assert!(page.locations_data.is_empty());
    assert_eq!(page.pagination.total_pages, 0);
}

#[tokio::test]
async fn test_fetch_locations_server_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/location"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({ "success": false, "message": "database unavailable" })),
        )
        .mount(&server)
        .await;

    let err = client
        .fetch_locations(&LocationQuery::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Http { status: 500, .. }));
    assert_eq!(err.status(), Some(500));
    insta::assert_snapshot!(err.to_string(), @"HTTP 500: database unavailable");
}

#[tokio::test]
async fn test_fetch_locations_rejected_envelope() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/location"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": false, "message": "invalid date range" })),
        )
        .mount(&server)
        .await;

    let result = client.fetch_locations(&LocationQuery::default()).await;
    assert!(
        matches!(result, Err(Error::Rejected { ref message }) if message == "invalid date range"),
        "expected Rejected error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_fetch_locations_malformed_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/location"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let result = client.fetch_locations(&LocationQuery::default()).await;
    assert!(matches!(result, Err(Error::Deserialization { .. })));
}

// ── Default config tests ────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_default_config() {
    let (server, client) = setup().await;

    let mut data = settings_json();
    data["id"] = json!(1);
    data["baseUrl"] = json!("https://tracking.example.com/TrackingServices.asmx");

    Mock::given(method("GET"))
        .and(path("/api/default-config"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data })),
        )
        .mount(&server)
        .await;

    let cfg = client.fetch_default_config().await.unwrap();
    assert_eq!(cfg.settings.gps_timer.as_u64(), Some(5));
    assert_eq!(cfg.settings.distance_threshold.as_u64(), Some(1000));
    assert_eq!(
        cfg.base_url.as_deref(),
        Some("https://tracking.example.com/TrackingServices.asmx")
    );
}

#[tokio::test]
async fn test_update_default_config_puts_numbers() {
    let (server, client) = setup().await;

    let mut stored = settings_json();
    stored["stopTimer"] = json!("140");

    let mut expected_body = serde_json::to_value(update()).unwrap();
    expected_body["stopTimer"] = json!(140);

    Mock::given(method("PUT"))
        .and(path("/api/default-config"))
        .and(body_json(&expected_body))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": stored })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut values = update();
    values.stop_timer = 140;
    let cfg = client.update_default_config(&values).await.unwrap();
    assert_eq!(cfg.settings.stop_timer.as_u64(), Some(140));
}

// ── Device tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_devices_with_nested_config() {
    let (server, client) = setup().await;

    let mut config = settings_json();
    config["deviceImei"] = json!("A123");
    config["id"] = json!(9);

    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                { "id": 1, "imei": "A123", "name": "Van 1", "phoneNo": "0300", "config": config,
                  "_count": { "locationData": 12 } },
                { "id": 2, "imei": "B456", "name": "Van 2", "phoneNo": "0301", "config": null }
            ]
        })))
        .mount(&server)
        .await;

    let devices = client.list_devices().await.unwrap();
    assert_eq!(devices.len(), 2);
    assert_eq!(
        devices[0].config.as_ref().unwrap().device_imei.as_deref(),
        Some("A123")
    );
    assert!(devices[1].config.is_none());
}

#[tokio::test]
async fn test_update_device_config() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/devices/A123/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let body = DeviceConfigUpdate {
        settings: update(),
        base_url: Some("https://tracking.example.com".into()),
    };
    client.update_device_config("A123", &body).await.unwrap();
}

#[tokio::test]
async fn test_update_device_config_rejected() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/devices/A123/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": false })))
        .mount(&server)
        .await;

    let body = DeviceConfigUpdate {
        settings: update(),
        base_url: None,
    };
    let result = client.update_device_config("A123", &body).await;
    assert!(matches!(result, Err(Error::Rejected { .. })));
}
