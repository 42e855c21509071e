// Wire types for the tracking backend
//
// These mirror the JSON the backend emits, field for field. Nothing here
// is normalized: `trackdash-core` converts them into domain types.

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// A numeric value the backend sometimes encodes as a JSON string
/// (`"60"`) and sometimes as a JSON number (`60`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    Number(serde_json::Number),
    Text(String),
}

impl NumberOrString {
    /// Parse as an unsigned integer, tolerating surrounding whitespace.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Number(n) => n.as_u64(),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Parse as a signed integer, tolerating surrounding whitespace.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => n.as_i64(),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl std::fmt::Display for NumberOrString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

// ── Envelopes ───────────────────────────────────────────────────────

/// Status fields present on every backend response.
#[derive(Debug, Deserialize)]
pub(crate) struct StatusEnvelope {
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// `{ success, data, message? }` envelope used by config and device endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    pub data: T,
}

// ── Locations ───────────────────────────────────────────────────────

/// One row of `locationsData`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRow {
    pub id: i64,
    pub imei: String,
    #[serde(default)]
    pub device_id: Option<i64>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub altitude: f64,
    #[serde(default)]
    pub accuracy: f64,
    #[serde(default)]
    pub bearing: f64,
    #[serde(default)]
    pub speed: f64,
    #[serde(default)]
    pub ig_status: i64,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    /// Device-reported fix time, epoch millis.
    #[serde(default)]
    pub time: Option<NumberOrString>,
    #[serde(rename = "deviceRDT", default)]
    pub device_rdt: Option<String>,
    #[serde(default)]
    pub gmt_settings: Option<String>,
    #[serde(default)]
    pub version_no: Option<String>,
    #[serde(default)]
    pub local_primary_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone_no: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub device: Option<DeviceRow>,
}

/// Pagination block returned alongside a location page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaginationInfo {
    pub current_page: u32,
    pub total_pages: u32,
    pub limit: u32,
    pub offset: u64,
    pub total: u64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub result_count: u32,
}

/// The filters the server actually applied, echoed back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FiltersEcho {
    pub imei: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Full body of `GET /location`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationPageResponse {
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default)]
    pub locations_data: Vec<LocationRow>,
    #[serde(default)]
    pub devices: Vec<DeviceRow>,
    #[serde(default)]
    pub filters: Option<FiltersEcho>,
    #[serde(default)]
    pub pagination: PaginationInfo,
}

// ── Devices ─────────────────────────────────────────────────────────

/// `_count` block attached to devices.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CountRow {
    pub location_data: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRow {
    pub id: i64,
    pub imei: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone_no: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(rename = "_count", default)]
    pub count: Option<CountRow>,
    #[serde(default)]
    pub config: Option<DeviceConfigRow>,
}

// ── Tracker configuration ───────────────────────────────────────────

/// The 13 timer/threshold fields shared by default and per-device config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSettings {
    pub gps_timer: NumberOrString,
    pub config_timer: NumberOrString,
    pub upload_timer: NumberOrString,
    pub retry_counter: NumberOrString,
    pub angle_threshold: NumberOrString,
    pub over_speeding_threshold: NumberOrString,
    pub travel_start_timer: NumberOrString,
    pub travel_stop_timer: NumberOrString,
    pub moving_timer: NumberOrString,
    pub stop_timer: NumberOrString,
    pub distance_threshold: NumberOrString,
    pub heartbeat_timer: NumberOrString,
    pub live_status_update_timer: NumberOrString,
}

/// `data` of `GET /default-config`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultConfigRow {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(flatten)]
    pub settings: TimerSettings,
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Per-device configuration nested under a device.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceConfigRow {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub device_imei: Option<String>,
    #[serde(flatten)]
    pub settings: TimerSettings,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Body of `PUT /default-config`: the 13 fields as plain numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSettingsUpdate {
    pub gps_timer: u32,
    pub config_timer: u32,
    pub upload_timer: u32,
    pub retry_counter: u32,
    pub angle_threshold: u32,
    pub over_speeding_threshold: u32,
    pub travel_start_timer: u32,
    pub travel_stop_timer: u32,
    pub moving_timer: u32,
    pub stop_timer: u32,
    pub distance_threshold: u32,
    pub heartbeat_timer: u32,
    pub live_status_update_timer: u32,
}

/// Body of `POST /devices/{imei}/config`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceConfigUpdate {
    #[serde(flatten)]
    pub settings: TimerSettingsUpdate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}
