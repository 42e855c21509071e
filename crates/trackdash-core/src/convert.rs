// ── API-to-domain type conversions ──
//
// Bridges raw `trackdash_api` wire types into canonical `trackdash_core::model`
// types. Numeric fields are clamped into their documented ranges, string
// timestamps are parsed, and string-encoded config values become integers.

use chrono::{DateTime, Utc};
use tracing::warn;

use trackdash_api::{
    DefaultConfigRow, DeviceConfigRow, DeviceRow, LocationRow, NumberOrString, PaginationInfo,
    TimerSettings, TimerSettingsUpdate,
};

use crate::error::CoreError;
use crate::model::{Device, Ignition, LocationRecord, Pagination, RecordId, TimerValues, TrackerConfig};

// ── Helpers ────────────────────────────────────────────────────────

/// Parse an ISO-8601 timestamp, dropping unparseable values.
fn parse_datetime(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn non_negative(v: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

fn parse_field(name: &str, raw: &NumberOrString) -> Result<u32, CoreError> {
    raw.as_u64()
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| CoreError::validation(format!("{name} is not a valid number: '{raw}'")))
}

// ── Locations ──────────────────────────────────────────────────────

impl From<LocationRow> for LocationRecord {
    fn from(r: LocationRow) -> Self {
        let bearing = if r.bearing.is_finite() {
            r.bearing.rem_euclid(360.0)
        } else {
            0.0
        };

        LocationRecord {
            id: RecordId(r.id),
            time_millis: r.time.as_ref().and_then(NumberOrString::as_i64),
            created_at: parse_datetime(r.created_at.as_deref()),
            updated_at: parse_datetime(r.updated_at.as_deref()),
            imei: r.imei,
            device_id: r.device_id,
            latitude: r.latitude,
            longitude: r.longitude,
            altitude: r.altitude,
            accuracy: non_negative(r.accuracy),
            bearing,
            speed: non_negative(r.speed),
            ignition: Ignition::from(r.ig_status),
            provider: r.provider,
            reason: r.reason,
            device: r.device.map(Device::from),
        }
    }
}

/// Build a consistent cursor from the server's pagination block.
///
/// Zero `limit` / `current_page` (absent on the wire) fall back to what
/// was requested.
pub fn pagination(info: &PaginationInfo, requested_page: u32, requested_limit: u32) -> Pagination {
    let page = if info.current_page == 0 {
        requested_page
    } else {
        info.current_page
    };
    let limit = if info.limit == 0 {
        requested_limit
    } else {
        info.limit
    };
    Pagination::from_server(page, limit, info.total, info.total_pages, info.result_count)
}

// ── Devices ────────────────────────────────────────────────────────

/// Lenient conversion: an unparseable nested config is dropped with a
/// warning and its reason kept in `config_error`.
impl From<DeviceRow> for Device {
    fn from(mut row: DeviceRow) -> Self {
        let (config, config_error) = match row.config.take().map(TrackerConfig::try_from) {
            None => (None, None),
            Some(Ok(cfg)) => (Some(cfg), None),
            Some(Err(err)) => {
                warn!(imei = %row.imei, error = %err, "ignoring unreadable device config");
                let reason = match err {
                    CoreError::Validation { message } => message,
                    other => other.to_string(),
                };
                (None, Some(reason))
            }
        };
        build_device(row, config, config_error)
    }
}

fn build_device(
    row: DeviceRow,
    config: Option<TrackerConfig>,
    config_error: Option<String>,
) -> Device {
    Device {
        id: row.id,
        name: row.name.unwrap_or_default(),
        phone: row.phone_no,
        email: row.email_address,
        created_at: parse_datetime(row.created_at.as_deref()),
        updated_at: parse_datetime(row.updated_at.as_deref()),
        location_count: row.count.map_or(0, |c| c.location_data),
        config,
        config_error,
        imei: row.imei,
    }
}

// ── Tracker configuration ──────────────────────────────────────────

impl TryFrom<&TimerSettings> for TimerValues {
    type Error = CoreError;

    fn try_from(s: &TimerSettings) -> Result<Self, Self::Error> {
        Ok(Self {
            gps_timer: parse_field("gpsTimer", &s.gps_timer)?,
            config_timer: parse_field("configTimer", &s.config_timer)?,
            upload_timer: parse_field("uploadTimer", &s.upload_timer)?,
            retry_counter: parse_field("retryCounter", &s.retry_counter)?,
            angle_threshold: parse_field("angleThreshold", &s.angle_threshold)?,
            over_speeding_threshold: parse_field(
                "overSpeedingThreshold",
                &s.over_speeding_threshold,
            )?,
            travel_start_timer: parse_field("travelStartTimer", &s.travel_start_timer)?,
            travel_stop_timer: parse_field("travelStopTimer", &s.travel_stop_timer)?,
            moving_timer: parse_field("movingTimer", &s.moving_timer)?,
            stop_timer: parse_field("stopTimer", &s.stop_timer)?,
            distance_threshold: parse_field("distanceThreshold", &s.distance_threshold)?,
            heartbeat_timer: parse_field("heartbeatTimer", &s.heartbeat_timer)?,
            live_status_update_timer: parse_field(
                "liveStatusUpdateTimer",
                &s.live_status_update_timer,
            )?,
        })
    }
}

impl TryFrom<DefaultConfigRow> for TrackerConfig {
    type Error = CoreError;

    fn try_from(row: DefaultConfigRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            values: TimerValues::try_from(&row.settings)?,
            base_url: row.base_url,
        })
    }
}

impl TryFrom<DeviceConfigRow> for TrackerConfig {
    type Error = CoreError;

    fn try_from(row: DeviceConfigRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            values: TimerValues::try_from(&row.settings)?,
            base_url: row.base_url,
        })
    }
}

impl From<TimerValues> for TimerSettingsUpdate {
    fn from(v: TimerValues) -> Self {
        Self {
            gps_timer: v.gps_timer,
            config_timer: v.config_timer,
            upload_timer: v.upload_timer,
            retry_counter: v.retry_counter,
            angle_threshold: v.angle_threshold,
            over_speeding_threshold: v.over_speeding_threshold,
            travel_start_timer: v.travel_start_timer,
            travel_stop_timer: v.travel_stop_timer,
            moving_timer: v.moving_timer,
            stop_timer: v.stop_timer,
            distance_threshold: v.distance_threshold,
            heartbeat_timer: v.heartbeat_timer,
            live_status_update_timer: v.live_status_update_timer,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settings(gps: serde_json::Value) -> serde_json::Value {
        json!({
            "gpsTimer": gps, "configTimer": "60", "uploadTimer": "10", "retryCounter": "10",
            "angleThreshold": "45", "overSpeedingThreshold": "60", "travelStartTimer": "20",
            "travelStopTimer": "20", "movingTimer": "60", "stopTimer": "130",
            "distanceThreshold": "1000", "heartbeatTimer": "30", "liveStatusUpdateTimer": "30"
        })
    }

    #[test]
    fn location_row_is_normalized() {
        let row: LocationRow = serde_json::from_value(json!({
            "id": 5, "imei": "A1", "latitude": 1.0, "longitude": 2.0,
            "accuracy": -3.0, "speed": -1.0, "bearing": 370.0, "igStatus": 0,
            "time": "1718445000000", "createdAt": "2024-06-15T10:30:05.000Z"
        }))
        .unwrap();
        let rec = LocationRecord::from(row);
        assert_eq!(rec.id, RecordId(5));
        assert!(rec.accuracy.abs() < f64::EPSILON);
        assert!(rec.speed.abs() < f64::EPSILON);
        assert!((rec.bearing - 10.0).abs() < 1e-9);
        assert_eq!(rec.ignition, Ignition::Off);
        assert_eq!(rec.time_millis, Some(1_718_445_000_000));
        assert_eq!(
            rec.recorded_at().unwrap().to_rfc3339(),
            "2024-06-15T09:50:00+00:00"
        );
        assert!(rec.created_at.is_some());
    }

    #[test]
    fn string_config_values_are_parsed() {
        let mut data = settings(json!(" 5 "));
        data["id"] = json!(1);
        let row: DefaultConfigRow = serde_json::from_value(data).unwrap();
        let cfg = TrackerConfig::try_from(row).unwrap();
        assert_eq!(cfg.values, TimerValues::default());
    }

    #[test]
    fn unparseable_config_value_is_rejected() {
        let row: DefaultConfigRow = serde_json::from_value(settings(json!("soon"))).unwrap();
        let err = TrackerConfig::try_from(row).unwrap_err();
        assert!(err.to_string().contains("gpsTimer"));
    }

    #[test]
    fn lenient_device_drops_bad_config() {
        let mut config = settings(json!("soon"));
        config["deviceImei"] = json!("A1");
        let row: DeviceRow = serde_json::from_value(json!({
            "id": 1, "imei": "A1", "name": "Van", "config": config
        }))
        .unwrap();
        let device = Device::from(row);
        assert_eq!(device.imei, "A1");
        assert!(device.config.is_none());
        assert!(device.config_error.unwrap().contains("gpsTimer"));
    }

    #[test]
    fn device_list_keeps_devices_with_bad_config() {
        let rows: Vec<DeviceRow> = serde_json::from_value(json!([
            { "id": 1, "imei": "A123", "config": settings(json!("5")) },
            { "id": 2, "imei": "B456", "config": settings(json!("")) }
        ]))
        .unwrap();

        let devices: Vec<Device> = rows.into_iter().map(Device::from).collect();

        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].config.as_ref().unwrap().values.gps_timer, 5);
        assert!(devices[0].config_error.is_none());
        assert!(devices[1].config.is_none());
        assert!(devices[1].config_error.as_deref().unwrap().contains("gpsTimer"));
    }

    #[test]
    fn pagination_falls_back_to_request() {
        let info = PaginationInfo {
            total: 42,
            ..PaginationInfo::default()
        };
        let p = pagination(&info, 2, 25);
        assert_eq!(p.limit, 25);
        assert_eq!(p.current_page, 2);
        assert_eq!(p.total_pages, 2);
        assert!(!p.has_next_page);
    }
}
