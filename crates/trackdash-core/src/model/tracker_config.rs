// ── Tracker configuration domain types ──

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Base URL pre-filled for a device that has never been configured.
pub const DEFAULT_DEVICE_BASE_URL: &str =
    "https://connectlive.commtw.com:446/twconnectlive/TrackingServices.asmx";

/// The 13 timer/threshold values pushed to a tracker.
///
/// `Default` yields the values the dashboard pre-fills for a device with
/// no stored configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerValues {
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

impl Default for TimerValues {
    fn default() -> Self {
        Self {
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
}

impl TimerValues {
    /// Wire names of every field, in display order.
    pub const FIELDS: [&'static str; 13] = [
        "gpsTimer",
        "configTimer",
        "uploadTimer",
        "retryCounter",
        "angleThreshold",
        "overSpeedingThreshold",
        "travelStartTimer",
        "travelStopTimer",
        "movingTimer",
        "stopTimer",
        "distanceThreshold",
        "heartbeatTimer",
        "liveStatusUpdateTimer",
    ];

    fn slot(&mut self, field: &str) -> Option<&mut u32> {
        let slot = match field {
            "gpsTimer" => &mut self.gps_timer,
            "configTimer" => &mut self.config_timer,
            "uploadTimer" => &mut self.upload_timer,
            "retryCounter" => &mut self.retry_counter,
            "angleThreshold" => &mut self.angle_threshold,
            "overSpeedingThreshold" => &mut self.over_speeding_threshold,
            "travelStartTimer" => &mut self.travel_start_timer,
            "travelStopTimer" => &mut self.travel_stop_timer,
            "movingTimer" => &mut self.moving_timer,
            "stopTimer" => &mut self.stop_timer,
            "distanceThreshold" => &mut self.distance_threshold,
            "heartbeatTimer" => &mut self.heartbeat_timer,
            "liveStatusUpdateTimer" => &mut self.live_status_update_timer,
            _ => return None,
        };
        Some(slot)
    }

    /// Look a value up by its wire name (`"gpsTimer"`).
    pub fn get(&self, field: &str) -> Option<u32> {
        let mut copy = *self;
        copy.slot(field).map(|v| *v)
    }

    /// Set a value by its wire name.
    pub fn set(&mut self, field: &str, value: u32) -> Result<(), CoreError> {
        let slot = self.slot(field).ok_or_else(|| {
            CoreError::validation(format!(
                "unknown config field '{field}' (expected one of: {})",
                Self::FIELDS.join(", ")
            ))
        })?;
        *slot = value;
        Ok(())
    }

    /// `(wire name, value)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u32)> + '_ {
        Self::FIELDS
            .iter()
            .filter_map(move |name| self.get(name).map(|v| (*name, v)))
    }
}

/// A stored tracker configuration: either the global default or the
/// per-device override attached to a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    pub id: Option<i64>,
    pub values: TimerValues,
    /// Server-managed; shown but never edited on the default config.
    pub base_url: Option<String>,
}

impl TrackerConfig {
    /// Numeric update payload matching this config, used to reset a form
    /// to the last fetched values.
    pub fn to_update(&self) -> trackdash_api::TimerSettingsUpdate {
        self.values.into()
    }

    /// Configuration shown for a device that has none stored.
    pub fn unconfigured_device() -> Self {
        Self {
            id: None,
            values: TimerValues::default(),
            base_url: Some(DEFAULT_DEVICE_BASE_URL.to_owned()),
        }
    }
}
