// ── Location record domain types ──

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::device::Device;

/// Backend identifier of a location record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Ignition line state reported with a fix.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Ignition {
    On,
    Off,
}

impl From<i64> for Ignition {
    fn from(status: i64) -> Self {
        if status == 0 { Self::Off } else { Self::On }
    }
}

/// One GPS fix. Immutable once fetched; the session replaces whole
/// pages of these and never patches one in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub id: RecordId,
    pub imei: String,
    pub device_id: Option<i64>,
    /// Degrees.
    pub latitude: f64,
    /// Degrees.
    pub longitude: f64,
    /// Meters.
    pub altitude: f64,
    /// Meters, never negative.
    pub accuracy: f64,
    /// Degrees in `[0, 360)`.
    pub bearing: f64,
    /// km/h, never negative.
    pub speed: f64,
    pub ignition: Ignition,
    pub provider: Option<String>,
    pub reason: Option<String>,
    /// Device-reported fix time (epoch millis). This is the canonical
    /// event timestamp; `created_at` is only when the server stored it.
    pub time_millis: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub device: Option<Device>,
}

impl LocationRecord {
    /// When the fix occurred, per the device clock.
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        self.time_millis.and_then(DateTime::from_timestamp_millis)
    }

    /// Display name of the reporting device, falling back to the IMEI.
    pub fn device_label(&self) -> &str {
        self.device
            .as_ref()
            .map(|d| d.name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or(self.imei.as_str())
    }
}
