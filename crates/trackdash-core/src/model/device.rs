// ── Device domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::tracker_config::TrackerConfig;

/// A tracking device: identity plus a count of its stored fixes.
///
/// Read-only from the data session's point of view; configuration edits
/// go through [`ConfigEditor`](crate::ConfigEditor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: i64,
    /// Unique business key.
    pub imei: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub location_count: u64,
    /// Per-device configuration, only present on `GET /devices` results.
    pub config: Option<TrackerConfig>,
    /// Why a stored configuration could not be read, when it was dropped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_error: Option<String>,
}
