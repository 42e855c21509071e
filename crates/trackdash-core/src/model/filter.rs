// ── Filter criteria ──

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::location::LocationRecord;
use crate::error::CoreError;

/// Active filter for the location listing.
///
/// `None` on any field means "unbounded" on that axis. Both dates are
/// inclusive local calendar days: the start bound is the first instant of
/// `start_date`, the end bound is 23:59:59.999 on `end_date`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub imei: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl FilterCriteria {
    /// The "no filter" value.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to a single device.
    pub fn for_device(imei: impl Into<String>) -> Self {
        Self {
            imei: Some(imei.into()),
            ..Self::default()
        }
    }

    /// Set the inclusive date range.
    pub fn between(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.imei.is_none() && self.start_date.is_none() && self.end_date.is_none()
    }

    /// Reject ranges that can never match and blank device selectors.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(CoreError::validation(format!(
                    "start date {start} is after end date {end}"
                )));
            }
        }
        if self.imei.as_deref().is_some_and(|i| i.trim().is_empty()) {
            return Err(CoreError::validation("device IMEI must not be blank"));
        }
        Ok(())
    }

    /// First local instant admitted by the start bound.
    pub fn start_bound(&self) -> Option<NaiveDateTime> {
        self.start_date.map(|d| d.and_time(NaiveTime::MIN))
    }

    /// Last local instant admitted by the end bound (23:59:59.999).
    pub fn end_bound(&self) -> Option<NaiveDateTime> {
        self.end_date
            .and_then(|d| d.and_hms_milli_opt(23, 59, 59, 999))
    }

    /// Whether `record` falls inside these criteria.
    ///
    /// Filtering is done by the server; this is used to detect records the
    /// server returned outside the active filter. Records without a device
    /// timestamp never match a date-bounded filter.
    pub fn matches(&self, record: &LocationRecord) -> bool {
        if self.imei.as_deref().is_some_and(|imei| imei != record.imei) {
            return false;
        }
        if self.start_date.is_none() && self.end_date.is_none() {
            return true;
        }
        let Some(at) = record.recorded_at() else {
            return false;
        };
        let local = at.with_timezone(&Local).naive_local();
        self.start_bound().is_none_or(|start| local >= start)
            && self.end_bound().is_none_or(|end| local <= end)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Ignition, RecordId};
    use chrono::TimeZone;

    fn record_at(imei: &str, local: NaiveDateTime) -> LocationRecord {
        let millis = Local
            .from_local_datetime(&local)
            .earliest()
            .unwrap()
            .timestamp_millis();
        LocationRecord {
            id: RecordId(1),
            imei: imei.into(),
            device_id: None,
            latitude: 0.0,
            longitude: 0.0,
            altitude: 0.0,
            accuracy: 0.0,
            bearing: 0.0,
            speed: 0.0,
            ignition: Ignition::Off,
            provider: None,
            reason: None,
            time_millis: Some(millis),
            created_at: None,
            updated_at: None,
            device: None,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_filter_matches_everything() {
        let f = FilterCriteria::all();
        assert!(f.is_empty());
        let r = record_at("A1", day(2024, 6, 1).and_hms_opt(12, 0, 0).unwrap());
        assert!(f.matches(&r));
    }

    #[test]
    fn end_date_is_inclusive_through_end_of_day() {
        let f = FilterCriteria::all().between(None, Some(day(2024, 6, 1)));
        let late = record_at("A1", day(2024, 6, 1).and_hms_milli_opt(23, 59, 59, 999).unwrap());
        let next = record_at("A1", day(2024, 6, 2).and_hms_opt(0, 0, 0).unwrap());
        assert!(f.matches(&late));
        assert!(!f.matches(&next));
    }

    #[test]
    fn start_date_is_inclusive_from_midnight() {
        let f = FilterCriteria::all().between(Some(day(2024, 6, 1)), None);
        let midnight = record_at("A1", day(2024, 6, 1).and_hms_opt(0, 0, 0).unwrap());
        let before = record_at("A1", day(2024, 5, 31).and_hms_opt(23, 59, 59).unwrap());
        assert!(f.matches(&midnight));
        assert!(!f.matches(&before));
    }

    #[test]
    fn imei_selector_must_match() {
        let f = FilterCriteria::for_device("A123");
        let other = record_at("B456", day(2024, 6, 1).and_hms_opt(12, 0, 0).unwrap());
        assert!(!f.matches(&other));
    }

    #[test]
    fn missing_timestamp_fails_date_filter() {
        let f = FilterCriteria::all().between(Some(day(2024, 6, 1)), None);
        let mut r = record_at("A1", day(2024, 6, 1).and_hms_opt(12, 0, 0).unwrap());
        r.time_millis = None;
        assert!(!f.matches(&r));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let f = FilterCriteria::all().between(Some(day(2024, 6, 2)), Some(day(2024, 6, 1)));
        assert!(matches!(f.validate(), Err(CoreError::Validation { .. })));
    }

    #[test]
    fn blank_imei_is_rejected() {
        assert!(FilterCriteria::for_device("  ").validate().is_err());
        assert!(FilterCriteria::for_device("A123").validate().is_ok());
    }
}
