// ── Data service contract ──
//
// The narrow async surface the data session and config editor depend on.
// `TrackingClient` is the production implementation; tests substitute a
// scripted fake.

use std::future::Future;

use tracing::debug;
use trackdash_api::{DeviceConfigUpdate, LocationQuery, TlsMode, TrackingClient, TransportConfig};

use crate::config::{BackendConfig, TlsVerification};
use crate::convert;
use crate::error::CoreError;
use crate::model::{Device, FilterCriteria, LocationRecord, Pagination, TimerValues, TrackerConfig};

/// Parameters for one location page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    /// 1-indexed.
    pub page: u32,
    pub limit: u32,
    pub filters: FilterCriteria,
}

impl PageQuery {
    fn to_wire(&self) -> LocationQuery {
        LocationQuery {
            page: self.page,
            limit: self.limit,
            imei: self.filters.imei.clone(),
            start_date: self.filters.start_date,
            end_date: self.filters.end_date,
        }
    }
}

/// One fetched page. Always complete: a failed fetch yields no page.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationPage {
    pub records: Vec<LocationRecord>,
    pub devices: Vec<Device>,
    pub pagination: Pagination,
}

/// Backend operations the dashboard needs.
///
/// Implementations perform exactly one request per call: no retries, no
/// caching. Location failures are reported as [`CoreError::Fetch`],
/// configuration and device failures as [`CoreError::Config`].
pub trait DataService: Send + Sync + 'static {
    fn fetch_page(
        &self,
        query: &PageQuery,
    ) -> impl Future<Output = Result<LocationPage, CoreError>> + Send;

    fn fetch_config(&self) -> impl Future<Output = Result<TrackerConfig, CoreError>> + Send;

    fn update_config(
        &self,
        values: &TimerValues,
    ) -> impl Future<Output = Result<TrackerConfig, CoreError>> + Send;

    fn fetch_devices(&self) -> impl Future<Output = Result<Vec<Device>, CoreError>> + Send;

    fn update_device_config(
        &self,
        imei: &str,
        values: &TimerValues,
        base_url: Option<&str>,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

impl DataService for TrackingClient {
    async fn fetch_page(&self, query: &PageQuery) -> Result<LocationPage, CoreError> {
        let resp = self
            .fetch_locations(&query.to_wire())
            .await
            .map_err(|e| CoreError::fetch(&e))?;

        let pagination = convert::pagination(&resp.pagination, query.page, query.limit);
        let records: Vec<LocationRecord> = resp
            .locations_data
            .into_iter()
            .map(LocationRecord::from)
            .collect();
        let devices = resp.devices.into_iter().map(Device::from).collect();

        debug!(
            records = records.len(),
            total = pagination.total,
            page = pagination.current_page,
            "location page fetched"
        );
        Ok(LocationPage {
            records,
            devices,
            pagination,
        })
    }

    async fn fetch_config(&self) -> Result<TrackerConfig, CoreError> {
        let row = self
            .fetch_default_config()
            .await
            .map_err(|e| CoreError::config(&e))?;
        TrackerConfig::try_from(row)
    }

    async fn update_config(&self, values: &TimerValues) -> Result<TrackerConfig, CoreError> {
        let row = self
            .update_default_config(&(*values).into())
            .await
            .map_err(|e| CoreError::config(&e))?;
        TrackerConfig::try_from(row)
    }

    async fn fetch_devices(&self) -> Result<Vec<Device>, CoreError> {
        let rows = self
            .list_devices()
            .await
            .map_err(|e| CoreError::config(&e))?;
        Ok(rows.into_iter().map(Device::from).collect())
    }

    async fn update_device_config(
        &self,
        imei: &str,
        values: &TimerValues,
        base_url: Option<&str>,
    ) -> Result<(), CoreError> {
        let body = DeviceConfigUpdate {
            settings: (*values).into(),
            base_url: base_url.map(str::to_owned),
        };
        TrackingClient::update_device_config(self, imei, &body)
            .await
            .map_err(|e| CoreError::config(&e))
    }
}

/// Build a `TrackingClient` for the configured backend.
pub fn connect(config: &BackendConfig) -> Result<TrackingClient, CoreError> {
    let transport = TransportConfig {
        tls: match &config.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        },
        timeout: config.timeout,
    };
    TrackingClient::new(config.url.clone(), &transport)
        .map_err(|e| CoreError::Internal(format!("failed to build HTTP client: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use url::Url;

    #[test]
    fn page_query_maps_filters_to_wire() {
        let q = PageQuery {
            page: 3,
            limit: 25,
            filters: FilterCriteria::for_device("A123")
                .between(NaiveDate::from_ymd_opt(2024, 6, 1), None),
        };
        let wire = q.to_wire();
        assert_eq!(wire.page, 3);
        assert_eq!(wire.limit, 25);
        assert_eq!(wire.imei.as_deref(), Some("A123"));
        assert_eq!(wire.start_date, NaiveDate::from_ymd_opt(2024, 6, 1));
        assert!(wire.end_date.is_none());
    }

    #[test]
    fn connect_builds_client_for_backend() {
        let cfg = BackendConfig::new(Url::parse("http://localhost:3000/api").unwrap());
        let client = connect(&cfg).unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:3000/api");
    }

    #[test]
    fn connect_reports_bad_ca_file() {
        let mut cfg = BackendConfig::new(Url::parse("https://localhost/api").unwrap());
        cfg.tls = TlsVerification::CustomCa("/nonexistent/ca.pem".into());
        assert!(matches!(connect(&cfg), Err(CoreError::Internal(_))));
    }
}
