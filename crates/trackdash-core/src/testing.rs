// Scripted in-memory `DataService` for unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::Mutex;

use tokio::sync::oneshot;

use crate::error::CoreError;
use crate::model::{
    Device, Ignition, LocationRecord, Pagination, RecordId, TimerValues, TrackerConfig,
};
use crate::service::{DataService, LocationPage, PageQuery};

pub(crate) enum Step {
    Ready(Result<LocationPage, CoreError>),
    Deferred(oneshot::Receiver<Result<LocationPage, CoreError>>),
}

/// Replays scripted page responses in order and records every query.
/// Once the script runs out it answers with an empty page.
#[derive(Default)]
pub(crate) struct FakeService {
    script: Mutex<VecDeque<Step>>,
    queries: Mutex<Vec<PageQuery>>,
    pub config: Mutex<Option<TrackerConfig>>,
    pub devices: Mutex<Vec<Device>>,
    pub device_updates: Mutex<Vec<(String, TimerValues, Option<String>)>>,
    pub fail_config: Mutex<bool>,
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, result: Result<LocationPage, CoreError>) {
        self.script.lock().unwrap().push_back(Step::Ready(result));
    }

    /// Script a response that resolves only when the sender fires.
    pub fn push_deferred(&self) -> oneshot::Sender<Result<LocationPage, CoreError>> {
        let (tx, rx) = oneshot::channel();
        self.script.lock().unwrap().push_back(Step::Deferred(rx));
        tx
    }

    pub fn queries(&self) -> Vec<PageQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub fn last_query(&self) -> Option<PageQuery> {
        self.queries.lock().unwrap().last().cloned()
    }

    fn config_guard(&self) -> Result<(), CoreError> {
        if *self.fail_config.lock().unwrap() {
            return Err(CoreError::Config {
                message: "server returned HTTP 500".into(),
                status: Some(500),
            });
        }
        Ok(())
    }
}

impl DataService for FakeService {
    async fn fetch_page(&self, query: &PageQuery) -> Result<LocationPage, CoreError> {
        self.queries.lock().unwrap().push(query.clone());
        let step = self.script.lock().unwrap().pop_front();
        match step {
            Some(Step::Ready(result)) => result,
            Some(Step::Deferred(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(CoreError::Internal("deferred response dropped".into()))),
            None => Ok(page(&[], query.page, query.limit, 0)),
        }
    }

    async fn fetch_config(&self) -> Result<TrackerConfig, CoreError> {
        self.config_guard()?;
        self.config
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| CoreError::Internal("no config scripted".into()))
    }

    async fn update_config(&self, values: &TimerValues) -> Result<TrackerConfig, CoreError> {
        self.config_guard()?;
        let mut slot = self.config.lock().unwrap();
        let mut cfg = slot.clone().unwrap_or_else(TrackerConfig::unconfigured_device);
        cfg.values = *values;
        *slot = Some(cfg.clone());
        Ok(cfg)
    }

    async fn fetch_devices(&self) -> Result<Vec<Device>, CoreError> {
        self.config_guard()?;
        Ok(self.devices.lock().unwrap().clone())
    }

    async fn update_device_config(
        &self,
        imei: &str,
        values: &TimerValues,
        base_url: Option<&str>,
    ) -> Result<(), CoreError> {
        self.config_guard()?;
        self.device_updates.lock().unwrap().push((
            imei.to_owned(),
            *values,
            base_url.map(str::to_owned),
        ));
        Ok(())
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────

pub(crate) fn record(id: i64, imei: &str) -> LocationRecord {
    LocationRecord {
        id: RecordId(id),
        imei: imei.to_owned(),
        device_id: None,
        latitude: 31.52,
        longitude: 74.35,
        altitude: 0.0,
        accuracy: 5.0,
        bearing: 90.0,
        speed: 40.0,
        ignition: Ignition::On,
        provider: Some("gps".into()),
        reason: None,
        time_millis: Some(1_718_445_000_000),
        created_at: None,
        updated_at: None,
        device: None,
    }
}

/// A page holding `ids`, reported as `page` of a `total`-record listing.
pub(crate) fn page(ids: &[i64], page: u32, limit: u32, total: u64) -> LocationPage {
    let count = u32::try_from(ids.len()).unwrap();
    LocationPage {
        records: ids.iter().map(|id| record(*id, "A123")).collect(),
        devices: Vec::new(),
        pagination: Pagination::from_server(page, limit, total, 0, count),
    }
}

pub(crate) fn device(imei: &str, config: Option<TrackerConfig>) -> Device {
    Device {
        id: 1,
        imei: imei.to_owned(),
        name: format!("Tracker {imei}"),
        phone: None,
        email: None,
        created_at: None,
        updated_at: None,
        location_count: 0,
        config,
        config_error: None,
    }
}
