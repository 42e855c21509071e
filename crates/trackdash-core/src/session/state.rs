// ── Session state ──

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{Device, FilterCriteria, LocationRecord, Pagination, RecordId};
use crate::service::PageQuery;

/// Where the session is in its load cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
pub enum LoadPhase {
    /// Nothing requested yet.
    Idle,
    Loading,
    Loaded,
    /// The last load failed. Previously loaded data is still present.
    Error,
}

/// What a load call did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response was installed.
    Applied,
    /// A newer load started (or the session closed) before this one
    /// resolved; its response was discarded.
    Superseded,
    /// Guard rejected the call; no request was issued.
    Skipped,
}

/// Observable snapshot of a [`DataSession`](super::DataSession).
#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    pub phase: LoadPhase,
    /// Current page of records, in server order.
    pub records: Arc<Vec<LocationRecord>>,
    /// Devices returned with the current page.
    pub devices: Arc<Vec<Device>>,
    /// Parameters of the most recently started load. Filters are
    /// installed here as soon as a load starts.
    #[serde(skip)]
    pub query: PageQuery,
    /// Cursor confirmed by the server for `records`.
    pub pagination: Pagination,
    /// Message of the last failed load, cleared on success.
    pub error: Option<String>,
    pub selected: Option<RecordId>,
    pub last_loaded: Option<DateTime<Utc>>,
}

impl SessionState {
    pub(crate) fn new(page_size: u32) -> Self {
        Self {
            phase: LoadPhase::Idle,
            records: Arc::new(Vec::new()),
            devices: Arc::new(Vec::new()),
            query: PageQuery {
                page: 1,
                limit: page_size,
                filters: FilterCriteria::default(),
            },
            pagination: Pagination::first_page(page_size),
            error: None,
            selected: None,
            last_loaded: None,
        }
    }

    /// Active filter criteria.
    pub fn filters(&self) -> &FilterCriteria {
        &self.query.filters
    }

    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    /// The selected record, resolved against the current page.
    pub fn selected_record(&self) -> Option<&LocationRecord> {
        let id = self.selected?;
        self.records.iter().find(|r| r.id == id)
    }
}
