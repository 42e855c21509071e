// ── Domain model ──
//
// Canonical, normalized types consumed by the session and the views.
// Wire types from trackdash-api are converted in `crate::convert`.

pub mod device;
pub mod filter;
pub mod location;
pub mod pagination;
pub mod tracker_config;

pub use device::Device;
pub use filter::FilterCriteria;
pub use location::{Ignition, LocationRecord, RecordId};
pub use pagination::{PAGE_SIZE_OPTIONS, PageLink, Pagination};
pub use tracker_config::{TimerValues, TrackerConfig};
