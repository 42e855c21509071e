// trackdash-api: Async Rust client for the fleet tracking backend

pub mod client;
pub mod devices;
pub mod error;
pub mod location;
pub mod models;
pub mod settings;
pub mod transport;

pub use client::TrackingClient;
pub use error::Error;
pub use location::LocationQuery;
pub use models::{
    CountRow, DefaultConfigRow, DeviceConfigRow, DeviceConfigUpdate, DeviceRow, FiltersEcho,
    LocationPageResponse, LocationRow, NumberOrString, PaginationInfo, TimerSettings,
    TimerSettingsUpdate,
};
pub use transport::{TlsMode, TransportConfig};
