//! State layer between `trackdash-api` and dashboard consumers (CLI / UI).
//!
//! This crate owns the business logic and domain model of the fleet
//! tracking dashboard:
//!
//! - **[`DataSession`]**: The load state machine (`Idle` / `Loading` /
//!   `Loaded` / `Error`) owning location records, devices, filters, the
//!   pagination cursor, and the selected record. Every operation funnels
//!   through one load primitive with request fencing so the most recent
//!   request always wins.
//!
//! - **[`AuthGate`]**: Authenticated/loading flags backed by a persisted
//!   session marker with a 24-hour expiry.
//!
//! - **[`DataService`]**: The narrow read/write contract the session talks
//!   to. Implemented for [`trackdash_api::TrackingClient`].
//!
//! - **[`policy`]**: Pure selection and parameter-merging rules.
//!
//! - **[`ConfigEditor`]**: Load/edit/save flow for the default and
//!   per-device tracker configuration.

pub mod auth;
pub mod config;
pub mod convert;
pub mod editor;
pub mod error;
pub mod model;
pub mod policy;
pub mod service;
pub mod session;

#[cfg(test)]
mod testing;

// ── Primary re-exports ──────────────────────────────────────────────
pub use auth::{
    AuthGate, AuthState, CredentialPolicy, FileSessionStore, MemorySessionStore, PersistedAuth,
    SessionStore, StaticCredentials,
};
pub use config::{BackendConfig, TlsVerification};
pub use editor::{ConfigEditor, ConfigTarget};
pub use error::CoreError;
pub use service::{DataService, LocationPage, PageQuery, connect};
pub use trackdash_api::TrackingClient;
pub use session::{
    DataSession, LoadOutcome, LoadPhase, SessionState, SessionWatchStream, StateStream,
};

pub use model::{
    Device, FilterCriteria, Ignition, LocationRecord, PAGE_SIZE_OPTIONS, PageLink, Pagination,
    RecordId, TimerValues, TrackerConfig,
};
