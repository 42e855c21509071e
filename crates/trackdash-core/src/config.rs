// ── Runtime backend configuration ──
//
// These types describe *how* to reach the tracking backend and how the
// data session should page through it. They never touch disk: the CLI
// (via trackdash-config) constructs a `BackendConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed staging backends).
    DangerAcceptInvalid,
}

/// Configuration for talking to one tracking backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// API root, e.g. `http://backend:3000/api`.
    pub url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
    /// Initial page size for the data session.
    pub page_size: u32,
    /// Periodic refresh of the data session. `None` = manual refresh only.
    pub refresh_interval: Option<Duration>,
}

impl BackendConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            page_size: 10,
            refresh_interval: None,
        }
    }
}
