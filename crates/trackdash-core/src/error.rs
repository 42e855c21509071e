// ── Core error types ──
//
// User-facing errors from trackdash-core. Consumers never see raw HTTP
// status handling or JSON parse failures: API errors are folded into
// `Fetch` or `Config` depending on which call produced them.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Authentication ───────────────────────────────────────────────
    #[error("Invalid credentials")]
    AuthenticationFailed,

    #[error("Not logged in")]
    NotAuthenticated,

    // ── Data ─────────────────────────────────────────────────────────
    #[error("Failed to fetch location data: {message}")]
    Fetch {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("Configuration request failed: {message}")]
    Config {
        message: String,
        status: Option<u16>,
    },

    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Input ────────────────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    Validation { message: String },

    // ── Lifecycle ────────────────────────────────────────────────────
    #[error("Data session is closed")]
    SessionClosed,

    #[error("Session storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Wrap an API error raised while loading location data.
    pub fn fetch(err: &trackdash_api::Error) -> Self {
        Self::Fetch {
            message: describe(err),
            status: err.status(),
        }
    }

    /// Wrap an API error raised while reading or writing configuration.
    pub fn config(err: &trackdash_api::Error) -> Self {
        Self::Config {
            message: describe(err),
            status: err.status(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub(crate) fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

/// Human-readable summary of a transport-layer error.
fn describe(err: &trackdash_api::Error) -> String {
    use trackdash_api::Error as ApiError;

    match err {
        ApiError::Transport(e) if e.is_timeout() => "the server did not respond in time".into(),
        ApiError::Transport(e) if e.is_connect() => "could not reach the server".into(),
        ApiError::Http { status, message } if message.is_empty() => {
            format!("server returned HTTP {status}")
        }
        ApiError::Http { status, message } => format!("server returned HTTP {status}: {message}"),
        ApiError::Rejected { message } => message.clone(),
        ApiError::Deserialization { message, .. } => {
            format!("unexpected response from server ({message})")
        }
        other => other.to_string(),
    }
}
