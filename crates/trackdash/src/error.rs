//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use trackdash_config::ConfigError;
use trackdash_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Backend ──────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(trackdash::fetch),
        help(
            "Check that the tracking backend is running and reachable.\n\
             Current API root: {url}\n\
             Override with --url or TRACKDASH_API__BASE_URL."
        )
    )]
    Backend {
        message: String,
        url: String,
        status: Option<u16>,
    },

    #[error("{message}")]
    #[diagnostic(code(trackdash::config_request))]
    ConfigRequest {
        message: String,
        status: Option<u16>,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Not logged in")]
    #[diagnostic(
        code(trackdash::not_logged_in),
        help("Run: trackdash login\nSaved sessions expire after 24 hours.")
    )]
    NotLoggedIn,

    #[error("Invalid credentials for '{username}'")]
    #[diagnostic(
        code(trackdash::auth_failed),
        help("Check the username and password, or the [auth] users list in your config.")
    )]
    AuthFailed { username: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(trackdash::not_found),
        help("Run: trackdash {list_command} to see what is available")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(trackdash::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Config file already exists at {path}")]
    #[diagnostic(
        code(trackdash::config_exists),
        help("Use --force to overwrite it, or edit it directly.")
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(
        code(trackdash::config),
        help("Check the config file (trackdash config path) and TRACKDASH_* variables.")
    )]
    Config(#[from] ConfigError),

    // ── Internal / IO ────────────────────────────────────────────────
    #[error("{0}")]
    #[diagnostic(code(trackdash::internal))]
    Internal(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Backend { status: None, .. } | Self::ConfigRequest { status: None, .. } => {
                exit_code::CONNECTION
            }
            Self::NotLoggedIn | Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::ConfigExists { .. } => exit_code::CONFLICT,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Attach the API root to a backend error for the help text.
    pub fn with_url(self, api_url: &str) -> Self {
        match self {
            Self::Backend {
                message, status, ..
            } => Self::Backend {
                message,
                url: api_url.to_owned(),
                status,
            },
            other => other,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Fetch { status, .. } => CliError::Backend {
                message: err.to_string(),
                url: "(unknown)".into(),
                status,
            },

            CoreError::Config { status, .. } => CliError::ConfigRequest {
                message: err.to_string(),
                status,
            },

            CoreError::NotAuthenticated => CliError::NotLoggedIn,

            CoreError::AuthenticationFailed => CliError::AuthFailed {
                username: "(unknown)".into(),
            },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: format!("{}s list", entity_type.to_lowercase()),
                resource_type: entity_type,
                identifier,
            },

            CoreError::Validation { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::SessionClosed | CoreError::Storage { .. } | CoreError::Internal(_) => {
                CliError::Internal(err.to_string())
            }
        }
    }
}
