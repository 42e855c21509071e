//! Shared configuration for the trackdash CLI.
//!
//! TOML file plus `TRACKDASH_*` environment overrides, and translation to
//! the runtime types in `trackdash_core` (`BackendConfig`,
//! `StaticCredentials`, session marker location).

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use trackdash_core::{BackendConfig, PAGE_SIZE_OPTIONS, StaticCredentials, TlsVerification};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiSection,

    #[serde(default)]
    pub session: SessionSection,

    #[serde(default)]
    pub auth: AuthSection,
}

/// Where the tracking backend lives and how to talk to it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiSection {
    /// API root, e.g. "http://localhost:3000/api".
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Accept invalid TLS certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Path to a custom CA certificate (PEM).
    pub ca_cert: Option<PathBuf>,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            insecure: false,
            ca_cert: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionSection {
    /// Initial page size; one of 5, 10, 25, 50, 100.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Auto-refresh period for `watch`. 0 disables it.
    #[serde(default)]
    pub refresh_interval_secs: u64,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            refresh_interval_secs: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AuthSection {
    /// Session marker path. Defaults to `session.json` in the data dir.
    pub session_file: Option<PathBuf>,

    /// Replaces the built-in operator account when non-empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<UserEntry>,
}

/// One allow-listed login (password in plaintext; keep the file private).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserEntry {
    pub username: String,
    pub password: String,
}

fn default_base_url() -> String {
    "http://localhost:3000/api".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_page_size() -> u32 {
    10
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "placentek", "trackdash")
}

fn home_fallback(kind: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(kind);
    p.push("trackdash");
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default location of the session marker.
pub fn default_session_file() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".local/share").join("session.json"),
        |dirs| dirs.data_dir().join("session.json"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load config from `path` + environment. A missing file is not an error.
///
/// Environment variables use `__` as the section separator:
/// `TRACKDASH_API__BASE_URL`, `TRACKDASH_SESSION__PAGE_SIZE`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("TRACKDASH_").split("__"))
        .extract()?;
    config.validate()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !PAGE_SIZE_OPTIONS.contains(&self.session.page_size) {
            return Err(ConfigError::Validation {
                field: "session.page_size".into(),
                reason: format!(
                    "expected one of {PAGE_SIZE_OPTIONS:?}, got {}",
                    self.session.page_size
                ),
            });
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Validation {
                field: "api.timeout_secs".into(),
                reason: "must be at least 1".into(),
            });
        }
        self.base_url().map(|_| ())
    }

    fn base_url(&self) -> Result<url::Url, ConfigError> {
        self.api
            .base_url
            .parse()
            .map_err(|e| ConfigError::Validation {
                field: "api.base_url".into(),
                reason: format!("invalid URL '{}': {e}", self.api.base_url),
            })
    }

    /// Build the runtime backend configuration.
    pub fn backend_config(&self) -> Result<BackendConfig, ConfigError> {
        let mut backend = BackendConfig::new(self.base_url()?);
        backend.tls = if self.api.insecure {
            TlsVerification::DangerAcceptInvalid
        } else if let Some(ref ca_path) = self.api.ca_cert {
            TlsVerification::CustomCa(ca_path.clone())
        } else {
            TlsVerification::SystemDefaults
        };
        backend.timeout = Duration::from_secs(self.api.timeout_secs);
        backend.page_size = self.session.page_size;
        backend.refresh_interval = (self.session.refresh_interval_secs > 0)
            .then(|| Duration::from_secs(self.session.refresh_interval_secs));
        Ok(backend)
    }

    /// Login allow-list: configured users, or the built-in account.
    pub fn credentials(&self) -> StaticCredentials {
        if self.auth.users.is_empty() {
            return StaticCredentials::default();
        }
        StaticCredentials::new(
            self.auth
                .users
                .iter()
                .map(|u| (u.username.clone(), SecretString::from(u.password.clone()))),
        )
    }

    pub fn session_file(&self) -> PathBuf {
        self.auth
            .session_file
            .clone()
            .unwrap_or_else(default_session_file)
    }
}
