//! Resolve the effective configuration for one invocation: config file,
//! `TRACKDASH_*` environment, then global CLI flags.

use std::path::PathBuf;

use trackdash_config::Config;
use trackdash_core::{
    AuthGate, BackendConfig, DataSession, FileSessionStore, PAGE_SIZE_OPTIONS, TrackingClient,
};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Config file path honoring `--config`.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(trackdash_config::config_path)
}

/// Load the config file plus environment, then apply flag overrides.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = trackdash_config::load_config_from(&config_path(global))?;

    if let Some(ref url) = global.url {
        cfg.api.base_url.clone_from(url);
    }
    if global.insecure {
        cfg.api.insecure = true;
    }
    if let Some(timeout) = global.timeout {
        cfg.api.timeout_secs = timeout;
    }

    cfg.validate()?;
    Ok(cfg)
}

/// Auth gate over the configured session marker and login allow-list.
pub fn auth_gate(cfg: &Config) -> AuthGate {
    AuthGate::new(
        FileSessionStore::new(cfg.session_file()),
        cfg.credentials(),
    )
}

/// Restore the saved session, failing when nobody is logged in.
pub fn require_login(cfg: &Config) -> Result<AuthGate, CliError> {
    let gate = auth_gate(cfg);
    gate.check_session();
    gate.require()?;
    Ok(gate)
}

/// Check a `--limit` value against the offered page sizes.
pub fn page_size(requested: Option<u32>, backend: &BackendConfig) -> Result<u32, CliError> {
    let size = requested.unwrap_or(backend.page_size);
    if PAGE_SIZE_OPTIONS.contains(&size) {
        Ok(size)
    } else {
        Err(CliError::Validation {
            field: "limit".into(),
            reason: format!("expected one of {PAGE_SIZE_OPTIONS:?}, got {size}"),
        })
    }
}

/// Everything a data command needs once the operator is logged in.
pub struct Connection {
    pub backend: BackendConfig,
    pub client: TrackingClient,
}

impl Connection {
    pub fn open(cfg: &Config) -> Result<Self, CliError> {
        let backend = cfg.backend_config()?;
        let client = trackdash_core::connect(&backend)?;
        tracing::debug!(url = %backend.url, "backend client ready");
        Ok(Self { backend, client })
    }

    pub fn api_url(&self) -> &str {
        self.backend.url.as_str()
    }

    /// Data session over this connection.
    pub fn session(&self, page_size: u32) -> DataSession<TrackingClient> {
        DataSession::new(self.client.clone(), page_size)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn limit_must_be_an_offered_page_size() {
        let backend = BackendConfig::new("http://localhost:3000/api".parse().unwrap());
        assert_eq!(page_size(None, &backend).unwrap(), 10);
        assert_eq!(page_size(Some(25), &backend).unwrap(), 25);
        assert!(matches!(
            page_size(Some(7), &backend),
            Err(CliError::Validation { .. })
        ));
    }
}
