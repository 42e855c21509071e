// ── Tracker config editor ──
//
// Load / edit / save flow for the default configuration and for one
// device's configuration. The form survives failed saves so the operator
// can retry without re-entering values.

use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::model::{TimerValues, TrackerConfig};
use crate::service::DataService;

/// Which configuration the editor works on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigTarget {
    /// The global default configuration.
    Defaults,
    /// Configuration of the device with this IMEI.
    Device(String),
}

impl std::fmt::Display for ConfigTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Defaults => f.write_str("default config"),
            Self::Device(imei) => write!(f, "device {imei}"),
        }
    }
}

pub struct ConfigEditor<S: DataService> {
    service: S,
    target: ConfigTarget,
    loaded: Option<TrackerConfig>,
    form: TimerValues,
    base_url: Option<String>,
    error: Option<String>,
}

impl<S: DataService> ConfigEditor<S> {
    pub fn new(service: S, target: ConfigTarget) -> Self {
        Self {
            service,
            target,
            loaded: None,
            form: TimerValues::default(),
            base_url: None,
            error: None,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn target(&self) -> &ConfigTarget {
        &self.target
    }

    /// Last configuration fetched from or accepted by the server.
    pub fn loaded(&self) -> Option<&TrackerConfig> {
        self.loaded.as_ref()
    }

    /// Current form values.
    pub fn values(&self) -> &TimerValues {
        &self.form
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Message of the last failed load or save.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the form differs from the loaded configuration.
    pub fn is_dirty(&self) -> bool {
        self.loaded
            .as_ref()
            .is_some_and(|c| c.values != self.form || c.base_url != self.base_url)
    }

    // ── Editing ──────────────────────────────────────────────────────

    /// Set one form field by its wire name (`"gpsTimer"`).
    pub fn set(&mut self, field: &str, value: u32) -> Result<(), CoreError> {
        self.form.set(field, value)
    }

    /// Replace every form value at once.
    pub fn set_values(&mut self, values: TimerValues) {
        self.form = values;
    }

    /// Change the device's service URL. The default config's URL is
    /// managed by the server and cannot be edited.
    pub fn set_base_url(&mut self, url: impl Into<String>) -> Result<(), CoreError> {
        match self.target {
            ConfigTarget::Defaults => Err(CoreError::validation(
                "the default config's base URL is managed by the server",
            )),
            ConfigTarget::Device(_) => {
                self.base_url = Some(url.into());
                Ok(())
            }
        }
    }

    /// Discard edits and return to the loaded values.
    pub fn reset(&mut self) {
        if let Some(cfg) = &self.loaded {
            self.form = cfg.values;
            self.base_url.clone_from(&cfg.base_url);
        }
    }

    // ── Server round-trips ───────────────────────────────────────────

    /// Fetch the target configuration and fill the form from it.
    ///
    /// A device without stored configuration yields the built-in
    /// defaults. On failure the form is left as it was.
    pub async fn load(&mut self) -> Result<&TrackerConfig, CoreError> {
        match self.fetch().await {
            Ok(cfg) => {
                debug!(config = %self.target, "config loaded");
                self.form = cfg.values;
                self.base_url.clone_from(&cfg.base_url);
                self.error = None;
                Ok(self.loaded.insert(cfg))
            }
            Err(e) => {
                warn!(config = %self.target, error = %e, "config load failed");
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    async fn fetch(&self) -> Result<TrackerConfig, CoreError> {
        match &self.target {
            ConfigTarget::Defaults => self.service.fetch_config().await,
            ConfigTarget::Device(imei) => {
                let device = self
                    .service
                    .fetch_devices()
                    .await?
                    .into_iter()
                    .find(|d| &d.imei == imei)
                    .ok_or_else(|| CoreError::NotFound {
                        entity_type: "Device".into(),
                        identifier: imei.clone(),
                    })?;
                if let Some(reason) = device.config_error {
                    return Err(CoreError::validation(format!(
                        "stored config for device {imei} is unreadable: {reason}"
                    )));
                }
                Ok(device
                    .config
                    .unwrap_or_else(TrackerConfig::unconfigured_device))
            }
        }
    }

    /// Push the form to the server.
    pub async fn save(&mut self) -> Result<(), CoreError> {
        let result = match &self.target {
            ConfigTarget::Defaults => self.service.update_config(&self.form).await,
            ConfigTarget::Device(imei) => self
                .service
                .update_device_config(imei, &self.form, self.base_url.as_deref())
                .await
                .map(|()| TrackerConfig {
                    id: self.loaded.as_ref().and_then(|c| c.id),
                    values: self.form,
                    base_url: self.base_url.clone(),
                }),
        };

        match result {
            Ok(cfg) => {
                info!(config = %self.target, "config saved");
                self.form = cfg.values;
                self.base_url.clone_from(&cfg.base_url);
                self.loaded = Some(cfg);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                warn!(config = %self.target, error = %e, "config save failed");
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }
}
