// Default tracker configuration: a singleton read/write resource.

use crate::client::TrackingClient;
use crate::error::Error;
use crate::models::{DataEnvelope, DefaultConfigRow, TimerSettingsUpdate};

impl TrackingClient {
    /// `GET /default-config`
    pub async fn fetch_default_config(&self) -> Result<DefaultConfigRow, Error> {
        let url = self.endpoint(&["default-config"])?;
        let envelope: DataEnvelope<DefaultConfigRow> = self.get(url).await?;
        Ok(envelope.data)
    }

    /// `PUT /default-config` with the 13 numeric fields.
    ///
    /// Returns the configuration as stored by the server.
    pub async fn update_default_config(
        &self,
        update: &TimerSettingsUpdate,
    ) -> Result<DefaultConfigRow, Error> {
        let url = self.endpoint(&["default-config"])?;
        let envelope: DataEnvelope<DefaultConfigRow> = self.put(url, update).await?;
        Ok(envelope.data)
    }
}
