// Device listing and per-device configuration.

use crate::client::TrackingClient;
use crate::error::Error;
use crate::models::{DataEnvelope, DeviceConfigUpdate, DeviceRow, StatusEnvelope};

impl TrackingClient {
    /// `GET /devices` -- every device with its nested config (or `null`).
    pub async fn list_devices(&self) -> Result<Vec<DeviceRow>, Error> {
        let url = self.endpoint(&["devices"])?;
        let envelope: DataEnvelope<Vec<DeviceRow>> = self.get(url).await?;
        Ok(envelope.data)
    }

    /// `POST /devices/{imei}/config`
    ///
    /// The backend answers `{ success }` only; the updated config must be
    /// re-read through [`list_devices`](Self::list_devices).
    pub async fn update_device_config(
        &self,
        imei: &str,
        update: &DeviceConfigUpdate,
    ) -> Result<(), Error> {
        let url = self.endpoint(&["devices", imei, "config"])?;
        let _: StatusEnvelope = self.post(url, update).await?;
        Ok(())
    }
}
