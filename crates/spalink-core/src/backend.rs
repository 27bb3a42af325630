// The seam between the caching layer and the network.

use std::future::Future;

use spalink_api::{DeviceStatus, SpaClient};

use crate::command::Command;
use crate::error::CoreError;

/// Something that can fetch the spa's status and apply writes.
///
/// [`SpaClient`] is the production implementation. The cache only needs
/// the returned futures to be `Send` so a fetch can be shared between
/// callers on any task.
pub trait SpaBackend: Send + Sync + 'static {
    /// One uncached `GET /status`.
    fn fetch_status(&self) -> impl Future<Output = Result<DeviceStatus, CoreError>> + Send;

    /// One uncached write.
    fn send(&self, command: &Command) -> impl Future<Output = Result<(), CoreError>> + Send;
}

impl SpaBackend for SpaClient {
    async fn fetch_status(&self) -> Result<DeviceStatus, CoreError> {
        Ok(self.get_status().await?)
    }

    async fn send(&self, command: &Command) -> Result<(), CoreError> {
        // Any success body (empty, text or JSON) counts as accepted.
        let _ack = match *command {
            Command::SetTemperature { setpoint_f } => self.set_temperature(setpoint_f).await?,
            Command::SetLights { on } => self.set_lights(on).await?,
            Command::SetPump { pump, state } => self.set_pump(pump, state).await?,
            Command::SetBlower { blower, on } => self.set_blower(blower, on).await?,
            Command::SetToggle { toggle, on } => self.set_toggle(toggle, on).await?,
            Command::Boost => self.boost().await?,
        };
        Ok(())
    }
}
