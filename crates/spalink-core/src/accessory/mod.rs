//! Accessories: presentation-level views over a [`DeviceStatus`] snapshot.
//!
//! Each accessory turns raw status fields into the state a home-automation
//! host would display, and turns user intent back into a [`Command`].
//! None of them cache anything; they all read through a shared
//! [`Spa`](crate::Spa) and are driven by [`spawn_poller`].
//!
//! [`Command`]: crate::Command

pub mod poller;
pub mod pump;
pub mod sensor;
pub mod switch;
pub mod thermostat;

use std::fmt::Debug;

use spalink_api::DeviceStatus;

pub use poller::{PollerHandle, spawn_poller};
pub use pump::{PumpFan, PumpFanState, PumpMode, PumpPolicy};
pub use sensor::{ChemistryKind, ChemistryReading, ChemistrySensor, Severity};
pub use switch::{Switch, SwitchKind};
pub use thermostat::{TemperatureUnit, Thermostat, ThermostatState};

/// A device-facing view rendered from a status snapshot.
pub trait Accessory: Send + Sync + 'static {
    type State: Debug + Clone + PartialEq + Send + Sync + 'static;

    /// Human-readable name, used in logs and output.
    fn name(&self) -> String;

    fn render(&self, status: &DeviceStatus) -> Self::State;
}
