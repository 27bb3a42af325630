//! Write command handlers. Each one is a single pass-through request.

use spalink_core::accessory::{TemperatureUnit, Thermostat};
use spalink_core::{Command as CoreCommand, Spa};

use crate::cli::{GlobalOpts, TemperatureArgs, UnitArg};
use crate::config::Session;
use crate::error::CliError;

impl From<UnitArg> for TemperatureUnit {
    fn from(unit: UnitArg) -> Self {
        match unit {
            UnitArg::F => Self::Fahrenheit,
            UnitArg::C => Self::Celsius,
        }
    }
}

/// Setpoint write for a target given in `--unit` or the profile's unit.
pub fn temperature(args: &TemperatureArgs, session: &Session) -> Result<CoreCommand, CliError> {
    let unit = args
        .unit
        .map_or(session.profile.temperature_unit, TemperatureUnit::from);
    Ok(Thermostat::new(unit).setpoint_command(args.value)?)
}

pub async fn run(spa: &Spa, command: CoreCommand, global: &GlobalOpts) -> Result<(), CliError> {
    spa.execute(command).await?;
    if !global.quiet {
        eprintln!("✓ {command}");
    }
    Ok(())
}
