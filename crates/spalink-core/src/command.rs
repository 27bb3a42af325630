// ── Command API ──
//
// All write operations flow through a unified `Command` enum. Each variant
// carries only the fields its control needs; string inputs are validated
// here, at the boundary, before anything reaches the network.

use std::fmt;
use std::str::FromStr;

use strum::IntoEnumIterator;

use spalink_api::{BlowerSelector, OnOff, PumpSelector, PumpState, Toggle};

use crate::error::CoreError;

/// All possible write operations against the spa.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Setpoint in degrees Fahrenheit. Range checks are the remote's job.
    SetTemperature { setpoint_f: f64 },
    SetLights { on: bool },
    SetPump { pump: PumpSelector, state: PumpState },
    SetBlower { blower: BlowerSelector, on: bool },
    SetToggle { toggle: Toggle, on: bool },
    Boost,
}

impl Command {
    /// Build a setpoint write. Only non-finite values are rejected.
    pub fn temperature(setpoint_f: f64) -> Result<Self, CoreError> {
        if !setpoint_f.is_finite() {
            return Err(CoreError::Validation {
                field: "temperature".into(),
                reason: format!("expected a finite number, got {setpoint_f}"),
            });
        }
        Ok(Self::SetTemperature { setpoint_f })
    }

    /// Parse `pump` (`1`-`5`, `all`) and `state` (`off`, `on`, `low`, `high`).
    pub fn pump(pump: &str, state: &str) -> Result<Self, CoreError> {
        Ok(Self::SetPump {
            pump: parse_choice::<PumpSelector>("pump", pump, &choices::<PumpSelector>())?,
            state: parse_choice::<PumpState>("pump state", state, &choices::<PumpState>())?,
        })
    }

    /// Parse `blower` (`1`, `2`, `all`) and `state` (`on`, `off`).
    pub fn blower(blower: &str, state: &str) -> Result<Self, CoreError> {
        let blower =
            parse_choice::<BlowerSelector>("blower", blower, &choices::<BlowerSelector>())?;
        let state = parse_choice::<OnOff>("blower state", state, "on, off")?;
        Ok(Self::SetBlower {
            blower,
            on: state.into(),
        })
    }

    /// Parse a toggle name (`easymode`, `sds`, `yess`, `fogger`).
    pub fn toggle(name: &str, on: bool) -> Result<Self, CoreError> {
        Ok(Self::SetToggle {
            toggle: parse_choice::<Toggle>("toggle", name, &choices::<Toggle>())?,
            on,
        })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetTemperature { setpoint_f } => write!(f, "set temperature to {setpoint_f}°F"),
            Self::SetLights { on } => write!(f, "turn lights {}", OnOff::from(*on)),
            Self::SetPump { pump, state } => write!(f, "set pump {pump} to {state}"),
            Self::SetBlower { blower, on } => {
                write!(f, "turn blower {blower} {}", OnOff::from(*on))
            }
            Self::SetToggle { toggle, on } => write!(f, "turn {toggle} {}", OnOff::from(*on)),
            Self::Boost => f.write_str("boost"),
        }
    }
}

fn choices<T: IntoEnumIterator + fmt::Display>() -> String {
    T::iter().map(|c| c.to_string()).collect::<Vec<_>>().join(", ")
}

fn parse_choice<T: FromStr>(field: &str, raw: &str, expected: &str) -> Result<T, CoreError> {
    T::from_str(raw.trim()).map_err(|_| CoreError::Validation {
        field: field.into(),
        reason: format!("expected one of {expected}, got '{raw}'"),
    })
}
