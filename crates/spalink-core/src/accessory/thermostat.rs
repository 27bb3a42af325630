//! Thermostat: current and target water temperature in a display unit.

use serde::{Deserialize, Serialize};

use spalink_api::DeviceStatus;

use super::Accessory;
use crate::command::Command;
use crate::error::CoreError;

/// Unit temperatures are displayed and entered in. The API is always °F.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemperatureUnit {
    #[default]
    #[serde(rename = "f", alias = "F", alias = "fahrenheit")]
    Fahrenheit,
    #[serde(rename = "c", alias = "C", alias = "celsius")]
    Celsius,
}

impl TemperatureUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Fahrenheit => "°F",
            Self::Celsius => "°C",
        }
    }

    /// Convert an API reading to this unit. Celsius is rounded to 0.5°.
    pub fn reading(self, f: f64) -> f64 {
        match self {
            Self::Fahrenheit => f,
            Self::Celsius => (f_to_c(f) * 2.0).round() / 2.0,
        }
    }

    /// Convert a value in this unit to a whole-degree Fahrenheit setpoint.
    pub fn setpoint(self, value: f64) -> f64 {
        match self {
            Self::Fahrenheit => value.round(),
            Self::Celsius => c_to_f(value).round(),
        }
    }
}

pub fn f_to_c(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

pub fn c_to_f(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThermostatState {
    pub current: Option<f64>,
    pub target: Option<f64>,
    pub unit: TemperatureUnit,
    /// Water is below target.
    pub heating: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Thermostat {
    pub unit: TemperatureUnit,
}

impl Thermostat {
    pub fn new(unit: TemperatureUnit) -> Self {
        Self { unit }
    }

    /// Build the setpoint write for a target entered in the display unit.
    pub fn setpoint_command(&self, target: f64) -> Result<Command, CoreError> {
        Command::temperature(self.unit.setpoint(target))
    }
}

impl Accessory for Thermostat {
    type State = ThermostatState;

    fn name(&self) -> String {
        "thermostat".into()
    }

    fn render(&self, status: &DeviceStatus) -> ThermostatState {
        let heating = matches!(
            (status.current_temp_f, status.target_temp_f),
            (Some(current), Some(target)) if current < target
        );
        ThermostatState {
            current: status.current_temp_f.map(|f| self.unit.reading(f)),
            target: status.target_temp_f.map(|f| self.unit.reading(f)),
            unit: self.unit,
            heating,
        }
    }
}
