//! Pumps as variable-speed fans.
//!
//! The API only knows discrete states; speeds (0-100) are quantized to
//! whichever states the pump supports. The thresholds are policy and live in
//! [`PumpPolicy`], not in the cache or transport.

use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use spalink_api::{DeviceStatus, PumpSelector, PumpState};

use super::Accessory;
use crate::command::Command;
use crate::error::CoreError;

/// Which states a pump supports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PumpMode {
    /// `off` / `on`.
    TwoState,
    /// `off` / `low` / `high`.
    #[default]
    ThreeState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PumpPolicy {
    pub mode: PumpMode,
    /// Highest speed (1-100) that still maps to `low` on a three-state pump.
    pub low_max: u8,
}

impl Default for PumpPolicy {
    fn default() -> Self {
        Self {
            mode: PumpMode::default(),
            low_max: 50,
        }
    }
}

impl PumpPolicy {
    /// Thresholds that leave both `low` and `high` reachable.
    pub const LOW_MAX_RANGE: RangeInclusive<u8> = 1..=99;

    pub fn two_state() -> Self {
        Self {
            mode: PumpMode::TwoState,
            ..Self::default()
        }
    }

    pub fn three_state(low_max: u8) -> Self {
        Self {
            mode: PumpMode::ThreeState,
            low_max,
        }
    }

    /// Quantize a speed percentage to a pump state. Speeds above 100 clamp.
    pub fn speed_to_state(&self, speed: u8) -> PumpState {
        match (self.mode, speed) {
            (_, 0) => PumpState::Off,
            (PumpMode::TwoState, _) => PumpState::On,
            (PumpMode::ThreeState, s) if s <= self.low_max => PumpState::Low,
            (PumpMode::ThreeState, _) => PumpState::High,
        }
    }

    /// Representative speed for a reported state. `low` reports the top of
    /// its band so it quantizes back to itself.
    pub fn state_to_speed(&self, state: PumpState) -> u8 {
        match (self.mode, state) {
            (_, PumpState::Off) => 0,
            (PumpMode::ThreeState, PumpState::Low) => self.low_max.max(1),
            (PumpMode::TwoState, _) | (PumpMode::ThreeState, PumpState::On | PumpState::High) => {
                100
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PumpFanState {
    pub state: PumpState,
    pub speed: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PumpFan {
    selector: PumpSelector,
    number: u8,
    pub policy: PumpPolicy,
}

impl PumpFan {
    /// Pump `number` (1-5).
    pub fn new(number: u8, policy: PumpPolicy) -> Result<Self, CoreError> {
        let selector = PumpSelector::from_str(&number.to_string()).map_err(|_| {
            CoreError::Validation {
                field: "pump".into(),
                reason: format!("expected 1-5, got {number}"),
            }
        })?;
        Ok(Self {
            selector,
            number,
            policy,
        })
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    /// The write for a requested speed.
    pub fn command(&self, speed: u8) -> Command {
        Command::SetPump {
            pump: self.selector,
            state: self.policy.speed_to_state(speed.min(100)),
        }
    }
}

impl Accessory for PumpFan {
    /// `None` when the pump is not fitted or reports an unknown state.
    type State = Option<PumpFanState>;

    fn name(&self) -> String {
        format!("pump {}", self.number)
    }

    fn render(&self, status: &DeviceStatus) -> Option<PumpFanState> {
        let state = PumpState::from_str(status.pump(self.number)?).ok()?;
        Some(PumpFanState {
            state,
            speed: self.policy.state_to_speed(state),
        })
    }
}
