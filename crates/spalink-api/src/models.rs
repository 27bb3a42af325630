// Wire models for the spa control API.
//
// `DeviceStatus` mirrors the `/status` body. Every field is optional
// because installed equipment varies per unit; absence means "not fitted".
// Selector enums double as URL path segments and request-body values.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Last-known remote state, as returned by `GET /status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStatus {
    /// Whether the controller currently reaches the spa.
    pub connected: Option<bool>,

    pub current_temp_f: Option<f64>,
    pub target_temp_f: Option<f64>,

    pub lights: Option<String>,

    /// Pumps 1-5: `off`, `on`, `low` or `high`.
    pub pump1: Option<String>,
    pub pump2: Option<String>,
    pub pump3: Option<String>,
    pub pump4: Option<String>,
    pub pump5: Option<String>,

    /// Blowers 1-2: `on` or `off`.
    pub blower1: Option<String>,
    pub blower2: Option<String>,

    pub easymode: Option<String>,
    pub sds: Option<String>,
    pub yess: Option<String>,
    pub fogger: Option<String>,

    pub ph: Option<f64>,
    pub ph_status: Option<String>,
    pub orp: Option<f64>,
    pub orp_status: Option<String>,

    /// Readings from a dedicated chemistry probe, when one is installed.
    pub probe_ph: Option<f64>,
    pub probe_ph_status: Option<String>,
    pub probe_orp: Option<f64>,
    pub probe_orp_status: Option<String>,

    /// Fields this client does not model, kept verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DeviceStatus {
    /// Raw state string of pump `n` (1-5).
    pub fn pump(&self, n: u8) -> Option<&str> {
        match n {
            1 => self.pump1.as_deref(),
            2 => self.pump2.as_deref(),
            3 => self.pump3.as_deref(),
            4 => self.pump4.as_deref(),
            5 => self.pump5.as_deref(),
            _ => None,
        }
    }

    /// Raw state string of blower `n` (1-2).
    pub fn blower(&self, n: u8) -> Option<&str> {
        match n {
            1 => self.blower1.as_deref(),
            2 => self.blower2.as_deref(),
            _ => None,
        }
    }

    /// Raw state string of a named toggle.
    pub fn toggle(&self, toggle: Toggle) -> Option<&str> {
        match toggle {
            Toggle::Easymode => self.easymode.as_deref(),
            Toggle::Sds => self.sds.as_deref(),
            Toggle::Yess => self.yess.as_deref(),
            Toggle::Fogger => self.fogger.as_deref(),
        }
    }
}

// ── Selectors ────────────────────────────────────────────────────────

/// Which pump a write targets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum PumpSelector {
    #[strum(serialize = "1")]
    One,
    #[strum(serialize = "2")]
    Two,
    #[strum(serialize = "3")]
    Three,
    #[strum(serialize = "4")]
    Four,
    #[strum(serialize = "5")]
    Five,
    #[strum(serialize = "all")]
    All,
}

/// Requested pump state.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PumpState {
    Off,
    On,
    Low,
    High,
}

/// Which blower a write targets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum BlowerSelector {
    #[strum(serialize = "1")]
    One,
    #[strum(serialize = "2")]
    Two,
    #[strum(serialize = "all")]
    All,
}

/// Named on/off features, each exposed at `/{name}`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Toggle {
    Easymode,
    Sds,
    Yess,
    Fogger,
}

/// Binary switch state as it appears on the wire.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OnOff {
    On,
    Off,
}

impl From<bool> for OnOff {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

impl From<OnOff> for bool {
    fn from(state: OnOff) -> Self {
        state == OnOff::On
    }
}

// ── Request bodies ───────────────────────────────────────────────────

/// Body of `PUT /temperature`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SetpointBody {
    #[serde(rename = "setpointF")]
    pub setpoint_f: f64,
}

/// Body of every `{state}` write.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StateBody<S> {
    pub state: S,
}
