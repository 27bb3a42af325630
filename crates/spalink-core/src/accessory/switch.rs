//! On/off switches: lights, blowers and the named toggles.

use spalink_api::{BlowerSelector, DeviceStatus, Toggle};

use super::Accessory;
use crate::command::Command;
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchKind {
    Lights,
    Blower1,
    Blower2,
    Toggle(Toggle),
}

impl SwitchKind {
    /// A single blower, numbered 1 or 2.
    pub fn blower(n: u8) -> Result<Self, CoreError> {
        match n {
            1 => Ok(Self::Blower1),
            2 => Ok(Self::Blower2),
            _ => Err(CoreError::Validation {
                field: "blower".into(),
                reason: format!("expected 1 or 2, got {n}"),
            }),
        }
    }
}

/// Read `on` (any case) as on and `off` as off; anything else is unknown.
pub fn parse_on_off(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("on") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("off") {
        Some(false)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Switch {
    pub kind: SwitchKind,
}

impl Switch {
    pub fn new(kind: SwitchKind) -> Self {
        Self { kind }
    }

    /// Every switch a fully equipped unit can expose.
    pub fn all() -> Vec<Self> {
        [
            SwitchKind::Lights,
            SwitchKind::Blower1,
            SwitchKind::Blower2,
            SwitchKind::Toggle(Toggle::Easymode),
            SwitchKind::Toggle(Toggle::Sds),
            SwitchKind::Toggle(Toggle::Yess),
            SwitchKind::Toggle(Toggle::Fogger),
        ]
        .into_iter()
        .map(Self::new)
        .collect()
    }

    pub fn command(&self, on: bool) -> Command {
        match self.kind {
            SwitchKind::Lights => Command::SetLights { on },
            SwitchKind::Blower1 => Command::SetBlower {
                blower: BlowerSelector::One,
                on,
            },
            SwitchKind::Blower2 => Command::SetBlower {
                blower: BlowerSelector::Two,
                on,
            },
            SwitchKind::Toggle(toggle) => Command::SetToggle { toggle, on },
        }
    }
}

impl Accessory for Switch {
    /// `None` when the unit does not report this switch.
    type State = Option<bool>;

    fn name(&self) -> String {
        match self.kind {
            SwitchKind::Lights => "lights".into(),
            SwitchKind::Blower1 => "blower 1".into(),
            SwitchKind::Blower2 => "blower 2".into(),
            SwitchKind::Toggle(toggle) => toggle.to_string(),
        }
    }

    fn render(&self, status: &DeviceStatus) -> Option<bool> {
        let raw = match self.kind {
            SwitchKind::Lights => status.lights.as_deref(),
            SwitchKind::Blower1 => status.blower(1),
            SwitchKind::Blower2 => status.blower(2),
            SwitchKind::Toggle(toggle) => status.toggle(toggle),
        };
        raw.and_then(parse_on_off)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_reads_raw_strings() {
        let status = DeviceStatus {
            lights: Some("ON".into()),
            blower2: Some("off".into()),
            sds: Some("broken".into()),
            ..DeviceStatus::default()
        };
        assert_eq!(Switch::new(SwitchKind::Lights).render(&status), Some(true));
        assert_eq!(Switch::new(SwitchKind::Blower2).render(&status), Some(false));
        assert_eq!(Switch::new(SwitchKind::Blower1).render(&status), None);
        assert_eq!(
            Switch::new(SwitchKind::Toggle(Toggle::Sds)).render(&status),
            None
        );
    }

    #[test]
    fn command_targets_the_right_control() {
        assert_eq!(
            Switch::new(SwitchKind::Blower2).command(true),
            Command::SetBlower {
                blower: BlowerSelector::Two,
                on: true,
            }
        );
        assert_eq!(
            Switch::new(SwitchKind::Toggle(Toggle::Fogger)).command(false),
            Command::SetToggle {
                toggle: Toggle::Fogger,
                on: false,
            }
        );
    }

    #[test]
    fn blower_number_is_validated() {
        assert_eq!(SwitchKind::blower(1), Ok(SwitchKind::Blower1));
        assert!(SwitchKind::blower(3).is_err());
    }

    #[test]
    fn names_are_stable() {
        let names: Vec<String> = Switch::all().iter().map(Accessory::name).collect();
        assert_eq!(
            names,
            ["lights", "blower 1", "blower 2", "easymode", "sds", "yess", "fogger"]
        );
    }
}
