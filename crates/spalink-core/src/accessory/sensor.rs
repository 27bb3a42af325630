//! Water chemistry sensors (pH and ORP).

use serde::Serialize;

use spalink_api::DeviceStatus;

use super::Accessory;

/// How worried a reading's qualitative status should make you.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Severity {
    /// Map the remote's free-text status onto a severity.
    pub fn from_status(status: &str) -> Self {
        let status = status.trim().to_ascii_lowercase();
        match status.as_str() {
            "ok" | "good" | "normal" | "ideal" | "in range" => Self::Ok,
            "low" | "high" | "caution" | "warning" => Self::Warning,
            "very low" | "very high" | "too low" | "too high" | "critical" | "danger" | "alert" => {
                Self::Critical
            }
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChemistryKind {
    Ph,
    Orp,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChemistryReading {
    pub value: f64,
    pub status: Option<String>,
    pub severity: Severity,
    /// The reading came from a dedicated probe.
    pub probe: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChemistrySensor {
    pub kind: ChemistryKind,
}

impl ChemistrySensor {
    pub fn new(kind: ChemistryKind) -> Self {
        Self { kind }
    }
}

impl Accessory for ChemistrySensor {
    /// `None` when the unit reports no value.
    type State = Option<ChemistryReading>;

    fn name(&self) -> String {
        match self.kind {
            ChemistryKind::Ph => "pH".into(),
            ChemistryKind::Orp => "ORP".into(),
        }
    }

    fn render(&self, status: &DeviceStatus) -> Option<ChemistryReading> {
        let (probe, probe_status, base, base_status) = match self.kind {
            ChemistryKind::Ph => (
                status.probe_ph,
                &status.probe_ph_status,
                status.ph,
                &status.ph_status,
            ),
            ChemistryKind::Orp => (
                status.probe_orp,
                &status.probe_orp_status,
                status.orp,
                &status.orp_status,
            ),
        };

        let (value, text, from_probe) = match (probe, base) {
            (Some(value), _) => (value, probe_status.clone(), true),
            (None, Some(value)) => (value, base_status.clone(), false),
            (None, None) => return None,
        };

        Some(ChemistryReading {
            value,
            severity: text
                .as_deref()
                .map_or(Severity::Unknown, Severity::from_status),
            status: text,
            probe: from_probe,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn severity_mapping() {
        assert_eq!(Severity::from_status("OK"), Severity::Ok);
        assert_eq!(Severity::from_status(" Low "), Severity::Warning);
        assert_eq!(Severity::from_status("VERY HIGH"), Severity::Critical);
        assert_eq!(Severity::from_status("calibrating"), Severity::Unknown);
    }

    #[test]
    fn probe_reading_wins() {
        let status = DeviceStatus {
            ph: Some(7.2),
            ph_status: Some("OK".into()),
            probe_ph: Some(7.9),
            probe_ph_status: Some("High".into()),
            ..DeviceStatus::default()
        };
        let reading = ChemistrySensor::new(ChemistryKind::Ph)
            .render(&status)
            .unwrap();
        assert!((reading.value - 7.9).abs() < f64::EPSILON);
        assert_eq!(reading.severity, Severity::Warning);
        assert!(reading.probe);
    }

    #[test]
    fn falls_back_to_controller_reading() {
        let status = DeviceStatus {
            orp: Some(400.0),
            ..DeviceStatus::default()
        };
        let reading = ChemistrySensor::new(ChemistryKind::Orp)
            .render(&status)
            .unwrap();
        assert_eq!(reading.status, None);
        assert_eq!(reading.severity, Severity::Unknown);
        assert!(!reading.probe);

        assert_eq!(
            ChemistrySensor::new(ChemistryKind::Ph).render(&status),
            None
        );
    }
}
