//! Status command handler.

use tabled::Tabled;

use spalink_core::accessory::{
    Accessory, ChemistryKind, ChemistryReading, ChemistrySensor, PumpFan, Switch, Thermostat,
};
use spalink_core::{DeviceStatus, Spa};

use crate::cli::GlobalOpts;
use crate::config::{Profile, Session};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Debug, Tabled)]
struct StatusRow {
    #[tabled(rename = "Control")]
    control: String,
    #[tabled(rename = "State")]
    state: String,
}

impl StatusRow {
    fn new(control: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            control: control.into(),
            state: state.into(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(spa: &Spa, session: &Session, global: &GlobalOpts) -> Result<(), CliError> {
    let status = spa.status().await?;
    let color = output::should_color(global.color);

    let out = output::render_single(
        session.output,
        status.as_ref(),
        |s| output::render_table(&status_rows(s, &session.profile, color)),
        |s| {
            status_rows(s, &session.profile, false)
                .into_iter()
                .map(|row| format!("{}\t{}", row.control, row.state))
                .collect::<Vec<_>>()
                .join("\n")
        },
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Row building ────────────────────────────────────────────────────

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

fn temperature(value: Option<f64>, symbol: &str) -> String {
    value.map_or_else(|| "-".into(), |v| format!("{v:.1}{symbol}"))
}

fn chemistry(reading: &ChemistryReading, color: bool) -> String {
    let text = match reading.status {
        Some(ref status) => format!("{} ({status})", reading.value),
        None => reading.value.to_string(),
    };
    output::paint_severity(&text, reading.severity, color)
}

/// One row per reported control. Features the unit does not report are
/// left out.
fn status_rows(status: &DeviceStatus, profile: &Profile, color: bool) -> Vec<StatusRow> {
    let mut rows = Vec::new();

    if let Some(connected) = status.connected {
        rows.push(StatusRow::new("connected", yes_no(connected)));
    }

    let thermostat = Thermostat::new(profile.temperature_unit).render(status);
    let symbol = thermostat.unit.symbol();
    rows.push(StatusRow::new("water", temperature(thermostat.current, symbol)));
    rows.push(StatusRow::new("target", temperature(thermostat.target, symbol)));
    rows.push(StatusRow::new("heating", yes_no(thermostat.heating)));

    for switch in Switch::all() {
        if let Some(on) = switch.render(status) {
            rows.push(StatusRow::new(switch.name(), output::paint_on_off(on, color)));
        }
    }

    for fan in (1..=5).filter_map(|n| PumpFan::new(n, profile.pump_policy(n)).ok()) {
        if let Some(pump) = fan.render(status) {
            rows.push(StatusRow::new(
                fan.name(),
                format!("{} ({}%)", pump.state, pump.speed),
            ));
        }
    }

    for sensor in [ChemistryKind::Ph, ChemistryKind::Orp].map(ChemistrySensor::new) {
        if let Some(reading) = sensor.render(status) {
            rows.push(StatusRow::new(sensor.name(), chemistry(&reading, color)));
        }
    }

    rows
}
