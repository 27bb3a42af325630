//! Watch command: one poller per accessory over one shared `Spa`.
//!
//! Every poller runs on its own interval; the shared status cache
//! coalesces their reads. Each state change is printed as it happens
//! until Ctrl-C or `--count` changes.

use std::time::Duration;

use chrono::Local;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use spalink_core::accessory::{
    ChemistryKind, ChemistryReading, ChemistrySensor, PollerHandle, PumpFan, PumpFanState,
    Severity, Switch, Thermostat, ThermostatState, spawn_poller,
};
use spalink_core::Spa;

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::config::Session;
use crate::error::CliError;
use crate::output;

/// Turns a rendered accessory state into display text, or `None` when
/// the unit does not report it.
type Describe<S> = fn(&S) -> Option<(String, Option<Severity>)>;

#[derive(Debug, Serialize)]
struct Change {
    time: String,
    accessory: String,
    state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    severity: Option<Severity>,
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    spa: &Spa,
    session: &Session,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    // Surface config and connectivity errors before starting the pollers.
    spa.status().await?;

    let interval = args
        .interval
        .map_or_else(|| session.poll_interval(), |s| Duration::from_secs(s.max(1)));
    let cancel = CancellationToken::new();
    let (tx, mut changes) = mpsc::unbounded_channel();
    let mut tasks = Vec::new();

    let profile = &session.profile;
    let thermostat = Thermostat::new(profile.temperature_unit);
    tasks.push(forward(
        spawn_poller(spa.clone(), thermostat, interval, cancel.clone()),
        describe_thermostat,
        tx.clone(),
        cancel.clone(),
    ));
    for switch in Switch::all() {
        tasks.push(forward(
            spawn_poller(spa.clone(), switch, interval, cancel.clone()),
            describe_switch,
            tx.clone(),
            cancel.clone(),
        ));
    }
    for fan in (1..=5).filter_map(|n| PumpFan::new(n, profile.pump_policy(n)).ok()) {
        tasks.push(forward(
            spawn_poller(spa.clone(), fan, interval, cancel.clone()),
            describe_pump,
            tx.clone(),
            cancel.clone(),
        ));
    }
    for sensor in [ChemistryKind::Ph, ChemistryKind::Orp].map(ChemistrySensor::new) {
        tasks.push(forward(
            spawn_poller(spa.clone(), sensor, interval, cancel.clone()),
            describe_chemistry,
            tx.clone(),
            cancel.clone(),
        ));
    }
    drop(tx);

    info!(accessories = tasks.len(), interval = ?interval, "watch started");

    let color = output::should_color(global.color);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut printed = 0usize;

    loop {
        tokio::select! {
            biased;
            _ = &mut ctrl_c => break,
            change = changes.recv() => {
                let Some(change) = change else { break };
                print_change(&change, session.output, color, global.quiet);
                printed += 1;
                if args.count.is_some_and(|n| printed >= n) {
                    break;
                }
            }
        }
    }

    cancel.cancel();
    for task in tasks {
        if let Err(e) = task.await {
            warn!(error = %e, "watch task failed");
        }
    }
    info!(changes = printed, "watch stopped");
    Ok(())
}

/// Relay each change of one poller's state onto `tx` until cancelled,
/// then wait for the poller to exit.
fn forward<S>(
    poller: PollerHandle<S>,
    describe: Describe<S>,
    tx: mpsc::UnboundedSender<Change>,
    cancel: CancellationToken,
) -> JoinHandle<()>
where
    S: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let mut state = poller.subscribe();
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                changed = state.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let described = state.borrow_and_update().as_ref().and_then(describe);
                    if let Some((text, severity)) = described {
                        let change = Change {
                            time: Local::now().format("%H:%M:%S").to_string(),
                            accessory: poller.name().to_owned(),
                            state: text,
                            severity,
                        };
                        if tx.send(change).is_err() {
                            break;
                        }
                    }
                }
            }
        }
        poller.join().await;
    })
}

fn print_change(change: &Change, format: OutputFormat, color: bool, quiet: bool) {
    let out = match format {
        // One object per line so the stream stays parseable.
        OutputFormat::Json | OutputFormat::JsonCompact => output::render_json(change, true),
        other => output::render_single(
            other,
            change,
            |c| {
                let state = match c.severity {
                    Some(severity) => output::paint_severity(&c.state, severity, color),
                    None => c.state.clone(),
                };
                format!("{}  {:<10} {state}", c.time, c.accessory)
            },
            |c| format!("{}\t{}", c.accessory, c.state),
        ),
    };
    output::print_output(&out, quiet);
}

// ── Describers ──────────────────────────────────────────────────────

fn describe_thermostat(state: &ThermostatState) -> Option<(String, Option<Severity>)> {
    if state.current.is_none() && state.target.is_none() {
        return None;
    }
    let symbol = state.unit.symbol();
    let show = |v: Option<f64>| v.map_or_else(|| "-".into(), |v| format!("{v:.1}{symbol}"));
    let heating = if state.heating { ", heating" } else { "" };
    Some((
        format!("{} (target {}{heating})", show(state.current), show(state.target)),
        None,
    ))
}

#[allow(clippy::ref_option)]
fn describe_switch(state: &Option<bool>) -> Option<(String, Option<Severity>)> {
    state.map(|on| (if on { "on" } else { "off" }.to_owned(), None))
}

#[allow(clippy::ref_option)]
fn describe_pump(state: &Option<PumpFanState>) -> Option<(String, Option<Severity>)> {
    state
        .as_ref()
        .map(|p| (format!("{} ({}%)", p.state, p.speed), None))
}

#[allow(clippy::ref_option)]
fn describe_chemistry(state: &Option<ChemistryReading>) -> Option<(String, Option<Severity>)> {
    state.as_ref().map(|r| {
        let text = match r.status {
            Some(ref status) => format!("{} ({status})", r.value),
            None => r.value.to_string(),
        };
        (text, Some(r.severity))
    })
}

#[cfg(test)]
mod tests {
    use spalink_core::PumpState;
    use spalink_core::accessory::TemperatureUnit;

    use super::*;

    #[test]
    fn thermostat_description() {
        let state = ThermostatState {
            current: Some(38.0),
            target: Some(40.0),
            unit: TemperatureUnit::Celsius,
            heating: true,
        };
        assert_eq!(
            describe_thermostat(&state),
            Some(("38.0°C (target 40.0°C, heating)".into(), None))
        );

        let empty = ThermostatState {
            current: None,
            target: None,
            unit: TemperatureUnit::Fahrenheit,
            heating: false,
        };
        assert_eq!(describe_thermostat(&empty), None);
    }

    #[test]
    fn unreported_accessories_are_skipped() {
        assert_eq!(describe_switch(&None), None);
        assert_eq!(describe_pump(&None), None);
        assert_eq!(describe_chemistry(&None), None);
    }

    #[test]
    fn reported_accessories_are_described() {
        assert_eq!(describe_switch(&Some(true)), Some(("on".into(), None)));
        assert_eq!(
            describe_pump(&Some(PumpFanState {
                state: PumpState::High,
                speed: 100,
            })),
            Some(("high (100%)".into(), None))
        );
        assert_eq!(
            describe_chemistry(&Some(ChemistryReading {
                value: 650.0,
                status: Some("OK".into()),
                severity: Severity::Ok,
                probe: true,
            })),
            Some(("650 (OK)".into(), Some(Severity::Ok)))
        );
    }
}
