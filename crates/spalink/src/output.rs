//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one line per item.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use spalink_core::accessory::Severity;

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Paint `text` by how alarming `severity` is.
pub fn paint_severity(text: &str, severity: Severity, color: bool) -> String {
    if !color {
        return text.to_owned();
    }
    match severity {
        Severity::Ok => text.green().to_string(),
        Severity::Warning => text.yellow().to_string(),
        Severity::Critical => text.red().bold().to_string(),
        Severity::Unknown => text.dimmed().to_string(),
    }
}

pub fn paint_on_off(on: bool, color: bool) -> String {
    let text = if on { "on" } else { "off" };
    match (on, color) {
        (_, false) => text.to_owned(),
        (true, true) => text.green().to_string(),
        (false, true) => text.dimmed().to_string(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses `table_fn`; plain rendering uses `plain_fn`.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    table_fn: impl Fn(&T) -> String,
    plain_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize + ?Sized,
{
    match format {
        OutputFormat::Table => table_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => plain_fn(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.unwrap_or_else(|e| format!("{{\"error\":\"serialization failed: {e}\"}}"))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_else(|e| format!("error: serialization failed: {e}"))
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::*;

    #[derive(Serialize)]
    struct Sample {
        name: &'static str,
        temp: f64,
    }

    const SAMPLE: Sample = Sample {
        name: "spa",
        temp: 101.5,
    };

    #[test]
    fn structured_formats_use_serde() {
        let json = render_single(OutputFormat::JsonCompact, &SAMPLE, |_| String::new(), |_| String::new());
        assert_eq!(json, r#"{"name":"spa","temp":101.5}"#);

        let yaml = render_single(OutputFormat::Yaml, &SAMPLE, |_| String::new(), |_| String::new());
        assert_eq!(yaml, "name: spa\ntemp: 101.5\n");
    }

    #[test]
    fn table_and_plain_use_callbacks() {
        let table = render_single(OutputFormat::Table, &SAMPLE, |s| format!("T {}", s.name), |_| String::new());
        assert_eq!(table, "T spa");
        let plain = render_single(OutputFormat::Plain, &SAMPLE, |_| String::new(), |s| s.temp.to_string());
        assert_eq!(plain, "101.5");
    }

    #[test]
    fn no_color_leaves_text_alone() {
        assert_eq!(paint_severity("7.4", Severity::Critical, false), "7.4");
        assert_eq!(paint_on_off(true, false), "on");
        assert_ne!(paint_severity("7.4", Severity::Critical, true), "7.4");
    }
}
