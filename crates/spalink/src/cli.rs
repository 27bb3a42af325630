//! Clap derive structures for the `spalink` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. This
//! file is also compiled by `build.rs` for man pages, so it depends on
//! clap alone.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// spalink -- monitor and control a networked hot tub
#[derive(Debug, Parser)]
#[command(
    name = "spalink",
    version,
    about = "Monitor and control a networked hot tub from the command line",
    long_about = "Talks to a hot-tub controller's REST API.\n\n\
        Status reads are cached and coalesced so several readers share one\n\
        request; writes are sent immediately and never cached.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Spa profile to use
    #[arg(long, short = 'p', env = "SPALINK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Spa API base URL (overrides profile)
    #[arg(long, short = 'e', env = "SPALINK_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// API key sent as X-API-KEY (overrides profile)
    #[arg(long, env = "SPALINK_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Serve cached status younger than this many milliseconds
    #[arg(long, env = "SPALINK_MIN_INTERVAL_MS", global = true)]
    pub min_interval_ms: Option<u64>,

    /// Per-request timeout in milliseconds
    #[arg(long, env = "SPALINK_TIMEOUT_MS", global = true)]
    pub timeout_ms: Option<u64>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "SPALINK_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Power {
    On,
    Off,
}

impl From<Power> for bool {
    fn from(p: Power) -> Self {
        p == Power::On
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum UnitArg {
    /// Fahrenheit
    F,
    /// Celsius
    C,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the current spa status
    #[command(alias = "st")]
    Status,

    /// Set the target water temperature
    #[command(alias = "temp")]
    Temperature(TemperatureArgs),

    /// Turn the lights on or off
    Lights {
        state: Power,
    },

    /// Set a pump (1-5 or all) to off, on, low or high
    Pump {
        /// Pump number (1-5) or "all"
        pump: String,
        /// off, on, low or high
        state: String,
    },

    /// Turn a blower (1, 2 or all) on or off
    Blower {
        /// Blower number (1-2) or "all"
        blower: String,
        /// on or off
        state: String,
    },

    /// Switch a named feature (easymode, sds, yess, fogger) on or off
    Toggle {
        /// easymode, sds, yess or fogger
        name: String,
        state: Power,
    },

    /// Trigger the boost action
    Boost,

    /// Poll every accessory and print each state change
    Watch(WatchArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONTROL
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TemperatureArgs {
    /// Target temperature in the display unit
    #[arg(allow_negative_numbers = true)]
    pub value: f64,

    /// Unit of VALUE (defaults to the profile's temperature_unit)
    #[arg(long, short = 'u')]
    pub unit: Option<UnitArg>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  WATCH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Seconds between polls of each accessory (defaults to the profile)
    #[arg(long, short = 'i')]
    pub interval: Option<u64>,

    /// Exit after printing this many changes
    #[arg(long, short = 'n')]
    pub count: Option<usize>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create a config file with guided setup
    Init,

    /// Display the current configuration (secrets masked)
    Show,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store an API key in the system keyring
    SetKey {
        /// Profile name (defaults to the active profile)
        name: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
