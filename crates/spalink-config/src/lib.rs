//! Shared configuration for spalink.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `spalink_core::SpaConfig`. Core never reads files;
//! the CLI layers its flag overrides on top of what this crate resolves.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use spalink_core::SpaConfig;
use spalink_core::accessory::{PumpMode, PumpPolicy, TemperatureUnit};

/// Keyring service name all secrets are stored under.
pub const KEYRING_SERVICE: &str = "spalink";

/// Prefix for environment overrides. Nested keys use `__`,
/// e.g. `SPALINK_DEFAULTS__TIMEOUT_MS`.
pub const ENV_PREFIX: &str = "SPALINK_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found (available: {available})")]
    ProfileNotFound { name: String, available: String },

    #[error("keyring error: {0}")]
    Keyring(String),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named spa profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Resolve the active profile name: explicit choice, then `default_profile`.
    pub fn active_profile_name(&self, requested: Option<&str>) -> String {
        requested
            .map(ToOwned::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound {
                name: name.into(),
                available: self.available_profiles(),
            })
    }

    /// Reject values that parse but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, profile) in &self.profiles {
            profile.validate(name)?;
        }
        Ok(())
    }

    /// Comma-separated profile names, or `(none)`.
    pub fn available_profiles(&self) -> String {
        if self.profiles.is_empty() {
            "(none)".into()
        } else {
            self.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub min_interval_ms: u64,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            min_interval_ms: 0,
            timeout_ms: default_timeout_ms(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout_ms() -> u64 {
    u64::try_from(SpaConfig::DEFAULT_TIMEOUT.as_millis()).unwrap_or(5000)
}
fn default_poll_interval_secs() -> u64 {
    30
}

/// A named spa profile.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Base URL of the spa API (e.g., "http://spa.local:8080/api").
    pub endpoint: String,

    /// API key (plaintext; prefer keyring or env var).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_interval_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,

    #[serde(default)]
    pub temperature_unit: TemperatureUnit,

    /// Per-pump mode, keyed by pump number ("1".."5"). Unlisted pumps
    /// are three-state.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pump_modes: BTreeMap<String, PumpMode>,

    /// Highest fan speed that maps to `low` on three-state pumps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pump_low_max: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_interval_secs: Option<u64>,
}

impl Profile {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            api_key_env: None,
            min_interval_ms: None,
            timeout_ms: None,
            temperature_unit: TemperatureUnit::default(),
            pump_modes: BTreeMap::new(),
            pump_low_max: None,
            poll_interval_secs: None,
        }
    }

    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        let Some(low_max) = self.pump_low_max else {
            return Ok(());
        };
        if !PumpPolicy::LOW_MAX_RANGE.contains(&low_max) {
            return Err(ConfigError::Validation {
                field: format!("profiles.{name}.pump_low_max"),
                reason: format!(
                    "must be between {} and {}, got {low_max}",
                    PumpPolicy::LOW_MAX_RANGE.start(),
                    PumpPolicy::LOW_MAX_RANGE.end(),
                ),
            });
        }
        Ok(())
    }

    /// Speed quantization policy for pump `number`.
    pub fn pump_policy(&self, number: u8) -> PumpPolicy {
        let mode = self
            .pump_modes
            .get(&number.to_string())
            .copied()
            .unwrap_or_default();
        let base = PumpPolicy::default();
        PumpPolicy {
            mode,
            low_max: self.pump_low_max.unwrap_or(base.low_max),
        }
    }

    pub fn min_interval(&self, defaults: &Defaults) -> Duration {
        Duration::from_millis(self.min_interval_ms.unwrap_or(defaults.min_interval_ms))
    }

    pub fn timeout(&self, defaults: &Defaults) -> Duration {
        Duration::from_millis(self.timeout_ms.unwrap_or(defaults.timeout_ms))
    }

    pub fn poll_interval(&self, defaults: &Defaults) -> Duration {
        Duration::from_secs(
            self.poll_interval_secs
                .unwrap_or(defaults.poll_interval_secs)
                .max(1),
        )
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "spalink", "spalink").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("spalink");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit path. A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist or is invalid.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credentials ─────────────────────────────────────────────────────

fn keyring_user(profile_name: &str) -> String {
    format!("{profile_name}/api-key")
}

/// Resolve an API key from the credential chain (no CLI flag step).
pub fn resolve_api_key(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's api_key_env → env var lookup
    if let Some(ref env_name) = profile.api_key_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name)) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref key) = profile.api_key {
        return Ok(SecretString::from(key.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a profile's API key in the system keyring.
pub fn store_api_key(profile_name: &str, key: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name))
        .map_err(|e| ConfigError::Keyring(format!("failed to access keyring: {e}")))?;
    entry
        .set_password(key)
        .map_err(|e| ConfigError::Keyring(format!("failed to store API key: {e}")))
}

// ── Translation to core ─────────────────────────────────────────────

/// Parse and validate an endpoint URL.
pub fn parse_endpoint(raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "endpoint".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "endpoint".into(),
            reason: format!("expected an http or https URL, got '{raw}'"),
        });
    }
    Ok(url)
}

/// Build a `SpaConfig` from a profile, with no CLI flag overrides.
pub fn profile_to_spa_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<SpaConfig, ConfigError> {
    let endpoint = parse_endpoint(&profile.endpoint)?;
    let api_key = resolve_api_key(profile, profile_name)?;

    Ok(SpaConfig::new(endpoint, api_key)
        .with_min_interval(profile.min_interval(defaults))
        .with_timeout(profile.timeout(defaults)))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;
    use spalink_core::PumpState;

    use super::*;

    const SAMPLE: &str = r#"
default_profile = "backyard"

[defaults]
output = "json"
timeout_ms = 2500

[profiles.backyard]
endpoint = "http://spa.local:8080/api"
api_key = "plain-key"
min_interval_ms = 1500
temperature_unit = "c"
pump_low_max = 40

[profiles.backyard.pump_modes]
"2" = "two-state"

[profiles.cabin]
endpoint = "https://cabin.example.net"
"#;

    fn write_sample() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        (dir, path)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults, Defaults::default());
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn loads_profiles_and_defaults() {
        let (_dir, path) = write_sample();
        let cfg = load_config_from(&path).unwrap();

        assert_eq!(cfg.active_profile_name(None), "backyard");
        assert_eq!(cfg.active_profile_name(Some("cabin")), "cabin");
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.timeout_ms, 2500);
        assert_eq!(cfg.defaults.poll_interval_secs, 30);

        let backyard = cfg.profile("backyard").unwrap();
        assert_eq!(backyard.temperature_unit, TemperatureUnit::Celsius);
        assert_eq!(backyard.min_interval(&cfg.defaults), Duration::from_millis(1500));
        assert_eq!(backyard.timeout(&cfg.defaults), Duration::from_millis(2500));
        assert_eq!(backyard.pump_policy(2), PumpPolicy {
            mode: PumpMode::TwoState,
            low_max: 40,
        });
        assert_eq!(backyard.pump_policy(1), PumpPolicy::three_state(40));

        let cabin = cfg.profile("cabin").unwrap();
        assert_eq!(cabin.temperature_unit, TemperatureUnit::Fahrenheit);
        assert_eq!(cabin.pump_policy(1), PumpPolicy::default());
    }

    #[test]
    fn pump_low_max_must_leave_both_bands_reachable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        for bad in [0, 100, 255] {
            std::fs::write(
                &path,
                format!("[profiles.backyard]\nendpoint = \"http://spa.local\"\npump_low_max = {bad}\n"),
            )
            .unwrap();
            match load_config_from(&path).unwrap_err() {
                ConfigError::Validation { field, reason } => {
                    assert_eq!(field, "profiles.backyard.pump_low_max");
                    assert!(reason.contains(&bad.to_string()), "{reason}");
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }

        for good in [1, 99] {
            std::fs::write(
                &path,
                format!("[profiles.backyard]\nendpoint = \"http://spa.local\"\npump_low_max = {good}\n"),
            )
            .unwrap();
            let cfg = load_config_from(&path).unwrap();
            let policy = cfg.profile("backyard").unwrap().pump_policy(1);
            assert_eq!(policy.speed_to_state(policy.state_to_speed(PumpState::Low)), PumpState::Low);
            assert_eq!(policy.speed_to_state(100), PumpState::High);
        }
    }

    #[test]
    fn unknown_profile_lists_alternatives() {
        let (_dir, path) = write_sample();
        let cfg = load_config_from(&path).unwrap();
        match cfg.profile("garage").unwrap_err() {
            ConfigError::ProfileNotFound { name, available } => {
                assert_eq!(name, "garage");
                assert_eq!(available, "backyard, cabin");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn save_then_load_preserves_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut profile = Profile::new("http://10.0.0.5/api");
        profile.api_key_env = Some("SPA_KEY".into());
        profile.pump_modes.insert("1".into(), PumpMode::TwoState);
        let mut cfg = Config::default();
        cfg.profiles.insert("default".into(), profile);

        save_config_to(&cfg, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.contains("api_key ="), "{text}");

        assert_eq!(load_config_from(&path).unwrap(), cfg);
    }

    #[test]
    fn profile_translates_to_spa_config() {
        let (_dir, path) = write_sample();
        let cfg = load_config_from(&path).unwrap();
        let spa = profile_to_spa_config(cfg.profile("backyard").unwrap(), "backyard", &cfg.defaults)
            .unwrap();

        assert_eq!(spa.endpoint.as_str(), "http://spa.local:8080/api");
        assert_eq!(spa.api_key.expose_secret(), "plain-key");
        assert_eq!(spa.min_interval, Duration::from_millis(1500));
        assert_eq!(spa.timeout, Duration::from_millis(2500));
    }

    #[test]
    fn api_key_env_takes_precedence_over_plaintext() {
        // Cargo sets CARGO_PKG_NAME for every test binary it runs.
        let mut profile = Profile::new("http://spa.local");
        profile.api_key = Some("plain-key".into());
        profile.api_key_env = Some("CARGO_PKG_NAME".into());
        let key = resolve_api_key(&profile, "spalink-config-test-env").unwrap();
        assert_eq!(key.expose_secret(), "spalink-config");
    }

    #[test]
    fn missing_credentials_is_an_error() {
        let mut profile = Profile::new("http://spa.local");
        profile.api_key_env = Some("SPALINK_TEST_UNSET_VARIABLE".into());
        let err = resolve_api_key(&profile, "spalink-config-test-none").unwrap_err();
        assert!(matches!(err, ConfigError::NoCredentials { .. }));
    }

    #[test]
    fn endpoint_must_be_http() {
        assert!(parse_endpoint("http://spa.local:8080").is_ok());
        assert!(parse_endpoint("https://spa.example.net/api").is_ok());
        assert!(parse_endpoint("spa.local").is_err());
        assert!(parse_endpoint("ftp://spa.local").is_err());
    }
}
