//! CLI configuration: thin wrapper around `spalink_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--endpoint, --api-key, --min-interval-ms, --timeout-ms, --output).

use std::time::Duration;

use clap::ValueEnum;
use secrecy::SecretString;

use spalink_core::SpaConfig;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use spalink_config::{
    Config, Defaults, Profile, config_path, load_config, load_config_or_default, save_config,
};

/// Everything a spa-bound command needs after config resolution.
#[derive(Debug)]
pub struct Session {
    pub profile_name: String,
    /// The profile's settings, or a flags-only stand-in when none exists.
    pub profile: Profile,
    pub defaults: Defaults,
    pub spa: SpaConfig,
    pub output: OutputFormat,
}

impl Session {
    pub fn poll_interval(&self) -> Duration {
        self.profile.poll_interval(&self.defaults)
    }
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// `--output`, else the config default, else table.
pub fn output_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    global.output.unwrap_or_else(|| {
        OutputFormat::from_str(&config.defaults.output, true).unwrap_or_default()
    })
}

/// Build a `Session` from the config file, profile, and CLI overrides.
pub fn resolve_session(global: &GlobalOpts, config: &Config) -> Result<Session, CliError> {
    let profile_name = active_profile_name(global, config);

    let profile = match config.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        // An explicitly requested profile must exist.
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: config.available_profiles(),
            });
        }
        // No profile: try to run from flags / env vars alone.
        None => {
            let endpoint = global.endpoint.as_deref().ok_or_else(|| CliError::NoConfig {
                path: config_path().display().to_string(),
            })?;
            Profile::new(endpoint)
        }
    };

    // 1. Endpoint (flag > env > profile)
    let endpoint = spalink_config::parse_endpoint(
        global.endpoint.as_deref().unwrap_or(&profile.endpoint),
    )?;

    // 2. API key (flag > profile chain)
    let api_key = match global.api_key {
        Some(ref key) => SecretString::from(key.clone()),
        None => spalink_config::resolve_api_key(&profile, &profile_name)?,
    };

    // 3. Cache window and timeout (flag > profile > defaults)
    let min_interval = global
        .min_interval_ms
        .map_or_else(|| profile.min_interval(&config.defaults), Duration::from_millis);
    let timeout = global
        .timeout_ms
        .map_or_else(|| profile.timeout(&config.defaults), Duration::from_millis);

    let spa = SpaConfig::new(endpoint, api_key)
        .with_min_interval(min_interval)
        .with_timeout(timeout);

    Ok(Session {
        profile_name,
        profile,
        defaults: config.defaults.clone(),
        spa,
        output: output_format(global, config),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use clap::Parser;
    use secrecy::ExposeSecret;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["spalink"];
        argv.extend_from_slice(args);
        argv.push("status");
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config_with_profile() -> Config {
        let mut profile = Profile::new("http://spa.local/api");
        profile.api_key = Some("profile-key".into());
        profile.min_interval_ms = Some(2000);
        let mut cfg = Config::default();
        cfg.defaults.output = "yaml".into();
        cfg.profiles.insert("default".into(), profile);
        cfg
    }

    #[test]
    fn profile_values_apply_without_flags() {
        let session = resolve_session(&global(&[]), &config_with_profile()).unwrap();
        assert_eq!(session.profile_name, "default");
        assert_eq!(session.spa.endpoint.as_str(), "http://spa.local/api");
        assert_eq!(session.spa.api_key.expose_secret(), "profile-key");
        assert_eq!(session.spa.min_interval, Duration::from_millis(2000));
        assert_eq!(session.spa.timeout, Duration::from_millis(5000));
        assert_eq!(session.output, OutputFormat::Yaml);
    }

    #[test]
    fn flags_override_profile() {
        let opts = global(&[
            "--endpoint",
            "http://10.0.0.9:8080",
            "--api-key",
            "flag-key",
            "--min-interval-ms",
            "0",
            "--timeout-ms",
            "750",
            "-o",
            "plain",
        ]);
        let session = resolve_session(&opts, &config_with_profile()).unwrap();
        assert_eq!(session.spa.endpoint.as_str(), "http://10.0.0.9:8080/");
        assert_eq!(session.spa.api_key.expose_secret(), "flag-key");
        assert_eq!(session.spa.min_interval, Duration::ZERO);
        assert_eq!(session.spa.timeout, Duration::from_millis(750));
        assert_eq!(session.output, OutputFormat::Plain);
    }

    #[test]
    fn flags_alone_are_enough() {
        let opts = global(&["--endpoint", "http://spa.local", "--api-key", "k"]);
        let session = resolve_session(&opts, &Config::default()).unwrap();
        assert_eq!(session.profile.endpoint, "http://spa.local");
        assert_eq!(session.output, OutputFormat::Table);
    }

    #[test]
    fn missing_endpoint_is_no_config() {
        let err = resolve_session(&global(&[]), &Config::default()).unwrap_err();
        assert!(matches!(err, CliError::NoConfig { .. }));
    }

    #[test]
    fn requested_profile_must_exist() {
        let opts = global(&["--profile", "cabin", "--endpoint", "http://spa.local"]);
        let err = resolve_session(&opts, &config_with_profile()).unwrap_err();
        assert!(matches!(err, CliError::ProfileNotFound { ref name, .. } if name == "cabin"));
    }
}
