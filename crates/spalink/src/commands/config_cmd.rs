//! Config subcommand handlers.

use dialoguer::{Input, Password, Select};

use spalink_core::accessory::TemperatureUnit;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt_api_key() -> Result<String, CliError> {
    let key = Password::new()
        .with_prompt("API key")
        .interact()
        .map_err(prompt_err)?;
    if key.is_empty() {
        return Err(CliError::Validation {
            field: "api_key".into(),
            reason: "API key cannot be empty".into(),
        });
    }
    Ok(key)
}

/// Copy of `cfg` with plaintext secrets replaced.
fn masked(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.api_key.is_some() {
            profile.api_key = Some("********".into());
        }
    }
    cfg
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let mut cfg = config::load_config_or_default();
            eprintln!("spalink configuration wizard");
            eprintln!("   Config path: {}\n", config::config_path().display());

            // 1. Profile name
            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            // 2. Endpoint
            let endpoint: String = Input::new()
                .with_prompt("Spa API URL (e.g. http://spa.local:8080)")
                .validate_with(|input: &String| {
                    spalink_config::parse_endpoint(input)
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                })
                .interact_text()
                .map_err(prompt_err)?;

            // 3. API key and where to keep it
            let key = prompt_api_key()?;
            let store_choices = &[
                "Store in system keyring (recommended)",
                "Save to config file (plaintext)",
            ];
            let store_selection = Select::new()
                .with_prompt("Where to store the API key?")
                .items(store_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;
            let api_key = if store_selection == 0 {
                spalink_config::store_api_key(&profile_name, &key)?;
                eprintln!("   ✓ API key stored in system keyring");
                None
            } else {
                Some(key)
            };

            // 4. Display unit
            let unit_selection = Select::new()
                .with_prompt("Temperature unit")
                .items(&["Fahrenheit", "Celsius"])
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            // 5. Build profile and write
            let mut profile = Profile::new(endpoint);
            profile.api_key = api_key;
            profile.temperature_unit = if unit_selection == 1 {
                TemperatureUnit::Celsius
            } else {
                TemperatureUnit::Fahrenheit
            };
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());

            let path = config::save_config(&cfg)?;
            eprintln!("\n✓ Configuration written to {}", path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: spalink status");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(
                config::output_format(global, &cfg),
                &masked(&cfg),
                |c| format!("{c:#?}"),
                |c| c.profiles.keys().cloned().collect::<Vec<_>>().join("\n"),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: spalink config init");
            } else {
                for (name, profile) in &cfg.profiles {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}\t{}", profile.endpoint);
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            cfg.profile(&name)?;

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        // ── SetKey ──────────────────────────────────────────────────
        ConfigCommand::SetKey { name } => {
            let cfg = config::load_config_or_default();
            let profile_name = name.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            cfg.profile(&profile_name)?;

            let key = prompt_api_key()?;
            spalink_config::store_api_key(&profile_name, &key)?;
            eprintln!("✓ API key stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_masks_plaintext_keys() {
        let mut cfg = Config::default();
        let mut with_key = Profile::new("http://spa.local");
        with_key.api_key = Some("secret-value".into());
        cfg.profiles.insert("a".into(), with_key);
        cfg.profiles.insert("b".into(), Profile::new("http://cabin.local"));

        let shown = masked(&cfg);
        assert_eq!(shown.profiles["a"].api_key.as_deref(), Some("********"));
        assert_eq!(shown.profiles["b"].api_key, None);
        assert_eq!(cfg.profiles["a"].api_key.as_deref(), Some("secret-value"));
    }
}
