//! Config subcommand handlers.

use dialoguer::{Input, Select};

use propdesk_config::{Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Helpers ─────────────────────────────────────────────────────────

fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

fn parse_number<T: std::str::FromStr>(field: &str, value: &str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: "must be a number".into(),
    })
}

/// Apply `key = value` to a profile.
fn set_profile_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "api_url" | "api-url" => {
            propdesk_config::parse_api_url(&value)?;
            profile.api_url = value;
        }
        "username" => profile.username = Some(value),
        "password_env" | "password-env" => profile.password_env = Some(value),
        "property" => profile.property = Some(parse_number("property", &value)?),
        "timeout" => profile.timeout = Some(parse_number("timeout", &value)?),
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: api_url, username, \
                     password_env, property, timeout"
                ),
            });
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("propdesk configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            // 1. Profile name
            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(util::prompt_err)?;

            // 2. API URL
            let api_url: String = Input::new()
                .with_prompt("API URL")
                .default("http://localhost:5000/api".into())
                .validate_with(|s: &String| {
                    propdesk_config::parse_api_url(s)
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                })
                .interact_text()
                .map_err(util::prompt_err)?;

            // 3. Username
            let username: String = Input::new()
                .with_prompt("Username")
                .interact_text()
                .map_err(util::prompt_err)?;

            // 4. Password storage
            let store_choices = &[
                "Store password in system keyring (recommended)",
                "Save to config file (plaintext)",
                "Don't store (prompt at login)",
            ];
            let store_selection = Select::new()
                .with_prompt("Where to store the password?")
                .items(store_choices)
                .default(0)
                .interact()
                .map_err(util::prompt_err)?;

            let password = match store_selection {
                0 => {
                    let secret = util::prompt_secret("Password: ")?;
                    propdesk_config::store_password(&profile_name, &secret)?;
                    eprintln!("   ✓ Password stored in system keyring");
                    None
                }
                1 => Some(util::prompt_secret("Password: ")?),
                _ => None,
            };

            // 5. Default property
            let property: String = Input::new()
                .with_prompt("Default property id (blank for none)")
                .allow_empty(true)
                .interact_text()
                .map_err(util::prompt_err)?;
            let property = if property.trim().is_empty() {
                None
            } else {
                Some(parse_number("property", property.trim())?)
            };

            // 6. Merge into the existing config and write
            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(
                profile_name.clone(),
                Profile {
                    api_url,
                    username: Some(username),
                    password,
                    property,
                    ..Profile::default()
                },
            );
            cfg.default_profile = Some(profile_name.clone());
            config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Next: propdesk login");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let mut cfg = config::load_config_or_default();
            for profile in cfg.profiles.values_mut() {
                if profile.password.is_some() {
                    profile.password = Some("********".into());
                }
            }
            let out = output::render_single(
                global.output,
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_else(|e| format!("{c:#?}\n({e})")),
                |c| c.profiles.keys().cloned().collect::<Vec<_>>().join("\n"),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();
            set_profile_key(profile, &key, value)?;

            config::save_config(&cfg)?;
            output::notice(&format!("✓ Set {key} on profile '{profile_name}'"), global.quiet);
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: propdesk config init");
            } else {
                for name in cfg.profiles.keys() {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    name,
                    available: available_profiles(&cfg),
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            output::notice(&format!("✓ Default profile set to '{name}'"), global.quiet);
            Ok(())
        }

        // ── SetPassword ─────────────────────────────────────────────
        ConfigCommand::SetPassword { profile } => {
            let cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(CliError::ProfileNotFound {
                    name: profile_name,
                    available: available_profiles(&cfg),
                });
            }

            let secret = util::prompt_secret("Password: ")?;
            propdesk_config::store_password(&profile_name, &secret)?;
            output::notice(
                &format!("✓ Password stored in system keyring for profile '{profile_name}'"),
                global.quiet,
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_profile_key_validates_values() {
        let mut profile = Profile::default();
        assert!(set_profile_key(&mut profile, "api_url", "not a url".into()).is_err());
        assert!(set_profile_key(&mut profile, "property", "seven".into()).is_err());
        assert!(set_profile_key(&mut profile, "colour", "blue".into()).is_err());

        set_profile_key(&mut profile, "api-url", "https://desk.example.com/api".into())
            .unwrap_or_else(|e| panic!("{e}"));
        set_profile_key(&mut profile, "property", "7".into()).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(profile.api_url, "https://desk.example.com/api");
        assert_eq!(profile.property, Some(7));
    }
}
