//! CLI overlay on `propdesk-config`: global flags win over the profile.
//!
//! This is the single boundary where config types become a live `Desk`.

use std::sync::Arc;
use std::time::Duration;

use propdesk_config::{Config, Connection, Defaults, Profile};
use propdesk_core::Desk;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use propdesk_config::{config_path, load_config_or_default, save_config};

/// A profile merged with global flags, ready to connect.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub profile_name: String,
    pub profile: Option<Profile>,
    pub connection: Connection,
}

impl Resolved {
    /// `--property` flag, else the profile's default property.
    pub fn property(&self) -> Option<i64> {
        self.connection.property
    }

    /// Build the desk facade, reading this profile's persisted session.
    pub fn desk(&self) -> Result<Desk, CliError> {
        let store = Arc::new(self.connection.session_store());
        Desk::new(
            self.connection.api_url.clone(),
            &self.connection.transport(),
            store,
        )
        .map_err(|e| CliError::from(e).for_profile(&self.profile_name))
    }
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Merge the config file, the active profile, and global flag overrides.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);
    let profile = cfg.profiles.get(&profile_name).cloned();

    let mut connection = match (&profile, global.api_url.as_deref()) {
        (Some(profile), _) => Connection::from_profile(profile, &profile_name, &cfg.defaults)?,
        (None, Some(url)) => flags_only(url, &profile_name, &cfg.defaults)?,
        (None, None) if global.profile.is_some() => {
            let available: Vec<_> = cfg.profiles.keys().cloned().collect();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }
        (None, None) => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    if let Some(url) = global.api_url.as_deref() {
        connection.api_url = propdesk_config::parse_api_url(url)?;
    }
    if let Some(secs) = global.timeout {
        connection.timeout = Duration::from_secs(secs);
    }
    if global.property.is_some() {
        connection.property = global.property;
    }

    tracing::debug!(
        profile = %profile_name,
        api_url = %connection.api_url,
        "resolved connection"
    );

    Ok(Resolved {
        profile_name,
        profile,
        connection,
    })
}

/// No profile on disk: build a connection from `--api-url` alone.
fn flags_only(url: &str, profile_name: &str, defaults: &Defaults) -> Result<Connection, CliError> {
    let profile = Profile {
        api_url: url.into(),
        ..Profile::default()
    };
    Ok(Connection::from_profile(&profile, profile_name, defaults)?)
}
