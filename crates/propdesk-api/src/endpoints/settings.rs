// Settings endpoints
//
// Settings sections are free-form JSON objects owned by the server.

use std::fmt;
use std::str::FromStr;

use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use crate::client::{ApiClient, AuthMode};
use crate::error::Error;

/// A settings section under `/api/settings/{section}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsSection {
    System,
    Security,
    General,
    Sms,
}

impl SettingsSection {
    pub const ALL: [Self; 4] = [Self::System, Self::Security, Self::General, Self::Sms];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Security => "security",
            Self::General => "general",
            Self::Sms => "sms",
        }
    }
}

impl fmt::Display for SettingsSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingsSection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|section| section.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown settings section '{s}' (expected system, security, general, or sms)"))
    }
}

impl ApiClient {
    /// `GET /api/settings/{section}`
    pub async fn get_settings(&self, section: SettingsSection) -> Result<Value, Error> {
        debug!(%section, "fetching settings");
        self.get_value(&format!("api/settings/{section}"), &[]).await
    }

    /// `PUT /api/settings/{section}`
    pub async fn put_settings(&self, section: SettingsSection, values: &Value) -> Result<Value, Error> {
        debug!(%section, "updating settings");
        self.send_value(
            Method::PUT,
            &format!("api/settings/{section}"),
            values,
            AuthMode::Session,
        )
        .await
    }
}
