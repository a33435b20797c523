//! Shared configuration for the propdesk CLI and TUI.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext), the
//! file-backed session store, and translation to a `TransportConfig`.
//! Both binaries depend on this crate; the CLI layers its global flags
//! on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use propdesk_api::{RetryPolicy, Session, SessionStore, TransportConfig};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

pub const KEYRING_SERVICE: &str = "propdesk";
pub const ENV_PREFIX: &str = "PROPDESK_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

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

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named server profiles.
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
    /// The profile name to use: explicit override, else `default_profile`.
    pub fn active_profile_name(&self, requested: Option<&str>) -> String {
        requested
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound { name: name.into() })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Retries for HTTP 5xx responses.
    #[serde(default = "default_retries")]
    pub retries: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
            retries: default_retries(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_retries() -> u32 {
    3
}

/// A named server profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// API base URL (e.g., "https://desk.example.com/api").
    pub api_url: String,

    /// Username for `login`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Environment variable name containing the password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,

    /// Password (plaintext; prefer keyring or env var).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Default property id for scoped commands.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<i64>,

    /// Override timeout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "propdesk", "propdesk")
}

fn dirs_fallback(kind: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(kind);
    p.push("propdesk");
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory holding per-profile session files.
pub fn sessions_dir() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".local/share").join("sessions"),
        |dirs| dirs.data_dir().join("sessions"),
    )
}

/// Session file for `profile`.
pub fn session_path(profile: &str) -> PathBuf {
    sessions_dir().join(format!("{profile}.json"))
}

/// Directory for TUI log files.
pub fn log_dir() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".local/state").join("logs"),
        |dirs| dirs.data_local_dir().join("logs"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit path, then apply `PROPDESK_` env overrides
/// (`PROPDESK_DEFAULTS__OUTPUT=json`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    debug!(path = %path.display(), profiles = config.profiles.len(), "config loaded");
    Ok(config)
}

/// Load config, returning a default if the file is missing or broken.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
        .map_err(|e| ConfigError::Keyring(e.to_string()))
}

/// Resolve the login username: profile, then `PROPDESK_USERNAME`.
pub fn resolve_username(profile: &Profile, profile_name: &str) -> Result<String, ConfigError> {
    profile
        .username
        .clone()
        .or_else(|| std::env::var("PROPDESK_USERNAME").ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })
}

/// Resolve the login password through the credential chain:
/// `password_env` → `PROPDESK_PASSWORD` → keyring → plaintext.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. Global env var
    if let Ok(val) = std::env::var("PROPDESK_PASSWORD") {
        return Ok(SecretString::from(val));
    }

    // 3. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 4. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?
        .set_password(password)
        .map_err(|e| ConfigError::Keyring(e.to_string()))
}

// ── Connection settings ─────────────────────────────────────────────

/// Everything needed to talk to one server, after merging profile and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub profile_name: String,
    pub api_url: Url,
    pub timeout: Duration,
    pub retries: u32,
    pub property: Option<i64>,
}

impl Connection {
    /// Merge a profile over the global defaults.
    pub fn from_profile(
        profile: &Profile,
        profile_name: &str,
        defaults: &Defaults,
    ) -> Result<Self, ConfigError> {
        let api_url = parse_api_url(&profile.api_url)?;
        Ok(Self {
            profile_name: profile_name.into(),
            api_url,
            timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
            retries: defaults.retries,
            property: profile.property,
        })
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig::default()
            .with_timeout(self.timeout)
            .with_retry(RetryPolicy {
                max_retries: self.retries,
                ..RetryPolicy::default()
            })
    }

    /// The persisted session store for this profile.
    pub fn session_store(&self) -> FileSessionStore {
        FileSessionStore::new(session_path(&self.profile_name))
    }
}

pub fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url: Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "api_url".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("expected an http(s) URL, got '{raw}'"),
        });
    }
    Ok(url)
}

// ── File-backed session store ───────────────────────────────────────

/// Persists the session record as JSON at a fixed path.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn session_err(err: impl std::fmt::Display) -> propdesk_api::Error {
    propdesk_api::Error::Session(err.to_string())
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, propdesk_api::Error> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(session_err(e)),
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        match serde_json::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                // An unreadable record must not block `login` from replacing it.
                warn!(path = %self.path.display(), error = %e, "discarding undecodable session file");
                if let Err(e) = std::fs::remove_file(&self.path) {
                    debug!(error = %e, "could not remove session file");
                }
                Ok(None)
            }
        }
    }

    fn save(&self, session: &Session) -> Result<(), propdesk_api::Error> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(session_err)?;
        }
        let json = serde_json::to_string(session).map_err(session_err)?;
        std::fs::write(&self.path, json).map_err(session_err)?;
        restrict_permissions(&self.path).map_err(session_err)
    }

    fn clear(&self) -> Result<(), propdesk_api::Error> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(session_err(e)),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;

    use super::*;

    fn sample_config() -> Config {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                api_url: "https://desk.example.com/api".into(),
                username: Some("demo".into()),
                property: Some(1),
                ..Profile::default()
            },
        );
        cfg
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = sample_config();

        save_config_to(&cfg, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.profiles, cfg.profiles);
        assert_eq!(loaded.defaults.retries, 3);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert!(loaded.profiles.is_empty());
        assert_eq!(loaded.defaults.output, "table");
        assert_eq!(loaded.active_profile_name(None), "default");
        assert_eq!(loaded.active_profile_name(Some("staging")), "staging");
    }

    #[test]
    fn connection_merges_profile_over_defaults() {
        let cfg = sample_config();
        let profile = cfg.profile("default").unwrap();
        let conn = Connection::from_profile(profile, "default", &cfg.defaults).unwrap();
        assert_eq!(conn.api_url.as_str(), "https://desk.example.com/api");
        assert_eq!(conn.timeout, Duration::from_secs(30));
        assert_eq!(conn.transport().retry.max_retries, 3);
        assert_eq!(conn.property, Some(1));
    }

    #[test]
    fn bad_url_is_rejected() {
        assert!(parse_api_url("not a url").is_err());
        assert!(parse_api_url("ftp://desk.example.com").is_err());
        assert!(parse_api_url("http://localhost:5000/api").is_ok());
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let cfg = Config::default();
        assert!(matches!(
            cfg.profile("nope"),
            Err(ConfigError::ProfileNotFound { .. })
        ));
    }

    #[test]
    fn plaintext_password_is_last_resort() {
        let profile = Profile {
            api_url: "https://desk.example.com".into(),
            password_env: Some("PROPDESK_TEST_SURELY_UNSET".into()),
            password: Some("hunter2".into()),
            ..Profile::default()
        };
        if std::env::var("PROPDESK_PASSWORD").is_ok() {
            return;
        }
        let secret = resolve_password(&profile, "propdesk-test-no-keyring").unwrap();
        assert_eq!(secrecy::ExposeSecret::expose_secret(&secret), "hunter2");
    }

    #[test]
    fn file_session_store_persists_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("sessions").join("default.json"));

        assert!(store.load().unwrap().is_none());
        store.save(&Session::new("abc", "demo")).unwrap();
        assert_eq!(store.load().unwrap(), Some(Session::new("abc", "demo")));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn file_session_store_accepts_user_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.json");
        std::fs::write(&path, r#"{"token":"t","user":"maria"}"#).unwrap();
        let session = FileSessionStore::new(path).load().unwrap().unwrap();
        assert_eq!(session.username, "maria");
    }

    #[test]
    fn file_session_store_accepts_user_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default.json");
        std::fs::write(&path, r#"{"token":"abc","user":{"username":"demo"}}"#).unwrap();
        let session = FileSessionStore::new(path).load().unwrap();
        assert_eq!(session, Some(Session::new("abc", "demo")));
    }

    #[test]
    fn corrupt_session_file_counts_as_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default.json");
        std::fs::write(&path, r#"{"token":"ab"#).unwrap();
        let store = FileSessionStore::new(path.clone());

        assert_eq!(store.load().unwrap(), None);
        assert!(!path.exists());

        store.save(&Session::new("fresh", "demo")).unwrap();
        assert_eq!(store.load().unwrap(), Some(Session::new("fresh", "demo")));
    }
}
