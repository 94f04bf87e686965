//! Shared configuration for the KL Rent a Car tools.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext), and
//! translation to `klrent_core::PortalConfig`. The CLI layers its flag
//! overrides on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use klrent_core::{PortalConfig, TlsVerification};

/// Keyring service name.
const KEYRING_SERVICE: &str = "klrent";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("keyring unavailable: {0}")]
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

impl From<keyring::Error> for ConfigError {
    fn from(err: keyring::Error) -> Self {
        Self::Keyring(err.to_string())
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named portal profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some(DEFAULT_PROFILE.into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Profile names, for error hints.
    pub fn profile_names(&self) -> String {
        if self.profiles.is_empty() {
            "(none)".into()
        } else {
            self.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
        }
    }
}

pub const DEFAULT_PROFILE: &str = "default";

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    klrent_core::config::DEFAULT_TIMEOUT.as_secs()
}

/// A named portal profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Backend API root (e.g., "https://api.klrentacar.com.br").
    #[serde(default = "default_api_url_string")]
    pub api_url: String,

    /// Login e-mail.
    pub email: Option<String>,

    /// Password (plaintext; prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Accept invalid TLS certificates (development backends).
    pub insecure: Option<bool>,

    /// Request timeout in seconds.
    pub timeout: Option<u64>,

    /// `origem_agen` tag sent with reservations.
    pub origin: Option<String>,

    /// CEP lookup service root (defaults to ViaCEP).
    pub cep_url: Option<String>,
}

fn default_api_url_string() -> String {
    klrent_core::config::DEFAULT_API_URL.into()
}

impl Profile {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Self::default()
        }
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("br", "klrent", "klrent")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Where the session for `profile_name` is kept.
pub fn session_path(profile_name: &str) -> PathBuf {
    let base = project_dirs().map_or_else(
        || dirs_fallback(".local/share"),
        |dirs| dirs.data_local_dir().to_path_buf(),
    );
    base.join("sessions").join(format!("{profile_name}.json"))
}

fn dirs_fallback(sub: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(sub);
    p.push("klrent");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path`, with `KLRENT_*` environment overrides.
///
/// Nested keys use a double underscore: `KLRENT_DEFAULTS__TIMEOUT=20`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("KLRENT_").split("__"));

    let config: Config = figment.extract()?;
    debug!(path = %path.display(), profiles = config.profiles.len(), "config loaded");
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

// ── Credential resolution ───────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/password"),
    )?)
}

/// Store the profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &SecretString) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(password.expose_secret())?;
    Ok(())
}

/// Resolve the login e-mail: profile, then `KLRENT_EMAIL`.
pub fn resolve_email(profile: &Profile, profile_name: &str) -> Result<String, ConfigError> {
    profile
        .email
        .clone()
        .or_else(|| std::env::var("KLRENT_EMAIL").ok())
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })
}

/// Resolve the password from the credential chain.
pub fn resolve_password(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. KLRENT_PASSWORD
    if let Ok(val) = std::env::var("KLRENT_PASSWORD") {
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

// ── Translation to core ─────────────────────────────────────────────

/// Build a `PortalConfig` from a profile, without CLI overrides.
pub fn profile_to_portal_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<PortalConfig, ConfigError> {
    let url: url::Url = profile
        .api_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {}", profile.api_url),
        })?;

    let tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let mut config = PortalConfig::new(url);
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.session_path = Some(session_path(profile_name));
    if let Some(ref origin) = profile.origin {
        config.origin.clone_from(origin);
    }
    if let Some(ref cep_url) = profile.cep_url {
        config.cep_url = Some(cep_url.parse().map_err(|_| ConfigError::Validation {
            field: "cep_url".into(),
            reason: format!("invalid URL: {cep_url}"),
        })?);
    }
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const SAMPLE: &str = r#"
default_profile = "prod"

[defaults]
output = "json"
timeout = 15

[profiles.prod]
api_url = "https://api.example.com"
email = "ana@example.com"
password = "segredo1"
password_env = "KLRENT_TEST_PASSWORD_THAT_IS_NEVER_SET"
origin = "app"
cep_url = "http://127.0.0.1:9000"

[profiles.dev]
api_url = "http://localhost:3000"
insecure = true
timeout = 5
"#;

    fn write_sample(dir: &Path) -> PathBuf {
        let path = dir.join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        path
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some(DEFAULT_PROFILE));
        assert!(cfg.profiles.is_empty());
        assert_eq!(cfg.defaults.output, "table");
        assert_eq!(cfg.profile_names(), "(none)");
    }

    #[test]
    fn profiles_are_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&write_sample(dir.path())).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("prod"));
        assert_eq!(cfg.defaults.timeout, 15);
        assert_eq!(cfg.profile_names(), "dev, prod");
        assert_eq!(cfg.profiles["dev"].insecure, Some(true));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        let mut profile = Profile::new("https://api.example.com");
        profile.email = Some("ana@example.com".into());
        cfg.profiles.insert("default".into(), profile);
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(
            loaded.profiles["default"].email.as_deref(),
            Some("ana@example.com")
        );
    }

    #[test]
    fn portal_config_from_profile() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&write_sample(dir.path())).unwrap();

        let prod = profile_to_portal_config(&cfg.profiles["prod"], "prod", &cfg.defaults).unwrap();
        assert_eq!(prod.url.as_str(), "https://api.example.com/");
        assert_eq!(prod.tls, TlsVerification::SystemDefaults);
        assert_eq!(prod.timeout, Duration::from_secs(15));
        assert_eq!(prod.origin, "app");
        assert_eq!(prod.cep_url.unwrap().as_str(), "http://127.0.0.1:9000/");
        assert!(prod.session_path.unwrap().ends_with("sessions/prod.json"));

        let dev = profile_to_portal_config(&cfg.profiles["dev"], "dev", &cfg.defaults).unwrap();
        assert_eq!(dev.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(dev.timeout, Duration::from_secs(5));
        assert_eq!(dev.origin, "site");
        assert_eq!(dev.cep_url, None);
    }

    #[test]
    fn invalid_url_is_rejected() {
        let profile = Profile::new("not a url");
        let err = profile_to_portal_config(&profile, "x", &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "api_url"));
    }

    #[test]
    fn password_falls_back_to_plaintext() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&write_sample(dir.path())).unwrap();
        if std::env::var("KLRENT_PASSWORD").is_ok() {
            return;
        }
        let secret = resolve_password(&cfg.profiles["prod"], "klrent-config-test-prod").unwrap();
        assert_eq!(secret.expose_secret(), "segredo1");
    }

    #[test]
    fn email_comes_from_profile() {
        let mut profile = Profile::new("https://api.example.com");
        profile.email = Some("ana@example.com".into());
        assert_eq!(resolve_email(&profile, "p").unwrap(), "ana@example.com");
    }
}
