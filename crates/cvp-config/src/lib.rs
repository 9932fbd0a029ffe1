//! Shared configuration for CVP tools.
//!
//! TOML profiles plus environment-variable credential resolution,
//! translated into a `ControllerConfig` ready for `cvp_api::CvpClient`.
//! The controller host and bearer token come from the `CVP` and
//! `CVPTOKEN` variables when no profile provides them; credentials are
//! resolved once and passed explicitly, so components never re-read the
//! process environment.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use cvp_api::{TlsMode, TransportConfig};

/// Controller host env var (hostname or host:port), from the original
/// deployment convention.
pub const HOST_ENV: &str = "CVP";
/// Bearer token env var.
pub const TOKEN_ENV: &str = "CVPTOKEN";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no controller host configured (set {HOST_ENV} or a profile host)")]
    NoHost,

    #[error("no token configured for profile '{profile}' (set {TOKEN_ENV} or a profile token)")]
    NoToken { profile: String },

    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String },

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
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named controller profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    /// Accept self-signed controller certificates. CVP controllers are
    /// routinely self-signed, so this defaults on.
    #[serde(default = "default_insecure")]
    pub insecure: bool,

    /// Request timeout in seconds (applies to GET and POST alike).
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            insecure: default_insecure(),
            timeout: default_timeout(),
        }
    }
}

fn default_insecure() -> bool {
    true
}
fn default_timeout() -> u64 {
    30
}

/// A named controller profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Controller host (e.g. "cvp.example.com" or a full URL).
    pub host: Option<String>,

    /// Bearer token (plaintext; prefer the CVPTOKEN env var).
    pub token: Option<String>,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,
}

// ── Resolved configuration ──────────────────────────────────────────

/// Everything needed to construct a `CvpClient`, resolved once.
#[derive(Debug)]
pub struct ControllerConfig {
    pub url: Url,
    pub token: SecretString,
    pub transport: TransportConfig,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "cvpctl", "cvpctl").map_or_else(
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
    p.push("cvpctl");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + `CVPCTL_*` environment overrides.
pub fn load_config() -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(config_path()))
        .merge(Env::prefixed("CVPCTL_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Resolution ──────────────────────────────────────────────────────

/// Resolve a profile (or the bare environment) into a `ControllerConfig`.
///
/// Host resolution order: profile `host`, then the `CVP` env var.
/// Token resolution order: the `CVPTOKEN` env var, then profile
/// `token`. A missing host or token is rejected here with a structured
/// error rather than surfacing later as a malformed URL or a
/// controller-side auth failure.
pub fn resolve(cfg: &Config, profile_name: Option<&str>) -> Result<ControllerConfig, ConfigError> {
    let name = profile_name
        .map(str::to_owned)
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into());

    // An explicitly requested profile must exist; the default may be absent.
    let bare = Profile::default();
    let profile = match cfg.profiles.get(&name) {
        Some(p) => p,
        None if profile_name.is_some() => {
            return Err(ConfigError::ProfileNotFound { name });
        }
        None => &bare,
    };

    let host = profile
        .host
        .clone()
        .or_else(|| std::env::var(HOST_ENV).ok())
        .ok_or(ConfigError::NoHost)?;

    let token = std::env::var(TOKEN_ENV)
        .ok()
        .or_else(|| profile.token.clone())
        .map(SecretString::from)
        .ok_or_else(|| ConfigError::NoToken {
            profile: name.clone(),
        })?;

    let url = host_to_url(&host)?;

    let tls = if let Some(ref ca) = profile.ca_cert {
        TlsMode::CustomCa(ca.clone())
    } else if profile.insecure.unwrap_or(cfg.defaults.insecure) {
        TlsMode::DangerAcceptInvalid
    } else {
        TlsMode::System
    };

    let timeout = Duration::from_secs(profile.timeout.unwrap_or(cfg.defaults.timeout));

    Ok(ControllerConfig {
        url,
        token,
        transport: TransportConfig { tls, timeout },
    })
}

/// Accept either a bare host ("cvp.example.com") or a full URL.
fn host_to_url(host: &str) -> Result<Url, ConfigError> {
    let raw = if host.contains("://") {
        host.to_owned()
    } else {
        format!("https://{host}")
    };
    raw.parse().map_err(|_| ConfigError::Validation {
        field: "host".into(),
        reason: format!("invalid controller URL: {raw}"),
    })
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}
