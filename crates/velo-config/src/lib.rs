//! Configuration for velo.
//!
//! TOML profiles, API token resolution (env + keyring + plaintext), and
//! translation to `velo_core::ServiceConfig`. The TUI layers its own CLI
//! flag overrides on top.

use std::collections::HashMap;
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

use velo_core::{DEFAULT_BATTERY_THRESHOLD, ServiceConfig, TlsVerification};

const KEYRING_SERVICE: &str = "velo";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no profile named '{profile}'")]
    UnknownProfile { profile: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

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

    /// Named backend profiles.
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

impl Config {
    /// Look up `name`, or the default profile when `name` is `None`.
    ///
    /// Returns the resolved profile name alongside the profile.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get_key_value(name)
            .map(|(k, v)| (k.as_str(), v))
            .ok_or_else(|| ConfigError::UnknownProfile {
                profile: name.into(),
            })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_battery_threshold")]
    pub battery_threshold: u8,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            insecure: false,
            timeout: default_timeout(),
            battery_threshold: default_battery_threshold(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}
fn default_battery_threshold() -> u8 {
    DEFAULT_BATTERY_THRESHOLD
}

/// A named backend profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Backend API root (e.g., "https://bikes.example.com/api").
    pub backend: String,

    /// API token (plaintext, prefer keyring or env var).
    pub api_token: Option<String>,

    /// Environment variable name containing the API token.
    pub api_token_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    /// Override the low-battery threshold (percent).
    pub battery_threshold: Option<u8>,
}

impl Profile {
    /// A profile pointing at `backend` with nothing else set.
    pub fn new(backend: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            ..Self::default()
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "velo", "velo").map_or_else(
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
    p.push("velo");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the Config from `path` + environment.
///
/// Environment keys use the `VELO_` prefix with `__` as the nesting
/// separator, e.g. `VELO_DEFAULTS__TIMEOUT=10` or
/// `VELO_PROFILES__HOME__BACKEND=http://localhost:8080`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("VELO_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the profile's API token.
///
/// Order: the env var named by `api_token_env`, the system keyring
/// (`velo` / `<profile>/api-token`), then plaintext `api_token`. A
/// profile that configures no token at all resolves to `None`; one that
/// names an env var which is unset and has no fallback is an error.
pub fn resolve_api_token(
    profile: &Profile,
    profile_name: &str,
) -> Result<Option<SecretString>, ConfigError> {
    // 1. Profile's api_token_env → env var lookup
    if let Some(ref env_name) = profile.api_token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(Some(SecretString::from(val)));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/api-token")) {
        if let Ok(secret) = entry.get_password() {
            return Ok(Some(SecretString::from(secret)));
        }
    }

    // 3. Plaintext in config
    if let Some(ref token) = profile.api_token {
        return Ok(Some(SecretString::from(token.clone())));
    }

    if profile.api_token_env.is_some() {
        return Err(ConfigError::NoCredentials {
            profile: profile_name.into(),
        });
    }
    Ok(None)
}

/// Build a `ServiceConfig` from a profile, falling back to `defaults`.
pub fn profile_to_service_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ServiceConfig, ConfigError> {
    let url: url::Url = profile
        .backend
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "backend".into(),
            reason: format!("invalid URL: {}", profile.backend),
        })?;

    let battery_threshold = profile
        .battery_threshold
        .unwrap_or(defaults.battery_threshold);
    if battery_threshold > 100 {
        return Err(ConfigError::Validation {
            field: "battery_threshold".into(),
            reason: format!("expected a percentage, got {battery_threshold}"),
        });
    }

    let api_token = resolve_api_token(profile, profile_name)?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));

    Ok(ServiceConfig {
        url,
        api_token,
        tls,
        timeout,
        battery_threshold,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::Jail;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn load(jail: &Jail) -> figment::error::Result<Config> {
        load_config_from(&jail.directory().join("config.toml")).map_err(|e| e.to_string().into())
    }

    #[test]
    fn file_and_env_layers_merge() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                default_profile = "home"

                [defaults]
                timeout = 12

                [profiles.home]
                backend = "http://localhost:8080/api"
                battery_threshold = 40
                "#,
            )?;
            jail.set_env("VELO_DEFAULTS__INSECURE", "true");

            let config = load(jail)?;
            let (name, profile) = config.profile(None).unwrap();

            assert_eq!(name, "home");
            assert_eq!(profile.backend, "http://localhost:8080/api");
            assert_eq!(config.defaults.timeout, 12);
            assert!(config.defaults.insecure);
            assert_eq!(config.defaults.battery_threshold, DEFAULT_BATTERY_THRESHOLD);
            Ok(())
        });
    }

    #[test]
    fn missing_file_yields_defaults() {
        Jail::expect_with(|jail| {
            let config = load(jail)?;
            assert_eq!(config.default_profile.as_deref(), Some("default"));
            assert!(config.profiles.is_empty());
            assert!(matches!(
                config.profile(None),
                Err(ConfigError::UnknownProfile { .. })
            ));
            Ok(())
        });
    }

    #[test]
    fn token_env_var_wins_over_plaintext() {
        Jail::expect_with(|jail| {
            jail.set_env("VELO_TEST_TOKEN_A", "from-env");
            let profile = Profile {
                api_token: Some("plain".into()),
                api_token_env: Some("VELO_TEST_TOKEN_A".into()),
                ..Profile::new("http://localhost:8080")
            };

            let token = resolve_api_token(&profile, "velo-test-env").unwrap().unwrap();
            assert_eq!(token.expose_secret(), "from-env");
            Ok(())
        });
    }

    #[test]
    fn unset_token_env_without_fallback_is_an_error() {
        let profile = Profile {
            api_token_env: Some("VELO_TEST_TOKEN_NEVER_SET".into()),
            ..Profile::new("http://localhost:8080")
        };
        assert!(matches!(
            resolve_api_token(&profile, "velo-test-missing"),
            Err(ConfigError::NoCredentials { .. })
        ));
    }

    #[test]
    fn profile_overrides_defaults() {
        let profile = Profile {
            api_token: Some("plain".into()),
            ca_cert: Some(Path::new("/etc/velo/ca.pem").to_path_buf()),
            timeout: Some(5),
            battery_threshold: Some(15),
            ..Profile::new("https://bikes.example.com/api")
        };

        let config = profile_to_service_config(&profile, "velo-test-ca", &Defaults::default())
            .unwrap();

        assert_eq!(config.url.as_str(), "https://bikes.example.com/api");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.battery_threshold, 15);
        assert_eq!(
            config.tls,
            TlsVerification::CustomCa(PathBuf::from("/etc/velo/ca.pem"))
        );
        assert_eq!(config.api_token.unwrap().expose_secret(), "plain");
    }

    #[test]
    fn insecure_default_applies_without_override() {
        let defaults = Defaults {
            insecure: true,
            ..Defaults::default()
        };
        let profile = Profile::new("http://localhost");
        let config = profile_to_service_config(&profile, "velo-test-insecure", &defaults).unwrap();
        assert_eq!(config.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(config.battery_threshold, DEFAULT_BATTERY_THRESHOLD);
    }

    #[test]
    fn invalid_backend_is_rejected() {
        let err = profile_to_service_config(
            &Profile::new("not a url"),
            "velo-test-bad",
            &Defaults::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "backend"));
    }

    #[test]
    fn threshold_above_100_is_rejected() {
        let profile = Profile {
            battery_threshold: Some(120),
            ..Profile::new("http://localhost")
        };
        assert!(matches!(
            profile_to_service_config(&profile, "velo-test-threshold", &Defaults::default()),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config
            .profiles
            .insert("default".into(), Profile::new("http://localhost:8080"));

        save_config_to(&config, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();

        assert_eq!(loaded.profiles["default"].backend, "http://localhost:8080");
    }
}
