// ── Runtime service configuration ──
//
// These types describe *how* to reach the bike-share backend. They carry
// credential data and connection tuning, but never touch disk. The TUI
// (via velo-config) constructs a `ServiceConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Battery percentage below which a bike is flagged as low.
pub const DEFAULT_BATTERY_THRESHOLD: u8 = 25;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict). Default for hosted backends.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed development backends).
    DangerAcceptInvalid,
}

/// Configuration for talking to one backend.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Backend API root (e.g., `https://bikes.example.com/api`).
    pub url: Url,
    /// Optional bearer token.
    pub api_token: Option<SecretString>,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout. The only timeout applied to backend calls.
    pub timeout: Duration,
    /// Battery percentage below which a bike row is flagged.
    pub battery_threshold: u8,
}

impl ServiceConfig {
    /// A config for `url` with default tuning and no credentials.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            api_token: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            battery_threshold: DEFAULT_BATTERY_THRESHOLD,
        }
    }
}
