//! `velo-tui`: terminal front-end for the velo bike-share client.
//!
//! Built on [ratatui](https://ratatui.rs). The Stations screen lists every
//! station and the bikes booked so far; `Enter` opens the Station Detail
//! screen, which is driven by `velo-core`'s
//! [`StationDetailController`](velo_core::StationDetailController).
//!
//! Logs are written to a file (default `/tmp/velo-tui.log`) to avoid
//! corrupting the terminal UI.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and app launch.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod host;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use secrecy::SecretString;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use velo_core::{HttpBikeService, ServiceConfig, StationId, TlsVerification};

use crate::app::App;

/// Browse bike-share stations and book bikes from the terminal.
#[derive(Parser, Debug)]
#[command(name = "velo-tui", version, about)]
struct Cli {
    /// Backend API root (e.g., https://bikes.example.com/api). Overrides the profile.
    #[arg(short = 'u', long, env = "VELO_URL")]
    url: Option<Url>,

    /// Config profile to use (defaults to the config's default profile)
    #[arg(short = 'p', long, env = "VELO_PROFILE")]
    profile: Option<String>,

    /// Bearer token for the backend
    #[arg(short = 't', long, env = "VELO_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// Accept invalid TLS certificates
    #[arg(short = 'k', long)]
    insecure: bool,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Battery percentage below which a bike is flagged
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    battery_threshold: Option<u8>,

    /// Open the detail screen of this station on start
    #[arg(short = 's', long)]
    station: Option<String>,

    /// Log file path (defaults to /tmp/velo-tui.log)
    #[arg(long, default_value = "/tmp/velo-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. Logging to stdout/stderr would corrupt the
/// TUI output. The returned guard must be held for the lifetime of the
/// application so logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "velo_tui={log_level},velo_core={log_level},velo_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("velo-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Resolve the service config. Priority: CLI flags > profile > defaults.
fn build_service_config(cli: &Cli) -> Result<ServiceConfig> {
    let cfg = velo_config::load_config().wrap_err("failed to load config")?;

    let mut config = if let Some(url) = &cli.url {
        let mut config = ServiceConfig::new(url.clone());
        config.timeout = Duration::from_secs(cfg.defaults.timeout);
        config.battery_threshold = cfg.defaults.battery_threshold;
        if cfg.defaults.insecure {
            config.tls = TlsVerification::DangerAcceptInvalid;
        }
        config
    } else {
        let (name, profile) = cfg
            .profile(cli.profile.as_deref())
            .wrap_err("no --url given and no usable profile")?;
        velo_config::profile_to_service_config(profile, name, &cfg.defaults)?
    };

    if let Some(token) = &cli.api_token {
        config.api_token = Some(SecretString::from(token.clone()));
    }
    if cli.insecure {
        config.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = cli.timeout {
        config.timeout = Duration::from_secs(secs);
    }
    if let Some(threshold) = cli.battery_threshold {
        config.battery_threshold = threshold;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let config = build_service_config(&cli)?;
    info!(url = %config.url, "starting velo-tui");

    let service = Arc::new(HttpBikeService::new(&config)?);
    let initial_station = cli.station.map(StationId::from);

    let mut app = App::new(service, config.battery_threshold, initial_station);
    app.run().await?;

    Ok(())
}
