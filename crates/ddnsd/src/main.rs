// # ddnsd - DDNS Daemon
//
// The ddnsd daemon is a thin integration layer. It is responsible for:
// 1. Loading an optional `.env` file and reading environment variables
// 2. Initializing logging
// 3. Building the HTTP IP source and the Hetzner provider
// 4. Running the poll loop until the process is terminated
//
// ## Configuration
//
// ### Required
// - `API_TOKEN`: Hetzner DNS API token
// - `ZONE_ID`: Zone identifier
// - `RECORD_NAME`: Record name (e.g. home.example.com)
// - `RECORD_ID`: Record identifier
//
// ### Optional
// - `CHECK_IP_URL`: IP check service (default https://checkip.amazonaws.com/)
// - `API_URL`: DNS API root (default https://dns.hetzner.com/api/v1/)
// - `INTERVAL`: Poll interval in milliseconds (default 10000)
// - `TTL`: Record TTL in seconds (default 60)
// - `TIMEOUT`: HTTP timeout in milliseconds (default 5000)
// - `DRY_RUN`: Log updates instead of sending them (default false)
// - `LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// export API_TOKEN=your_token
// export ZONE_ID=your_zone_id
// export RECORD_NAME=home.example.com
// export RECORD_ID=your_record_id
//
// ddnsd
// ```

use anyhow::Result;
use ddns_core::{DdnsConfig, DdnsEngine};
use ddns_ip_http::HttpIpSource;
use ddns_provider_hetzner::HetznerProvider;
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DdnsExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Exit code for a startup failure
///
/// Fatal errors are configuration problems; anything else that stops the
/// daemon before the loop starts is unexpected.
fn startup_exit_code(err: &ddns_core::Error) -> DdnsExitCode {
    if err.is_fatal() {
        DdnsExitCode::ConfigError
    } else {
        DdnsExitCode::RuntimeError
    }
}

/// Load `.env` from the working directory if there is one
///
/// A missing file is fine; a file that exists but cannot be parsed is a
/// configuration error.
fn load_dotenv() -> Result<()> {
    match dotenv::dotenv() {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(anyhow::anyhow!("Failed to load .env file: {}", e)),
    }
}

/// Parse `LOG_LEVEL`
fn parse_log_level(value: &str) -> Result<Level> {
    match value.trim().to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "LOG_LEVEL '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            value
        ),
    }
}

fn main() -> ExitCode {
    if let Err(e) = load_dotenv() {
        eprintln!("Configuration error: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    // Load and validate configuration from environment
    let config = match DdnsConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{}", e);
            return startup_exit_code(&e).into();
        }
    };

    let level_name = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_level = match parse_log_level(&level_name) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    info!("Starting ddnsd daemon");
    info!("Managing record: {} (zone {})", config.record_name, config.zone_id);

    // The poll loop is a single cooperative task
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    let guard = rt.enter();

    // Build the network collaborators before entering the loop
    let ip_source = match HttpIpSource::from_config(&config) {
        Ok(source) => source,
        Err(e) => {
            error!("{}", e);
            return startup_exit_code(&e).into();
        }
    };
    let provider = match HetznerProvider::from_config(&config) {
        Ok(provider) => provider,
        Err(e) => {
            error!("{}", e);
            return startup_exit_code(&e).into();
        }
    };

    let mut engine = DdnsEngine::new(Box::new(ip_source), Box::new(provider), &config);
    drop(guard);

    let result = rt.block_on(async {
        match run_daemon(&mut engine).await {
            Ok(()) => DdnsExitCode::CleanShutdown,
            Err(e) => {
                error!("Daemon error: {}", e);
                DdnsExitCode::RuntimeError
            }
        }
    });

    result.into()
}

/// Run the poll loop until a termination signal arrives
async fn run_daemon(engine: &mut DdnsEngine) -> Result<()> {
    let shutdown = wait_for_shutdown()?;
    engine.run_until(shutdown).await;
    info!("Shutting down daemon");
    Ok(())
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// Signal handlers are installed eagerly so a setup failure surfaces before
/// the loop starts.
#[cfg(unix)]
fn wait_for_shutdown() -> Result<impl std::future::Future<Output = ()>> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(async move {
        let name = tokio::select! {
            _ = sigterm.recv() => "SIGTERM",
            _ = sigint.recv() => "SIGINT",
        };
        info!("Received shutdown signal: {}", name);
    })
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
fn wait_for_shutdown() -> Result<impl std::future::Future<Output = ()>> {
    Ok(async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received shutdown signal: SIGINT"),
            Err(e) => {
                error!("Failed to wait for CTRL-C: {}", e);
                std::future::pending::<()>().await
            }
        }
    })
}
