//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ```bash
//! export LISTEN="0.0.0.0:8080"
//! export STORAGE_FILE="/var/lib/link-status/link_sets.json"
//! export PROBE_TIMEOUT_SECS=10
//! export CHECK_DEADLINE_SECS=30
//! ```
//!
//! ## Optional Variables
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:8080`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `STORAGE_FILE` - Snapshot file path (default: `link_sets.json`)
//! - `PROBE_TIMEOUT_SECS` - Upper bound for one probe (default: 10)
//! - `CHECK_DEADLINE_SECS` - Deadline for a whole batch (default: 30)
//! - `SHUTDOWN_TIMEOUT_SECS` - Drain ceiling on shutdown (default: 30)
//! - `PROBE_POOL_MAX_IDLE_PER_HOST` - Pooled idle connections per host (default: 10)
//! - `MAX_LINKS_PER_REQUEST` - Batch size limit (default: 1000)
//! - `SNAPSHOT_WRITE_ATTEMPTS` - Attempts per snapshot write (default: 3)

use anyhow::Result;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::infrastructure::probe::ProberSettings;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    /// Canonical snapshot location. Writes go through `<file>.tmp`.
    pub storage_file: PathBuf,
    pub probe_timeout_secs: u64,
    /// Deadline shared by every probe of one batch, measured from request start.
    pub check_deadline_secs: u64,
    /// Maximum time shutdown waits for in-flight requests.
    pub shutdown_timeout_secs: u64,
    pub probe_pool_max_idle_per_host: usize,
    pub max_links_per_request: usize,
    pub snapshot_write_attempts: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            storage_file: PathBuf::from("link_sets.json"),
            probe_timeout_secs: 10,
            check_deadline_secs: 30,
            shutdown_timeout_secs: 30,
            probe_pool_max_idle_per_host: 10,
            max_links_per_request: 1000,
            snapshot_write_attempts: 3,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Unset or unparsable numeric variables fall back to their defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let listen_addr = env::var("LISTEN").unwrap_or(defaults.listen_addr);
        let log_level = env::var("RUST_LOG").unwrap_or(defaults.log_level);
        let log_format = env::var("LOG_FORMAT").unwrap_or(defaults.log_format);
        let storage_file = env::var("STORAGE_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.storage_file);

        Ok(Self {
            listen_addr,
            log_level,
            log_format,
            storage_file,
            probe_timeout_secs: parse_var("PROBE_TIMEOUT_SECS", defaults.probe_timeout_secs),
            check_deadline_secs: parse_var("CHECK_DEADLINE_SECS", defaults.check_deadline_secs),
            shutdown_timeout_secs: parse_var(
                "SHUTDOWN_TIMEOUT_SECS",
                defaults.shutdown_timeout_secs,
            ),
            probe_pool_max_idle_per_host: parse_var(
                "PROBE_POOL_MAX_IDLE_PER_HOST",
                defaults.probe_pool_max_idle_per_host,
            ),
            max_links_per_request: parse_var(
                "MAX_LINKS_PER_REQUEST",
                defaults.max_links_per_request,
            ),
            snapshot_write_attempts: parse_var(
                "SNAPSHOT_WRITE_ATTEMPTS",
                defaults.snapshot_write_attempts,
            ),
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is not `host:port` with a numeric port
    /// - any timeout is zero
    /// - `max_links_per_request` is zero or above 100000
    /// - `snapshot_write_attempts` is outside 1..=10
    /// - `storage_file` is empty
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        let port_ok = self
            .listen_addr
            .rsplit_once(':')
            .is_some_and(|(host, port)| !host.is_empty() && port.parse::<u16>().is_ok());
        if !port_ok {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if self.storage_file.as_os_str().is_empty() {
            anyhow::bail!("STORAGE_FILE must not be empty");
        }

        if self.probe_timeout_secs == 0 {
            anyhow::bail!("PROBE_TIMEOUT_SECS must be greater than 0");
        }
        if self.check_deadline_secs == 0 {
            anyhow::bail!("CHECK_DEADLINE_SECS must be greater than 0");
        }
        if self.shutdown_timeout_secs == 0 {
            anyhow::bail!("SHUTDOWN_TIMEOUT_SECS must be greater than 0");
        }

        if self.max_links_per_request == 0 || self.max_links_per_request > 100_000 {
            anyhow::bail!(
                "MAX_LINKS_PER_REQUEST must be between 1 and 100000, got {}",
                self.max_links_per_request
            );
        }

        if !(1..=10).contains(&self.snapshot_write_attempts) {
            anyhow::bail!(
                "SNAPSHOT_WRITE_ATTEMPTS must be between 1 and 10, got {}",
                self.snapshot_write_attempts
            );
        }

        Ok(())
    }

    pub fn check_deadline(&self) -> Duration {
        Duration::from_secs(self.check_deadline_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    pub fn prober_settings(&self) -> ProberSettings {
        ProberSettings {
            timeout: Duration::from_secs(self.probe_timeout_secs),
            pool_max_idle_per_host: self.probe_pool_max_idle_per_host,
            ..ProberSettings::default()
        }
    }

    /// Prints configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Storage file: {}", self.storage_file.display());
        tracing::info!(
            "  Probe timeout: {}s, batch deadline: {}s",
            self.probe_timeout_secs,
            self.check_deadline_secs
        );
        tracing::info!("  Shutdown drain ceiling: {}s", self.shutdown_timeout_secs);
        tracing::info!("  Max links per request: {}", self.max_links_per_request);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
