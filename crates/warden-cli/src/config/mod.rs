//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── log_format: LogFormat          # text or json logs
//! ├── server: ServerConfig           # Host, port, shutdown
//! ├── middleware: MiddlewareConfig   # Request timeout
//! └── service: ServiceConfig         # User store, signing keys, tokens, Argon2
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! warden --user-store postgres --postgres-url "postgresql://..." --port 8080
//!
//! # Or via environment variables
//! USER_STORE=postgres POSTGRES_URL="postgresql://..." PORT=8080 warden
//! ```

mod middleware;
mod server;

use std::process;

use anyhow::Context;
use clap::{Parser, ValueEnum};
pub use middleware::MiddlewareConfig;
use serde::{Deserialize, Serialize};
pub use server::ServerConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use warden_server::service::{ServiceConfig, StoreBackend};

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_SERVER_STARTUP};

/// Output format of the log subscriber.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable, colored when attached to a terminal.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "warden")]
#[command(about = "Warden authentication server")]
#[command(version)]
pub struct Cli {
    /// Log output format.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// HTTP middleware configuration.
    #[clap(flatten)]
    pub middleware: MiddlewareConfig,

    /// Authentication service configuration.
    #[clap(flatten)]
    pub service: ServiceConfig,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    ///
    /// `RUST_LOG` overrides the default `info` level.
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let registry = tracing_subscriber::registry().with(filter);

        match self.log_format {
            LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
            LogFormat::Json => registry
                .with(tracing_subscriber::fmt::layer().json().flatten_event(true))
                .init(),
        }
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server
            .validate()
            .context("invalid server configuration")?;
        self.middleware
            .validate()
            .context("invalid middleware configuration")?;
        self.service
            .validate()
            .context("invalid service configuration")?;
        Ok(())
    }

    /// Logs configuration (no sensitive information).
    pub fn log(&self) {
        Self::log_build_info();
        self.server.log();
        self.middleware.log();

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            user_store = %self.service.user_store,
            token_lifetime_secs = self.service.token.token_lifetime_secs,
            token_issuer = %self.service.token.token_issuer,
            "Service configuration"
        );

        if self.service.user_store == StoreBackend::Postgres {
            tracing::info!(
                target: TRACING_TARGET_CONFIG,
                postgres_url = %self.service.postgres.database_url_masked(),
                postgres_max_connections = self.service.postgres.postgres_max_connections,
                postgres_connection_timeout_secs = ?self.service.postgres.postgres_connection_timeout_secs,
                postgres_idle_timeout_secs = ?self.service.postgres.postgres_idle_timeout_secs,
                "Database configuration"
            );
        }
    }

    /// Logs build information at debug level.
    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_arguments() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from([
            "warden",
            "--user-store",
            "memory",
            "--port",
            "8080",
            "--log-format",
            "json",
            "--request-timeout",
            "10",
        ])?;

        assert_eq!(cli.service.user_store, StoreBackend::Memory);
        assert_eq!(cli.server.port, 8080);
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(cli.middleware.recovery.request_timeout, 10);
        cli.validate()?;
        Ok(())
    }

    #[test]
    fn rejects_zero_request_timeout() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from(["warden", "--request-timeout", "0"])?;
        assert!(cli.validate().is_err());
        Ok(())
    }
}
