//! Middleware configuration for the HTTP server.

use clap::Args;
use serde::{Deserialize, Serialize};
use warden_server::middleware::RecoveryConfig;

use crate::TRACING_TARGET_CONFIG;

/// HTTP middleware configuration.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// Request timeout and panic recovery.
    #[clap(flatten)]
    pub recovery: RecoveryConfig,
}

impl MiddlewareConfig {
    /// Validates middleware settings.
    pub fn validate(&self) -> anyhow::Result<()> {
        let timeout = self.recovery.request_timeout;
        if timeout == 0 || timeout > 300 {
            anyhow::bail!(
                "Request timeout {timeout} seconds is invalid. Must be between 1 and 300 seconds."
            );
        }

        Ok(())
    }

    /// Logs middleware configuration at info level.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            request_timeout_secs = self.recovery.request_timeout,
            "Recovery configuration"
        );
    }
}
