//! Middleware for `axum::Router` and HTTP request processing.
//!
//! - Observability: tracing spans, request ids, sensitive header redaction
//! - Recovery: handler panics, request timeouts and tower service errors
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use axum::Router;
//! use warden_server::middleware::{RecoveryConfig, RouterObservabilityExt, RouterRecoveryExt};
//!
//! let app: Router = Router::new()
//!     .with_recovery(&RecoveryConfig::default())
//!     .with_observability();
//! ```

mod observability;
mod recovery;

pub use observability::RouterObservabilityExt;
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
