//! Centralized tracing target constants for structured logging.
//!
//! Using consistent targets enables fine-grained control over log output
//! via tracing subscriber filters, e.g. `RUST_LOG=warden_server::auth=debug`.

/// Registration, login and user lookup in the authentication core.
pub const AUTH_SERVICE: &str = "warden_server::auth";

/// Password hashing and verification operations.
pub const PASSWORD_HASHER: &str = "warden_server::password_hasher";

/// Session key loading and validation.
pub const SESSION_KEYS: &str = "warden_server::session_keys";

/// Bearer token issuance.
pub const TOKEN_ISSUER: &str = "warden_server::token_issuer";

/// User store backends.
pub const USER_STORE: &str = "warden_server::user_store";

/// HTTP handlers.
pub const HANDLER: &str = "warden_server::handler";

/// Registration and login handlers.
pub const AUTHENTICATION_HANDLER: &str = "warden_server::handler::authentication";

/// User lookup handlers.
pub const USERS_HANDLER: &str = "warden_server::handler::users";

/// Error recovery including middleware errors and request failures.
pub const RECOVERY_ERROR: &str = "warden_server::recovery::error";

/// Panic recovery including handler panics.
pub const RECOVERY_PANIC: &str = "warden_server::recovery::panic";

/// Request extraction and validation failures.
pub const EXTRACT: &str = "warden_server::extract";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_targets_nest_under_handler() {
        for target in [AUTHENTICATION_HANDLER, USERS_HANDLER] {
            let rest = target.strip_prefix(HANDLER);
            assert!(rest.is_some_and(|rest| rest.starts_with("::")), "{target}");
        }
    }
}
