use uuid::Uuid;

use crate::service::StoreError;
use crate::utility::tracing_targets::AUTH_SERVICE as TRACING_TARGET;

/// Outcome taxonomy of the authentication core.
///
/// Storage, hashing and signing failures never cross this boundary in their
/// raw form; they are logged and collapsed into [`AuthError::Internal`].
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Registration with an email that is already taken.
    #[error("{email} already exists")]
    AlreadyExists { email: String },

    /// Login failed. Unknown email, wrong password and inactive user are
    /// indistinguishable.
    #[error("Credentials are not valid")]
    InvalidCredentials,

    /// No user with the given identifier.
    #[error("User {user_id} not found")]
    NotFound { user_id: Uuid },

    /// Any other failure. The message never carries details.
    #[error("Something went wrong")]
    Internal(#[source] crate::Error),
}

impl AuthError {
    /// Wraps an infrastructure failure, logging it with the operation name.
    pub(crate) fn internal(operation: &'static str, error: crate::Error) -> Self {
        tracing::error!(
            target: TRACING_TARGET,
            operation = operation,
            kind = %error.kind(),
            error = %error,
            "authentication operation failed"
        );
        Self::Internal(error)
    }

    /// Re-classifies a store failure outside of registration.
    pub(crate) fn from_store(operation: &'static str, error: StoreError) -> Self {
        match error {
            StoreError::Unavailable(error) => Self::internal(operation, error),
            // Only `create` reports duplicates; anywhere else it is a backend bug.
            StoreError::DuplicateKey { email } => Self::internal(
                operation,
                crate::Error::store(format!("unexpected duplicate key for {email}")),
            ),
        }
    }

    /// Returns a stable machine-readable name for this error.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AlreadyExists { .. } => "already_exists",
            Self::InvalidCredentials => "invalid_credentials",
            Self::NotFound { .. } => "not_found",
            Self::Internal(_) => "internal",
        }
    }
}
