//! Application state and dependency injection.

mod auth;
mod config;
mod security;
mod store;
mod token_issuer;

pub use crate::service::auth::{
    AuthError, AuthService, AuthSession, DEFAULT_ROLE, LoginInput, RegisterInput, User,
};
pub use crate::service::config::{ServiceConfig, StoreBackend};
pub use crate::service::security::{
    PasswordHasher, PasswordHasherConfig, SessionKeys, SessionKeysConfig,
};
pub use crate::service::store::{
    MemoryUserStore, NewUserRecord, PgUserStore, StoreError, UserRecord, UserStore,
};
pub use crate::service::token_issuer::{AuthClaims, IssuedToken, TokenIssuer, TokenIssuerConfig};
// Re-export error types from crate root for convenience
pub use crate::{Error, Result};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    pub auth_service: AuthService,
}

impl ServiceState {
    /// Creates state around an already constructed service.
    pub fn new(auth_service: AuthService) -> Self {
        Self { auth_service }
    }

    /// Initializes application state from configuration.
    ///
    /// Opens the user store, loads and validates the signing keys, and wires
    /// them into the [`AuthService`].
    pub async fn from_config(config: &ServiceConfig) -> Result<Self> {
        config.validate()?;

        let store = config.connect_user_store().await?;
        let keys = config.load_session_keys().await?;
        let auth_service = AuthService::new(
            store,
            config.password_hasher()?,
            config.token_issuer(keys)?,
        );

        Ok(Self::new(auth_service))
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(auth_service: AuthService);

#[cfg(test)]
pub(crate) mod tests {
    pub(crate) use crate::service::auth::tests::test_service;
    pub(crate) use crate::service::token_issuer::tests::decode_token;
}
