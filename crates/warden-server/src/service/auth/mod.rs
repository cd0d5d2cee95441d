//! Registration, login and user lookup.

mod auth_error;
mod model;

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

pub use self::auth_error::AuthError;
pub use self::model::{AuthSession, LoginInput, RegisterInput, User};
use crate::service::{
    IssuedToken, NewUserRecord, PasswordHasher, StoreError, TokenIssuer, UserStore,
};
use crate::utility::tracing_targets::AUTH_SERVICE as TRACING_TARGET;

/// Role granted to every newly registered user.
pub const DEFAULT_ROLE: &str = "user";

/// The authentication core.
///
/// Owns its store, hasher and token issuer for its whole lifetime and keeps
/// no other state between calls. Cloning shares the same collaborators.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    issuer: TokenIssuer,
}

impl AuthService {
    /// Creates a new service from its collaborators.
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher, issuer: TokenIssuer) -> Self {
        Self {
            store,
            hasher,
            issuer,
        }
    }

    /// Creates a user and issues a token for it.
    ///
    /// Fails with [`AuthError::AlreadyExists`] when the email is taken, even
    /// if the conflicting registration is running concurrently.
    #[tracing::instrument(skip_all, target = TRACING_TARGET)]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthSession, AuthError> {
        let RegisterInput {
            email_address,
            password,
            display_name,
        } = input;
        let email_address = email_address.trim().to_owned();

        let password_hash = self
            .hasher
            .hash(password)
            .await
            .map_err(|e| AuthError::internal("register", e))?;

        let new_user = NewUserRecord {
            id: Uuid::now_v7(),
            email_address,
            display_name,
            password_hash,
            roles: vec![DEFAULT_ROLE.to_owned()],
        };

        let record = match self.store.create(new_user).await {
            Ok(record) => record,
            Err(StoreError::DuplicateKey { email }) => {
                tracing::info!(
                    target: TRACING_TARGET,
                    email = %email,
                    "registration rejected: email already exists"
                );
                return Err(AuthError::AlreadyExists { email });
            }
            Err(StoreError::Unavailable(e)) => return Err(AuthError::internal("register", e)),
        };

        let user = User::from(record);
        let token = self.issue(&user, "register")?;

        tracing::info!(
            target: TRACING_TARGET,
            user_id = %user.id,
            token_id = %token.token_id,
            "user registered"
        );

        Ok(AuthSession { user, token })
    }

    /// Verifies credentials and issues a token.
    ///
    /// An unknown email, a wrong password and an inactive user all yield the
    /// same [`AuthError::InvalidCredentials`]. Unknown emails are verified
    /// against a dummy hash so that the three cases take comparable time.
    #[tracing::instrument(skip_all, target = TRACING_TARGET)]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let LoginInput {
            email_address,
            password,
        } = input;

        let record = self
            .store
            .find_by_email(&email_address)
            .await
            .map_err(|e| AuthError::from_store("login", e))?;

        let password_valid = match &record {
            Some(record) => self
                .hasher
                .verify(password, record.password_hash.clone())
                .await
                .map_err(|e| AuthError::internal("login", e))?,
            None => self
                .hasher
                .verify_dummy(password)
                .await
                .map_err(|e| AuthError::internal("login", e))?,
        };

        let record = match record {
            Some(record) if password_valid && record.is_active => record,
            record => {
                tracing::info!(
                    target: TRACING_TARGET,
                    user_exists = record.is_some(),
                    password_valid = password_valid,
                    "login rejected"
                );
                return Err(AuthError::InvalidCredentials);
            }
        };

        let user = User::from(record);
        let token = self.issue(&user, "login")?;

        tracing::info!(
            target: TRACING_TARGET,
            user_id = %user.id,
            token_id = %token.token_id,
            "login successful"
        );

        Ok(AuthSession { user, token })
    }

    /// Returns the user with the given identifier.
    #[tracing::instrument(skip(self), target = TRACING_TARGET)]
    pub async fn get_user(&self, user_id: Uuid) -> Result<User, AuthError> {
        let record = self
            .store
            .find_by_id(user_id)
            .await
            .map_err(|e| AuthError::from_store("get_user", e))?;

        record.map(User::from).ok_or(AuthError::NotFound { user_id })
    }

    /// Returns every user, oldest first.
    #[tracing::instrument(skip_all, target = TRACING_TARGET)]
    pub async fn list_users(&self) -> Result<Vec<User>, AuthError> {
        let records = self
            .store
            .list_all()
            .await
            .map_err(|e| AuthError::from_store("list_users", e))?;

        Ok(records.into_iter().map(User::from).collect())
    }

    fn issue(&self, user: &User, operation: &'static str) -> Result<IssuedToken, AuthError> {
        self.issuer
            .issue(user.id, &user.roles)
            .map_err(|e| AuthError::internal(operation, e))
    }
}

impl fmt::Debug for AuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthService")
            .field("hasher", &self.hasher)
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}
