//! User persistence boundary.
//!
//! The authentication core talks to storage only through [`UserStore`].
//! Two backends are provided:
//!
//! - [`PgUserStore`]: Postgres through `warden-postgres`, uniqueness enforced
//!   by the `users_email_address_unique_idx` index.
//! - [`MemoryUserStore`]: process-local, uniqueness enforced inside a single
//!   write lock. Intended for development and tests.

mod memory;
mod postgres;

use std::fmt;

use jiff::Timestamp;
use uuid::Uuid;

pub use self::memory::MemoryUserStore;
pub use self::postgres::PgUserStore;

/// Stored user, including the password hash.
///
/// Never leaves the service layer; see [`User`] for the outward view.
///
/// [`User`]: crate::service::User
#[derive(Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: Uuid,
    pub email_address: String,
    pub display_name: String,
    /// PHC-formatted password hash.
    pub password_hash: String,
    pub is_active: bool,
    pub roles: Vec<String>,
    pub created_at: Timestamp,
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("email_address", &self.email_address)
            .field("display_name", &self.display_name)
            .field("is_active", &self.is_active)
            .field("roles", &self.roles)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// Data for a user about to be created.
#[derive(Clone)]
pub struct NewUserRecord {
    /// Identifier assigned by the caller.
    pub id: Uuid,
    pub email_address: String,
    pub display_name: String,
    pub password_hash: String,
    pub roles: Vec<String>,
}

impl fmt::Debug for NewUserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUserRecord")
            .field("id", &self.id)
            .field("email_address", &self.email_address)
            .field("display_name", &self.display_name)
            .field("roles", &self.roles)
            .finish_non_exhaustive()
    }
}

/// Failures reported by a [`UserStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A user with this email address already exists.
    #[error("{email} already exists")]
    DuplicateKey { email: String },

    /// The backend failed for any other reason.
    #[error("user store unavailable")]
    Unavailable(#[from] crate::Error),
}

/// Persistence boundary for users.
///
/// Lookups return `Ok(None)` when nothing matches; errors are reserved for
/// backend failures and the duplicate-email condition on [`create`].
///
/// [`create`]: UserStore::create
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user, failing with [`StoreError::DuplicateKey`] if the email is taken.
    ///
    /// Must be atomic: of two concurrent creates with the same email, exactly
    /// one succeeds.
    async fn create(&self, user: NewUserRecord) -> Result<UserRecord, StoreError>;

    /// Finds a user by email address, compared exactly as stored.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Finds a user by identifier.
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserRecord>, StoreError>;

    /// Returns every user, oldest first.
    async fn list_all(&self) -> Result<Vec<UserRecord>, StoreError>;
}
