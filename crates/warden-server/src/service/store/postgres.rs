use jiff::Timestamp;
use uuid::Uuid;
use warden_postgres::model::{NewUser, User};
use warden_postgres::query::UserRepository;
use warden_postgres::{PgClient, PgError};

use super::{NewUserRecord, StoreError, UserRecord, UserStore};
use crate::utility::tracing_targets::USER_STORE as TRACING_TARGET;

/// Postgres-backed [`UserStore`].
#[derive(Debug, Clone)]
pub struct PgUserStore {
    client: PgClient,
}

impl PgUserStore {
    /// Creates a store on top of an existing client.
    ///
    /// Migrations are expected to have been applied already.
    pub fn new(client: PgClient) -> Self {
        Self { client }
    }

    async fn connection(&self) -> Result<warden_postgres::PgConn, StoreError> {
        self.client
            .get_connection()
            .await
            .map_err(|e| StoreError::Unavailable(e.into()))
    }
}

impl From<User> for UserRecord {
    fn from(user: User) -> Self {
        let created_at: Timestamp = user.created_at();
        Self {
            id: user.id,
            email_address: user.email_address,
            display_name: user.display_name,
            password_hash: user.password_hash,
            is_active: user.is_active,
            roles: user.roles,
            created_at,
        }
    }
}

fn classify(error: PgError, email: &str) -> StoreError {
    if error.is_unique_violation() {
        return StoreError::DuplicateKey {
            email: email.to_owned(),
        };
    }

    tracing::error!(
        target: TRACING_TARGET,
        backend = "postgres",
        error = %error,
        transient = error.is_transient(),
        "user store query failed"
    );
    StoreError::Unavailable(error.into())
}

#[async_trait::async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, user: NewUserRecord) -> Result<UserRecord, StoreError> {
        let email = user.email_address.trim().to_owned();
        let new_user = NewUser {
            id: user.id,
            email_address: email.clone(),
            display_name: user.display_name,
            password_hash: user.password_hash,
            is_active: None,
            roles: Some(user.roles),
        };

        let mut conn = self.connection().await?;
        let user = conn
            .create_user(new_user)
            .await
            .map_err(|e| classify(e, &email))?;
        Ok(user.into())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let mut conn = self.connection().await?;
        let user = conn
            .find_user_by_email(email)
            .await
            .map_err(|e| classify(e, email))?;
        Ok(user.map(Into::into))
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        let mut conn = self.connection().await?;
        let user = conn
            .find_user_by_id(user_id)
            .await
            .map_err(|e| classify(e, ""))?;
        Ok(user.map(Into::into))
    }

    async fn list_all(&self) -> Result<Vec<UserRecord>, StoreError> {
        let mut conn = self.connection().await?;
        let users = conn.list_users().await.map_err(|e| classify(e, ""))?;
        Ok(users.into_iter().map(Into::into).collect())
    }
}
