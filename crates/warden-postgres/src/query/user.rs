//! User repository for managing stored users.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{NewUser, User};
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY, schema};

/// Repository for user database operations.
///
/// Uniqueness of the email address is enforced by the
/// `users_email_address_unique_idx` index, so concurrent inserts of the same
/// email resolve to exactly one success.
pub trait UserRepository {
    /// Inserts a new user and returns the stored record.
    ///
    /// Fails with a [`PgError::Query`] unique violation when the email is taken.
    fn create_user(&mut self, new_user: NewUser) -> impl Future<Output = PgResult<User>> + Send;

    /// Finds a user by its unique identifier.
    fn find_user_by_id(
        &mut self,
        user_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Finds a user by email address, compared exactly as stored.
    fn find_user_by_email(
        &mut self,
        email: &str,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Lists all users, oldest first.
    fn list_users(&mut self) -> impl Future<Output = PgResult<Vec<User>>> + Send;
}

impl UserRepository for PgConnection {
    async fn create_user(&mut self, mut new_user: NewUser) -> PgResult<User> {
        use schema::users;

        new_user.email_address = new_user.email_address.trim().to_owned();
        new_user.display_name = new_user.display_name.trim().to_owned();

        let user = diesel::insert_into(users::table)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            user_id = %user.id,
            "user inserted"
        );

        Ok(user)
    }

    async fn find_user_by_id(&mut self, user_id: Uuid) -> PgResult<Option<User>> {
        use schema::users::{self, dsl};

        users::table
            .filter(dsl::id.eq(user_id))
            .select(User::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_user_by_email(&mut self, email: &str) -> PgResult<Option<User>> {
        use schema::users::{self, dsl};

        users::table
            .filter(dsl::email_address.eq(email.trim()))
            .select(User::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn list_users(&mut self) -> PgResult<Vec<User>> {
        use schema::users::{self, dsl};

        users::table
            .order(dsl::created_at.asc())
            .select(User::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }
}
