//! User model for PostgreSQL database operations.
//!
//! ## Models
//!
//! - [`User`] - Stored user record, including the password hash
//! - [`NewUser`] - Data structure for inserting a new user

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::users;

/// Stored user record.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Email used for authentication, unique and compared as stored.
    pub email_address: String,
    /// Human-readable name.
    pub display_name: String,
    /// PHC-formatted password hash.
    pub password_hash: String,
    /// Whether the user may authenticate.
    pub is_active: bool,
    /// Role names granted to the user.
    pub roles: Vec<String>,
    /// Timestamp when the user was created.
    pub created_at: Timestamp,
    /// Timestamp when the user was last updated.
    pub updated_at: Timestamp,
}

/// Data for creating a new user.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewUser {
    /// Identifier assigned by the caller (UUIDv7).
    pub id: Uuid,
    /// Email used for authentication.
    pub email_address: String,
    /// Human-readable name.
    pub display_name: String,
    /// PHC-formatted password hash.
    pub password_hash: String,
    /// Whether the user may authenticate, database default when `None`.
    pub is_active: Option<bool>,
    /// Role names, database default (`{user}`) when `None`.
    pub roles: Option<Vec<String>>,
}

impl User {
    /// Returns the creation time as a [`jiff::Timestamp`].
    pub fn created_at(&self) -> jiff::Timestamp {
        self.created_at.to_jiff()
    }
}
