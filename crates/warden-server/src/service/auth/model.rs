use std::fmt;

use jiff::Timestamp;
use serde::Serialize;
use uuid::Uuid;

use crate::service::{IssuedToken, UserRecord};

/// Public view of a user. Carries no password material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email_address: String,
    pub display_name: String,
    pub is_active: bool,
    pub roles: Vec<String>,
    pub created_at: Timestamp,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            email_address: record.email_address,
            display_name: record.display_name,
            is_active: record.is_active,
            roles: record.roles,
            created_at: record.created_at,
        }
    }
}

/// Input to [`AuthService::register`], already validated by the caller.
///
/// [`AuthService::register`]: crate::service::AuthService::register
#[derive(Clone)]
pub struct RegisterInput {
    pub email_address: String,
    pub password: String,
    pub display_name: String,
}

impl fmt::Debug for RegisterInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterInput")
            .field("email_address", &self.email_address)
            .field("password", &"[redacted]")
            .field("display_name", &self.display_name)
            .finish()
    }
}

/// Input to [`AuthService::login`].
///
/// [`AuthService::login`]: crate::service::AuthService::login
#[derive(Clone)]
pub struct LoginInput {
    pub email_address: String,
    pub password: String,
}

impl fmt::Debug for LoginInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginInput")
            .field("email_address", &self.email_address)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Result of a successful registration or login.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub token: IssuedToken,
}
