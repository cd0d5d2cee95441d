//! Maps [`AuthError`] onto HTTP responses.

use crate::handler::{Error, ErrorKind};
use crate::service::AuthError;

impl From<AuthError> for Error<'static> {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::AlreadyExists { email } => ErrorKind::Conflict
                .with_message(format!("{email} already exists"))
                .with_resource("user"),
            AuthError::InvalidCredentials => ErrorKind::Unauthorized
                .with_message("Credentials are not valid")
                .with_resource("authentication"),
            AuthError::NotFound { user_id } => ErrorKind::NotFound
                .with_message("User not found")
                .with_resource("user")
                .with_context(format!("user_id: {user_id}")),
            AuthError::Internal(_) => ErrorKind::InternalServerError
                .with_message("Something went wrong"),
        }
    }
}
