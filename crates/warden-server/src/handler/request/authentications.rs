//! Authentication request types.

use std::fmt;

use serde::Deserialize;
use validator::Validate;

use crate::service::{LoginInput, RegisterInput};

/// Request payload for registration.
#[must_use]
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Register {
    /// Email address of the new user.
    #[validate(email)]
    #[validate(length(max = 254))]
    pub email_address: String,

    /// Plaintext password, hashed before storage.
    #[validate(length(min = 8, max = 128))]
    pub password: String,

    /// Display name of the new user.
    #[validate(length(min = 1, max = 100))]
    pub display_name: String,
}

impl fmt::Debug for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Register")
            .field("email_address", &self.email_address)
            .field("display_name", &self.display_name)
            .finish_non_exhaustive()
    }
}

impl From<Register> for RegisterInput {
    fn from(request: Register) -> Self {
        Self {
            email_address: request.email_address,
            password: request.password,
            display_name: request.display_name,
        }
    }
}

/// Request payload for login.
///
/// The password is only bounded in length: a wrong-format password must
/// fail the same way a wrong password does.
#[must_use]
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Login {
    /// Email address of the user.
    #[validate(length(min = 1, max = 254))]
    pub email_address: String,

    /// Plaintext password.
    #[validate(length(min = 1, max = 1000))]
    pub password: String,
}

impl fmt::Debug for Login {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Login")
            .field("email_address", &self.email_address)
            .finish_non_exhaustive()
    }
}

impl From<Login> for LoginInput {
    fn from(request: Login) -> Self {
        Self {
            email_address: request.email_address,
            password: request.password,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_omits_password() {
        let request = Register {
            email_address: "a@x.com".to_owned(),
            password: "hunter22hunter22".to_owned(),
            display_name: "A".to_owned(),
        };
        assert!(!format!("{request:?}").contains("hunter22"));

        let request = Login {
            email_address: "a@x.com".to_owned(),
            password: "hunter22hunter22".to_owned(),
        };
        assert!(!format!("{request:?}").contains("hunter22"));
    }

    #[test]
    fn register_bounds() {
        let request = Register {
            email_address: "a@x.com".to_owned(),
            password: "p1".to_owned(),
            display_name: String::new(),
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("display_name"));
        assert!(!fields.contains_key("email_address"));
    }
}
