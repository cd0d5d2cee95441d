//! Users table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Users table constraint violations.
///
/// Names match the constraints and indexes declared by the embedded migrations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum UserConstraints {
    // User validation constraints
    #[strum(serialize = "users_email_address_not_empty")]
    EmailAddressNotEmpty,
    #[strum(serialize = "users_email_address_length_max")]
    EmailAddressLengthMax,
    #[strum(serialize = "users_display_name_length")]
    DisplayNameLength,
    #[strum(serialize = "users_password_hash_not_empty")]
    PasswordHashNotEmpty,

    // User chronological constraints
    #[strum(serialize = "users_updated_after_created")]
    UpdatedAfterCreated,

    // User unique constraints
    #[strum(serialize = "users_email_address_unique_idx")]
    EmailAddressUnique,
    #[strum(serialize = "users_pkey")]
    PrimaryKey,
}

impl UserConstraints {
    /// Creates a new [`UserConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }
}

impl From<UserConstraints> for String {
    #[inline]
    fn from(val: UserConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for UserConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn parses_every_declared_constraint() {
        for constraint in UserConstraints::iter() {
            let name = constraint.to_string();
            assert_eq!(UserConstraints::new(&name), Some(constraint));
        }
    }

    #[test]
    fn parses_unique_email_index() {
        let constraint = UserConstraints::new("users_email_address_unique_idx");
        assert_eq!(constraint, Some(UserConstraints::EmailAddressUnique));
    }

    #[test]
    fn unknown_constraint_is_rejected() {
        assert_eq!(UserConstraints::new("accounts_email_format"), None);
    }
}
