//! Credential hashing and token signing keys.

mod password_hasher;
mod session_keys;

pub use password_hasher::{PasswordHasher, PasswordHasherConfig};
pub use session_keys::{SessionKeys, SessionKeysConfig};

#[cfg(test)]
pub(crate) use password_hasher::tests::test_hasher;
#[cfg(test)]
pub(crate) use session_keys::tests::test_keys;
