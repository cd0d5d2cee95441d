//! Password hashing and verification using Argon2id.
//!
//! Argon2 is CPU-bound, so the async entry points ([`hash`],
//! [`verify`] and [`verify_dummy`]) move the work onto tokio's blocking thread
//! pool and never run it on a request-handling worker.
//!
//! [`hash`]: PasswordHasher::hash
//! [`verify`]: PasswordHasher::verify
//! [`verify_dummy`]: PasswordHasher::verify_dummy

use std::fmt;
use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{Error as ArgonError, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _, PasswordVerifier, Version};
#[cfg(any(test, feature = "config"))]
use clap::Args;
use rand::Rng;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize};

use crate::utility::tracing_targets::PASSWORD_HASHER as TRACING_TARGET;
use crate::{Error, Result};

/// Argon2id cost parameters.
///
/// Defaults follow the OWASP recommendation (19 MiB, 2 iterations, 1 lane).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "config"), derive(Args))]
pub struct PasswordHasherConfig {
    /// Argon2 memory cost in KiB.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "ARGON2_MEMORY_KIB", default_value_t = Params::DEFAULT_M_COST)
    )]
    pub argon2_memory_kib: u32,

    /// Argon2 number of iterations.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "ARGON2_ITERATIONS", default_value_t = Params::DEFAULT_T_COST)
    )]
    pub argon2_iterations: u32,

    /// Argon2 degree of parallelism.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "ARGON2_PARALLELISM", default_value_t = Params::DEFAULT_P_COST)
    )]
    pub argon2_parallelism: u32,
}

impl Default for PasswordHasherConfig {
    fn default() -> Self {
        Self {
            argon2_memory_kib: Params::DEFAULT_M_COST,
            argon2_iterations: Params::DEFAULT_T_COST,
            argon2_parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl PasswordHasherConfig {
    /// Builds the Argon2 parameters, rejecting out-of-range costs.
    pub fn params(&self) -> Result<Params> {
        Params::new(
            self.argon2_memory_kib,
            self.argon2_iterations,
            self.argon2_parallelism,
            None,
        )
        .map_err(|e| Error::config(format!("invalid Argon2 parameters: {e}")))
    }
}

/// Password hashing and verification service using Argon2id.
///
/// Cheap to clone; clones share the dummy hash built at construction.
#[derive(Clone)]
pub struct PasswordHasher {
    inner: Arc<PasswordHasherInner>,
}

struct PasswordHasherInner {
    argon2: Argon2<'static>,
    dummy_hash: String,
}

impl PasswordHasher {
    /// Creates a new [`PasswordHasher`] with the given cost parameters.
    ///
    /// Also computes the dummy hash used by [`verify_dummy_password`], so
    /// this pays the cost of one hash up front.
    ///
    /// [`verify_dummy_password`]: Self::verify_dummy_password
    pub fn new(config: &PasswordHasherConfig) -> Result<Self> {
        let params = config.params()?;

        tracing::debug!(
            target: TRACING_TARGET,
            memory_kib = params.m_cost(),
            iterations = params.t_cost(),
            parallelism = params.p_cost(),
            "password hasher configured"
        );

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let dummy_password: String = rand::rng()
            .sample_iter(Alphanumeric)
            .take(24)
            .map(char::from)
            .collect();
        let dummy_hash = Self::hash_with(&argon2, &dummy_password)?;

        Ok(Self {
            inner: Arc::new(PasswordHasherInner { argon2, dummy_hash }),
        })
    }

    /// Hashes a password with a fresh random salt.
    ///
    /// Returns a PHC string that embeds the algorithm, parameters and salt.
    /// Blocks the calling thread for the full cost of the hash.
    pub fn hash_password(&self, password: &str) -> Result<String> {
        Self::hash_with(&self.inner.argon2, password)
    }

    fn hash_with(argon2: &Argon2<'_>, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "password hashing operation failed"
                );
                Error::internal("password_hasher", "hash generation failed")
                    .with_source(e)
            })?;

        Ok(password_hash.to_string())
    }

    /// Verifies a password against a stored PHC hash.
    ///
    /// A mismatch is `Ok(false)`. Only a malformed stored hash or an internal
    /// Argon2 failure is an error.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(stored_hash).map_err(|e| {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %e,
                "invalid password hash format"
            );
            Error::internal("password_hasher", "stored hash is malformed")
                .with_source(e)
        })?;

        match self
            .inner
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(ArgonError::Password) => {
                tracing::debug!(target: TRACING_TARGET, "password mismatch");
                Ok(false)
            }
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "password verification system error"
                );
                Err(Error::internal("password_hasher", "verification failed")
                    .with_source(e))
            }
        }
    }

    /// Verifies the password against a throwaway hash and returns `false`.
    ///
    /// Used when the account does not exist so that the response takes as
    /// long as a real verification. The dummy hash is built in [`new`] with
    /// the configured parameters, so every call costs exactly one verify.
    ///
    /// [`new`]: Self::new
    pub fn verify_dummy_password(&self, password: &str) -> bool {
        let _ = self.verify_password(password, &self.inner.dummy_hash);
        false
    }

    /// Hashes a password on the blocking thread pool.
    pub async fn hash(&self, password: String) -> Result<String> {
        let this = self.clone();
        run_blocking(move || this.hash_password(&password)).await?
    }

    /// Verifies a password on the blocking thread pool.
    pub async fn verify(&self, password: String, stored_hash: String) -> Result<bool> {
        let this = self.clone();
        run_blocking(move || this.verify_password(&password, &stored_hash)).await?
    }

    /// Runs [`verify_dummy_password`] on the blocking thread pool.
    ///
    /// [`verify_dummy_password`]: Self::verify_dummy_password
    pub async fn verify_dummy(&self, password: String) -> Result<bool> {
        let this = self.clone();
        run_blocking(move || this.verify_dummy_password(&password)).await
    }
}

impl fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = self.inner.argon2.params();
        f.debug_struct("PasswordHasher")
            .field("memory_kib", &params.m_cost())
            .field("iterations", &params.t_cost())
            .field("parallelism", &params.p_cost())
            .finish_non_exhaustive()
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        tracing::error!(
            target: TRACING_TARGET,
            error = %e,
            "password hashing task failed"
        );
        Error::internal("password_hasher", "blocking task failed").with_source(e)
    })
}
