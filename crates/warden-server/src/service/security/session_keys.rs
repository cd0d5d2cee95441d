//! Signing keys for bearer tokens.
//!
//! Tokens are signed with an Ed25519 key pair stored as PEM files. The
//! private half signs, the public half is kept for verification by
//! collaborators and for the startup round-trip check.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[cfg(any(test, feature = "config"))]
use clap::Args;
use jsonwebtoken::{DecodingKey, EncodingKey};
use serde::{Deserialize, Serialize};

use crate::utility::tracing_targets::SESSION_KEYS as TRACING_TARGET;
use crate::{Error, Result};

/// Key file paths configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "config"), derive(Args))]
pub struct SessionKeysConfig {
    /// File path to the token decoding (public) key.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "AUTH_PUBLIC_PEM_FILEPATH", default_value = "./public.pem")
    )]
    #[serde(default = "SessionKeysConfig::default_decoding_key")]
    pub decoding_key: PathBuf,

    /// File path to the token encoding (private) key.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(
            long,
            env = "AUTH_PRIVATE_PEM_FILEPATH",
            default_value = "./private.pem"
        )
    )]
    #[serde(default = "SessionKeysConfig::default_encoding_key")]
    pub encoding_key: PathBuf,
}

impl SessionKeysConfig {
    fn default_decoding_key() -> PathBuf {
        "./public.pem".into()
    }

    fn default_encoding_key() -> PathBuf {
        "./private.pem".into()
    }
}

impl Default for SessionKeysConfig {
    fn default() -> Self {
        Self {
            decoding_key: Self::default_decoding_key(),
            encoding_key: Self::default_encoding_key(),
        }
    }
}

/// Ed25519 key pair used to sign bearer tokens.
#[derive(Clone)]
pub struct SessionKeys {
    inner: Arc<SessionKeysInner>,
}

struct SessionKeysInner {
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
}

impl SessionKeys {
    /// Loads and parses both keys from the configured files.
    pub async fn from_config(config: &SessionKeysConfig) -> Result<Self> {
        Self::validate_config(config)?;

        tracing::debug!(
            target: TRACING_TARGET,
            decoding_key_path = %config.decoding_key.display(),
            encoding_key_path = %config.encoding_key.display(),
            "loading session keys",
        );

        let decoding_pem = Self::read_pem(&config.decoding_key, "decoding").await?;
        let encoding_pem = Self::read_pem(&config.encoding_key, "encoding").await?;
        let keys = Self::from_pem(&decoding_pem, &encoding_pem)?;

        tracing::info!(target: TRACING_TARGET, "session keys loaded");
        Ok(keys)
    }

    /// Loads keys from file paths.
    pub async fn new(
        decoding_pem_key: impl AsRef<Path>,
        encoding_pem_key: impl AsRef<Path>,
    ) -> Result<Self> {
        let config = SessionKeysConfig {
            decoding_key: decoding_pem_key.as_ref().to_path_buf(),
            encoding_key: encoding_pem_key.as_ref().to_path_buf(),
        };
        Self::from_config(&config).await
    }

    /// Parses keys from in-memory PEM data.
    pub fn from_pem(decoding_pem: &[u8], encoding_pem: &[u8]) -> Result<Self> {
        let decoding_key = DecodingKey::from_ed_pem(decoding_pem).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %e,
                "failed to parse decoding key PEM data",
            );
            Error::auth("invalid decoding key PEM format").with_source(e)
        })?;

        let encoding_key = EncodingKey::from_ed_pem(encoding_pem).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %e,
                "failed to parse encoding key PEM data",
            );
            Error::auth("invalid encoding key PEM format").with_source(e)
        })?;

        Ok(Self {
            inner: Arc::new(SessionKeysInner {
                decoding_key,
                encoding_key,
            }),
        })
    }

    /// Returns the key used to verify tokens.
    #[inline]
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.inner.decoding_key
    }

    /// Returns the key used to sign tokens.
    #[inline]
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.inner.encoding_key
    }

    /// Signs and verifies a short-lived check token to prove that the two
    /// halves belong to the same key pair.
    pub fn validate_keys(&self) -> Result<()> {
        use jsonwebtoken::{Algorithm, Header, Validation, decode, encode};

        #[derive(Debug, Serialize, Deserialize)]
        struct ProbeClaims {
            sub: String,
            exp: i64,
        }

        let claims = ProbeClaims {
            sub: "key-check".to_owned(),
            exp: jiff::Timestamp::now().as_second() + 300,
        };

        let token = encode(&Header::new(Algorithm::EdDSA), &claims, self.encoding_key()).map_err(
            |e| {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "key validation failed during encoding",
                );
                Error::auth("key validation encoding failed").with_source(e)
            },
        )?;

        let validation = Validation::new(Algorithm::EdDSA);
        decode::<ProbeClaims>(&token, self.decoding_key(), &validation).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %e,
                "key validation failed during decoding",
            );
            Error::auth("key validation decoding failed").with_source(e)
        })?;

        tracing::debug!(target: TRACING_TARGET, "key validation successful");
        Ok(())
    }

    fn validate_config(config: &SessionKeysConfig) -> Result<()> {
        if !config.decoding_key.is_file() {
            return Err(Error::config(format!(
                "decoding key file does not exist: {}",
                config.decoding_key.display()
            )));
        }

        if !config.encoding_key.is_file() {
            return Err(Error::config(format!(
                "encoding key file does not exist: {}",
                config.encoding_key.display()
            )));
        }

        Ok(())
    }

    async fn read_pem(path: &Path, which: &'static str) -> Result<Vec<u8>> {
        tokio::fs::read(path).await.map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                path = %path.display(),
                key = which,
                error = %e,
                "failed to read key file",
            );
            Error::file_system(format!("failed to read {which} key file")).with_source(e)
        })
    }
}

impl fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeys").finish_non_exhaustive()
    }
}
