//! Bearer token issuance.

use std::sync::Arc;

#[cfg(any(test, feature = "config"))]
use clap::Args;
use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::{Algorithm, Header, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::service::SessionKeys;
use crate::utility::tracing_targets::TOKEN_ISSUER as TRACING_TARGET;
use crate::{Error, Result};

/// Longest lifetime a token may be configured with (30 days).
const MAX_TOKEN_LIFETIME_SECS: u64 = 30 * 24 * 60 * 60;

/// Token signing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "config"), derive(Args))]
pub struct TokenIssuerConfig {
    /// Lifetime of issued tokens in seconds.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "AUTH_TOKEN_LIFETIME_SECS", default_value = "21600")
    )]
    pub token_lifetime_secs: u64,

    /// Value of the `iss` claim.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "AUTH_TOKEN_ISSUER", default_value = "warden")
    )]
    pub token_issuer: String,

    /// Value of the `aud` claim.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "AUTH_TOKEN_AUDIENCE", default_value = "warden:api")
    )]
    pub token_audience: String,
}

impl Default for TokenIssuerConfig {
    fn default() -> Self {
        Self {
            token_lifetime_secs: 6 * 60 * 60,
            token_issuer: "warden".to_owned(),
            token_audience: "warden:api".to_owned(),
        }
    }
}

impl TokenIssuerConfig {
    /// Validates the lifetime and claim values.
    pub fn validate(&self) -> Result<()> {
        if self.token_lifetime_secs == 0 || self.token_lifetime_secs > MAX_TOKEN_LIFETIME_SECS {
            return Err(Error::config(format!(
                "token lifetime must be between 1 and {MAX_TOKEN_LIFETIME_SECS} seconds"
            )));
        }

        if self.token_issuer.trim().is_empty() {
            return Err(Error::config("token issuer cannot be empty"));
        }

        if self.token_audience.trim().is_empty() {
            return Err(Error::config("token audience cannot be empty"));
        }

        Ok(())
    }
}

/// Claims embedded in every issued token.
///
/// Timestamps are seconds since the Unix epoch, as RFC 7519 requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthClaims {
    /// Issuer.
    #[serde(rename = "iss")]
    pub issued_by: String,
    /// Audience.
    #[serde(rename = "aud")]
    pub audience: String,
    /// Unique token identifier.
    #[serde(rename = "jti")]
    pub token_id: Uuid,
    /// Identifier of the authenticated user.
    #[serde(rename = "sub")]
    pub user_id: Uuid,
    /// Issued at.
    #[serde(rename = "iat")]
    pub issued_at: i64,
    /// Expiration time.
    #[serde(rename = "exp")]
    pub expires_at: i64,
    /// Roles held by the user at issue time.
    #[serde(default)]
    pub roles: Vec<String>,
}

/// A freshly signed token together with its metadata.
#[derive(Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// The compact JWS.
    pub token: String,
    /// Value of the `jti` claim.
    pub token_id: Uuid,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
}

impl std::fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedToken")
            .field("token_id", &self.token_id)
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Signs bearer tokens with the server-held key.
///
/// Tokens are stateless: their validity rests on the signature and the
/// `exp` claim alone.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    keys: SessionKeys,
    issuer: Arc<str>,
    audience: Arc<str>,
    lifetime: SignedDuration,
}

impl TokenIssuer {
    /// Creates a new issuer from signing keys and configuration.
    pub fn new(keys: SessionKeys, config: &TokenIssuerConfig) -> Result<Self> {
        config.validate()?;

        // Bounded by `MAX_TOKEN_LIFETIME_SECS`, so the cast cannot wrap.
        let lifetime = SignedDuration::from_secs(config.token_lifetime_secs as i64);

        Ok(Self {
            keys,
            issuer: config.token_issuer.as_str().into(),
            audience: config.token_audience.as_str().into(),
            lifetime,
        })
    }

    /// Signs a token for the given user.
    pub fn issue(&self, user_id: Uuid, roles: &[String]) -> Result<IssuedToken> {
        let issued_at = Timestamp::from_second(Timestamp::now().as_second())
            .map_err(|e| Error::internal("token_issuer", "clock out of range").with_source(e))?;
        let expires_at = issued_at
            .checked_add(self.lifetime)
            .map_err(|e| Error::internal("token_issuer", "expiry out of range").with_source(e))?;

        let claims = AuthClaims {
            issued_by: self.issuer.to_string(),
            audience: self.audience.to_string(),
            token_id: Uuid::new_v4(),
            user_id,
            issued_at: issued_at.as_second(),
            expires_at: expires_at.as_second(),
            roles: roles.to_vec(),
        };

        let token = encode(
            &Header::new(Algorithm::EdDSA),
            &claims,
            self.keys.encoding_key(),
        )
        .map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                user_id = %user_id,
                error = %e,
                "failed to sign token"
            );
            Error::auth("token signing failed").with_source(e)
        })?;

        tracing::debug!(
            target: TRACING_TARGET,
            user_id = %user_id,
            token_id = %claims.token_id,
            expires_at = %expires_at,
            "token issued"
        );

        Ok(IssuedToken {
            token,
            token_id: claims.token_id,
            issued_at,
            expires_at,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use jsonwebtoken::{Validation, decode};

    use super::*;
    use crate::service::security::test_keys;

    pub(crate) fn test_issuer() -> TokenIssuer {
        TokenIssuer::new(test_keys(), &TokenIssuerConfig::default()).expect("valid test issuer")
    }

    /// Verifies a token the way an external collaborator would.
    pub(crate) fn decode_token(token: &str) -> anyhow::Result<AuthClaims> {
        let config = TokenIssuerConfig::default();
        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_issuer(&[config.token_issuer]);
        validation.set_audience(&[config.token_audience]);

        let data = decode::<AuthClaims>(token, test_keys().decoding_key(), &validation)?;
        Ok(data.claims)
    }

    #[test]
    fn issued_token_carries_subject_and_expiry() -> anyhow::Result<()> {
        let issuer = test_issuer();
        let user_id = Uuid::now_v7();
        let issued = issuer.issue(user_id, &["user".to_owned()])?;

        let claims = decode_token(&issued.token)?;
        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.token_id, issued.token_id);
        assert_eq!(claims.roles, vec!["user".to_owned()]);
        assert_eq!(claims.issued_at, issued.issued_at.as_second());
        assert_eq!(claims.expires_at - claims.issued_at, 6 * 60 * 60);
        Ok(())
    }

    #[test]
    fn user_id_is_carried_in_sub_claim() -> anyhow::Result<()> {
        let user_id = Uuid::now_v7();
        let issued = test_issuer().issue(user_id, &[])?;

        let config = TokenIssuerConfig::default();
        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_audience(&[config.token_audience]);
        let data =
            decode::<serde_json::Value>(&issued.token, test_keys().decoding_key(), &validation)?;

        assert_eq!(data.claims["sub"], user_id.to_string());
        assert!(data.claims.get("userId").is_none());
        Ok(())
    }

    #[test]
    fn every_token_has_a_fresh_id() -> anyhow::Result<()> {
        let issuer = test_issuer();
        let user_id = Uuid::now_v7();

        let first = issuer.issue(user_id, &[])?;
        let second = issuer.issue(user_id, &[])?;
        assert_ne!(first.token_id, second.token_id);
        Ok(())
    }

    #[test]
    fn rejects_wrong_audience() -> anyhow::Result<()> {
        let issued = test_issuer().issue(Uuid::now_v7(), &[])?;

        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_audience(&["someone-else"]);
        let result = decode::<AuthClaims>(&issued.token, test_keys().decoding_key(), &validation);
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn rejects_invalid_lifetime() {
        let config = TokenIssuerConfig {
            token_lifetime_secs: 0,
            ..TokenIssuerConfig::default()
        };
        assert!(TokenIssuer::new(test_keys(), &config).is_err());

        let config = TokenIssuerConfig {
            token_lifetime_secs: MAX_TOKEN_LIFETIME_SECS + 1,
            ..TokenIssuerConfig::default()
        };
        assert!(TokenIssuer::new(test_keys(), &config).is_err());
    }

    #[test]
    fn debug_output_omits_token() -> anyhow::Result<()> {
        let issued = test_issuer().issue(Uuid::now_v7(), &[])?;
        assert!(!format!("{issued:?}").contains(&issued.token));
        Ok(())
    }
}
