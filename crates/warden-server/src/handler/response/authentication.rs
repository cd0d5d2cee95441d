use std::fmt;

use jiff::Timestamp;
use serde::Serialize;
use uuid::Uuid;

use crate::service::{AuthSession, IssuedToken, User};

/// Signed bearer token and its metadata.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub token_id: Uuid,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
}

impl From<IssuedToken> for TokenResponse {
    fn from(token: IssuedToken) -> Self {
        Self {
            token: token.token,
            token_id: token.token_id,
            issued_at: token.issued_at,
            expires_at: token.expires_at,
        }
    }
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("token_id", &self.token_id)
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Response returned after registration or login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: User,
    pub token: TokenResponse,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            user: session.user,
            token: session.token.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_response() -> TokenResponse {
        TokenResponse {
            token: "eyJhbGciOiJFZERTQSJ9.payload.signature".to_owned(),
            token_id: Uuid::new_v4(),
            issued_at: Timestamp::UNIX_EPOCH,
            expires_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn debug_omits_bearer_token() {
        let response = token_response();
        let debug = format!("{response:?}");

        assert!(!debug.contains(&response.token));
        assert!(debug.contains(&response.token_id.to_string()));
    }

    #[test]
    fn auth_response_debug_omits_bearer_token() {
        let response = AuthResponse {
            user: User {
                id: Uuid::now_v7(),
                email_address: "a@x.com".to_owned(),
                display_name: "A".to_owned(),
                is_active: true,
                roles: vec!["user".to_owned()],
                created_at: Timestamp::UNIX_EPOCH,
            },
            token: token_response(),
        };
        let debug = format!("{response:?}");

        assert!(!debug.contains(&response.token.token));
        assert!(debug.contains("a@x.com"));
    }

    #[test]
    fn serialized_body_still_carries_token() -> anyhow::Result<()> {
        let response = token_response();
        let json = serde_json::to_value(&response)?;
        assert_eq!(json["token"], response.token.as_str());
        Ok(())
    }
}
