//! Registration and login handlers.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;

use super::request::{Login, Register};
use super::response::AuthResponse;
use crate::extract::{Json, ValidateJson};
use crate::handler::Result;
use crate::service::{AuthService, ServiceState};
use crate::utility::tracing_targets::AUTHENTICATION_HANDLER as TRACING_TARGET;

/// Creates a user and issues its first token.
#[tracing::instrument(skip_all)]
async fn register(
    State(auth_service): State<AuthService>,
    ValidateJson(request): ValidateJson<Register>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    tracing::trace!(
        target: TRACING_TARGET,
        email = %request.email_address,
        "registration attempt"
    );

    let session = auth_service.register(request.into()).await?;

    tracing::info!(
        target: TRACING_TARGET,
        user_id = %session.user.id,
        token_id = %session.token.token_id,
        "registration successful"
    );

    Ok((StatusCode::CREATED, Json(session.into())))
}

/// Verifies credentials and issues a token.
#[tracing::instrument(skip_all)]
async fn login(
    State(auth_service): State<AuthService>,
    ValidateJson(request): ValidateJson<Login>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    tracing::trace!(
        target: TRACING_TARGET,
        email = %request.email_address,
        "login attempt"
    );

    let session = auth_service.login(request.into()).await?;

    tracing::info!(
        target: TRACING_TARGET,
        user_id = %session.user.id,
        token_id = %session.token.token_id,
        "login successful"
    );

    Ok((StatusCode::OK, Json(session.into())))
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::handler::test::create_test_server_with_router;
    use crate::service::tests::decode_token;

    fn register_body(email: &str, password: &str) -> Value {
        json!({
            "emailAddress": email,
            "password": password,
            "displayName": "Ada Lovelace",
        })
    }

    #[tokio::test]
    async fn register_returns_user_and_token() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|_| routes())?;

        let response = server
            .post("/auth/register")
            .json(&register_body("a@x.com", "correct horse"))
            .await;
        response.assert_status(StatusCode::CREATED);

        let body: Value = response.json();
        assert_eq!(body["user"]["emailAddress"], "a@x.com");
        assert_eq!(body["user"]["displayName"], "Ada Lovelace");
        assert_eq!(body["user"]["roles"], json!(["user"]));
        assert!(body["user"].get("passwordHash").is_none());
        assert!(!response.text().contains("correct horse"));

        let token = body["token"]["token"].as_str().unwrap_or_default();
        let claims = decode_token(token)?;
        assert_eq!(claims.user_id.to_string(), body["user"]["id"].as_str().unwrap_or_default());
        assert_eq!(claims.token_id.to_string(), body["token"]["tokenId"].as_str().unwrap_or_default());
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_register_conflicts() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|_| routes())?;

        server
            .post("/auth/register")
            .json(&register_body("a@x.com", "correct horse"))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .post("/auth/register")
            .json(&register_body("a@x.com", "another password"))
            .await;
        response.assert_status(StatusCode::CONFLICT);

        let body: Value = response.json();
        assert_eq!(body["name"], "conflict");
        assert_eq!(body["message"], "a@x.com already exists");
        Ok(())
    }

    #[tokio::test]
    async fn register_rejects_invalid_input() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|_| routes())?;

        let response = server
            .post("/auth/register")
            .json(&register_body("not-an-email", "short"))
            .await;
        response.assert_status_bad_request();

        let body: Value = response.json();
        assert_eq!(body["name"], "bad_request");
        assert_eq!(body["resource"], "request");
        Ok(())
    }

    #[tokio::test]
    async fn login_returns_token_for_stored_user() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|_| routes())?;

        let registered: Value = server
            .post("/auth/register")
            .json(&register_body("a@x.com", "correct horse"))
            .await
            .json();

        let response = server
            .post("/auth/login")
            .json(&json!({ "emailAddress": "a@x.com", "password": "correct horse" }))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["user"], registered["user"]);
        let claims = decode_token(body["token"]["token"].as_str().unwrap_or_default())?;
        assert_eq!(claims.user_id.to_string(), registered["user"]["id"].as_str().unwrap_or_default());
        Ok(())
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|_| routes())?;

        server
            .post("/auth/register")
            .json(&register_body("a@x.com", "correct horse"))
            .await
            .assert_status(StatusCode::CREATED);

        let wrong_password = server
            .post("/auth/login")
            .json(&json!({ "emailAddress": "a@x.com", "password": "battery staple" }))
            .await;
        let unknown_email = server
            .post("/auth/login")
            .json(&json!({ "emailAddress": "missing@x.com", "password": "correct horse" }))
            .await;

        wrong_password.assert_status_unauthorized();
        unknown_email.assert_status_unauthorized();
        assert_eq!(wrong_password.text(), unknown_email.text());

        let body: Value = unknown_email.json();
        assert_eq!(body["message"], "Credentials are not valid");
        Ok(())
    }
}
