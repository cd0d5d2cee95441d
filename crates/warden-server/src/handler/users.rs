//! User lookup handlers.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;

use super::request::UserPathParams;
use crate::extract::{Json, Path};
use crate::handler::Result;
use crate::service::{AuthService, ServiceState, User};
use crate::utility::tracing_targets::USERS_HANDLER as TRACING_TARGET;

/// Returns every stored user.
#[tracing::instrument(skip_all)]
async fn list_users(
    State(auth_service): State<AuthService>,
) -> Result<(StatusCode, Json<Vec<User>>)> {
    let users = auth_service.list_users().await?;

    tracing::debug!(
        target: TRACING_TARGET,
        user_count = users.len(),
        "users listed"
    );

    Ok((StatusCode::OK, Json(users)))
}

/// Returns a single user by identifier.
#[tracing::instrument(skip_all)]
async fn get_user(
    State(auth_service): State<AuthService>,
    Path(path_params): Path<UserPathParams>,
) -> Result<(StatusCode, Json<User>)> {
    let user = auth_service.get_user(path_params.user_id).await?;

    tracing::debug!(
        target: TRACING_TARGET,
        user_id = %user.id,
        "user retrieved"
    );

    Ok((StatusCode::OK, Json(user)))
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/{userId}", get(get_user))
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use uuid::Uuid;

    use super::*;
    use crate::handler::test::create_test_server;

    #[tokio::test]
    async fn get_user_by_id() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let registered: Value = server
            .post("/auth/register")
            .json(&json!({
                "emailAddress": "a@x.com",
                "password": "correct horse",
                "displayName": "Ada",
            }))
            .await
            .json();
        let user_id = registered["user"]["id"].as_str().unwrap_or_default();

        let response = server.get(&format!("/users/{user_id}")).await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body, registered["user"]);
        assert!(body.get("passwordHash").is_none());
        Ok(())
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server.get(&format!("/users/{}", Uuid::now_v7())).await;
        response.assert_status_not_found();

        let body: Value = response.json();
        assert_eq!(body["name"], "not_found");
        assert_eq!(body["message"], "User not found");
        Ok(())
    }

    #[tokio::test]
    async fn malformed_user_id_is_bad_request() -> anyhow::Result<()> {
        let server = create_test_server()?;

        server.get("/users/42").await.assert_status_bad_request();
        Ok(())
    }

    #[tokio::test]
    async fn lists_registered_users() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server.get("/users").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), json!([]));

        for email in ["a@x.com", "b@x.com"] {
            server
                .post("/auth/register")
                .json(&json!({
                    "emailAddress": email,
                    "password": "correct horse",
                    "displayName": "Someone",
                }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let users: Vec<Value> = server.get("/users").await.json();
        assert_eq!(users.len(), 2);
        assert!(users.iter().all(|user| user.get("passwordHash").is_none()));
        Ok(())
    }
}
