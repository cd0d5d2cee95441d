//! Path parameter extractor with improved error handling.

use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequestParts, Path as AxumPath};
use axum::http::request::Parts;
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;

use super::sanitize_error_message;
use crate::handler::{Error, ErrorKind};

/// Path parameter extractor.
///
/// Malformed parameters (a user id that is not a UUID, for example) are
/// rejected with `400 Bad Request` and a hint about the expected format.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct Path<T>(pub T);

impl<T> Path<T> {
    /// Creates a new instance of [`Path`].
    #[inline]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Returns the inner path parameters.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let extractor =
            <AxumPath<T> as FromRequestParts<S>>::from_request_parts(parts, state).await;
        extractor.map(|x| Self(x.0)).map_err(Into::into)
    }
}

impl From<PathRejection> for Error<'static> {
    fn from(rejection: PathRejection) -> Self {
        match rejection {
            PathRejection::FailedToDeserializePathParams(err) => {
                let error_message = err.body_text();
                ErrorKind::BadRequest
                    .with_message(format!(
                        "Invalid path parameter format. {}",
                        deserialization_hint(&error_message)
                    ))
                    .with_context(sanitize_error_message(&error_message, 2, 150))
            }
            PathRejection::MissingPathParams(err) => ErrorKind::BadRequest
                .with_message("Required path parameter missing")
                .with_context(sanitize_error_message(&err.body_text(), 2, 150)),
            other => ErrorKind::InternalServerError
                .with_message("Path processing failed")
                .with_context(format!("unexpected path rejection: {other:?}")),
        }
    }
}

/// Returns a format hint for the parameter type named in a deserialization error.
fn deserialization_hint(error_message: &str) -> &'static str {
    let error_lower = error_message.to_lowercase();

    if error_lower.contains("uuid") || error_lower.contains("invalid character") {
        "UUID parameters must be in format: xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx"
    } else if error_lower.contains("invalid digit") || error_lower.contains("cannot parse") {
        "Numeric parameters must contain only digits"
    } else {
        "Check that the parameter format matches the expected type"
    }
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::routing::get;
    use axum_test::TestServer;
    use uuid::Uuid;

    use super::*;

    async fn show(Path(id): Path<Uuid>) -> String {
        id.to_string()
    }

    #[tokio::test]
    async fn rejects_non_uuid_parameter() -> anyhow::Result<()> {
        let server = TestServer::new(Router::new().route("/items/{id}", get(show)))?;

        let response = server.get("/items/not-a-uuid").await;
        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert_eq!(body["name"], "bad_request");

        let id = Uuid::now_v7();
        let response = server.get(&format!("/items/{id}")).await;
        response.assert_status_ok();
        response.assert_text(id.to_string());
        Ok(())
    }

    #[test]
    fn hints_match_parameter_type() {
        assert!(deserialization_hint("UUID parsing failed").starts_with("UUID"));
        assert!(deserialization_hint("invalid digit found in string").starts_with("Numeric"));
        assert!(deserialization_hint("something else").starts_with("Check"));
    }
}
