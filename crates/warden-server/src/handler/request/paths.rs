//! Path parameter types for HTTP handlers.

use serde::Deserialize;
use uuid::Uuid;

/// Path parameters for single-user operations.
#[must_use]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPathParams {
    /// Unique identifier of the user.
    pub user_id: Uuid,
}
