//! Request and response shapes for the HTTP endpoint.

use serde::{Deserialize, Serialize};

/// Query string of the element map routes.
#[derive(Debug, Deserialize)]
pub struct ElementMapQuery {
    /// Raw `id` parameter; validated by the handler so that a missing or
    /// malformed id yields the structured error body.
    #[serde(default)]
    pub id: Option<String>,
}

/// `{"error": {"message": ..., "code": ...}}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
    pub code: String,
}

/// Response for `/health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` when the content store opens and passes the schema check.
    pub status: String,
    pub store: String,
}
