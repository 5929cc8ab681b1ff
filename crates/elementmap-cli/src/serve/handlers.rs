//! HTTP route handlers.
//!
//! Handlers stay thin: parse the request, open the store on a blocking
//! worker, and delegate to [`elementmap_core::ElementMapper`].

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use elementmap_core::{ElementMap, ErrorCode, MapError, StoreError, parse_element_id};
use thiserror::Error;
use tokio::task;
use tracing::{debug, error, warn};

use super::AppState;
use super::models::{ElementMapQuery, ErrorBody, ErrorDetail, HealthResponse};

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Map(#[from] MapError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("internal task failure: {0}")]
    Join(#[from] task::JoinError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Map(MapError::InvalidId(_)) => StatusCode::BAD_REQUEST,
            Self::Map(MapError::Store(StoreError::NotFound(_)))
            | Self::Store(StoreError::NotFound(_)) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> ErrorCode {
        match self {
            Self::Map(err) => err.code(),
            Self::Store(err) => err.code(),
            Self::Join(_) => ErrorCode::InternalUnexpected,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, status = status.as_u16(), "element map request failed");
        } else {
            debug!(error = %self, "rejected element map request");
        }
        let body = Json(ErrorBody {
            error: ErrorDetail {
                message: self.to_string(),
                code: self.code().code().to_string(),
            },
        });
        (status, body).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// GET `/actions/elementMap/getElementMap?id=<int>` (also `/api/element-map`).
///
/// Response format:
/// ```json
/// {
///   "from": [{"id": 200, "type": "entry", "title": "Launch", "url": "/admin/entries/news/200-launch"}],
///   "to": []
/// }
/// ```
pub async fn element_map(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ElementMapQuery>,
) -> Result<Json<ElementMap>, AppError> {
    let id = parse_element_id(query.id.as_deref().unwrap_or_default())?;
    let map = task::spawn_blocking(move || state.resolve(id)).await??;
    Ok(Json(map))
}

/// GET `/health` - Reports whether the content store opens cleanly.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let store = state.store_path.display().to_string();
    let opened = task::spawn_blocking(move || state.open_store().map(drop)).await;

    let (status, label) = match opened {
        Ok(Ok(())) => (StatusCode::OK, "ok"),
        Ok(Err(err)) => {
            warn!(error = %err, "health check could not open content store");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
        Err(err) => {
            error!(error = %err, "health check task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "error")
        }
    };
    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            store,
        }),
    )
}
