use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use healthsync_core::ValidationError;
use healthsync_storage::StorageError;

use crate::response::error_response;

/// Request-boundary failure. Validation problems map to 400, store failures
/// to 500 with the endpoint's own message and the underlying error echoed.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{message}: {source}")]
    Storage {
        message: &'static str,
        source: StorageError,
    },
}

impl ApiError {
    pub(crate) fn storage(message: &'static str, source: StorageError) -> Self {
        Self::Storage { message, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(error) => {
                error_response(StatusCode::BAD_REQUEST, error.to_string(), None)
            }
            ApiError::Storage { message, source } => {
                tracing::error!(%source, message, "request failed");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    message,
                    Some(source.to_string()),
                )
            }
        }
    }
}
