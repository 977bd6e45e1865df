//! JSON envelopes shared by every endpoint: `{success: true, ...}` on the
//! happy path, `{success: false, message, error?}` on failure.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct ApiSuccess<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T: Serialize> ApiSuccess<T> {
    pub(crate) fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
            count: None,
        }
    }

    pub(crate) fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

impl<T: Serialize> ApiSuccess<Vec<T>> {
    pub(crate) fn list(records: Vec<T>) -> Self {
        let count = records.len();
        Self {
            success: true,
            message: None,
            data: records,
            count: Some(count),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
struct ApiFailure {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub(crate) fn error_response(
    status: StatusCode,
    message: impl Into<String>,
    error: Option<String>,
) -> Response {
    let body = ApiFailure {
        success: false,
        message: message.into(),
        error,
    };
    (status, Json(body)).into_response()
}
