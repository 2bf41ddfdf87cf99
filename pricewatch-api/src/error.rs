use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Caller-facing failures. Messages are fixed; the underlying cause is
/// logged where it happens and never serialized.
///
/// ```json
/// {"message": "Error getting device information"}
/// ```
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    /// Fetch, unsupported retailer or price extraction failed. HTTP 500.
    #[error("Error getting device information")]
    DeviceInfo,

    /// Release date could not be turned into an age. HTTP 500.
    #[error("Error getting device age")]
    DeviceAge,

    /// Anything but GET on the device route. HTTP 405.
    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::DeviceInfo | ApiError::DeviceAge => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "message": self.to_string() });
        (self.status_code(), axum::Json(body)).into_response()
    }
}
