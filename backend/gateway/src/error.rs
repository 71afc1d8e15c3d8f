//! HTTP mapping for handler failures.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use filekit_tools::{error_json, write_json, JsonError, JsonResponse};
use filekit_upload::UploadError;
use tracing::{error, warn};

#[derive(Debug)]
pub enum ApiError {
    Upload(UploadError),
    Json(JsonError),
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        Self::Upload(err)
    }
}

impl From<JsonError> for ApiError {
    fn from(err: JsonError) -> Self {
        Self::Json(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Upload(err) => match err {
                UploadError::Parse(_)
                | UploadError::InvalidFileName(_)
                | UploadError::NoFilesSubmitted => StatusCode::BAD_REQUEST,
                UploadError::SizeLimitExceeded { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                UploadError::Validation { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                UploadError::Io { .. } | UploadError::RandomnessUnavailable(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Json(err) => match err {
                JsonError::TooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
                JsonError::Remote(_) => StatusCode::BAD_GATEWAY,
                JsonError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_REQUEST,
            },
        }
    }

    /// Whether the request itself was at fault.
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::Upload(err) => err.is_client_error(),
            Self::Json(err) => err.is_client_error(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.is_client_error() {
            warn!(status = status.as_u16(), error = ?self, "Rejected request");
        } else {
            error!(status = status.as_u16(), error = ?self, "Request failed");
        }

        match self {
            // Files stored before the rejected part are reported back.
            Self::Upload(err) if !err.uploaded().is_empty() => {
                let payload = JsonResponse {
                    error: true,
                    message: err.to_string(),
                    data: Some(err.uploaded()),
                };
                write_json(status, &payload, None)
                    .unwrap_or_else(|e| error_json(&e, Some(StatusCode::INTERNAL_SERVER_ERROR)))
            }
            Self::Upload(err) => error_json(&err, Some(status)),
            Self::Json(err) => error_json(&err, Some(status)),
        }
    }
}
