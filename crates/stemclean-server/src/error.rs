//! HTTP error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use stemclean_core::StemCleanError;

/// Errors a handler can return. Every variant renders as JSON with an
/// `error` field; the status code follows the failure class.
#[derive(Debug)]
pub enum ApiError {
    /// Request parameters failed validation
    Validation(String),
    /// Requested file does not exist, or lies outside the output directory
    NotFound,
    /// Pipeline failure, status mapped by stage
    Pipeline(StemCleanError),
    /// Service-level failure outside the pipeline
    Internal(String),
}

impl From<StemCleanError> for ApiError {
    fn from(e: StemCleanError) -> Self {
        ApiError::Pipeline(e)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Pipeline(e) => match e {
                // The caller's URL could not be retrieved
                StemCleanError::Fetch(_) => StatusCode::BAD_REQUEST,
                StemCleanError::OutputExists(_) => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Validation(msg) => msg.clone(),
            ApiError::NotFound => "File not found".to_string(),
            ApiError::Pipeline(e) => e.to_string(),
            ApiError::Internal(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({"error": self.message()}))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use stemclean_core::error::{FetchError, TrimError};
    use stemclean_split::SplitError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Validation("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Pipeline(FetchError::NoAudioStream.into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Pipeline(StemCleanError::OutputExists(PathBuf::from("x"))).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Pipeline(SplitError::SpleeterNotInstalled.into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Pipeline(TrimError::FfmpegFailed(Some(1)).into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(ApiError::NotFound.message(), "File not found");
    }
}
