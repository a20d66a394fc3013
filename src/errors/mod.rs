//! Unified error handling with consistent API response envelope.

use axum::{
    extract::{multipart::MultipartError, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Consistent JSON envelope for all API responses.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap a successful result in the envelope.
    pub fn success(data: T) -> Json<Self> {
        Json(Self {
            status: "success",
            message: None,
            data: Some(data),
        })
    }

    /// Wrap a successful result together with a human-readable message.
    pub fn success_with_message(message: &str, data: T) -> Json<Self> {
        Json(Self {
            status: "success",
            message: Some(message.to_string()),
            data: Some(data),
        })
    }

    /// Wrap an error in the envelope.
    pub fn error(message: &str) -> Json<Self> {
        Json(Self {
            status: "error",
            message: Some(message.to_string()),
            data: None,
        })
    }
}

/// Application error type mapping to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("External tool error: {0}")]
    ExternalTool(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Check if this error represents a not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this error is the client's fault (4xx).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::Validation(_) | Self::PayloadTooLarge(_)
        )
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(err.body_text())
        } else {
            AppError::Validation(format!("Multipart error: {}", err.body_text()))
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg.clone()),
            AppError::ExternalTool(msg) => {
                tracing::error!(error = %msg, "External tool error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Analysis failed".to_string())
            }
            AppError::Parse(msg) => {
                tracing::error!(error = %msg, "Parse error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Analysis failed".to_string())
            }
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Io(e) => {
                tracing::error!(error = %e, "IO error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, ApiResponse::<()>::error(&message)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_response_success() {
        let response = ApiResponse::success("hello");
        let json = serde_json::to_value(&response.0).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"], "hello");
        assert!(json.get("message").is_none());
    }

    #[test]
    fn api_response_success_with_message() {
        let response = ApiResponse::success_with_message("File uploaded successfully", 7);
        let json = serde_json::to_value(&response.0).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["message"], "File uploaded successfully");
        assert_eq!(json["data"], 7);
    }

    #[test]
    fn api_response_error() {
        let response = ApiResponse::<()>::error("Contract file not found");
        let json = serde_json::to_value(&response.0).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "Contract file not found");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn app_error_is_not_found() {
        let err = AppError::NotFound("contract".to_string());
        assert!(err.is_not_found());
        assert!(err.is_client_error());
        assert!(!AppError::Internal("boom".to_string()).is_client_error());
    }

    #[test]
    fn app_error_display() {
        let err = AppError::Validation("projectName is required".to_string());
        assert_eq!(err.to_string(), "Validation error: projectName is required");
    }

    #[test]
    fn app_error_from_sqlx() {
        let sqlx_err = sqlx::Error::RowNotFound;
        let err: AppError = sqlx_err.into();
        assert!(matches!(err, AppError::Database(_)));
    }

    #[test]
    fn status_codes_follow_taxonomy() {
        let cases = [
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::PayloadTooLarge("x".into()), StatusCode::PAYLOAD_TOO_LARGE),
            (AppError::ExternalTool("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::Parse("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
