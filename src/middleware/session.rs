//! Client session extractors.
//!
//! The frontend tags every request with an `X-Session-Id` header so that scans
//! can be grouped per browser session. There is no authentication behind it.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::errors::AppError;
use crate::AppState;

pub const SESSION_HEADER: &str = "x-session-id";

/// Session id if the client sent one. Blank values count as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(pub Option<String>);

/// Session id that must be present.
///
/// ```ignore
/// async fn handler(RequireSession(session_id): RequireSession) -> impl IntoResponse { ... }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequireSession(pub String);

fn header_value(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl FromRequestParts<AppState> for SessionId {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(SessionId(header_value(parts)))
    }
}

impl FromRequestParts<AppState> for RequireSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        header_value(parts)
            .map(RequireSession)
            .ok_or_else(|| AppError::Validation("No session ID found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/projects");
        if let Some(value) = header {
            builder = builder.header("X-Session-Id", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn header_is_case_insensitive_and_trimmed() {
        assert_eq!(header_value(&parts_with(Some("  abc-123 "))), Some("abc-123".to_string()));
    }

    #[test]
    fn blank_header_is_absent() {
        assert_eq!(header_value(&parts_with(Some("   "))), None);
        assert_eq!(header_value(&parts_with(None)), None);
    }
}
