//! HTTP mapping for agency errors.
//!
//! # Invariants
//! - Every error body is `{"error": <kind>, "details": <message>}`.
//! - Internal failures are logged here and never leak details.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde_json::json;
use spycat_core::{AgencyError, ErrorKind, ValidationError};
use std::fmt::{Display, Formatter};

const INTERNAL_MESSAGE: &str = "internal server error";

#[derive(Debug)]
pub enum ApiError {
    Agency(AgencyError),
    /// Request could not be decoded (path, query or body).
    BadRequest(String),
    /// Failure outside the agency core, e.g. a panicked blocking task.
    Internal(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Agency(err) => err.kind(),
            Self::BadRequest(_) => ErrorKind::Validation,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Agency(err) => write!(f, "{err}"),
            Self::BadRequest(message) | Self::Internal(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for ApiError {}

/// Response status for an error category.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::Conflict
        | ErrorKind::InvalidState
        | ErrorKind::InvalidTransition
        | ErrorKind::InvariantViolation => StatusCode::CONFLICT,
        ErrorKind::ExternalService => StatusCode::BAD_GATEWAY,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let status = status_for(kind);
        let body = if kind == ErrorKind::Internal {
            error!(
                "event=http_error module=server status=error error_kind={} error={}",
                kind.as_str(),
                self
            );
            json!({ "error": INTERNAL_MESSAGE })
        } else {
            json!({ "error": kind.as_str(), "details": self.to_string() })
        };
        (status, Json(body)).into_response()
    }
}

impl From<AgencyError> for ApiError {
    fn from(value: AgencyError) -> Self {
        Self::Agency(value)
    }
}

impl From<ValidationError> for ApiError {
    fn from(value: ValidationError) -> Self {
        Self::Agency(AgencyError::Validation(value))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(value: PathRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(value: QueryRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::{status_for, ApiError};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use spycat_core::ErrorKind;

    #[test]
    fn lifecycle_errors_share_conflict_status() {
        for kind in [
            ErrorKind::Conflict,
            ErrorKind::InvalidState,
            ErrorKind::InvalidTransition,
            ErrorKind::InvariantViolation,
        ] {
            assert_eq!(status_for(kind), StatusCode::CONFLICT);
        }
        assert_eq!(status_for(ErrorKind::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(status_for(ErrorKind::ExternalService), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn bad_request_maps_to_400() {
        let response = ApiError::BadRequest("bad id".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_maps_to_500() {
        let response = ApiError::Internal("worker panicked".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
