//! # API Error Types
//!
//! Unified error handling for the HTTP layer.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use school_analytics::AnalyticsError;

/// API-level errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error(transparent)]
    Access(#[from] AnalyticsError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] school_persistence::PersistenceError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Access(err) => match err {
                AnalyticsError::MissingStudentId => StatusCode::BAD_REQUEST,
                AnalyticsError::StudentNotFound(_) => StatusCode::NOT_FOUND,
                AnalyticsError::NotGuardian(_) | AnalyticsError::RoleNotPermitted(_) => {
                    StatusCode::FORBIDDEN
                }
            },
            Self::Persistence(_) | Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthenticated(_) => "UNAUTHENTICATED",
            Self::Access(err) => match err {
                AnalyticsError::MissingStudentId => "STUDENT_ID_REQUIRED",
                AnalyticsError::StudentNotFound(_) => "STUDENT_NOT_FOUND",
                AnalyticsError::NotGuardian(_) => "NOT_GUARDIAN",
                AnalyticsError::RoleNotPermitted(_) => "ROLE_NOT_PERMITTED",
            },
            Self::Persistence(_) => "PERSISTENCE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(code = self.error_code(), "Request rejected");
        }

        let body = serde_json::json!({
            "error": {
                "message": self.to_string(),
                "code": self.error_code(),
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use school_domain::Role;

    #[test]
    fn test_access_errors_map_to_client_statuses() {
        let cases = [
            (AnalyticsError::MissingStudentId, StatusCode::BAD_REQUEST, "STUDENT_ID_REQUIRED"),
            (AnalyticsError::StudentNotFound(3), StatusCode::NOT_FOUND, "STUDENT_NOT_FOUND"),
            (AnalyticsError::NotGuardian(3), StatusCode::FORBIDDEN, "NOT_GUARDIAN"),
            (
                AnalyticsError::RoleNotPermitted(Role::Parent),
                StatusCode::FORBIDDEN,
                "ROLE_NOT_PERMITTED",
            ),
        ];
        for (err, status, code) in cases {
            let err = ApiError::from(err);
            assert_eq!(err.status_code(), status);
            assert_eq!(err.error_code(), code);
        }
    }

    #[test]
    fn test_config_error_is_server_error() {
        let err = ApiError::Config("invalid SERVER_ADDR".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_unauthenticated() {
        let err = ApiError::Unauthenticated("missing X-User-Id".to_string());
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }
}
