use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

/// Service-level errors for the review system
#[derive(Debug)]
pub enum ReviewError {
    /// Review not found
    NotFound,

    /// Client has already reviewed this service
    DuplicateReview,

    /// Client does not own this review
    Forbidden,

    /// Validation error with details
    ValidationError(String),

    /// Service proposal not found
    ServiceNotFound,

    /// Database error
    DatabaseError(sqlx::Error),
}

impl fmt::Display for ReviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewError::NotFound => write!(f, "Review not found"),
            ReviewError::DuplicateReview => {
                write!(f, "Duplicate review: client has already reviewed this service")
            }
            ReviewError::Forbidden => {
                write!(f, "Forbidden: client does not own this review")
            }
            ReviewError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ReviewError::ServiceNotFound => write!(f, "Service not found"),
            ReviewError::DatabaseError(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for ReviewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReviewError::DatabaseError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for ReviewError {
    fn from(err: sqlx::Error) -> Self {
        ReviewError::DatabaseError(err)
    }
}

/// Error response structure for review endpoints
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: String, message: String) -> Self {
        Self {
            error,
            message,
            details: None,
        }
    }
}

/// Convert ReviewError to HTTP response
impl IntoResponse for ReviewError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ReviewError::NotFound => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Review not found".to_string(),
            ),
            ReviewError::DuplicateReview => (
                StatusCode::CONFLICT,
                "DUPLICATE_REVIEW",
                "You have already reviewed this service".to_string(),
            ),
            ReviewError::Forbidden => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "You do not own this review".to_string(),
            ),
            ReviewError::ValidationError(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            ReviewError::ServiceNotFound => (
                StatusCode::NOT_FOUND,
                "SERVICE_NOT_FOUND",
                "Service not found".to_string(),
            ),
            ReviewError::DatabaseError(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let error_response = ErrorResponse::new(error_type.to_string(), message);
        (status, Json(error_response)).into_response()
    }
}
