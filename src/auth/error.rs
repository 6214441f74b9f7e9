// Authentication error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;
use tracing::{error, warn};

/// Authentication error types
#[derive(Debug)]
pub enum AuthError {
    ValidationError(String),
    InvalidCredentials,
    InvalidToken,
    ExpiredToken,
    MissingToken,
    EmailAlreadyExists,
    AccountNotFound,
    /// Authenticated account does not own the targeted resource
    Forbidden,
    /// Reset code unknown, bound to a different email, or expired
    InvalidResetCode,
    DatabaseError(String),
    PasswordHashError,
    TokenGenerationError(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AuthError::InvalidCredentials => write!(f, "Invalid email or password"),
            AuthError::InvalidToken => write!(f, "Invalid token"),
            AuthError::ExpiredToken => write!(f, "Token has expired"),
            AuthError::MissingToken => write!(f, "Missing authentication token"),
            AuthError::EmailAlreadyExists => write!(f, "Email already in use"),
            AuthError::AccountNotFound => write!(f, "Account not found"),
            AuthError::Forbidden => write!(f, "You may only modify your own account"),
            AuthError::InvalidResetCode => write!(f, "Reset code is invalid or expired"),
            AuthError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AuthError::PasswordHashError => write!(f, "Password hashing error"),
            AuthError::TokenGenerationError(msg) => write!(f, "Token generation error: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AuthError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AuthError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Invalid email or password".to_string(),
            ),
            AuthError::InvalidToken => {
                warn!("Invalid token attempt");
                (StatusCode::UNAUTHORIZED, "Invalid token".to_string())
            }
            AuthError::ExpiredToken => {
                warn!("Expired token attempt");
                (StatusCode::UNAUTHORIZED, "Token has expired".to_string())
            }
            AuthError::MissingToken => {
                warn!("Missing token in request");
                (
                    StatusCode::UNAUTHORIZED,
                    "Missing authentication token".to_string(),
                )
            }
            AuthError::EmailAlreadyExists => {
                (StatusCode::CONFLICT, "Email already in use".to_string())
            }
            AuthError::AccountNotFound => {
                (StatusCode::NOT_FOUND, "Account not found".to_string())
            }
            AuthError::Forbidden => {
                warn!("Account attempted to modify a resource it does not own");
                (
                    StatusCode::FORBIDDEN,
                    "You may only modify your own account".to_string(),
                )
            }
            AuthError::InvalidResetCode => {
                warn!("Invalid or expired reset code attempt");
                (
                    StatusCode::BAD_REQUEST,
                    "Reset code is invalid or expired".to_string(),
                )
            }
            AuthError::DatabaseError(msg) => {
                error!("Database error in auth: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AuthError::PasswordHashError => {
                error!("Password hashing error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AuthError::TokenGenerationError(msg) => {
                error!("Token generation error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::ExpiredToken => StatusCode::UNAUTHORIZED,
            AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::EmailAlreadyExists => StatusCode::CONFLICT,
            AuthError::AccountNotFound => StatusCode::NOT_FOUND,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::InvalidResetCode => StatusCode::BAD_REQUEST,
            AuthError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::PasswordHashError => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::TokenGenerationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
