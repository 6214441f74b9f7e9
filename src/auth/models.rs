// Account data models and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Account database model
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Account response model (excludes password_hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.name,
            email: account.email,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

/// Registration request DTO
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login request DTO
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Account update request DTO
///
/// Password is optional: when absent or blank the stored hash is kept.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAccountRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub password: Option<String>,
}

/// Password change request DTO (old password re-checked)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePasswordRequest {
    #[validate(length(min = 1))]
    pub old_password: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// Forgot-password request DTO
#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email)]
    pub email: String,
}

/// Reset-password request DTO, carrying the one-time code
#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub reset_code: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// Reset-code verification request DTO
#[derive(Debug, Deserialize, Validate)]
pub struct VerifyResetCodeRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub reset_code: String,
}

/// Authentication response DTO returned by register and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub id: i64,
    pub email: String,
    pub name: String,
}

/// Forgot-password response
///
/// The code is echoed back in the response body; a mail collaborator is out
/// of scope, so clients pick it up here (development behavior carried over).
#[derive(Debug, Serialize)]
pub struct ForgotPasswordResponse {
    pub message: String,
    pub reset_code: String,
}
