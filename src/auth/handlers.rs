// HTTP handlers for authentication and account endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use validator::Validate;

use crate::auth::{
    error::AuthError,
    middleware::AuthenticatedUser,
    models::{
        AccountResponse, AuthResponse, ForgotPasswordRequest, ForgotPasswordResponse,
        LoginRequest, RegisterRequest, ResetPasswordRequest, UpdateAccountRequest,
        UpdatePasswordRequest, VerifyResetCodeRequest,
    },
};
use crate::AppState;

/// Register a new account
/// POST /api/auth/register
pub async fn register_handler(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AuthError> {
    request
        .validate()
        .map_err(|e| AuthError::ValidationError(e.to_string()))?;

    let response = state.auth_service.register(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Log in
/// POST /api/auth/login
pub async fn login_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    request
        .validate()
        .map_err(|e| AuthError::ValidationError(e.to_string()))?;

    let response = state.auth_service.login(request).await?;
    Ok(Json(response))
}

/// Current account profile (protected)
/// GET /api/auth/me
pub async fn me_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<AccountResponse>, AuthError> {
    let profile = state.auth_service.profile(&user.email).await?;
    Ok(Json(profile))
}

/// Request a password-reset code
/// POST /api/auth/forgot-password
pub async fn forgot_password_handler(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<Json<ForgotPasswordResponse>, AuthError> {
    request
        .validate()
        .map_err(|e| AuthError::ValidationError(e.to_string()))?;

    let code = state.auth_service.forgot_password(&request.email).await?;

    Ok(Json(ForgotPasswordResponse {
        message: format!("A password reset code was sent to {}", request.email),
        reset_code: code,
    }))
}

/// Check a reset code without consuming it
/// POST /api/auth/verify-reset-code
pub async fn verify_reset_code_handler(
    State(state): State<AppState>,
    Json(request): Json<VerifyResetCodeRequest>,
) -> Result<Json<serde_json::Value>, AuthError> {
    request
        .validate()
        .map_err(|e| AuthError::ValidationError(e.to_string()))?;

    if state
        .auth_service
        .verify_reset_code(&request.email, &request.reset_code)
        .await
    {
        Ok(Json(json!({
            "message": "Reset code is valid",
            "valid": true,
        })))
    } else {
        Err(AuthError::InvalidResetCode)
    }
}

/// Consume a reset code and set a new password
/// POST /api/auth/reset-password
pub async fn reset_password_handler(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<serde_json::Value>, AuthError> {
    request
        .validate()
        .map_err(|e| AuthError::ValidationError(e.to_string()))?;

    state
        .auth_service
        .reset_password(&request.email, &request.reset_code, &request.new_password)
        .await?;

    Ok(Json(json!({
        "message": "Password changed successfully",
    })))
}

/// Update the authenticated account's profile
/// PUT /api/accounts/:id
pub async fn update_account_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateAccountRequest>,
) -> Result<Json<AccountResponse>, AuthError> {
    request
        .validate()
        .map_err(|e| AuthError::ValidationError(e.to_string()))?;

    // Accounts may only update themselves
    if user.account_id != id {
        return Err(AuthError::Forbidden);
    }

    let response = state.auth_service.update_account(id, request).await?;
    Ok(Json(response))
}

/// Change the authenticated account's password
/// PUT /api/accounts/:id/password
pub async fn update_password_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdatePasswordRequest>,
) -> Result<StatusCode, AuthError> {
    request
        .validate()
        .map_err(|e| AuthError::ValidationError(e.to_string()))?;

    if user.account_id != id {
        return Err(AuthError::Forbidden);
    }

    state.auth_service.update_password(id, request).await?;
    Ok(StatusCode::OK)
}
