// Authentication middleware for protected routes

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::auth::{error::AuthError, token::TokenService};

/// Authenticated account extractor for protected routes
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub account_id: i64,
    pub email: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Extract Authorization header
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AuthError::MissingToken)?
            .to_str()
            .map_err(|_| AuthError::InvalidToken)?;

        // Verify Bearer token format
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidToken)?;

        let jwt_secret = std::env::var("JWT_SECRET")
            .map_err(|_| AuthError::TokenGenerationError("JWT_SECRET not configured".to_string()))?;

        let token_service = TokenService::new(jwt_secret);
        let claims = token_service.validate_token(token)?;

        Ok(AuthenticatedUser {
            account_id: claims.sub,
            email: claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_auth(auth_value: &str) -> Parts {
        let req = Request::builder()
            .uri("/")
            .header(header::AUTHORIZATION, auth_value)
            .body(())
            .unwrap();

        let (parts, _) = req.into_parts();
        parts
    }

    fn parts_without_auth() -> Parts {
        let req = Request::builder().uri("/").body(()).unwrap();
        let (parts, _) = req.into_parts();
        parts
    }

    #[tokio::test]
    async fn test_missing_header_is_rejected() {
        let mut parts = parts_without_auth();
        let result = AuthenticatedUser::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::MissingToken)));
    }

    #[tokio::test]
    async fn test_non_bearer_header_is_rejected() {
        let mut parts = parts_with_auth("Basic dXNlcjpwYXNz");
        let result = AuthenticatedUser::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_valid_bearer_token_is_accepted() {
        std::env::set_var("JWT_SECRET", "middleware_test_secret");

        let token_service = TokenService::new("middleware_test_secret".to_string());
        let token = token_service.generate_token(9, "mw@example.com").unwrap();

        let mut parts = parts_with_auth(&format!("Bearer {}", token));
        let user = AuthenticatedUser::from_request_parts(&mut parts, &())
            .await
            .expect("Valid token rejected");

        assert_eq!(user.account_id, 9);
        assert_eq!(user.email, "mw@example.com");
    }
}
