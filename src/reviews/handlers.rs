// HTTP handlers for review endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::json;

use crate::auth::middleware::AuthenticatedUser;
use crate::reviews::{
    models::{CreateReviewRequest, ReviewResponse},
    ReviewError,
};
use crate::AppState;

/// Create a review for a service; the reviewer is the authenticated client
/// POST /api/services/:id/reviews
pub async fn create_review_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(service_id): Path<i64>,
    Json(request): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ReviewResponse>), ReviewError> {
    let review = state
        .review_service
        .add_review(service_id, &user.email, request)
        .await?;

    Ok((StatusCode::CREATED, Json(ReviewResponse::from(review))))
}

/// All reviews for a service (public)
/// GET /api/services/:id/reviews
pub async fn get_reviews_for_service_handler(
    State(state): State<AppState>,
    Path(service_id): Path<i64>,
) -> Result<Json<Vec<ReviewResponse>>, ReviewError> {
    let reviews = state
        .review_service
        .get_reviews_for_service(service_id)
        .await?;

    Ok(Json(reviews.into_iter().map(ReviewResponse::from).collect()))
}

/// Reviews written by the authenticated client
/// GET /api/reviews/mine
pub async fn my_reviews_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<ReviewResponse>>, ReviewError> {
    let reviews = state
        .review_service
        .get_reviews_by_client(&user.email)
        .await?;

    Ok(Json(reviews.into_iter().map(ReviewResponse::from).collect()))
}

/// Whether the authenticated client has reviewed a service
/// GET /api/services/:id/has-reviewed
pub async fn has_reviewed_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(service_id): Path<i64>,
) -> Result<Json<serde_json::Value>, ReviewError> {
    let has_reviewed = state
        .review_service
        .has_reviewed(service_id, &user.email)
        .await?;

    Ok(Json(json!({
        "has_reviewed": has_reviewed,
        "client_email": user.email,
    })))
}

/// Delete a review owned by the authenticated client
/// DELETE /api/reviews/:id
pub async fn delete_review_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(review_id): Path<i64>,
) -> Result<StatusCode, ReviewError> {
    state
        .review_service
        .delete_review(review_id, &user.email)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
