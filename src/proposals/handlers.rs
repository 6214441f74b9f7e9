// HTTP handlers for service-proposal endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::auth::middleware::AuthenticatedUser;
use crate::error::ApiError;
use crate::proposals::models::{
    CreateProposalRequest, ServiceProposal, UpdateProposalRequest, VoteResponse,
};
use crate::AppState;

/// List all service proposals
/// GET /api/services
#[utoipa::path(
    get,
    path = "/api/services",
    responses(
        (status = 200, description = "List of all service proposals", body = Vec<ServiceProposal>),
        (status = 500, description = "Internal server error")
    ),
    tag = "services"
)]
pub async fn list_proposals_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<ServiceProposal>>, ApiError> {
    tracing::debug!("Fetching all service proposals");

    let proposals = state.proposal_repository.find_all().await?;

    tracing::debug!("Retrieved {} proposals", proposals.len());
    Ok(Json(proposals))
}

/// Create a service proposal
/// POST /api/services
#[utoipa::path(
    post,
    path = "/api/services",
    request_body = CreateProposalRequest,
    responses(
        (status = 201, description = "Proposal created successfully", body = ServiceProposal),
        (status = 400, description = "Invalid input data"),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "services"
)]
pub async fn create_proposal_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateProposalRequest>,
) -> Result<(StatusCode, Json<ServiceProposal>), ApiError> {
    tracing::debug!("Creating proposal: {}", request.name);

    request.validate()?;

    let proposal = state
        .proposal_repository
        .create(&request, user.account_id, &user.email)
        .await?;

    tracing::info!("Successfully created proposal with id: {}", proposal.id);
    Ok((StatusCode::CREATED, Json(proposal)))
}

/// Update a service proposal
/// PUT /api/services/:id
#[utoipa::path(
    put,
    path = "/api/services/{id}",
    params(("id" = i64, Path, description = "Proposal ID")),
    request_body = UpdateProposalRequest,
    responses(
        (status = 200, description = "Proposal updated successfully", body = ServiceProposal),
        (status = 400, description = "Invalid input data"),
        (status = 404, description = "Proposal not found")
    ),
    tag = "services"
)]
pub async fn update_proposal_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateProposalRequest>,
) -> Result<Json<ServiceProposal>, ApiError> {
    tracing::debug!("Updating proposal with id: {}", id);

    request.validate()?;

    let proposal = state
        .proposal_repository
        .update(id, &request)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "Service".to_string(),
            id: id.to_string(),
        })?;

    tracing::info!("Successfully updated proposal with id: {}", id);
    Ok(Json(proposal))
}

/// Delete a service proposal
/// DELETE /api/services/:id
#[utoipa::path(
    delete,
    path = "/api/services/{id}",
    params(("id" = i64, Path, description = "Proposal ID")),
    responses(
        (status = 204, description = "Proposal deleted successfully"),
        (status = 404, description = "Proposal not found")
    ),
    tag = "services"
)]
pub async fn delete_proposal_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    tracing::debug!("Deleting proposal with id: {}", id);

    if !state.proposal_repository.delete(id).await? {
        return Err(ApiError::NotFound {
            resource: "Service".to_string(),
            id: id.to_string(),
        });
    }

    tracing::info!("Successfully deleted proposal with id: {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Vote for a service proposal
/// POST /api/services/:id/vote
#[utoipa::path(
    post,
    path = "/api/services/{id}/vote",
    params(("id" = i64, Path, description = "Proposal ID")),
    responses(
        (status = 200, description = "Vote counted", body = VoteResponse),
        (status = 404, description = "Proposal not found")
    ),
    tag = "services"
)]
pub async fn vote_proposal_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<VoteResponse>, ApiError> {
    let proposal = state
        .proposal_repository
        .increment_votes(id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "Service".to_string(),
            id: id.to_string(),
        })?;

    tracing::debug!("Proposal {} now has {} votes", proposal.id, proposal.votes);
    Ok(Json(VoteResponse::from(proposal)))
}
