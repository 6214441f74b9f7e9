use sqlx::PgPool;

use crate::error::ApiError;
use crate::proposals::models::{CreateProposalRequest, ServiceProposal, UpdateProposalRequest};

const PROPOSAL_COLUMNS: &str = "id, name, description, location, votes, proposed_by_id, \
     owner_email, end_date, reservation_link, delegation, sector, provider, institution, \
     category, average_rating, review_count, created_at, updated_at";

/// Repository for database operations on service proposals
#[derive(Clone)]
pub struct ProposalRepository {
    pool: PgPool,
}

impl ProposalRepository {
    /// Create a new ProposalRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all proposals
    pub async fn find_all(&self) -> Result<Vec<ServiceProposal>, ApiError> {
        let proposals = sqlx::query_as::<_, ServiceProposal>(&format!(
            "SELECT {} FROM service_proposals ORDER BY id",
            PROPOSAL_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(proposals)
    }

    /// Find a proposal by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<ServiceProposal>, ApiError> {
        let proposal = sqlx::query_as::<_, ServiceProposal>(&format!(
            "SELECT {} FROM service_proposals WHERE id = $1",
            PROPOSAL_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(proposal)
    }

    /// Insert a new proposal
    ///
    /// `proposed_by_id` and the `owner_email` fallback come from the
    /// authenticated creator.
    pub async fn create(
        &self,
        request: &CreateProposalRequest,
        proposed_by_id: i64,
        creator_email: &str,
    ) -> Result<ServiceProposal, ApiError> {
        let location = request.location.as_deref().unwrap_or("36.81,10.17");
        let owner_email = request.owner_email.as_deref().unwrap_or(creator_email);

        let proposal = sqlx::query_as::<_, ServiceProposal>(&format!(
            r#"
            INSERT INTO service_proposals
                (name, description, location, proposed_by_id, owner_email, end_date,
                 reservation_link, delegation, sector, provider, institution, category)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {}
            "#,
            PROPOSAL_COLUMNS
        ))
        .bind(&request.name)
        .bind(&request.description)
        .bind(location)
        .bind(proposed_by_id)
        .bind(owner_email)
        .bind(request.end_date)
        .bind(&request.reservation_link)
        .bind(&request.delegation)
        .bind(&request.sector)
        .bind(&request.provider)
        .bind(&request.institution)
        .bind(&request.category)
        .fetch_one(&self.pool)
        .await?;

        Ok(proposal)
    }

    /// Overwrite a proposal's stored fields; derived rating fields and votes
    /// are left untouched
    pub async fn update(
        &self,
        id: i64,
        request: &UpdateProposalRequest,
    ) -> Result<Option<ServiceProposal>, ApiError> {
        let proposal = sqlx::query_as::<_, ServiceProposal>(&format!(
            r#"
            UPDATE service_proposals
            SET name = $1,
                description = $2,
                location = $3,
                owner_email = $4,
                end_date = $5,
                reservation_link = $6,
                delegation = $7,
                sector = $8,
                provider = $9,
                institution = $10,
                category = $11,
                updated_at = NOW()
            WHERE id = $12
            RETURNING {}
            "#,
            PROPOSAL_COLUMNS
        ))
        .bind(&request.name)
        .bind(&request.description)
        .bind(&request.location)
        .bind(&request.owner_email)
        .bind(request.end_date)
        .bind(&request.reservation_link)
        .bind(&request.delegation)
        .bind(&request.sector)
        .bind(&request.provider)
        .bind(&request.institution)
        .bind(&request.category)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(proposal)
    }

    /// Delete a proposal; returns false when the id does not resolve
    pub async fn delete(&self, id: i64) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM service_proposals WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Increment a proposal's vote count by one
    pub async fn increment_votes(&self, id: i64) -> Result<Option<ServiceProposal>, ApiError> {
        let proposal = sqlx::query_as::<_, ServiceProposal>(&format!(
            r#"
            UPDATE service_proposals
            SET votes = votes + 1, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PROPOSAL_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(proposal)
    }
}
