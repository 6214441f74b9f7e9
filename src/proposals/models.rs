use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// A service proposal listed on the marketplace
///
/// `average_rating` and `review_count` are derived fields owned by the rating
/// calculator; nothing else writes them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ServiceProposal {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Home Cleaning")]
    pub name: String,
    pub description: String,
    /// Stored as "lat,lon" (e.g. "36.81,10.17")
    #[schema(example = "36.81,10.17")]
    pub location: String,
    #[schema(example = 12)]
    pub votes: i32,
    pub proposed_by_id: Option<i64>,
    pub owner_email: Option<String>,
    pub end_date: Option<NaiveDate>,
    pub reservation_link: Option<String>,
    pub delegation: Option<String>,
    pub sector: Option<String>,
    pub provider: Option<String>,
    pub institution: Option<String>,
    pub category: Option<String>,
    #[schema(example = 4.5, minimum = 0.0, maximum = 5.0)]
    pub average_rating: f64,
    #[schema(example = 3)]
    pub review_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for creating a service proposal
///
/// `owner_email` defaults to the creator's email and `location` to the city
/// center when omitted.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProposalRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 2000))]
    pub description: String,
    #[validate(custom = "crate::validation::validate_location")]
    pub location: Option<String>,
    pub owner_email: Option<String>,
    pub end_date: Option<NaiveDate>,
    pub reservation_link: Option<String>,
    pub delegation: Option<String>,
    pub sector: Option<String>,
    pub provider: Option<String>,
    pub institution: Option<String>,
    pub category: Option<String>,
}

/// Request DTO for updating a service proposal; all stored fields are
/// overwritten with the supplied values
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateProposalRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 2000))]
    pub description: String,
    #[validate(custom = "crate::validation::validate_location")]
    pub location: String,
    pub owner_email: Option<String>,
    pub end_date: Option<NaiveDate>,
    pub reservation_link: Option<String>,
    pub delegation: Option<String>,
    pub sector: Option<String>,
    pub provider: Option<String>,
    pub institution: Option<String>,
    pub category: Option<String>,
}

/// Response for the vote endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct VoteResponse {
    pub id: i64,
    pub name: String,
    pub votes: i32,
}

impl From<ServiceProposal> for VoteResponse {
    fn from(proposal: ServiceProposal) -> Self {
        Self {
            id: proposal.id,
            name: proposal.name,
            votes: proposal.votes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_create_request_minimal_deserialization() {
        let json = r#"{
            "name": "Home Cleaning",
            "description": "Weekly home cleaning service"
        }"#;

        let request: CreateProposalRequest =
            serde_json::from_str(json).expect("Failed to deserialize CreateProposalRequest");

        assert_eq!(request.name, "Home Cleaning");
        assert_eq!(request.location, None);
        assert_eq!(request.owner_email, None);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_bad_location() {
        let request = CreateProposalRequest {
            name: "Home Cleaning".to_string(),
            description: "desc".to_string(),
            location: Some("downtown".to_string()),
            owner_email: None,
            end_date: None,
            reservation_link: None,
            delegation: None,
            sector: None,
            provider: None,
            institution: None,
            category: None,
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_request_requires_core_fields() {
        let json = r#"{"name": "x", "description": "y"}"#;
        // location is mandatory on update
        assert!(serde_json::from_str::<UpdateProposalRequest>(json).is_err());
    }
}
